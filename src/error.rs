use thiserror::Error;

/// Reasons a dropped or picked file is refused by capture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("No file was provided")]
    NoFile,
    #[error("Only one image can be uploaded at a time ({0} files received)")]
    TooManyFiles(usize),
    #[error("File '{0}' is empty")]
    EmptyFile(String),
    #[error("File '{name}' is not a supported image ({detail}); use JPEG or PNG")]
    UnsupportedType { name: String, detail: String },
    #[error("File '{name}' is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { name: String, size: usize, limit: usize },
}

/// Generate attempted without its preconditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowWarning {
    #[error("Please upload an image and select a room type first!")]
    MissingInputs,
    #[error("Room type '{0}' is not offered here")]
    RoomTypeUnavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Request error: {0}")]
    Request(String),
    #[error("Response error: {0}")]
    Response(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("AWS error: {0}")]
    Aws(String),
    #[error("AWS service error: {0}")]
    AwsService(String),
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Generation timed out after {0}s")]
    Timeout(u64),
    #[error("Provider returned no designs")]
    EmptyBatch,
    #[error("Generation was cancelled")]
    Cancelled,
    #[error("Provider crashed: {0}")]
    Crashed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Serialization(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum RoomIdError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Workflow(#[from] WorkflowWarning),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RoomIdError>;
