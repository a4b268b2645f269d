//! RoomID: capture a room photo, pick a room type, and generate redesign
//! previews through a pluggable image-generation provider.

pub mod capture;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod provider;
pub mod session;
pub mod workflow;

pub use capture::Capture;
pub use config::{BedrockConfig, ProviderKind, ReplicateConfig, RoomIdConfig};
pub use error::{CaptureError, ProviderError, Result, RoomIdError, WorkflowWarning};
pub use models::{
    DesignStyle, FileCandidate, GeneratedResult, GenerationRequest, ImageFormat, ImageSource,
    Notification, NotificationLevel, RoomCatalog, RoomType, UploadedImage,
};
pub use provider::{
    build_provider, BedrockGenerationProvider, GenerationProvider, MockGenerationProvider,
    ReplicateGenerationProvider,
};
pub use session::DesignSession;
pub use workflow::{Event, GeneratorPhase, Stage, WorkflowState};
