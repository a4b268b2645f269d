use crate::{
    capture::DEFAULT_MAX_UPLOAD_BYTES,
    error::{Result, RoomIdError},
    logger::LogLevel,
    models::{DesignStyle, RoomCatalog},
    provider::mock::DEFAULT_MOCK_DELAY_MS,
};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    Mock,
    Bedrock,
    Replicate,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::Bedrock => "bedrock",
            ProviderKind::Replicate => "replicate",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Some(ProviderKind::Mock),
            "bedrock" => Some(ProviderKind::Bedrock),
            "replicate" => Some(ProviderKind::Replicate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
    pub image_size: u32,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: "amazon.titan-image-generator-v1".to_string(),
            image_size: 1024,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION")
            .or_else(|_| env::var("AWS_DEFAULT_REGION"))
            .ok();
        let access_key = env::var("AWS_ACCESS_KEY_ID").ok();
        let secret_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
        let defaults = Self::default();

        BedrockConfig {
            region,
            access_key,
            secret_key,
            model_id: env::var("ROOMID_BEDROCK_MODEL").unwrap_or(defaults.model_id),
            image_size: env::var("ROOMID_BEDROCK_IMAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.image_size),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    pub api_token: Option<String>,
    pub model_version: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for ReplicateConfig {
    fn default() -> Self {
        ReplicateConfig {
            api_token: None,
            model_version: None,
            base_url: "https://api.replicate.com".to_string(),
            timeout_secs: 120,
            poll_interval_ms: 1000,
        }
    }
}

impl ReplicateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        ReplicateConfig {
            api_token: env::var("REPLICATE_API_TOKEN").ok(),
            model_version: env::var("REPLICATE_MODEL_VERSION").ok(),
            base_url: env::var("REPLICATE_BASE_URL").unwrap_or(defaults.base_url),
            timeout_secs: env::var("ROOMID_REPLICATE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_secs),
            poll_interval_ms: defaults.poll_interval_ms,
        }
    }

    pub fn with_credentials(
        mut self,
        api_token: impl Into<String>,
        model_version: impl Into<String>,
    ) -> Self {
        self.api_token = Some(api_token.into());
        self.model_version = Some(model_version.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Clone)]
pub struct RoomIdConfig {
    pub provider: ProviderKind,
    pub catalog: RoomCatalog,
    pub styles: Vec<DesignStyle>,
    pub mock_delay_ms: u64,
    pub max_upload_bytes: usize,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub bedrock: BedrockConfig,
    pub replicate: ReplicateConfig,
}

impl Default for RoomIdConfig {
    fn default() -> Self {
        RoomIdConfig {
            provider: ProviderKind::Mock,
            catalog: RoomCatalog::Dashboard,
            styles: DesignStyle::default_batch(),
            mock_delay_ms: DEFAULT_MOCK_DELAY_MS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: LogLevel::Info,
            log_json: false,
            bedrock: BedrockConfig::default(),
            replicate: ReplicateConfig::default(),
        }
    }
}

impl RoomIdConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `ROOMID_*` plus the provider-specific variables. Workflow
    /// settings that do not parse are a configuration error; the Bedrock and
    /// Replicate numeric settings fall back to their defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let provider = match env::var("ROOMID_PROVIDER") {
            Ok(value) => ProviderKind::from_name(&value).ok_or_else(|| {
                RoomIdError::Config(format!("unknown provider '{}'", value))
            })?,
            Err(_) => defaults.provider,
        };

        let catalog = match env::var("ROOMID_CATALOG") {
            Ok(value) => RoomCatalog::from_name(&value).ok_or_else(|| {
                RoomIdError::Config(format!("unknown room catalog '{}'", value))
            })?,
            Err(_) => defaults.catalog,
        };

        let styles = match env::var("ROOMID_STYLES") {
            Ok(value) => parse_styles(&value)?,
            Err(_) => defaults.styles,
        };

        let mock_delay_ms = match env::var("ROOMID_MOCK_DELAY_MS") {
            Ok(value) => parse_mock_delay_ms(&value)?,
            Err(_) => defaults.mock_delay_ms,
        };

        let max_upload_bytes = match env::var("ROOMID_MAX_UPLOAD_MB") {
            Ok(value) => parse_upload_limit_mb(&value)?,
            Err(_) => defaults.max_upload_bytes,
        };

        let log_level = match env::var("ROOMID_LOG_LEVEL") {
            Ok(value) => LogLevel::from_name(&value).ok_or_else(|| {
                RoomIdError::Config(format!("unknown log level '{}'", value))
            })?,
            Err(_) => defaults.log_level,
        };

        let log_json = env::var("ROOMID_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");

        Ok(RoomIdConfig {
            provider,
            catalog,
            styles,
            mock_delay_ms,
            max_upload_bytes,
            log_level,
            log_json,
            bedrock: BedrockConfig::from_env(),
            replicate: ReplicateConfig::from_env(),
        })
    }

    pub fn with_provider(mut self, provider: ProviderKind) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_catalog(mut self, catalog: RoomCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_styles(mut self, styles: Vec<DesignStyle>) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_mock_delay_ms(mut self, delay_ms: u64) -> Self {
        self.mock_delay_ms = delay_ms;
        self
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.provider = ProviderKind::Bedrock;
        self
    }

    pub fn with_replicate(mut self, config: ReplicateConfig) -> Self {
        self.replicate = config;
        self.provider = ProviderKind::Replicate;
        self
    }
}

pub fn parse_styles(value: &str) -> Result<Vec<DesignStyle>> {
    let styles = value
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(|part| {
            DesignStyle::from_name(part)
                .ok_or_else(|| RoomIdError::Config(format!("unknown design style '{}'", part.trim())))
        })
        .collect::<Result<Vec<_>>>()?;

    if styles.is_empty() {
        return Err(RoomIdError::Config("at least one design style is required".into()));
    }
    Ok(styles)
}

pub fn parse_mock_delay_ms(value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        RoomIdError::Config(format!("invalid mock delay '{}', expected milliseconds", value))
    })
}

/// Converts a megabyte count to bytes, refusing values that overflow `usize`.
pub fn parse_upload_limit_mb(value: &str) -> Result<usize> {
    let mb: usize = value.trim().parse().map_err(|_| {
        RoomIdError::Config(format!("invalid upload limit '{}', expected megabytes", value))
    })?;
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| RoomIdError::Config(format!("upload limit of {} MB is too large", mb)))
}
