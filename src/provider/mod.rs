pub mod bedrock;
pub mod mock;
pub mod replicate;
pub mod traits;

use crate::config::{ProviderKind, RoomIdConfig};
use crate::error::Result;
use std::sync::Arc;
use std::time::Duration;

pub use bedrock::BedrockGenerationProvider;
pub use mock::MockGenerationProvider;
pub use replicate::ReplicateGenerationProvider;
pub use traits::GenerationProvider;

/// Builds the provider selected by `config.provider`.
pub async fn build_provider(config: &RoomIdConfig) -> Result<Arc<dyn GenerationProvider>> {
    let provider: Arc<dyn GenerationProvider> = match config.provider {
        ProviderKind::Mock => Arc::new(
            MockGenerationProvider::new().with_delay(Duration::from_millis(config.mock_delay_ms)),
        ),
        ProviderKind::Bedrock => {
            Arc::new(BedrockGenerationProvider::new(config.bedrock.clone()).await?)
        }
        ProviderKind::Replicate => {
            Arc::new(ReplicateGenerationProvider::new(config.replicate.clone())?)
        }
    };

    log::info!("Using {} generation provider", provider.name());
    Ok(provider)
}
