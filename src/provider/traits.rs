use crate::{
    error::ProviderError,
    models::{GeneratedResult, GenerationRequest},
};
use async_trait::async_trait;

/// The boundary where a real image-generation service is invoked.
///
/// One call is one attempt: implementations return the whole batch or an
/// error and never retry on their own.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedResult>, ProviderError>;

    fn name(&self) -> &str;
}
