use super::traits::GenerationProvider;
use crate::{
    error::ProviderError,
    models::{GeneratedResult, GenerationRequest, ImageSource},
};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_MOCK_DELAY_MS: u64 = 3000;

/// Stands in for a real service: waits, then hands back the same three
/// placeholder designs every time.
#[derive(Debug, Clone)]
pub struct MockGenerationProvider {
    delay: Duration,
    batch: Vec<GeneratedResult>,
}

impl Default for MockGenerationProvider {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_MOCK_DELAY_MS),
            batch: placeholder_batch(),
        }
    }
}

impl MockGenerationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_batch(mut self, batch: Vec<GeneratedResult>) -> Self {
        self.batch = batch;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

pub fn placeholder_batch() -> Vec<GeneratedResult> {
    vec![
        GeneratedResult::new(
            "1",
            ImageSource::url("https://images.unsplash.com/photo-1616047006789-b7af5afb8c20"),
            "Modern",
        ),
        GeneratedResult::new(
            "2",
            ImageSource::url("https://images.unsplash.com/photo-1616486338812-3dadae4b4ace"),
            "Scandinavian",
        ),
        GeneratedResult::new(
            "3",
            ImageSource::url("https://images.unsplash.com/photo-1616486701797-0f33f61038df"),
            "Industrial",
        ),
    ]
}

#[async_trait]
impl GenerationProvider for MockGenerationProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedResult>, ProviderError> {
        log::info!(
            "Mock generation #{} for {} ({} bytes), waiting {}ms",
            request.request_id,
            request.room_type.label(),
            request.image.size(),
            self.delay.as_millis()
        );
        tokio::time::sleep(self.delay).await;
        Ok(self.batch.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DesignStyle, ImageFormat, RoomType, UploadedImage};

    #[tokio::test]
    async fn test_mock_returns_placeholder_batch() {
        let provider = MockGenerationProvider::new().with_delay(Duration::from_millis(1));
        let request = GenerationRequest {
            request_id: 1,
            image: UploadedImage::new("room.png", ImageFormat::Png, vec![0u8; 4], None),
            room_type: RoomType::Bathroom,
            styles: DesignStyle::default_batch(),
        };

        let results = provider.generate(request).await.unwrap();
        let styles: Vec<_> = results.iter().map(|r| r.style.as_str()).collect();
        assert_eq!(styles, vec!["Modern", "Scandinavian", "Industrial"]);
        assert_eq!(results[0].id, "1");
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(
            MockGenerationProvider::default().delay(),
            Duration::from_millis(3000)
        );
    }
}
