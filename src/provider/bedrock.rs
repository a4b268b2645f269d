use super::traits::GenerationProvider;
use crate::{
    config::BedrockConfig,
    error::ProviderError,
    models::{DesignStyle, GeneratedResult, GenerationRequest, ImageSource},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;

const TITAN_IMAGE_V1: &str = "amazon.titan-image-generator-v1";
const TITAN_IMAGE_V2: &str = "amazon.titan-image-generator-v2:0";

#[derive(Serialize, Deserialize)]
pub struct TitanImageResponse {
    pub images: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Amazon Titan image variations over the uploaded photo, one per style.
#[derive(Clone)]
pub struct BedrockGenerationProvider {
    client: Client,
    model_id: String,
    image_size: u32,
}

impl BedrockGenerationProvider {
    pub async fn new(config: BedrockConfig) -> Result<Self, ProviderError> {
        if !Self::supports_model(&config.model_id) {
            return Err(ProviderError::Config(format!(
                "Unsupported image model: {}",
                config.model_id
            )));
        }

        let mut loader = aws_config::from_env();
        if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
            loader = loader.credentials_provider(
                aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "roomid",
                ),
            );
        }
        if let Some(region) = &config.region {
            loader = loader.region(aws_sdk_bedrockruntime::config::Region::new(region.clone()));
        }
        let aws_config = loader.load().await;

        Ok(Self::with_client(Client::new(&aws_config), config))
    }

    pub fn with_client(client: Client, config: BedrockConfig) -> Self {
        Self {
            client,
            model_id: config.model_id,
            image_size: config.image_size,
        }
    }

    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (TITAN_IMAGE_V1, "Titan Image Generator G1", "Amazon"),
            (TITAN_IMAGE_V2, "Titan Image Generator G1 v2", "Amazon"),
        ]
    }

    pub fn supports_model(model_id: &str) -> bool {
        Self::supported_models()
            .iter()
            .any(|(id, _, _)| *id == model_id)
    }

    async fn generate_style(
        &self,
        request: &GenerationRequest,
        image_b64: &str,
        style: DesignStyle,
        index: usize,
    ) -> Result<GeneratedResult, ProviderError> {
        let payload = variation_payload(&request.prompt_for(style), image_b64, self.image_size);
        let request_json = serde_json::to_string(&payload)?;

        log::info!("Generating {} variation with model: {}", style, self.model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    log::error!("Bedrock service error code: {:?}", service_error.code());
                    ProviderError::AwsService(format!(
                        "{} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    ProviderError::Aws(e.to_string())
                }
            })?;

        let image_data = parse_titan_response(&response.body.into_inner())?;

        Ok(GeneratedResult::new(
            format!("{}-{}", request.request_id, index + 1),
            ImageSource::Base64 {
                mime_type: "image/png".to_string(),
                data: image_data,
            },
            style.label(),
        ))
    }
}

pub fn variation_payload(prompt: &str, image_b64: &str, size: u32) -> serde_json::Value {
    json!({
        "taskType": "IMAGE_VARIATION",
        "imageVariationParams": {
            "text": prompt,
            "images": [image_b64]
        },
        "imageGenerationConfig": {
            "numberOfImages": 1,
            "quality": "standard",
            "cfgScale": 8.0,
            "width": size,
            "height": size
        }
    })
}

pub fn parse_titan_response(body: &[u8]) -> Result<String, ProviderError> {
    let response_str =
        std::str::from_utf8(body).map_err(|e| ProviderError::Response(e.to_string()))?;
    let titan_response: TitanImageResponse = serde_json::from_str(response_str)
        .map_err(|e| ProviderError::Response(e.to_string()))?;

    if let Some(error) = titan_response.error.filter(|e| !e.is_empty()) {
        return Err(ProviderError::Response(error));
    }

    titan_response
        .images
        .into_iter()
        .next()
        .ok_or(ProviderError::EmptyBatch)
}

#[async_trait]
impl GenerationProvider for BedrockGenerationProvider {
    /// All styles are requested together; the batch fails as a whole if any
    /// variation fails.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedResult>, ProviderError> {
        let image_b64 = request.image.to_base64();
        let calls = request
            .styles
            .iter()
            .enumerate()
            .map(|(index, style)| self.generate_style(&request, &image_b64, *style, index));

        futures::future::try_join_all(calls).await
    }

    fn name(&self) -> &str {
        "bedrock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variation_payload_shape() {
        let payload = variation_payload("a modern kitchen", "QUJD", 512);
        assert_eq!(payload["taskType"], "IMAGE_VARIATION");
        assert_eq!(payload["imageVariationParams"]["images"][0], "QUJD");
        assert_eq!(payload["imageGenerationConfig"]["width"], 512);
        assert_eq!(payload["imageGenerationConfig"]["numberOfImages"], 1);
    }

    #[test]
    fn test_parse_titan_response() {
        let body = br#"{"images": ["aW1n"], "error": null}"#;
        assert_eq!(parse_titan_response(body).unwrap(), "aW1n");

        let empty = br#"{"images": []}"#;
        assert_eq!(parse_titan_response(empty).unwrap_err(), ProviderError::EmptyBatch);

        let failed = br#"{"images": [], "error": "content filtered"}"#;
        assert!(matches!(
            parse_titan_response(failed).unwrap_err(),
            ProviderError::Response(msg) if msg == "content filtered"
        ));
    }

    #[test]
    fn test_supported_models() {
        assert!(BedrockGenerationProvider::supports_model(TITAN_IMAGE_V1));
        assert!(!BedrockGenerationProvider::supports_model("stability.sd3-large-v1:0"));
    }
}
