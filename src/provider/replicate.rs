use super::traits::GenerationProvider;
use crate::{
    config::ReplicateConfig,
    error::ProviderError,
    models::{DesignStyle, GeneratedResult, GenerationRequest, ImageSource},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionUrls {
    pub get: Option<String>,
}

impl Prediction {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    /// Models answer with either a single URL or a list of them.
    pub fn first_output_url(&self) -> Option<String> {
        match self.output.as_ref()? {
            serde_json::Value::String(url) => Some(url.clone()),
            serde_json::Value::Array(items) => items
                .iter()
                .find_map(|item| item.as_str().map(String::from)),
            _ => None,
        }
    }
}

/// Image-to-image predictions on Replicate, one per requested style.
#[derive(Clone)]
pub struct ReplicateGenerationProvider {
    client: Client,
    api_token: String,
    model_version: String,
    base_url: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl ReplicateGenerationProvider {
    pub fn new(config: ReplicateConfig) -> Result<Self, ProviderError> {
        let api_token = config
            .api_token
            .ok_or_else(|| ProviderError::Config("REPLICATE_API_TOKEN is required".into()))?;
        let model_version = config
            .model_version
            .ok_or_else(|| ProviderError::Config("REPLICATE_MODEL_VERSION is required".into()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_token,
            model_version,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    async fn create_prediction(
        &self,
        request: &GenerationRequest,
        style: DesignStyle,
    ) -> Result<Prediction, ProviderError> {
        let body = json!({
            "version": self.model_version,
            "input": {
                "image": request.image.display_url,
                "prompt": request.prompt_for(style)
            }
        });

        let response = self
            .client
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(&self.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        Self::read_prediction(response).await
    }

    async fn fetch_prediction(&self, url: &str) -> Result<Prediction, ProviderError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        Self::read_prediction(response).await
    }

    async fn read_prediction(response: reqwest::Response) -> Result<Prediction, ProviderError> {
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::Request(format!(
                "Replicate returned {}: {}",
                status, error_text
            )));
        }
        Ok(response.json::<Prediction>().await?)
    }

    async fn generate_style(
        &self,
        request: &GenerationRequest,
        style: DesignStyle,
        index: usize,
    ) -> Result<GeneratedResult, ProviderError> {
        let started = Instant::now();
        let mut prediction = self.create_prediction(request, style).await?;
        log::info!("Replicate prediction {} ({}) is {}", prediction.id, style, prediction.status);

        while !prediction.is_terminal() {
            if started.elapsed() >= self.timeout {
                return Err(ProviderError::Timeout(self.timeout.as_secs()));
            }
            let get_url = prediction
                .urls
                .as_ref()
                .and_then(|urls| urls.get.clone())
                .ok_or_else(|| ProviderError::Response("prediction has no status URL".into()))?;

            tokio::time::sleep(self.poll_interval).await;
            prediction = self.fetch_prediction(&get_url).await?;
            log::debug!("Replicate prediction {} is {}", prediction.id, prediction.status);
        }

        if prediction.status != "succeeded" {
            let reason = prediction
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| prediction.status.clone());
            return Err(ProviderError::Response(format!(
                "prediction {} {}",
                prediction.id, reason
            )));
        }

        let url = prediction.first_output_url().ok_or(ProviderError::EmptyBatch)?;
        Ok(GeneratedResult::new(
            format!("{}-{}", request.request_id, index + 1),
            ImageSource::url(url),
            style.label(),
        ))
    }
}

#[async_trait]
impl GenerationProvider for ReplicateGenerationProvider {
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedResult>, ProviderError> {
        let calls = request
            .styles
            .iter()
            .enumerate()
            .map(|(index, style)| self.generate_style(&request, *style, index));

        futures::future::try_join_all(calls).await
    }

    fn name(&self) -> &str {
        "replicate"
    }
}
