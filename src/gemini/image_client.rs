use super::ImageGenerator;
use crate::{
    config::GeminiConfig,
    error::{Result, SketchError},
    models::{GenerateContentRequest, GenerateContentResponse},
};
use async_trait::async_trait;
use serde_json::Value;

/// Calls the Gemini `generateContent` endpoint. One attempt per call: no
/// retry, no timeout beyond what the transport imposes.
#[derive(Clone)]
pub struct ImageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ImageClient {
    pub fn new(http: reqwest::Client, config: &GeminiConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key()?.trim().to_string(),
        })
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ImageGenerator for ImageClient {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(&request.model);
        log::info!("Generating sketch with model: {}", request.model);
        log::debug!(
            "Requested aspect ratio: {}",
            request.generation_config.image_config.aspect_ratio
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image service request failed: {}", e);
                if e.is_builder() {
                    SketchError::Config(format!("invalid image service request: {}", e))
                } else {
                    SketchError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SketchError::Network(format!("failed to read response body: {}", e)))?;

        if !status.is_success() {
            let message = api_error_message(&body);
            log::error!("Image service returned {}: {}", status, message);
            return Err(SketchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!("Unparseable image service response: {}", e);
            SketchError::Response(e.to_string())
        })
    }
}

/// `error.message` from a Google API error body, or a trimmed copy of the body.
fn api_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    serde_json::from_str::<Value>(trimmed)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| trimmed.chars().take(500).collect())
}
