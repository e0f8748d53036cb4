pub mod image_client;

use crate::{
    config::GeminiConfig,
    error::Result,
    interpret::interpret_outcome,
    logger,
    models::{GenerateContentRequest, GenerateContentResponse, SketchImage, SketchRequest},
};
use async_trait::async_trait;
use std::sync::Arc;

pub use image_client::ImageClient;

/// The image-generation capability: one request in, one raw response (or a
/// failure) out. The core never assumes the response contains an image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

#[async_trait]
impl<G: ImageGenerator + ?Sized> ImageGenerator for Arc<G> {
    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        (**self).generate_content(request).await
    }
}

/// Entry point holding the configured Gemini clients.
#[derive(Clone)]
pub struct GeminiClient {
    image_client: ImageClient,
    model: String,
}

impl GeminiClient {
    /// Fails with a configuration error when the api key is missing, before
    /// any request can be attempted.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    pub fn with_http_client(http: reqwest::Client, config: &GeminiConfig) -> Result<Self> {
        let image_client = ImageClient::new(http, config)?;
        log::debug!("Gemini client ready for model {}", config.model);
        Ok(Self {
            image_client,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn sketch_generator(&self) -> SketchGenerator<ImageClient> {
        SketchGenerator::new(self.image_client.clone(), self.model.clone())
    }
}

/// Prompt building, the generation call and response interpretation, in
/// that order. Stateless; safe to call repeatedly.
#[derive(Clone)]
pub struct SketchGenerator<G> {
    generator: G,
    model: String,
}

impl<G: ImageGenerator> SketchGenerator<G> {
    pub fn new(generator: G, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn generate(&self, request: &SketchRequest) -> Result<SketchImage> {
        let _timer = logger::timer("sketch generation");
        let payload = request.to_prompt().into_request(self.model.clone());
        log::debug!(
            "Sketch request: style={}, aspect_ratio={}, titled={}",
            request.style,
            request.aspect_ratio,
            !request.title.trim().is_empty()
        );

        let outcome = self.generator.generate_content(&payload).await;
        let result = interpret_outcome(outcome);
        match &result {
            Ok(image) => log::info!("✅ Sketch generated ({})", image.mime_type),
            Err(e) => log::error!("Sketch generation failed: {}", e),
        }
        result
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedGenerator;
    use super::*;
    use crate::classify::ErrorKind;
    use crate::error::SketchError;
    use crate::models::{AspectRatio, SketchStyle};

    #[tokio::test]
    async fn test_generate_returns_data_uri_and_sends_directive() {
        let fake = Arc::new(ScriptedGenerator::new(vec![ScriptedGenerator::image("AAAA")]));
        let generator = SketchGenerator::new(fake.clone(), "gemini-2.5-flash-image");
        let request = SketchRequest::new("weekly planning")
            .with_aspect_ratio(AspectRatio::Classic4x3)
            .with_style(SketchStyle::Charcoal);

        let image = generator.generate(&request).await.unwrap();
        assert_eq!(image.to_data_uri(), "data:image/png;base64,AAAA");

        let sent = fake.requests.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].model, "gemini-2.5-flash-image");
        assert_eq!(sent[0].generation_config.image_config.aspect_ratio, "4:3");
        let prompt = sent[0].contents[0].parts[0].text.as_deref().unwrap();
        assert!(prompt.contains(SketchStyle::Charcoal.visual_clause()));
    }

    #[tokio::test]
    async fn test_generate_surfaces_refusal() {
        let fake = ScriptedGenerator::new(vec![ScriptedGenerator::text("content flagged")]);
        let generator = SketchGenerator::new(fake, "m");
        let err = generator
            .generate(&SketchRequest::new("something"))
            .await
            .unwrap_err();
        assert!(matches!(&err, SketchError::ModelRefusal(detail) if detail == "content flagged"));
        assert_eq!(err.classify().kind, ErrorKind::ContentPolicy);
        assert_eq!(err.classify().title, "Content compliance issue");
    }

    #[tokio::test]
    async fn test_generate_surfaces_transport_failure() {
        let fake = ScriptedGenerator::new(vec![Err(SketchError::Network(
            "Failed to fetch".into(),
        ))]);
        let generator = SketchGenerator::new(fake, "m");
        let err = generator
            .generate(&SketchRequest::new("something"))
            .await
            .unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.classify().kind, ErrorKind::NetworkError);
    }

    #[test]
    fn test_client_construction_fails_fast_without_key() {
        assert!(matches!(
            GeminiClient::new(&GeminiConfig::new()),
            Err(SketchError::Config(_))
        ));
        let client = GeminiClient::new(&GeminiConfig::new().with_api_key("k")).unwrap();
        assert_eq!(client.model(), crate::config::DEFAULT_IMAGE_MODEL);
        assert_eq!(client.sketch_generator().model(), client.model());
    }
}
