use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::logger;
use crate::models::{AdRequest, EncodedImage};

/// The external multimodal image model. One implementation talks to Gemini;
/// tests substitute their own.
#[async_trait]
pub trait ImageModel: Send + Sync {
    /// Generates one image from a text prompt and an ordered list of input
    /// images. Returns the first image artifact of the response.
    async fn generate(&self, prompt: &str, images: &[EncodedImage]) -> Result<EncodedImage>;
}

/// Builds the advertisement prompt and drives the single external generation
/// call per request.
#[derive(Clone)]
pub struct Orchestrator {
    model: Arc<dyn ImageModel>,
}

impl Orchestrator {
    pub fn new(model: Arc<dyn ImageModel>) -> Self {
        Self { model }
    }

    /// Fills the fixed advertisement template with the request's options. The
    /// wording references the attached images positionally, so callers must
    /// keep the (model, product) attachment order.
    pub fn build_prompt(request: &AdRequest) -> String {
        format!(
            "A {} photograph of a fashionable model {} the {}. The scene is a {}. \
             Professional studio lighting, high quality, photorealistic, commercial \
             advertisement look. Use the first image as the model's appearance and \
             the second image as the product.",
            request.style, request.action, request.product_name, request.background
        )
    }

    /// Runs one generation: validate, fill the template, call the model once
    /// with `[prompt, model image, product image]`. No retries, no caching;
    /// every failure is terminal for the request.
    pub async fn generate(&self, request: AdRequest) -> Result<EncodedImage> {
        request.validate()?;

        let prompt = Self::build_prompt(&request);
        log::debug!("Ad prompt: {}", prompt);
        log::info!(
            "Generating ad image ({} + {})",
            request.model_image.mime_type(),
            request.product_image.mime_type()
        );

        let images = [request.model_image, request.product_image];
        let result = {
            let _timer = logger::timer("ad image generation");
            self.model.generate(&prompt, &images).await
        };

        match &result {
            Ok(image) => log::info!("Generated {} ({} base64 chars)", image.mime_type(), image.size()),
            Err(e) => log::error!("Ad generation failed: {}", e),
        }

        result
    }
}
