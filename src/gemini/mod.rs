pub mod image_client;

pub use image_client::GeminiImageClient;

use crate::config::GeminiConfig;
use crate::error::{AdForgeError, Result};

/// Default image model. Deployment config may override it; callers never can.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    image_client: GeminiImageClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .ok_or_else(|| {
                AdForgeError::Config("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        let model = config
            .model
            .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string());

        let http = reqwest::Client::builder()
            .build()
            .map_err(AdForgeError::Network)?;

        Ok(Self {
            image_client: GeminiImageClient::new(http, api_key, model, config.safety),
        })
    }

    pub fn image(&self) -> &GeminiImageClient {
        &self.image_client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_requires_api_key() {
        // explicit key wins; no env fallback needed
        let client = GeminiClient::new(GeminiConfig::new().with_api_key("test-key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_model_defaults_when_unset() {
        let client = GeminiClient::new(GeminiConfig::new().with_api_key("test-key")).unwrap();
        assert_eq!(client.image().model(), DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_model_override() {
        let config = GeminiConfig::new()
            .with_api_key("test-key")
            .with_model("nano-banana-pro-preview");
        let client = GeminiClient::new(config).unwrap();
        assert_eq!(client.image().model(), "nano-banana-pro-preview");
    }
}
