use std::env;

use crate::error::{AdForgeError, Result};

/// Blocking threshold applied to a safety category. Deployment-time only; the
/// request schema never exposes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

impl SafetyThreshold {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyThreshold::BlockNone => "BLOCK_NONE",
            SafetyThreshold::BlockOnlyHigh => "BLOCK_ONLY_HIGH",
            SafetyThreshold::BlockMediumAndAbove => "BLOCK_MEDIUM_AND_ABOVE",
            SafetyThreshold::BlockLowAndAbove => "BLOCK_LOW_AND_ABOVE",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "BLOCK_NONE" | "NONE" => Ok(SafetyThreshold::BlockNone),
            "BLOCK_ONLY_HIGH" | "ONLY_HIGH" => Ok(SafetyThreshold::BlockOnlyHigh),
            "BLOCK_MEDIUM_AND_ABOVE" | "MEDIUM_AND_ABOVE" => {
                Ok(SafetyThreshold::BlockMediumAndAbove)
            }
            "BLOCK_LOW_AND_ABOVE" | "LOW_AND_ABOVE" => Ok(SafetyThreshold::BlockLowAndAbove),
            other => Err(AdForgeError::Config(format!(
                "Unknown safety threshold: {}",
                other
            ))),
        }
    }
}

/// Per-category safety thresholds sent with every generation call when set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetySettings {
    pub hate_speech: SafetyThreshold,
    pub dangerous_content: SafetyThreshold,
    pub harassment: SafetyThreshold,
    pub sexually_explicit: SafetyThreshold,
}

impl SafetySettings {
    /// The same threshold for all four categories.
    pub fn uniform(threshold: SafetyThreshold) -> Self {
        Self {
            hate_speech: threshold,
            dangerous_content: threshold,
            harassment: threshold,
            sexually_explicit: threshold,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub safety: Option<SafetySettings>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: None,
            safety: None,
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY").ok();
        let model = env::var("GEMINI_MODEL").ok();
        let safety = env::var("GEMINI_SAFETY_THRESHOLD")
            .ok()
            .and_then(|value| SafetyThreshold::parse(&value).ok())
            .map(SafetySettings::uniform);

        GeminiConfig {
            api_key,
            model,
            safety,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_safety(mut self, safety: SafetySettings) -> Self {
        self.safety = Some(safety);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub gemini: Option<GeminiConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            gemini: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let port = env::var("PORT").ok().and_then(|port| port.parse().ok());

        Config {
            port,
            gemini: Some(GeminiConfig::from_env()),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = Some(config);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_round_trip() {
        for threshold in [
            SafetyThreshold::BlockNone,
            SafetyThreshold::BlockOnlyHigh,
            SafetyThreshold::BlockMediumAndAbove,
            SafetyThreshold::BlockLowAndAbove,
        ] {
            assert_eq!(SafetyThreshold::parse(threshold.as_str()).unwrap(), threshold);
        }
        assert!(SafetyThreshold::parse("BLOCK_EVERYTHING").is_err());
    }

    #[test]
    fn test_uniform_settings() {
        let settings = SafetySettings::uniform(SafetyThreshold::BlockMediumAndAbove);
        assert_eq!(settings.hate_speech, SafetyThreshold::BlockMediumAndAbove);
        assert_eq!(settings.sexually_explicit, SafetyThreshold::BlockMediumAndAbove);
    }

    #[test]
    fn test_builders() {
        let config = Config::new().with_port(3000).with_gemini(
            GeminiConfig::new()
                .with_api_key("key")
                .with_model("gemini-2.5-flash-image"),
        );
        assert_eq!(config.port, Some(3000));
        let gemini = config.gemini.unwrap();
        assert_eq!(gemini.api_key.as_deref(), Some("key"));
        assert_eq!(gemini.model.as_deref(), Some("gemini-2.5-flash-image"));
        assert!(gemini.safety.is_none());
    }
}
