use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdForgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid form data: {0}")]
    Validation(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Response error: {0}")]
    Response(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Content blocked: {0}")]
    Blocked(String),

    #[error("Image generation failed. Please try again.")]
    NoImage,
}

impl AdForgeError {
    /// The message shown to the end user. Validation failures collapse to one
    /// generic message with no per-field detail; upstream failures keep their
    /// underlying message, prefixed for context.
    pub fn user_message(&self) -> String {
        match self {
            AdForgeError::Validation(_) => "Invalid form data.".to_string(),
            AdForgeError::NoImage => self.to_string(),
            other => format!("Image generation error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdForgeError>;
