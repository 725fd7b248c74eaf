use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::GEMINI_ENDPOINT;
use crate::config::SafetySettings;
use crate::error::{AdForgeError, Result};
use crate::models::EncodedImage;
use crate::orchestrator::ImageModel;

/// Client for the Gemini `generateContent` endpoint, fixed to multimodal
/// image output.
#[derive(Clone)]
pub struct GeminiImageClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    safety: Option<SafetySettings>,
}

impl GeminiImageClient {
    pub fn new(
        client: reqwest::Client,
        api_key: String,
        model: String,
        safety: Option<SafetySettings>,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            safety,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request_body(
        prompt: &str,
        images: &[EncodedImage],
        safety: Option<&SafetySettings>,
    ) -> GenerateContentRequest {
        let mut parts = Vec::with_capacity(1 + images.len());
        parts.push(Part::Text {
            text: prompt.to_string(),
        });
        for image in images {
            parts.push(Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type().to_string(),
                    data: image.base64_data().to_string(),
                },
            });
        }

        GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
            safety_settings: safety.map(|s| {
                vec![
                    SafetySetting::new("HARM_CATEGORY_HATE_SPEECH", s.hate_speech.as_str()),
                    SafetySetting::new(
                        "HARM_CATEGORY_DANGEROUS_CONTENT",
                        s.dangerous_content.as_str(),
                    ),
                    SafetySetting::new("HARM_CATEGORY_HARASSMENT", s.harassment.as_str()),
                    SafetySetting::new(
                        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
                        s.sexually_explicit.as_str(),
                    ),
                ]
            }),
        }
    }

    /// Pulls the first inline image artifact out of a response.
    fn extract_image(response: GenerateContentResponse) -> Result<EncodedImage> {
        if let Some(feedback) = response.prompt_feedback {
            if let Some(reason) = feedback.block_reason {
                let message = feedback
                    .block_reason_message
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(AdForgeError::Blocked(message));
            }
        }

        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(AdForgeError::NoImage)?;

        let content = candidate.content.ok_or(AdForgeError::NoImage)?;

        let inline_data = content
            .parts
            .into_iter()
            .find_map(|part| part.inline_data)
            .ok_or(AdForgeError::NoImage)?;

        Ok(EncodedImage::from_parts(
            inline_data.mime_type,
            inline_data.data,
        ))
    }

    async fn generate_impl(
        &self,
        prompt: &str,
        images: &[EncodedImage],
    ) -> Result<EncodedImage> {
        let url = format!("{}/{}:generateContent", GEMINI_ENDPOINT, self.model);
        let body = Self::build_request_body(prompt, images, self.safety.as_ref());

        log::info!(
            "Invoking model {} with {} image part(s)",
            self.model,
            images.len()
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::error!("Gemini returned {}: {}", status, truncate(&text, 200));
            return Err(AdForgeError::Api {
                status: status.as_u16(),
                message: truncate(&text, 500).to_string(),
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AdForgeError::Response(e.to_string()))?;

        Self::extract_image(parsed)
    }
}

#[async_trait]
impl ImageModel for GeminiImageClient {
    async fn generate(&self, prompt: &str, images: &[EncodedImage]) -> Result<EncodedImage> {
        self.generate_impl(prompt, images).await
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// Request/Response wire types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_settings: Option<Vec<SafetySetting>>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

impl SafetySetting {
    fn new(category: &str, threshold: &str) -> Self {
        Self {
            category: category.to_string(),
            threshold: threshold.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<ResponseInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}
