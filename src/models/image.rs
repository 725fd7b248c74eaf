use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{AdForgeError, Result};

/// Image MIME types the generation flow accepts as inputs.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

pub fn is_accepted_image_type(mime_type: &str) -> bool {
    ACCEPTED_IMAGE_TYPES.contains(&mime_type)
}

/// Detects the image MIME type from magic bytes.
fn sniff_mime_type(data: &[u8]) -> Option<&'static str> {
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    None
}

/// A self-describing encoded image: a MIME type plus the base64 encoding of the
/// image bytes. Canonical textual form is `data:<mimetype>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    /// Builds an encoded image from raw bytes and the content type declared by
    /// the upload. A missing or non-specific content type falls back to magic
    /// byte detection.
    pub fn from_bytes(content_type: Option<&str>, bytes: &[u8]) -> Result<Self> {
        let mime_type = match content_type {
            Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
            _ => sniff_mime_type(bytes)
                .ok_or_else(|| {
                    AdForgeError::Validation("could not determine image type".to_string())
                })?
                .to_string(),
        };

        Ok(Self {
            mime_type,
            data: STANDARD.encode(bytes),
        })
    }

    /// Builds an encoded image from an already base64-encoded payload, e.g. a
    /// generation response part.
    pub fn from_parts(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Parses the canonical `data:<mimetype>;base64,<payload>` form.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| AdForgeError::Decode("missing data: prefix".to_string()))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| AdForgeError::Decode("missing base64 marker".to_string()))?;
        if mime_type.is_empty() {
            return Err(AdForgeError::Decode("empty MIME type".to_string()));
        }
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without the MIME prefix.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    /// Decodes the payload back into the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.data)
            .map_err(|e| AdForgeError::Decode(e.to_string()))
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_data_url())
    }
}

impl TryFrom<String> for EncodedImage {
    type Error = AdForgeError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_data_url(&value)
    }
}

impl From<EncodedImage> for String {
    fn from(image: EncodedImage) -> Self {
        image.to_data_url()
    }
}
