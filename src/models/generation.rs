use serde::{Deserialize, Serialize};

use super::image::{is_accepted_image_type, EncodedImage};
use crate::error::{AdForgeError, Result};

/// One advertisement generation request: the model photo, the product photo and
/// the four descriptive options. Constructed per submission and consumed once.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    pub model_image: EncodedImage,
    pub product_image: EncodedImage,
    pub action: String,
    pub style: String,
    pub background: String,
    pub product_name: String,
}

impl AdRequest {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("action", &self.action),
            ("style", &self.style),
            ("background", &self.background),
            ("productName", &self.product_name),
        ] {
            if value.trim().is_empty() {
                return Err(AdForgeError::Validation(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        for (name, image) in [
            ("modelImage", &self.model_image),
            ("productImage", &self.product_image),
        ] {
            if !is_accepted_image_type(image.mime_type()) {
                return Err(AdForgeError::Validation(format!(
                    "{} has unsupported type {}",
                    name,
                    image.mime_type()
                )));
            }
            if image.base64_data().is_empty() {
                return Err(AdForgeError::Validation(format!("{} is empty", name)));
            }
        }

        Ok(())
    }
}

/// The uniform result shape rendered to the caller. Exactly one field is
/// populated: `generated_image` on success (the data-URL form of the result),
/// `error` otherwise.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdResponse {
    pub fn success(image: &EncodedImage) -> Self {
        Self {
            generated_image: Some(image.to_data_url()),
            error: None,
        }
    }

    pub fn failure(err: &AdForgeError) -> Self {
        Self {
            generated_image: None,
            error: Some(err.user_message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> AdRequest {
        AdRequest {
            model_image: EncodedImage::from_bytes(Some("image/jpeg"), &[0xFF, 0xD8, 0xFF, 0xE0])
                .unwrap(),
            product_image: EncodedImage::from_bytes(Some("image/png"), &[0x89, 0x50, 0x4E, 0x47])
                .unwrap(),
            action: "holding delicately".into(),
            style: "close-up".into(),
            background: "urban street at night".into(),
            product_name: "red sneaker".into(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_empty_text_field_rejected() {
        let mut request = sample_request();
        request.action = "   ".into();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AdForgeError::Validation(_)));
    }

    #[test]
    fn test_unaccepted_image_type_rejected() {
        let mut request = sample_request();
        request.product_image = EncodedImage::from_parts("image/gif", "R0lGODlh");
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AdForgeError::Validation(_)));
    }

    #[test]
    fn test_empty_image_payload_rejected() {
        let mut request = sample_request();
        request.model_image = EncodedImage::from_parts("image/png", "");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_populates_exactly_one_field() {
        let image = EncodedImage::from_parts("image/png", "aGVsbG8=");
        let ok = AdResponse::success(&image);
        assert_eq!(
            ok.generated_image.as_deref(),
            Some("data:image/png;base64,aGVsbG8=")
        );
        assert!(ok.error.is_none());

        let failed = AdResponse::failure(&AdForgeError::NoImage);
        assert!(failed.generated_image.is_none());
        assert_eq!(
            failed.error.as_deref(),
            Some("Image generation failed. Please try again.")
        );
    }

    #[test]
    fn test_response_serializes_camel_case_and_skips_empty() {
        let image = EncodedImage::from_parts("image/png", "aGVsbG8=");
        let json = serde_json::to_value(AdResponse::success(&image)).unwrap();
        assert!(json.get("generatedImage").is_some());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "modelImage": "data:image/jpeg;base64,/9j/4A==",
            "productImage": "data:image/png;base64,iVBORw0=",
            "action": "wearing",
            "style": "studio",
            "background": "white cyclorama",
            "productName": "denim jacket"
        }"#;
        let request: AdRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.model_image.mime_type(), "image/jpeg");
        assert_eq!(request.product_name, "denim jacket");
        assert!(request.validate().is_ok());
    }
}
