use actix_multipart::Multipart;
use actix_web::{http::StatusCode, web, HttpResponse};
use futures::{StreamExt, TryStreamExt};
use uuid::Uuid;

use super::AppState;
use crate::error::{AdForgeError, Result};
use crate::models::{AdRequest, AdResponse, EncodedImage};

/// Liveness probe.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// POST /api/generate: multipart form with `modelImage` and `productImage`
/// files plus `action`, `style`, `background`, `productName` text fields.
/// Always renders the uniform `{generatedImage | error}` shape.
pub async fn generate(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    let request_id = Uuid::new_v4();
    log::info!("[req:{}] ad generation submission", request_id);

    match handle_submission(&state, payload).await {
        Ok(image) => {
            log::info!("[req:{}] generated {}", request_id, image.mime_type());
            HttpResponse::Ok().json(AdResponse::success(&image))
        }
        Err(e) => {
            log::error!("[req:{}] {}", request_id, e);
            HttpResponse::build(status_for(&e)).json(AdResponse::failure(&e))
        }
    }
}

fn status_for(err: &AdForgeError) -> StatusCode {
    match err {
        AdForgeError::Validation(_) => StatusCode::BAD_REQUEST,
        AdForgeError::NoImage
        | AdForgeError::Api { .. }
        | AdForgeError::Network(_)
        | AdForgeError::Blocked(_)
        | AdForgeError::Response(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn handle_submission(state: &AppState, payload: Multipart) -> Result<EncodedImage> {
    let form = read_form(payload).await?;
    let request = build_request(form).await?;
    state.orchestrator.generate(request).await
}

/// One uploaded file before normalization.
struct Upload {
    content_type: Option<String>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct AdForm {
    model_image: Option<Upload>,
    product_image: Option<Upload>,
    action: Option<String>,
    style: Option<String>,
    background: Option<String>,
    product_name: Option<String>,
}

async fn read_form(mut payload: Multipart) -> Result<AdForm> {
    let mut form = AdForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AdForgeError::Validation(e.to_string()))?
    {
        let name = field.name().to_string();
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AdForgeError::Validation(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        match name.as_str() {
            "modelImage" => form.model_image = Some(Upload { content_type, bytes }),
            "productImage" => form.product_image = Some(Upload { content_type, bytes }),
            "action" => form.action = Some(text_field(bytes)?),
            "style" => form.style = Some(text_field(bytes)?),
            "background" => form.background = Some(text_field(bytes)?),
            "productName" => form.product_name = Some(text_field(bytes)?),
            other => log::debug!("Ignoring unknown form field: {}", other),
        }
    }

    Ok(form)
}

fn text_field(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| AdForgeError::Validation(e.to_string()))
}

async fn build_request(form: AdForm) -> Result<AdRequest> {
    let model = form
        .model_image
        .ok_or_else(|| AdForgeError::Validation("modelImage is required".into()))?;
    let product = form
        .product_image
        .ok_or_else(|| AdForgeError::Validation("productImage is required".into()))?;

    // independent pure transforms; both must finish before orchestration
    let (model_image, product_image) = futures::try_join!(normalize(model), normalize(product))?;

    Ok(AdRequest {
        model_image,
        product_image,
        action: required_text(form.action, "action")?,
        style: required_text(form.style, "style")?,
        background: required_text(form.background, "background")?,
        product_name: required_text(form.product_name, "productName")?,
    })
}

async fn normalize(upload: Upload) -> Result<EncodedImage> {
    EncodedImage::from_bytes(upload.content_type.as_deref(), &upload.bytes)
}

fn required_text(value: Option<String>, name: &str) -> Result<String> {
    value.ok_or_else(|| AdForgeError::Validation(format!("{} is required", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ImageModel, Orchestrator};
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const BOUNDARY: &str = "------------------------adforgeboundary";
    const JPEG_BYTES: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];
    const PNG_BYTES: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    struct MockModel {
        calls: AtomicUsize,
        outcome: fn() -> Result<EncodedImage>,
    }

    #[async_trait]
    impl ImageModel for MockModel {
        async fn generate(&self, _prompt: &str, _images: &[EncodedImage]) -> Result<EncodedImage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn push_text(body: &mut Vec<u8>, name: &str, value: &str) {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }

    fn push_file(body: &mut Vec<u8>, name: &str, content_type: &str, bytes: &[u8]) {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}.bin\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, name, name, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }

    fn close_body(body: &mut Vec<u8>) {
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    }

    fn full_form() -> Vec<u8> {
        let mut body = Vec::new();
        push_file(&mut body, "modelImage", "image/jpeg", &JPEG_BYTES);
        push_file(&mut body, "productImage", "image/png", &PNG_BYTES);
        push_text(&mut body, "action", "holding delicately");
        push_text(&mut body, "style", "close-up");
        push_text(&mut body, "background", "urban street at night");
        push_text(&mut body, "productName", "red sneaker");
        close_body(&mut body);
        body
    }

    async fn call(
        mock: Arc<MockModel>,
        body: Vec<u8>,
    ) -> (StatusCode, AdResponse) {
        let state = web::Data::new(AppState {
            orchestrator: Orchestrator::new(mock),
        });
        let app = test::init_service(
            App::new()
                .app_data(state)
                .route("/api/generate", web::post().to(generate)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
            .to_request();

        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let parsed: AdResponse = test::read_body_json(resp).await;
        (status, parsed)
    }

    #[actix_web::test]
    async fn test_generate_success() {
        let mock = Arc::new(MockModel {
            calls: AtomicUsize::new(0),
            outcome: || Ok(EncodedImage::from_parts("image/png", "Z2VuZXJhdGVk")),
        });

        let (status, response) = call(mock.clone(), full_form()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.generated_image.as_deref(),
            Some("data:image/png;base64,Z2VuZXJhdGVk")
        );
        assert!(response.error.is_none());
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn test_generate_missing_file_is_bad_request() {
        let mut body = Vec::new();
        push_file(&mut body, "modelImage", "image/jpeg", &JPEG_BYTES);
        push_text(&mut body, "action", "holding");
        push_text(&mut body, "style", "close-up");
        push_text(&mut body, "background", "studio");
        push_text(&mut body, "productName", "sneaker");
        close_body(&mut body);

        let mock = Arc::new(MockModel {
            calls: AtomicUsize::new(0),
            outcome: || Ok(EncodedImage::from_parts("image/png", "eA==")),
        });

        let (status, response) = call(mock.clone(), body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.as_deref(), Some("Invalid form data."));
        assert!(response.generated_image.is_none());
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
    }

    #[actix_web::test]
    async fn test_generate_no_artifact_is_bad_gateway() {
        let mock = Arc::new(MockModel {
            calls: AtomicUsize::new(0),
            outcome: || Err(AdForgeError::NoImage),
        });

        let (status, response) = call(mock, full_form()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.error.as_deref(),
            Some("Image generation failed. Please try again.")
        );
    }

    #[actix_web::test]
    async fn test_generate_upstream_error_keeps_message() {
        let mock = Arc::new(MockModel {
            calls: AtomicUsize::new(0),
            outcome: || {
                Err(AdForgeError::Api {
                    status: 429,
                    message: "quota exceeded".into(),
                })
            },
        });

        let (status, response) = call(mock, full_form()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(response.error.unwrap().contains("quota exceeded"));
    }

    #[actix_web::test]
    async fn test_health() {
        let app =
            test::init_service(App::new().route("/health", web::get().to(health))).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "adforge");
    }
}
