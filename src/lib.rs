//! AdForge blends a model photo and a product photo into one advertisement
//! image using Google's Gemini image models.
//!
//! ```no_run
//! use adforge::{AdRequest, EncodedImage, GeminiClient, GeminiConfig, Orchestrator};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> adforge::Result<()> {
//!     let client = GeminiClient::new(GeminiConfig::from_env())?;
//!     let orchestrator = Orchestrator::new(Arc::new(client.image().clone()));
//!
//!     let request = AdRequest {
//!         model_image: EncodedImage::from_bytes(Some("image/jpeg"), &[0xFF, 0xD8, 0xFF])?,
//!         product_image: EncodedImage::from_bytes(Some("image/png"), &[0x89, 0x50, 0x4E, 0x47])?,
//!         action: "wearing".into(),
//!         style: "editorial".into(),
//!         background: "rooftop at golden hour".into(),
//!         product_name: "denim jacket".into(),
//!     };
//!
//!     let image = orchestrator.generate(request).await?;
//!     println!("{}", image.to_data_url());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod gemini;
pub mod logger;
pub mod models;
pub mod orchestrator;

#[cfg(feature = "server")]
pub mod server;

pub use config::{Config, GeminiConfig, SafetySettings, SafetyThreshold};
pub use error::{AdForgeError, Result};
pub use gemini::{GeminiClient, GeminiImageClient, DEFAULT_IMAGE_MODEL};
pub use models::{AdRequest, AdResponse, EncodedImage, ACCEPTED_IMAGE_TYPES};
pub use orchestrator::{ImageModel, Orchestrator};
