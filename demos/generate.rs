use std::env;
use std::fs;
use std::sync::Arc;

use adforge::{logger, AdRequest, EncodedImage, GeminiClient, GeminiConfig, Orchestrator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(_) => eprintln!("No .env file found, using system environment variables"),
    }

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        log::error!("Usage: generate <model-photo> <product-photo>");
        std::process::exit(1);
    }

    log::info!("📷 Reading input images...");
    let model_bytes = fs::read(&args[1])?;
    let product_bytes = fs::read(&args[2])?;

    // content type sniffed from magic bytes
    let model_image = EncodedImage::from_bytes(None, &model_bytes)?;
    let product_image = EncodedImage::from_bytes(None, &product_bytes)?;
    log::info!(
        "Model photo: {}, product photo: {}",
        model_image.mime_type(),
        product_image.mime_type()
    );

    let request = AdRequest {
        model_image,
        product_image,
        action: "holding delicately".to_string(),
        style: "close-up".to_string(),
        background: "urban street at night".to_string(),
        product_name: "red sneaker".to_string(),
    };

    log::info!("🔄 Creating Gemini client...");
    let client = GeminiClient::new(GeminiConfig::from_env())?;
    let orchestrator = Orchestrator::new(Arc::new(client.image().clone()));

    log::info!("🎨 Generating advertisement image...");
    match orchestrator.generate(request).await {
        Ok(image) => {
            let extension = match image.mime_type() {
                "image/jpeg" => "jpg",
                "image/webp" => "webp",
                _ => "png",
            };
            let filename = format!("generated_ad.{}", extension);
            fs::write(&filename, image.decode()?)?;
            log::info!("💾 Advertisement saved to: {}", filename);
        }
        Err(e) => {
            log::error!("❌ Generation failed: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
