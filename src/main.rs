use std::env;
use std::sync::Arc;

use adforge::{logger, Config, GeminiClient, Orchestrator};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before the logger so LOG_LEVEL from the file is honored
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(logger::LoggerConfig::from_env())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    log::info!("🔍 Checking Gemini environment...");

    match env::var("GEMINI_API_KEY") {
        Ok(key) => {
            log::info!("✅ Gemini API key found in environment");
            log::debug!("API key starts with: {}...", &key[..4.min(key.len())]);
        }
        Err(_) => {
            log::warn!("⚠️  GEMINI_API_KEY not set in environment");
            log::error!("❌ This will cause client initialization to fail");
        }
    }

    if let Ok(model) = env::var("GEMINI_MODEL") {
        log::info!("GEMINI_MODEL override: {}", model);
    }

    let config = Config::from_env();
    let gemini_config = config.gemini.clone().unwrap_or_default();

    log::info!("🔄 Creating Gemini client...");
    let client = match GeminiClient::new(gemini_config) {
        Ok(client) => {
            log::info!("✅ Gemini client initialized successfully");
            client
        }
        Err(e) => {
            log::error!("❌ Failed to initialize Gemini client: {}", e);
            return Err(e.into());
        }
    };

    let orchestrator = Orchestrator::new(Arc::new(client.image().clone()));

    adforge::server::serve(&config, orchestrator).await?;
    Ok(())
}
