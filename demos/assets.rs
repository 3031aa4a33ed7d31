use gamegen::{logger, Config, GenerationClient};
use std::fs;

/// Generates one asset through the Gemini fallback chain and saves the image
/// next to the working directory.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logger::init_with_config(logger::LoggerConfig::development())?;

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "a pixel-art treasure chest with golden trim".to_string());

    let config = Config::from_env();
    logger::log_config_info(&config);
    let client = GenerationClient::new(&config)?;

    log::info!("🎨 Generating asset for: {}", prompt);
    let result = client.generate_assets(&prompt, Some("gemini")).await?;
    log::info!("📝 {}", result.text());

    match result.decode_image() {
        Some(Ok(bytes)) => {
            let filename = format!("asset_{}.png", chrono::Utc::now().timestamp());
            fs::write(&filename, bytes)?;
            log::info!("💾 Image saved to: {}", filename);
        }
        Some(Err(e)) => log::error!("❌ Failed to decode image: {}", e),
        None => log::warn!("No image was produced, only design advice"),
    }

    Ok(())
}
