use gamegen::{logger, Config, GenerationClient, ModelId};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init()?;
    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    logger::log_config_info(&config);

    log::info!("📚 Available models:");
    for (id, name, category) in ModelId::supported_models() {
        log::info!("  {} - {} ({:?})", id, name, category);
    }

    let client = match GenerationClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("❌ Failed to initialize generation client: {}", e);
            return Err(e.into());
        }
    };

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.host,
        config.port(),
    );

    gamegen::server::run(client, &config.host, config.port()).await?;
    Ok(())
}
