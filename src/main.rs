// src/main.rs

use std::path::PathBuf;

use anyhow::Result;
use contavoz_config::{ConfigLoader, ConfigValidator, ContavozConfig};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod pipeline;

use app::ContavozApp;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    info!("Starting Contavoz v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    let mut app = ContavozApp::new(config)?;
    app.run().await?;

    info!("Contavoz shut down successfully");
    Ok(())
}

fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "contavoz=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

fn load_config() -> Result<ContavozConfig> {
    let path = std::env::var("CONTAVOZ_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config/contavoz.toml"));

    let config = ConfigLoader::load_or_default(&path)?;
    ConfigValidator::validate(&config)?;

    Ok(config)
}
