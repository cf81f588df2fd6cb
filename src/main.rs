//! Nexus CLI entry point.

use anyhow::Result;
use clap::Parser;
use nexus::cli::{commands, Cli, Commands};
use nexus::config::Settings;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; keys may come from the real environment.
    let dotenv = dotenvy::dotenv();

    let config_path = cli.config.as_deref().map(PathBuf::from);
    let settings = Settings::load_from(config_path.as_ref())?;

    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            format!("nexus={},tower_http={}", log_level, log_level)
        })))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    match &cli.command {
        Commands::Doctor => {
            commands::run_doctor(&settings)?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Chat { source, server } => {
            commands::run_chat(source, server.clone(), settings).await?;
        }

        Commands::Ask { source, question } => {
            commands::run_ask(source, question, settings).await?;
        }

        Commands::Ocr { image } => {
            commands::run_ocr(image, settings).await?;
        }

        Commands::Transcribe { audio } => {
            commands::run_transcribe(audio, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, config_path, settings)?;
        }
    }

    Ok(())
}
