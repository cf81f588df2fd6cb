//! HTTP API server and browser UI.

use crate::api;
use crate::cli::output::format_size;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use std::sync::Arc;

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'nexus doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let max_upload = settings.server.max_upload_bytes as u64;

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let upload_dir = orchestrator.upload_dir().display().to_string();
    let app = api::router(orchestrator);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Nexus API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Browser UI", "GET  /");
    Output::kv("Health", "GET  /health");
    Output::kv("Chat with file", "POST /chat-with-file");
    Output::kv("Chat with URL", "POST /chat-with-url");
    Output::kv("Image to text", "POST /extract-text-from-image");
    Output::kv("Transcribe", "POST /transcribe-audio");
    println!();
    Output::kv("Max upload", &format_size(max_upload));
    Output::kv("Uploads saved to", &upload_dir);
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Output::info("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
