//! Interactive multi-turn chat about a file or web page.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, Source};
use crate::config::Settings;
use crate::error::Result;
use crate::frontend::{ApiClient, Assistant, ChatDesk};
use crate::models::Upload;
use crate::orchestrator::Orchestrator;
use crate::session::SessionKind;
use console::style;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Run the interactive chat command.
pub async fn run_chat(source: &Source, server: Option<String>, settings: Settings) -> Result<()> {
    let operation = if server.is_some() {
        Operation::Remote
    } else {
        Operation::Ask
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'nexus doctor' for detailed diagnostics.");
        return Err(e);
    }

    let max_upload_bytes = settings.server.max_upload_bytes;
    let assistant: Arc<dyn Assistant> = match &server {
        Some(url) => {
            let timeout = Duration::from_secs(settings.completion.timeout_secs + 30);
            Arc::new(ApiClient::new(url, timeout)?)
        }
        None => Arc::new(Orchestrator::new(settings)?),
    };
    let desk = ChatDesk::new(assistant, max_upload_bytes);

    let upload = match &source.file {
        Some(path) => Some(Upload::from_path(path).await?),
        None => None,
    };
    let (kind, subject) = match (&upload, &source.url) {
        (Some(upload), _) => (SessionKind::File, upload.filename.clone()),
        (None, Some(url)) => (SessionKind::Url, url.clone()),
        (None, None) => (SessionKind::File, String::new()),
    };

    println!("\n{} {}", style("Nexus Chat").bold().cyan(), style(&subject).dim());
    if let Some(url) = &server {
        println!("{}", style(format!("Using server at {}", url)).dim());
    }
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'new' to start a new chat.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("new") || input.eq_ignore_ascii_case("clear") {
            desk.clear(kind);
            Output::info("Started a new chat.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = match kind {
            SessionKind::File => desk.ask_from_file(upload.clone(), input).await,
            SessionKind::Url => {
                desk.ask_from_url(source.url.as_deref().unwrap_or_default(), input)
                    .await
            }
        };
        spinner.finish_and_clear();

        match result {
            Ok(history) => {
                debug!("{} session has {} turns", kind, desk.sessions().get(kind).len());
                Output::history(&history);
            }
            Err(e) => {
                Output::error(&format!("❌ Error: {}", e));
            }
        }
    }

    Ok(())
}
