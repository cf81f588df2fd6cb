//! One-shot question about a file or web page.

use crate::cli::preflight::{self, Operation};
use crate::cli::{Output, Source};
use crate::config::Settings;
use crate::error::{NexusError, Result};
use crate::models::Upload;
use crate::orchestrator::Orchestrator;

/// Run the ask command.
pub async fn run_ask(source: &Source, question: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'nexus doctor' for detailed diagnostics.");
        return Err(e);
    }

    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Thinking...");
    let result = match (&source.file, &source.url) {
        (Some(path), _) => {
            let upload = Upload::from_path(path).await?;
            orchestrator.chat_with_file(upload, question).await
        }
        (None, Some(url)) => orchestrator.chat_with_url(url, question).await,
        (None, None) => Err(NexusError::InvalidInput(
            "either --file or --url is required".to_string(),
        )),
    };
    spinner.finish_and_clear();

    let answer = result?;
    Output::answer("Answer:", &answer);

    Ok(())
}
