//! Audio transcription.

use crate::cli::output::format_size;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::models::{Upload, NO_TRANSCRIPT_RETURNED};
use crate::transcription::{Transcriber, WhisperTranscriber};
use std::path::Path;

/// Transcribe a local audio file and print the transcript.
pub async fn run_transcribe(audio: &Path, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'nexus doctor' for detailed diagnostics.");
        return Err(e);
    }

    let upload = Upload::from_path(audio).await?;
    let transcriber = WhisperTranscriber::with_config(&settings.completion, &settings.transcription)?;

    let spinner = Output::spinner(&format!(
        "Transcribing {} ({}) with {}...",
        upload.filename,
        format_size(upload.len() as u64),
        settings.transcription.model
    ));
    let result = transcriber.transcribe(&upload).await;
    spinner.finish_and_clear();

    let transcript = result?.into_answer(NO_TRANSCRIPT_RETURNED);
    println!("{}", transcript);

    Ok(())
}
