//! Image text extraction.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;
use crate::models::{Upload, NO_TEXT_EXTRACTED};
use crate::ocr::{TesseractRecognizer, TextRecognizer};
use std::path::Path;

/// Run OCR on a local image and print the text.
pub async fn run_ocr(image: &Path, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ocr, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Install Tesseract or set TESSERACT_CMD to its path.");
        return Err(e);
    }

    let upload = Upload::from_path(image).await?;
    let recognizer = TesseractRecognizer::with_config(&settings.ocr);

    let spinner = Output::spinner(&format!("Reading {}...", upload.filename));
    let result = recognizer.recognize(&upload.bytes).await;
    spinner.finish_and_clear();

    let text = result?.into_answer(NO_TEXT_EXTRACTED);
    println!("{}", text);

    Ok(())
}
