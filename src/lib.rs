//! Nexus - chat with files, websites, images and audio
//!
//! A thin orchestration layer over hosted models and local tools.
//!
//! # Overview
//!
//! Nexus allows you to:
//! - Ask questions about `.txt`, `.docx`, `.csv` and `.pdf` documents
//! - Ask questions about the content of a web page
//! - Extract text from images with Tesseract
//! - Transcribe audio with Whisper
//!
//! All four are available as an HTTP API with a browser UI (`nexus serve`)
//! and from the command line.
//!
//! # Architecture
//!
//! - `config` - Configuration management and prompt templates
//! - `extract` - Document text extraction
//! - `ocr` - Image text recognition
//! - `transcription` - Speech-to-text
//! - `web` - Web page loading
//! - `completion` - Chat completion client
//! - `orchestrator` - Pipeline coordination
//! - `api` - HTTP handlers and the embedded browser UI
//! - `session` / `frontend` - Client-side chat history and context replay
//!
//! # Example
//!
//! ```rust,no_run
//! use nexus::config::Settings;
//! use nexus::models::Upload;
//! use nexus::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let report = Upload::new("report.txt", b"Revenue: $500".to_vec());
//!     let answer = orchestrator
//!         .chat_with_file(report, "What is the revenue?")
//!         .await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod frontend;
pub mod models;
pub mod ocr;
pub mod openai;
pub mod orchestrator;
pub mod session;
pub mod transcription;
pub mod web;

pub use error::{NexusError, Result};
