//! CLI module for Nexus.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Nexus - chat with files, websites, images and audio
///
/// Answers questions about uploaded documents and web pages with a hosted
/// language model, extracts text from images with Tesseract, and transcribes
/// audio with Whisper. Run `nexus serve` for the HTTP API and browser UI.
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// What a question is about.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct Source {
    /// Document to ask about (.txt, .docx, .csv, .pdf)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Web page to ask about
    #[arg(short, long)]
    pub url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check system requirements and configuration
    Doctor,

    /// Start the HTTP API server and browser UI
    Serve {
        /// Host to bind to (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (default from config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an interactive multi-turn chat about a file or web page
    Chat {
        #[command(flatten)]
        source: Source,

        /// Send questions to a running server instead of answering in-process
        #[arg(long)]
        server: Option<String>,
    },

    /// Ask a single question about a file or web page
    Ask {
        #[command(flatten)]
        source: Source,

        /// The question to ask
        question: String,
    },

    /// Extract text from an image with OCR
    Ocr {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,
    },

    /// Transcribe an audio file
    Transcribe {
        /// Audio file (wav, mp3, m4a, ...)
        audio: PathBuf,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask_with_file() {
        let cli = Cli::parse_from(["nexus", "ask", "--file", "report.pdf", "What is the revenue?"]);
        match cli.command {
            Commands::Ask { source, question } => {
                assert_eq!(source.file, Some(PathBuf::from("report.pdf")));
                assert!(source.url.is_none());
                assert_eq!(question, "What is the revenue?");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["nexus", "ask", "question"]).is_err());
        assert!(Cli::try_parse_from([
            "nexus",
            "chat",
            "--file",
            "a.txt",
            "--url",
            "https://example.com"
        ])
        .is_err());
    }

    #[test]
    fn test_parse_chat_against_server() {
        let cli = Cli::parse_from([
            "nexus",
            "-v",
            "chat",
            "--url",
            "https://example.com",
            "--server",
            "http://127.0.0.1:8000",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Chat { source, server } => {
                assert_eq!(source.url.as_deref(), Some("https://example.com"));
                assert_eq!(server.as_deref(), Some("http://127.0.0.1:8000"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
