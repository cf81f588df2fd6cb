//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod doctor;
mod ocr;
mod serve;
mod transcribe;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use doctor::run_doctor;
pub use ocr::run_ocr;
pub use serve::run_serve;
pub use transcribe::run_transcribe;
