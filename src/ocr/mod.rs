//! Optical character recognition for uploaded images.

mod tesseract;

pub use tesseract::TesseractRecognizer;

use crate::error::Result;
use crate::models::Extracted;
use async_trait::async_trait;

/// Trait for image-to-text engines.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text in an encoded image (PNG, JPEG, ...).
    ///
    /// An image without text yields [`Extracted::Empty`]; undecodable input or an
    /// engine failure is an error.
    async fn recognize(&self, image: &[u8]) -> Result<Extracted>;
}
