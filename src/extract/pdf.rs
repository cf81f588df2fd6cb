//! PDF page text extraction.

use crate::error::{NexusError, Result};
use pdf_oxide::PdfDocument;
use std::path::Path;
use tracing::{debug, warn};

/// Extract the text of every page that has any, in page order.
///
/// A page whose text cannot be decoded is treated like a page without text.
pub fn pdf_pages(path: &Path) -> Result<Vec<String>> {
    let doc = PdfDocument::open(path)
        .map_err(|e| NexusError::Extraction(format!("failed to parse PDF: {}", e)))?;

    let page_count = doc
        .page_count()
        .map_err(|e| NexusError::Extraction(format!("failed to read page count: {}", e)))?;

    let mut pages = Vec::with_capacity(page_count);

    for page_index in 0..page_count {
        let text = match doc.extract_text(page_index) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping page {}: {}", page_index + 1, e);
                continue;
            }
        };

        if !text.trim().is_empty() {
            pages.push(text);
        }
    }

    debug!("Extracted text from {}/{} PDF pages", pages.len(), page_count);
    Ok(pages)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a PDF with one Helvetica text line per page; an empty entry makes a blank page.
    pub(crate) fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut objects = vec![
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                (0..pages.len())
                    .map(|i| format!("{} 0 R", 4 + 2 * i))
                    .collect::<Vec<_>>()
                    .join(" "),
                pages.len()
            ),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
        ];
        for (i, text) in pages.iter().enumerate() {
            objects.push(format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                5 + 2 * i
            ));
            let stream = if text.is_empty() {
                String::new()
            } else {
                format!("BT /F1 12 Tf 72 712 Td ({}) Tj ET", text)
            };
            objects.push(format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ));
        }

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, object) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, object).as_bytes());
        }

        let xref_offset = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{:010} 00000 n \n", offset));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        ));
        pdf.extend_from_slice(xref.as_bytes());
        pdf
    }

    #[test]
    fn test_blank_pages_are_skipped_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, build_pdf(&["Page one", "", "Page three"])).unwrap();

        let pages = pdf_pages(&path).unwrap();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].contains("Page one"));
        assert!(pages[1].contains("Page three"));
    }

    #[test]
    fn test_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        let err = pdf_pages(&path).unwrap_err();
        assert!(matches!(err, NexusError::Extraction(_)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(pdf_pages(&dir.path().join("absent.pdf")).is_err());
    }
}
