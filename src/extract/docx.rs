//! Word (.docx) paragraph extraction.

use crate::error::{NexusError, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

/// Extract the text of every body paragraph, in document order.
///
/// Paragraphs inside tables and text boxes are skipped. Empty paragraphs are kept as empty strings.
pub fn docx_paragraphs(bytes: &[u8]) -> Result<Vec<String>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| NexusError::Extraction(format!("not a valid .docx archive: {}", e)))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| NexusError::Extraction(format!("missing {}: {}", DOCUMENT_PART, e)))?
        .read_to_string(&mut xml)
        .map_err(|e| NexusError::Extraction(format!("unreadable {}: {}", DOCUMENT_PART, e)))?;

    parse_document_xml(&xml)
}

fn parse_document_xml(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current = String::new();
    // Open tables and text boxes; nothing beneath them is a body paragraph.
    let mut hidden_depth = 0usize;
    let mut paragraph_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| NexusError::Extraction(format!("malformed document XML: {}", e)))?;

        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => hidden_depth += 1,
                _ if hidden_depth > 0 => {}
                b"p" => {
                    paragraph_depth += 1;
                    if paragraph_depth == 1 {
                        current.clear();
                    }
                }
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Event::Empty(e) if hidden_depth == 0 => match e.local_name().as_ref() {
                b"p" if paragraph_depth == 0 => paragraphs.push(String::new()),
                b"tab" if in_run && paragraph_depth > 0 => current.push('\t'),
                b"br" | b"cr" if in_run && paragraph_depth > 0 => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text && paragraph_depth > 0 && hidden_depth == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| NexusError::Extraction(format!("bad text node: {}", e)))?;
                current.push_str(&text);
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"tbl" | b"txbxContent" => hidden_depth = hidden_depth.saturating_sub(1),
                _ if hidden_depth > 0 => {}
                b"p" if paragraph_depth > 0 => {
                    paragraph_depth -= 1;
                    if paragraph_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    const NS: &str = "xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"";

    /// Wrap body XML into a minimal .docx archive.
    pub(crate) fn build_docx_xml(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document {}><w:body>{}</w:body></w:document>",
            NS, body
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCUMENT_PART, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Build a .docx with one single-run paragraph per entry.
    pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", p))
            .collect();
        build_docx_xml(&body)
    }

    #[test]
    fn test_paragraphs_in_order() {
        let docx = build_docx(&["Quarterly report", "Revenue: $500", "Costs: $200"]);
        let paragraphs = docx_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Quarterly report", "Revenue: $500", "Costs: $200"]);
    }

    #[test]
    fn test_runs_tabs_breaks_and_entities() {
        let docx = build_docx_xml(
            "<w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr>\
             <w:r><w:t xml:space=\"preserve\">Fish &amp; </w:t></w:r>\
             <w:r><w:t>chips</w:t><w:tab/><w:t>4.50</w:t><w:br/><w:t>daily</w:t></w:r></w:p>",
        );
        let paragraphs = docx_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Fish & chips\t4.50\ndaily"]);
    }

    #[test]
    fn test_empty_paragraphs_are_kept() {
        let docx = build_docx_xml(
            "<w:p><w:r><w:t>Title</w:t></w:r></w:p><w:p/><w:p></w:p><w:p><w:r><w:t>Body</w:t></w:r></w:p>",
        );
        let paragraphs = docx_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Title", "", "", "Body"]);
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let docx = build_docx_xml(
            "<w:p><w:r><w:t>Before</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>After</w:t></w:r></w:p>",
        );
        let paragraphs = docx_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Before", "After"]);
    }

    #[test]
    fn test_text_box_content_is_left_out_of_its_paragraph() {
        let docx = build_docx_xml(
            "<w:p><w:r><w:t xml:space=\"preserve\">Invoice total: $900</w:t></w:r>\
             <w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Draft</w:t></w:r></w:p><w:p/>\
             </w:txbxContent></w:pict></w:r>\
             <w:r><w:t xml:space=\"preserve\"> due Friday</w:t></w:r></w:p>\
             <w:p><w:r><w:t>Next</w:t></w:r></w:p>",
        );
        let paragraphs = docx_paragraphs(&docx).unwrap();
        assert_eq!(paragraphs, vec!["Invoice total: $900 due Friday", "Next"]);
    }

    #[test]
    fn test_archive_without_document_part() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<x/>").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let err = docx_paragraphs(&bytes).unwrap_err();
        assert!(err.to_string().contains(DOCUMENT_PART));
    }
}
