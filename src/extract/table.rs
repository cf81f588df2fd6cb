//! CSV rendering as a plain-text table.

use crate::error::{NexusError, Result};

/// Parse CSV (first row is the header) and lay it out as a fixed-width table.
///
/// Every column is as wide as its widest cell, cells are right-aligned and
/// columns are separated by a single space. Short rows are padded with blanks.
pub fn render_csv(bytes: &[u8]) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader
        .headers()
        .map_err(|e| NexusError::Extraction(format!("invalid CSV header: {}", e)))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = vec![header];
    for record in reader.records() {
        let record = record.map_err(|e| NexusError::Extraction(format!("invalid CSV row: {}", e)))?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    if columns == 0 {
        return Ok(String::new());
    }

    let mut widths = vec![0usize; columns];
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:>width$}", cell, width = width)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    Ok(lines.join("\n"))
}
