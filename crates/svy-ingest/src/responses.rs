//! Response CSV ingestion.
//!
//! One row per respondent, one column per selected field; the header row
//! names the selected columns in output order. Cells stay raw strings
//! here — all rewriting belongs to the recoding engine.

use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::info;

use svy_model::ResponseMatrix;

/// The ingested response set: header keys plus the buffered matrix.
#[derive(Debug, Clone)]
pub struct ResponseTable {
    pub headers: Vec<String>,
    pub matrix: ResponseMatrix,
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

/// Read the full response set into memory. Rows shorter than the header
/// are padded with empty cells; longer rows are cut to the header width.
pub fn read_responses(path: &Path) -> Result<ResponseTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read responses: {}", path.display()))?;

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => {
            let record =
                record.with_context(|| format!("read header: {}", path.display()))?;
            record.iter().map(normalize_header).collect()
        }
        None => Vec::new(),
    };

    let mut matrix = ResponseMatrix::new();
    for record in records {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        let mut row = Vec::with_capacity(headers.len());
        for idx in 0..headers.len() {
            let value = record.get(idx).unwrap_or("");
            row.push(normalize_cell(value));
        }
        matrix.push_row(row);
    }
    info!(
        rows = matrix.len(),
        columns = headers.len(),
        "ingested responses"
    );
    Ok(ResponseTable { headers, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("svy-ingest-{name}-{}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn reads_header_and_rows() {
        let path = write_temp("basic", "id,gender\n1,F\n2,M\n");
        let table = read_responses(&path).unwrap();
        assert_eq!(table.headers, vec!["id", "gender"]);
        assert_eq!(table.matrix.len(), 2);
        assert_eq!(table.matrix.cell(0, 1), Some("F"));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn short_rows_padded_long_rows_cut() {
        let path = write_temp("ragged", "a,b,c\n1\n1,2,3,4\n");
        let table = read_responses(&path).unwrap();
        assert_eq!(table.matrix.cell(0, 1), Some(""));
        assert_eq!(table.matrix.cell(1, 2), Some("3"));
        assert_eq!(table.matrix.rows()[1].len(), 3);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn header_bom_stripped() {
        let path = write_temp("bom", "\u{feff}id,token\n1,abc\n");
        let table = read_responses(&path).unwrap();
        assert_eq!(table.headers[0], "id");
        std::fs::remove_file(path).ok();
    }
}
