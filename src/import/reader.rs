use anyhow::{Context, Result};
use std::path::Path;

/// Tokenized CSV input: ordered headers plus row cells addressable by header.
/// Quoting and escaping are the csv crate's problem, not ours.
#[derive(Debug, Clone)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
    /// Records the tokenizer rejected; surfaced as a count-based warning.
    pub(crate) parse_errors: usize,
}

impl RawTable {
    pub(crate) fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of an exactly-matching header (compared trimmed).
    pub(crate) fn col(&self, header: &str) -> Option<usize> {
        let wanted = header.trim();
        self.headers.iter().position(|h| h.trim() == wanted)
    }

    /// Index of the first header whose lowercase form contains `needle`.
    pub(crate) fn find_col(&self, needle: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.to_lowercase().contains(needle))
    }

    pub(crate) fn cell<'a>(&'a self, row: &'a [String], col: usize) -> &'a str {
        row.get(col).map(String::as_str).unwrap_or("")
    }
}

pub(crate) struct CsvImporter;

impl CsvImporter {
    pub(crate) fn read_path(path: &Path) -> Result<RawTable> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;
        Self::read_str(&text)
    }

    /// Tokenize CSV text into a RawTable. Rows the tokenizer rejects are
    /// counted, not fatal; only a file with no usable header is an error.
    pub(crate) fn read_str(text: &str) -> Result<RawTable> {
        let delimiter = sniff_delimiter(text);
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV header row")?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.iter().all(String::is_empty) {
            anyhow::bail!("CSV file is empty");
        }

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut parse_errors = 0;
        for result in rdr.records() {
            match result {
                Ok(record) => rows.push(record.iter().map(|s| s.to_string()).collect()),
                Err(_) => parse_errors += 1,
            }
        }

        Ok(RawTable {
            headers,
            rows,
            parse_errors,
        })
    }
}

/// Pick the field delimiter by counting candidates in the raw header line.
/// Pre-detection only; the real tokenization happens in the csv reader.
pub(crate) fn sniff_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or("");
    let commas = first_line.matches(',').count();
    let semicolons = first_line.matches(';').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas && tabs > semicolons {
        b'\t'
    } else {
        b','
    }
}

#[cfg(test)]
#[path = "reader_tests.rs"]
mod tests;
