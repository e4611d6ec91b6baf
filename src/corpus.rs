//! Question corpus loading
//!
//! The corpus is a header-less CSV file. Each row holds a theme label followed
//! by two or more alternate phrasings of it. Rows that are too short or have an
//! empty label are dropped here, so the round builder only sees usable rows.

use crate::types::CorpusRow;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Label plus at least two option cells
pub const MIN_ROW_CELLS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Failed to read corpus file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed corpus CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parse corpus rows from CSV data, trimming every cell and dropping invalid rows
pub fn parse_corpus<R: Read>(reader: R) -> Result<Vec<CorpusRow>, CorpusError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in csv_reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();

        match into_row(cells) {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!("Dropped {} short or unlabeled corpus rows", dropped);
    }

    Ok(rows)
}

/// Load corpus rows from a CSV file on disk
pub fn load_corpus(path: &Path) -> Result<Vec<CorpusRow>, CorpusError> {
    let file = std::fs::File::open(path)?;
    let rows = parse_corpus(file)?;
    tracing::info!("Loaded {} corpus rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Where the session gets its rows from when a match starts
#[derive(Debug, Clone)]
pub enum CorpusSource {
    /// Re-read on every match start, so edits apply to the next match
    File(PathBuf),
    Rows(Vec<CorpusRow>),
}

impl CorpusSource {
    /// Current rows. A file that cannot be read yields no rows.
    pub fn rows(&self) -> Vec<CorpusRow> {
        match self {
            CorpusSource::File(path) => match load_corpus(path) {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!("Failed to load corpus {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            CorpusSource::Rows(rows) => rows.clone(),
        }
    }
}

fn into_row(mut cells: Vec<String>) -> Option<CorpusRow> {
    if cells.len() < MIN_ROW_CELLS || cells[0].is_empty() {
        return None;
    }

    let options = cells.split_off(1);
    let label = cells.pop()?;
    Some(CorpusRow {
        label,
        cells: options,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_trims_and_filters_rows() {
        let data = "\
Capitals , Paris,  Rome ,Berlin
Too short,only
,missing,label
Colors,red,blue
";
        let rows = parse_corpus(data.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Capitals");
        assert_eq!(rows[0].cells, vec!["Paris", "Rome", "Berlin"]);
        assert_eq!(rows[1].label, "Colors");
        assert_eq!(rows[1].cells, vec!["red", "blue"]);
    }

    #[test]
    fn test_parse_keeps_quoted_commas() {
        let data = "Sayings,\"well, well\",\"so, so\"\n";
        let rows = parse_corpus(data.as_bytes()).unwrap();

        assert_eq!(rows[0].cells, vec!["well, well", "so, so"]);
    }

    #[test]
    fn test_load_corpus_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Fruit,apple,pear,plum").unwrap();
        writeln!(file, "Trees,oak,elm").unwrap();

        let rows = load_corpus(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_load_corpus_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_corpus(&dir.path().join("nope.csv"));

        assert!(matches!(result, Err(CorpusError::Io(_))));
    }

    #[test]
    fn test_missing_file_source_yields_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let source = CorpusSource::File(dir.path().join("gone.csv"));

        assert!(source.rows().is_empty());
    }

    #[test]
    fn test_file_source_rereads_on_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Fruit,apple,pear").unwrap();
        file.flush().unwrap();
        let source = CorpusSource::File(file.path().to_path_buf());
        assert_eq!(source.rows().len(), 1);

        writeln!(file, "Trees,oak,elm").unwrap();
        file.flush().unwrap();
        assert_eq!(source.rows().len(), 2);
    }
}
