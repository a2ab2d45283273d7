//! Word-list loading.
//!
//! The source is a two-column table with a header row (`word,art`); the
//! header names are ignored and only fix the column count. Each data row is
//! a noun and its one-letter gender code.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use quiz_core::model::{EntryError, GenderCode, GenderCodeError, VocabEntry};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VocabError {
    #[error("failed to open word list {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("word list row {row}: {source}")]
    Csv { row: u64, source: csv::Error },

    #[error("word list row {row}: expected 2 columns, found {found}")]
    Columns { row: u64, found: usize },

    #[error("word list row {row}: {source}")]
    Code { row: u64, source: GenderCodeError },

    #[error("word list row {row}: {source}")]
    Entry { row: u64, source: EntryError },

    #[error("word list has no entries")]
    Empty,
}

/// Load and validate the word list at `path`.
///
/// # Errors
///
/// Returns `VocabError` if the file cannot be read, a row is malformed, or
/// the list is empty.
pub fn load_entries(path: &Path) -> Result<Vec<VocabEntry>, VocabError> {
    let file = File::open(path).map_err(|source| VocabError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let entries = parse_entries(file)?;
    debug!(path = %path.display(), count = entries.len(), "loaded word list");
    Ok(entries)
}

/// Parse a word list from any reader.
///
/// Blank lines are skipped and fields are trimmed.
///
/// # Errors
///
/// Returns `VocabError` for malformed rows or an empty list.
pub fn parse_entries<R: Read>(reader: R) -> Result<Vec<VocabEntry>, VocabError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|source| VocabError::Csv {
            row: source.position().map_or(0, csv::Position::line),
            source,
        })?;
        let row = record.position().map_or(0, csv::Position::line);
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != 2 {
            return Err(VocabError::Columns {
                row,
                found: record.len(),
            });
        }

        let code =
            GenderCode::from_code(&record[1]).map_err(|source| VocabError::Code { row, source })?;
        let entry =
            VocabEntry::new(&record[0], code).map_err(|source| VocabError::Entry { row, source })?;
        entries.push(entry);
    }

    if entries.is_empty() {
        return Err(VocabError::Empty);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_after_the_header() {
        let data = "word,art\nHund,m\n Katze , F \n\nHaus,n\nLeute,p\n";
        let entries = parse_entries(data.as_bytes()).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[1].word(), "Katze");
        assert_eq!(entries[1].expected(), GenderCode::Feminine);
        assert_eq!(entries[3].expected(), GenderCode::Plural);
    }

    #[test]
    fn header_names_do_not_matter() {
        let entries = parse_entries("noun,gender\nTisch,m".as_bytes()).unwrap();
        assert_eq!(entries[0].word(), "Tisch");
    }

    #[test]
    fn wrong_column_count_is_reported_with_row() {
        let err = parse_entries("word,art\nHund,m\nKatze\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabError::Columns { row: 3, found: 1 }));
    }

    #[test]
    fn unknown_code_is_reported() {
        let err = parse_entries("word,art\nHund,x\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabError::Code { row: 2, .. }));
    }

    #[test]
    fn blank_word_is_reported() {
        let err = parse_entries("word,art\n ,m\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabError::Entry { row: 2, .. }));
    }

    #[test]
    fn header_only_is_empty() {
        let err = parse_entries("word,art\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VocabError::Empty));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_entries(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, VocabError::Open { .. }));
    }
}
