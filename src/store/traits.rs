//! Store traits and error types

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Column '{column}' not found in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A typed row of one of the CSV datasets
///
/// `HEADERS` must list the serialized field names in declaration order; the
/// store writes it as the header row of a new file.
pub trait CsvRecord: Serialize {
    const HEADERS: &'static [&'static str];
}
