//! Reading particle and triangle tables and writing per-particle force
//! reports as CSV.

use thiserror::Error;

pub mod csv;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV error for '{path}': {source}")]
    Csv {
        path: String,
        source: ::csv::Error,
    },
    #[error("Row {row} of '{path}' has a non-finite coordinate")]
    NonFiniteCoordinate { path: String, row: usize },
}
