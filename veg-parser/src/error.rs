use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read LAS data from {path}: {source}")]
    Las {
        path: PathBuf,
        #[source]
        source: las::Error,
    },
    #[error("failed to read CSV data from {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: required column '{column}' is missing")]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{path}: could not parse column '{column}' on line {line}")]
    InvalidValue {
        path: PathBuf,
        column: &'static str,
        line: u64,
    },
    #[error("{path}: no points left after loading")]
    EmptyCloud { path: PathBuf },
}
