use std::path::PathBuf;

use thiserror::Error;

use veg_parser::ParseError;
use veg_raster::RasterError;

/// Anything that can sink one plot. The batch driver logs these and moves
/// on to the next plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("unsupported file extension: {path}")]
    UnsupportedExtension { path: PathBuf },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("failed to read predictions from {path}: {source}")]
    Predictions {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: expected {expected} scores on line {line}, found {found}")]
    PredictionShape {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{path}: could not parse score on line {line}")]
    InvalidScore { path: PathBuf, line: u64 },
    #[error(transparent)]
    Raster(#[from] RasterError),
}
