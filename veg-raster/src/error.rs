use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("point cloud '{source_name}' has no points")]
    EmptyCloud { source_name: String },
    #[error("{rows} prediction rows for {points} points")]
    PredictionCountMismatch { rows: usize, points: usize },
    #[error("prediction vectors have {actual} channels, expected {expected}")]
    ChannelMismatch { expected: usize, actual: usize },
    #[error("negative prediction score in row {row}")]
    NegativeScore { row: usize },
    #[error("prediction values are not a whole number of {channels}-channel rows")]
    RaggedPredictions { channels: usize },
    #[error("cloud has no recorded plot center; run the centering transform first")]
    MissingCenterOffset,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode raster: {0}")]
    Tiff(#[from] tiff::TiffError),
}
