use std::path::Path;

use csv::ReaderBuilder;

use veg_raster::PointPredictions;

use crate::error::PlotError;

/// Reads the external model's per-point scores for one plot: a headerless
/// CSV with one row per point and `channels` non-negative columns, in the
/// same order as the plot's points.
pub fn load_predictions(path: &Path, channels: usize) -> Result<PointPredictions, PlotError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| PlotError::Predictions {
            path: path.to_path_buf(),
            source,
        })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| PlotError::Predictions {
            path: path.to_path_buf(),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != channels {
            return Err(PlotError::PredictionShape {
                path: path.to_path_buf(),
                line,
                expected: channels,
                found: record.len(),
            });
        }

        for field in record.iter() {
            let score: f32 = field.trim().parse().map_err(|_| PlotError::InvalidScore {
                path: path.to_path_buf(),
                line,
            })?;
            values.push(score);
        }
    }

    Ok(PointPredictions::new(channels, values)?)
}
