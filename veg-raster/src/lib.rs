pub mod aggregate;
pub mod error;
pub mod geotiff;
pub mod geotransform;
pub mod pixel;
pub mod predictions;
pub mod stratum;

pub use error::RasterError;
pub use geotransform::GeoTransform;
pub use predictions::PointPredictions;
pub use stratum::{Band, StratumMode, StratumRasters};

use veg_core::pointcloud::point::PointCloud;

#[derive(Debug, Clone)]
pub struct RasterizeOptions {
    /// Output resolution in pixels per side.
    pub grid_size: usize,
    pub mode: StratumMode,
    /// Renormalize the low-vegetation band against the soil channel.
    pub normalize_ground: bool,
    /// Plot radius in meters; reverses the planar rescaling for
    /// geo-referencing.
    pub plot_radius: f64,
}

/// Bins one cloud's points into pixels, max-pools the per-point predictions
/// per pixel, and derives the pixel-to-world transform. The cloud must have
/// been through the centering transform (its center offset is recorded).
pub fn rasterize_plot(
    cloud: &PointCloud,
    predictions: &PointPredictions,
    options: &RasterizeOptions,
) -> Result<(StratumRasters, GeoTransform), RasterError> {
    if cloud.is_empty() {
        return Err(RasterError::EmptyCloud {
            source_name: cloud.metadata.source_name.clone(),
        });
    }
    if predictions.len() != cloud.len() {
        return Err(RasterError::PredictionCountMismatch {
            rows: predictions.len(),
            points: cloud.len(),
        });
    }
    if predictions.channels() != options.mode.channels() {
        return Err(RasterError::ChannelMismatch {
            expected: options.mode.channels(),
            actual: predictions.channels(),
        });
    }

    let cells = pixel::map_to_cells(&cloud.points, options.grid_size);
    let groups = aggregate::group_by_cell(&cells);
    let cell_values = aggregate::aggregate_max(&groups, predictions);
    let rasters = StratumRasters::build(
        options.grid_size,
        options.mode,
        options.normalize_ground,
        &cell_values,
    )?;
    let geo = GeoTransform::from_centered_cloud(cloud, options.plot_radius, options.grid_size)?;

    Ok((rasters, geo))
}
