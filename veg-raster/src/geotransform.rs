use veg_core::pointcloud::point::PointCloud;

use crate::error::RasterError;
use crate::pixel::EXTENT_EPSILON;

/// GDAL-convention affine transform: `[origin_x, pixel_width, 0, origin_y,
/// 0, pixel_height]` with `pixel_height < 0` (row 0 is the maximum-y row).
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTransform(pub [f64; 6]);

impl GeoTransform {
    /// Derives the transform for a centered cloud: local coordinates are
    /// scaled back by the plot radius, translated by the recorded center,
    /// and the resulting bounding box is divided into `grid_size` pixels.
    /// The epsilon keeps the pixel size positive for a degenerate extent
    /// and matches the denominator used when binning.
    pub fn from_centered_cloud(
        cloud: &PointCloud,
        scale: f64,
        grid_size: usize,
    ) -> Result<Self, RasterError> {
        let [center_x, center_y] = cloud
            .metadata
            .center_offset
            .ok_or(RasterError::MissingCenterOffset)?;
        if cloud.is_empty() {
            return Err(RasterError::EmptyCloud {
                source_name: cloud.metadata.source_name.clone(),
            });
        }

        let volume = &cloud.metadata.bounding_volume;
        let min_x = volume.min[0] * scale + center_x;
        let max_x = volume.max[0] * scale + center_x;
        let min_y = volume.min[1] * scale + center_y;
        let max_y = volume.max[1] * scale + center_y;

        let pixel_width = (max_x - min_x + EXTENT_EPSILON * scale) / grid_size as f64;
        let pixel_height = (min_y - max_y - EXTENT_EPSILON * scale) / grid_size as f64;

        Ok(Self([min_x, pixel_width, 0.0, max_y, 0.0, pixel_height]))
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.0[0], self.0[3])
    }

    pub fn pixel_width(&self) -> f64 {
        self.0[1]
    }

    pub fn pixel_height(&self) -> f64 {
        self.0[5]
    }

    /// World coordinates of the center of stored pixel `(row, col)`.
    pub fn pixel_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.0[0] + (col as f64 + 0.5) * self.0[1];
        let y = self.0[3] + (row as f64 + 0.5) * self.0[5];
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veg_core::pointcloud::point::{Color, Point, PointAttributes};

    fn centered_cloud(coords: &[(f64, f64)]) -> PointCloud {
        let points = coords
            .iter()
            .map(|&(x, y)| Point::new(x, y, 0.0, Color::default(), PointAttributes::default()))
            .collect();
        let mut cloud = PointCloud::new(points, "plot", 2154);
        cloud.metadata.center_offset = Some([1000.0, 2000.0]);
        cloud
    }

    #[test]
    fn origin_is_min_x_max_y() {
        let cloud = centered_cloud(&[(-1.0, -1.0), (1.0, 1.0)]);
        let geo = GeoTransform::from_centered_cloud(&cloud, 10.0, 20).unwrap();

        let (ox, oy) = geo.origin();
        assert_eq!(ox, 990.0);
        assert_eq!(oy, 2010.0);
    }

    #[test]
    fn pixel_height_is_negative() {
        let cloud = centered_cloud(&[(-0.5, -0.25), (0.75, 0.5)]);
        let geo = GeoTransform::from_centered_cloud(&cloud, 10.0, 32).unwrap();

        assert!(geo.pixel_height() < 0.0);
        assert!(geo.pixel_width() > 0.0);
    }

    #[test]
    fn single_point_cloud_is_still_well_defined() {
        let cloud = centered_cloud(&[(0.0, 0.0)]);
        let geo = GeoTransform::from_centered_cloud(&cloud, 10.0, 32).unwrap();

        assert!(geo.pixel_width() > 0.0);
        assert!(geo.pixel_height() < 0.0);
        let (x, y) = geo.pixel_center(0, 0);
        assert!(x.is_finite() && y.is_finite());
    }

    #[test]
    fn missing_center_offset_is_an_error() {
        let points = vec![Point::new(
            0.0,
            0.0,
            0.0,
            Color::default(),
            PointAttributes::default(),
        )];
        let cloud = PointCloud::new(points, "plot", 2154);

        assert!(matches!(
            GeoTransform::from_centered_cloud(&cloud, 10.0, 32),
            Err(RasterError::MissingCenterOffset)
        ));
    }
}
