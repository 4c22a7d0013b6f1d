use veg_core::pointcloud::point::PointCloud;

use crate::index::NeighborhoodIndex;

use super::Transform;

/// Detrends each point's height against a local ground estimate: the minimum
/// z among its planar neighbors within `radius` meters. The query point is
/// part of its own neighborhood, so the result is never negative and an
/// isolated point gets exactly zero.
///
/// Also records the height above the plot-wide minimum z, a feature the
/// classification model consumes alongside the detrended height.
pub struct GroundHeightTransform {
    /// Neighborhood radius in meters. Must be applied while coordinates are
    /// still in meters, before any planar rescaling.
    pub radius: f64,
}

impl Transform for GroundHeightTransform {
    fn transform(&self, point_cloud: PointCloud) -> PointCloud {
        let mut cloud = point_cloud;
        if cloud.is_empty() {
            return cloud;
        }

        let index = NeighborhoodIndex::build(&cloud.points);
        let heights: Vec<f64> = cloud.points.iter().map(|p| p.z).collect();
        let plot_floor = cloud.metadata.bounding_volume.min[2];

        for point in cloud.points.iter_mut() {
            let mut zmin = point.z;
            for neighbor in index.within_radius(point.x, point.y, self.radius) {
                zmin = zmin.min(heights[neighbor]);
            }
            point.height_above_ground = Some(point.z - zmin);
            point.height_above_plot_floor = Some(point.z - plot_floor);
        }

        cloud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veg_core::pointcloud::point::{Color, Point, PointAttributes};

    fn make_point(x: f64, y: f64, z: f64) -> Point {
        Point::new(x, y, z, Color::default(), PointAttributes::default())
    }

    fn make_cloud(points: Vec<Point>) -> PointCloud {
        PointCloud::new(points, "plot", 2154)
    }

    fn detrended(cloud: &PointCloud) -> Vec<f64> {
        cloud
            .points
            .iter()
            .map(|p| p.height_above_ground.unwrap())
            .collect()
    }

    #[test]
    fn heights_are_detrended_against_the_local_minimum() {
        // Three mutually-neighboring points at 10.0, 10.5 and 11.0 m.
        let cloud = make_cloud(vec![
            make_point(0.0, 0.0, 10.0),
            make_point(1.0, 0.0, 10.5),
            make_point(0.0, 1.0, 11.0),
        ]);

        let out = GroundHeightTransform { radius: 2.0 }.transform(cloud);
        assert_eq!(detrended(&out), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn isolated_point_gets_zero() {
        let cloud = make_cloud(vec![make_point(0.0, 0.0, 42.0), make_point(100.0, 0.0, 1.0)]);

        let out = GroundHeightTransform { radius: 2.0 }.transform(cloud);
        assert_eq!(detrended(&out), vec![0.0, 0.0]);
    }

    #[test]
    fn detrended_height_is_never_negative() {
        let zs = [3.0, 7.5, 1.25, 9.0, 2.0, 4.5, 8.0, 0.5];
        let points = zs
            .iter()
            .enumerate()
            .map(|(i, &z)| make_point(i as f64 * 0.4, (i % 3) as f64 * 0.4, z))
            .collect();

        let out = GroundHeightTransform { radius: 1.0 }.transform(make_cloud(points));
        for h in detrended(&out) {
            assert!(h >= 0.0);
        }
    }

    #[test]
    fn result_is_independent_of_point_order() {
        let points = vec![
            make_point(0.0, 0.0, 5.0),
            make_point(0.5, 0.5, 3.0),
            make_point(1.0, 0.0, 8.0),
            make_point(5.0, 5.0, 2.0),
        ];
        let mut reversed = points.clone();
        reversed.reverse();

        let a = GroundHeightTransform { radius: 2.0 }.transform(make_cloud(points));
        let b = GroundHeightTransform { radius: 2.0 }.transform(make_cloud(reversed));

        let mut ha = detrended(&a);
        let mut hb = detrended(&b);
        ha.sort_by(f64::total_cmp);
        hb.sort_by(f64::total_cmp);
        assert_eq!(ha, hb);
    }

    #[test]
    fn plot_floor_feature_uses_the_global_minimum() {
        let cloud = make_cloud(vec![make_point(0.0, 0.0, 12.0), make_point(50.0, 0.0, 10.0)]);

        let out = GroundHeightTransform { radius: 1.0 }.transform(cloud);
        assert_eq!(out.points[0].height_above_plot_floor, Some(2.0));
        assert_eq!(out.points[1].height_above_plot_floor, Some(0.0));
    }
}
