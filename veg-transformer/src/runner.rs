use veg_core::pointcloud::point::PointCloud;

use crate::transform::Transform;

pub trait Transformer {
    fn execute(&self, point_cloud: PointCloud) -> PointCloud;
}

pub struct PointCloudTransformer {
    transform: Box<dyn Transform>,
}

impl PointCloudTransformer {
    pub fn new(transform: Box<dyn Transform>) -> Self {
        Self { transform }
    }
}

impl Transformer for PointCloudTransformer {
    fn execute(&self, point_cloud: PointCloud) -> PointCloud {
        self.transform.transform(point_cloud)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{PlotPreprocessBuilder, TransformBuilder};
    use veg_core::pointcloud::point::{Color, Point, PointAttributes};

    #[test]
    fn preprocess_chain_detrends_then_centers() {
        let points = vec![
            Point::new(10.0, 10.0, 100.0, Color::default(), PointAttributes::default()),
            Point::new(11.0, 10.0, 101.5, Color::default(), PointAttributes::default()),
        ];
        let cloud = PointCloud::new(points, "plot", 2154);

        let builder = PlotPreprocessBuilder::new(2.0, 10.0);
        let transformer = PointCloudTransformer::new(builder.build());
        let out = transformer.execute(cloud);

        // Detrending saw meters, so the 1 m spacing was within the radius.
        assert_eq!(out.points[0].height_above_ground, Some(0.0));
        assert_eq!(out.points[1].height_above_ground, Some(1.5));
        // Centering ran afterwards and recorded the midpoint.
        assert_eq!(out.metadata.center_offset, Some([10.5, 10.0]));
        assert_eq!(out.points[0].x, -0.05);
    }
}
