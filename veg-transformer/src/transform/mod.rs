use veg_core::pointcloud::point::PointCloud;

pub mod ground;
pub mod normalize;

pub trait Transform {
    fn transform(&self, point_cloud: PointCloud) -> PointCloud;
}

pub struct CompositeTransform {
    transforms: Vec<Box<dyn Transform>>,
}

impl CompositeTransform {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for CompositeTransform {
    fn transform(&self, point_cloud: PointCloud) -> PointCloud {
        let mut current = point_cloud;
        for transform in &self.transforms {
            current = transform.transform(current);
        }
        current
    }
}
