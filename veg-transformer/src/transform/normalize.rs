use veg_core::pointcloud::point::PointCloud;

use super::Transform;

/// Shifts planar coordinates to be cloud-local and rescales them by the plot
/// radius, recording the removed center in the cloud metadata. The
/// geotransform later reverses this: `world = local * scale + center`.
pub struct PlanarCenterTransform {
    /// Plot radius in meters (the rescaling factor).
    pub scale: f64,
}

impl Transform for PlanarCenterTransform {
    fn transform(&self, point_cloud: PointCloud) -> PointCloud {
        let mut cloud = point_cloud;
        if cloud.is_empty() {
            return cloud;
        }

        let volume = &cloud.metadata.bounding_volume;
        let center_x = (volume.min[0] + volume.max[0]) / 2.0;
        let center_y = (volume.min[1] + volume.max[1]) / 2.0;

        for point in cloud.points.iter_mut() {
            point.x = (point.x - center_x) / self.scale;
            point.y = (point.y - center_y) / self.scale;
        }

        let source_name = cloud.metadata.source_name.clone();
        let epsg = cloud.metadata.epsg;
        let mut recentered = PointCloud::new(cloud.points, source_name, epsg);
        recentered.metadata.center_offset = Some([center_x, center_y]);
        recentered
    }
}
