use kdtree::distance::squared_euclidean;
use kdtree::KdTree;

use veg_core::pointcloud::point::Point;

/// Planar (x, y) index over one cloud for radius queries. Height is ignored;
/// neighborhoods are vertical cylinders around each point.
pub struct NeighborhoodIndex {
    tree: KdTree<f64, usize, [f64; 2]>,
    len: usize,
}

impl NeighborhoodIndex {
    pub fn build(points: &[Point]) -> Self {
        let mut tree = KdTree::with_capacity(2, points.len().max(1));
        for (i, point) in points.iter().enumerate() {
            // Coordinates come from LAS/CSV loaders and are always finite.
            tree.add([point.x, point.y], i)
                .expect("finite 2-d coordinate");
        }
        Self {
            tree,
            len: points.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Indices of all points with planar distance <= `radius` from `(x, y)`.
    /// A query at a stored point's own coordinates always returns that point
    /// (distance zero).
    pub fn within_radius(&self, x: f64, y: f64, radius: f64) -> Vec<usize> {
        if self.len == 0 {
            return Vec::new();
        }
        self.tree
            .within(&[x, y], radius * radius, &squared_euclidean)
            .map(|found| found.into_iter().map(|(_, &i)| i).collect())
            .unwrap_or_default()
    }
}
