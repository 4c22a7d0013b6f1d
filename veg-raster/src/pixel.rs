use veg_core::pointcloud::point::Point;

/// Guard added to the extent denominator so a degenerate (single-value) axis
/// still maps every point into cell 0 instead of dividing by zero. Also keeps
/// the maximum coordinate strictly below the last cell boundary.
pub const EXTENT_EPSILON: f64 = 1e-4;

/// Maps each point to a `(row, col)` cell in a `grid_size` x `grid_size`
/// grid spanning the cloud's own planar extent. Rows come from y, columns
/// from x; row 0 holds the minimum-y points (raster storage flips this
/// later). Every point lands in exactly one cell.
pub fn map_to_cells(points: &[Point], grid_size: usize) -> Vec<(usize, usize)> {
    let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for point in points {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }

    let span_x = max_x - min_x + EXTENT_EPSILON;
    let span_y = max_y - min_y + EXTENT_EPSILON;

    points
        .iter()
        .map(|point| {
            let col = ((point.x - min_x) / span_x * grid_size as f64).floor() as usize;
            let row = ((point.y - min_y) / span_y * grid_size as f64).floor() as usize;
            (row.min(grid_size - 1), col.min(grid_size - 1))
        })
        .collect()
}
