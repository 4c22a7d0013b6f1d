use std::collections::HashMap;

use crate::predictions::PointPredictions;

/// Groups point indices by their `(row, col)` cell.
pub fn group_by_cell(cells: &[(usize, usize)]) -> HashMap<(usize, usize), Vec<usize>> {
    let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        groups.entry(*cell).or_default().push(i);
    }
    groups
}

/// Reduces each cell group to a single vector by element-wise maximum over
/// the member points' prediction rows: for every channel, the cell score is
/// at least every member's score.
pub fn aggregate_max(
    groups: &HashMap<(usize, usize), Vec<usize>>,
    predictions: &PointPredictions,
) -> HashMap<(usize, usize), Vec<f32>> {
    let mut aggregated = HashMap::with_capacity(groups.len());

    for (&cell, members) in groups {
        let mut pooled = vec![f32::MIN; predictions.channels()];
        for &i in members {
            for (slot, &score) in pooled.iter_mut().zip(predictions.row(i)) {
                *slot = slot.max(score);
            }
        }
        aggregated.insert(cell, pooled);
    }

    aggregated
}
