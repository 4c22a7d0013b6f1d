use std::collections::HashMap;

use crate::error::RasterError;

/// Vertical strata resolved by the model. Two-stratum runs carry 3-channel
/// predictions (low vegetation, soil, medium vegetation); three-stratum runs
/// add the high-vegetation channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StratumMode {
    Two,
    Three,
}

impl StratumMode {
    pub fn channels(self) -> usize {
        match self {
            StratumMode::Two => 3,
            StratumMode::Three => 4,
        }
    }

    pub fn has_high_vegetation(self) -> bool {
        matches!(self, StratumMode::Three)
    }
}

const CHANNEL_LOW: usize = 0;
const CHANNEL_SOIL: usize = 1;
const CHANNEL_MEDIUM: usize = 2;
const CHANNEL_HIGH: usize = 3;

/// One named coverage layer, row-major, with NaN marking cells no point
/// fell into ("no data", as opposed to zero coverage).
#[derive(Debug, Clone)]
pub struct Band {
    pub name: &'static str,
    pub grid_size: usize,
    pub data: Vec<f32>,
}

impl Band {
    fn new(name: &'static str, grid_size: usize) -> Self {
        Self {
            name,
            grid_size,
            data: vec![f32::NAN; grid_size * grid_size],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.grid_size + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row * self.grid_size + col] = value;
    }

    /// Reverses row order in place. Binning puts minimum y in row 0; raster
    /// storage wants row 0 at maximum y.
    fn flip_rows(&mut self) {
        let g = self.grid_size;
        for row in 0..g / 2 {
            for col in 0..g {
                self.data.swap(row * g + col, (g - 1 - row) * g + col);
            }
        }
    }

    /// Mean over populated cells, NaN when the whole band is empty.
    pub fn mean_coverage(&self) -> f32 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &v in &self.data {
            if !v.is_nan() {
                sum += v;
                count += 1;
            }
        }
        if count == 0 {
            f32::NAN
        } else {
            sum / count as f32
        }
    }
}

/// The per-plot output layers, in file band order.
#[derive(Debug, Clone)]
pub struct StratumRasters {
    pub grid_size: usize,
    pub bands: Vec<Band>,
}

impl StratumRasters {
    /// Builds the named bands from aggregated per-cell vectors and applies
    /// the row flip. With `normalize_ground` set, the low-vegetation value
    /// is renormalized against soil (`low / (low + soil)`); a cell whose
    /// denominator is not positive keeps the raw low score, so populated
    /// cells never turn into the missing sentinel.
    pub fn build(
        grid_size: usize,
        mode: StratumMode,
        normalize_ground: bool,
        cell_values: &HashMap<(usize, usize), Vec<f32>>,
    ) -> Result<Self, RasterError> {
        let mut low = Band::new("low_vegetation", grid_size);
        let mut medium = Band::new("medium_vegetation", grid_size);
        let mut high = mode
            .has_high_vegetation()
            .then(|| Band::new("high_vegetation", grid_size));

        for (&(row, col), values) in cell_values {
            if values.len() != mode.channels() {
                return Err(RasterError::ChannelMismatch {
                    expected: mode.channels(),
                    actual: values.len(),
                });
            }

            let low_value = if normalize_ground {
                let denominator = values[CHANNEL_LOW] + values[CHANNEL_SOIL];
                if denominator > 0.0 {
                    values[CHANNEL_LOW] / denominator
                } else {
                    values[CHANNEL_LOW]
                }
            } else {
                values[CHANNEL_LOW]
            };

            low.set(row, col, low_value);
            medium.set(row, col, values[CHANNEL_MEDIUM]);
            if let Some(band) = high.as_mut() {
                band.set(row, col, values[CHANNEL_HIGH]);
            }
        }

        let mut bands = vec![low, medium];
        bands.extend(high);
        for band in bands.iter_mut() {
            band.flip_rows();
        }

        Ok(Self { grid_size, bands })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_cell(values: Vec<f32>) -> HashMap<(usize, usize), Vec<f32>> {
        HashMap::from([((0, 0), values)])
    }

    #[test]
    fn bands_carry_their_channels() {
        let cells = single_cell(vec![0.9, 0.2, 0.6, 1.0]);
        let rasters = StratumRasters::build(32, StratumMode::Three, false, &cells).unwrap();

        assert_eq!(rasters.bands.len(), 3);
        // Cell (0, 0) lands in the last stored row after the flip.
        assert_eq!(rasters.bands[0].get(31, 0), 0.9);
        assert_eq!(rasters.bands[1].get(31, 0), 0.6);
        assert_eq!(rasters.bands[2].get(31, 0), 1.0);
    }

    #[test]
    fn ground_normalization_divides_by_low_plus_soil() {
        let cells = single_cell(vec![0.9, 0.2, 0.6, 1.0]);
        let rasters = StratumRasters::build(32, StratumMode::Three, true, &cells).unwrap();

        let expected = 0.9 / (0.9 + 0.2);
        assert!((rasters.bands[0].get(31, 0) - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_denominator_falls_back_to_raw_low_score() {
        let cells = single_cell(vec![0.0, 0.0, 0.4]);
        let rasters = StratumRasters::build(8, StratumMode::Two, true, &cells).unwrap();

        let value = rasters.bands[0].get(7, 0);
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }

    #[test]
    fn two_stratum_mode_produces_no_high_band() {
        let cells = single_cell(vec![0.5, 0.1, 0.3]);
        let rasters = StratumRasters::build(8, StratumMode::Two, false, &cells).unwrap();

        assert_eq!(rasters.bands.len(), 2);
        assert!(rasters.bands.iter().all(|b| b.name != "high_vegetation"));
    }

    #[test]
    fn empty_cells_stay_missing() {
        let cells = single_cell(vec![0.5, 0.1, 0.3]);
        let rasters = StratumRasters::build(4, StratumMode::Two, false, &cells).unwrap();

        for band in &rasters.bands {
            let populated = band.data.iter().filter(|v| !v.is_nan()).count();
            assert_eq!(populated, 1);
        }
    }

    #[test]
    fn rows_are_flipped_for_storage() {
        // Binning row 0 (minimum y) must end up as the last stored row.
        let mut cells = HashMap::new();
        cells.insert((0usize, 1usize), vec![0.1, 0.0, 0.0]);
        cells.insert((3usize, 2usize), vec![0.9, 0.0, 0.0]);
        let rasters = StratumRasters::build(4, StratumMode::Two, false, &cells).unwrap();

        assert_eq!(rasters.bands[0].get(3, 1), 0.1);
        assert_eq!(rasters.bands[0].get(0, 2), 0.9);
    }

    #[test]
    fn mean_coverage_ignores_missing_cells() {
        let mut cells = HashMap::new();
        cells.insert((0usize, 0usize), vec![0.2, 0.0, 0.0]);
        cells.insert((1usize, 1usize), vec![0.6, 0.0, 0.0]);
        let rasters = StratumRasters::build(4, StratumMode::Two, false, &cells).unwrap();

        assert!((rasters.bands[0].mean_coverage() - 0.4).abs() < 1e-6);
    }
}
