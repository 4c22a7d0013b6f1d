use crate::error::RasterError;

/// Per-point class scores produced by the external model, one row per point.
/// Channel order is {low vegetation, soil, medium vegetation, high
/// vegetation}; the fourth channel is only present in 3-stratum mode.
#[derive(Debug, Clone)]
pub struct PointPredictions {
    channels: usize,
    values: Vec<f32>,
}

impl PointPredictions {
    pub fn new(channels: usize, values: Vec<f32>) -> Result<Self, RasterError> {
        if channels == 0 || values.len() % channels != 0 {
            return Err(RasterError::RaggedPredictions { channels });
        }
        if let Some(pos) = values.iter().position(|v| *v < 0.0) {
            return Err(RasterError::NegativeScore { row: pos / channels });
        }
        Ok(Self { channels, values })
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of rows (= points).
    pub fn len(&self) -> usize {
        self.values.len() / self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.channels..(i + 1) * self.channels]
    }
}
