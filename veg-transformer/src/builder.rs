use crate::transform::ground::GroundHeightTransform;
use crate::transform::normalize::PlanarCenterTransform;
use crate::transform::{CompositeTransform, Transform};

pub trait TransformBuilder {
    fn build(&self) -> Box<dyn Transform>;
}

/// Builds the per-plot preprocessing chain: ground-height detrending first
/// (needs meter coordinates), then planar centering and rescaling.
pub struct PlotPreprocessBuilder {
    pub ground_radius: f64,
    pub plot_radius: f64,
}

impl PlotPreprocessBuilder {
    pub fn new(ground_radius: f64, plot_radius: f64) -> Self {
        Self {
            ground_radius,
            plot_radius,
        }
    }
}

impl TransformBuilder for PlotPreprocessBuilder {
    fn build(&self) -> Box<dyn Transform> {
        let ground = Box::new(GroundHeightTransform {
            radius: self.ground_radius,
        });
        let center = Box::new(PlanarCenterTransform {
            scale: self.plot_radius,
        });

        let composite = CompositeTransform::new(vec![ground, center]);

        Box::new(composite)
    }
}
