use std::collections::HashMap;

use veg_core::pointcloud::point::Point;

/// A predicate on a single point, applied while loading one specific file.
///
/// A handful of survey files carry sensor artifacts (stray returns far above
/// the canopy, saturated intensity values). Those are expressed here as data
/// rather than as filename branches inside the loaders.
#[derive(Debug, Clone, Copy)]
pub enum AnomalyRule {
    /// Drop points at or above this height (meters).
    MaxHeight(f64),
    /// Drop points at or above this intensity value.
    MaxIntensity(u16),
}

impl AnomalyRule {
    fn keeps(&self, point: &Point) -> bool {
        match *self {
            AnomalyRule::MaxHeight(limit) => point.z < limit,
            AnomalyRule::MaxIntensity(limit) => match point.attributes.intensity {
                Some(intensity) => intensity < limit,
                None => true,
            },
        }
    }
}

/// Per-file anomaly rules, keyed by file stem.
#[derive(Debug, Clone, Default)]
pub struct AnomalyFilter {
    rules: HashMap<String, Vec<AnomalyRule>>,
}

impl AnomalyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The known bad files of the survey campaign: a pair of returns ~60 m
    /// above the canopy (likely birds) and two plots with saturated
    /// intensity recordings.
    pub fn default_rules() -> Self {
        Self::new()
            .with_rule("Releve_Lidar_F70", AnomalyRule::MaxHeight(640.0))
            .with_rule("POINT_OBS8", AnomalyRule::MaxIntensity(32768))
            .with_rule("Releve_Lidar_F39", AnomalyRule::MaxIntensity(20000))
    }

    pub fn with_rule(mut self, file_stem: impl Into<String>, rule: AnomalyRule) -> Self {
        self.rules.entry(file_stem.into()).or_default().push(rule);
        self
    }

    /// Whether `point` from the file named `file_stem` should be kept.
    pub fn keeps(&self, file_stem: &str, point: &Point) -> bool {
        match self.rules.get(file_stem) {
            Some(rules) => rules.iter().all(|rule| rule.keeps(point)),
            None => true,
        }
    }
}
