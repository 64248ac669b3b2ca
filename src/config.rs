use serde_derive::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;
use crate::roi::Roi;
use crate::window::WindowConfig;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Entries untouched for longer than this many cycles are dropped
    pub max_idle_cycles: u64,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            max_idle_cycles: 120,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub max_start_x: f64,
    pub min_end_x: f64,
    pub min_drop: f64,
    pub min_points: usize,
    pub max_curvature: f64,
    /// Observation confidence must be strictly above this
    pub min_confidence: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_start_x: 0.6,
            min_end_x: 0.4,
            min_drop: 0.1,
            min_points: 8,
            max_curvature: 0.0,
            min_confidence: 0.6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CorrectorConfig {
    pub boundary_x: f64,
    /// Number of leading point pairs averaged into the step size
    pub step_pairs: usize,
}

impl Default for CorrectorConfig {
    fn default() -> Self {
        Self {
            boundary_x: 0.1,
            step_pairs: 5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CompletionConfig {
    pub gap_threshold: u32,
    pub reference_distance_m: f64,
    pub kmh_per_ms: f64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            gap_threshold: 4,
            reference_distance_m: 18.0,
            kmh_per_ms: 3.6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub accumulator: AccumulatorConfig,
    pub filter: FilterConfig,
    pub corrector: CorrectorConfig,
    pub completion: CompletionConfig,
    pub roi: Roi,
    pub window: WindowConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let unit = |v: f64| (0.0..=1.0).contains(&v);

        if self.corrector.step_pairs == 0 {
            return Err(Error::InvalidConfig("corrector.step_pairs must be > 0".into()));
        }

        if self.filter.min_points == 0 {
            return Err(Error::InvalidConfig("filter.min_points must be > 0".into()));
        }

        // also rejects NaN and infinities
        if !unit(self.corrector.boundary_x) {
            return Err(Error::InvalidConfig(
                "corrector.boundary_x must be within [0, 1]".into(),
            ));
        }

        if self.completion.gap_threshold == 0 {
            return Err(Error::InvalidConfig(
                "completion.gap_threshold must be > 0".into(),
            ));
        }

        if !(self.completion.reference_distance_m > 0.0 && self.completion.kmh_per_ms > 0.0) {
            return Err(Error::InvalidConfig(
                "completion distance and speed factor must be positive".into(),
            ));
        }

        if !unit(self.filter.min_confidence) {
            return Err(Error::InvalidConfig(
                "filter.min_confidence must be within [0, 1]".into(),
            ));
        }

        if self.window.len < 3 {
            return Err(Error::InvalidConfig(
                "window.len must be at least 3 for a quadratic fit".into(),
            ));
        }

        if !(self.window.residual_scale.is_finite() && self.window.residual_scale > 0.0) {
            return Err(Error::InvalidConfig(
                "window.residual_scale must be positive".into(),
            ));
        }

        let roi = &self.roi;
        if !(unit(roi.x)
            && unit(roi.y)
            && roi.width > 0.0
            && roi.height > 0.0
            && unit(roi.x + roi.width)
            && unit(roi.y + roi.height))
        {
            return Err(Error::InvalidConfig(format!(
                "roi {:?} is outside the unit square",
                roi
            )));
        }

        Ok(())
    }
}
