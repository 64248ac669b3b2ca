use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::observation::Observation;

/// All observations reported for one detection cycle
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Frame {
    pub timestamp: f64, // in seconds
    #[serde(default)]
    pub observations: Vec<Observation>,
}

impl Frame {
    pub fn new(timestamp: f64, observations: Vec<Observation>) -> Self {
        Self {
            timestamp,
            observations,
        }
    }

    #[inline]
    pub fn empty(timestamp: f64) -> Self {
        Self::new(timestamp, Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Fails on the first observation without a 3-term fit.
    pub fn validate(&self) -> Result<(), Error> {
        for obs in &self.observations {
            obs.equation()?;
        }

        Ok(())
    }
}
