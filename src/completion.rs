use serde_derive::Serialize;
use tracing::{debug, info, warn};

use crate::config::CompletionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    Measuring,
    Finalized,
}

/// What the display should show after a cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Status {
    Idle,
    Measuring,
    // km/h, rounded; `None` when the duration was unusable
    Finalized { speed: Option<f64> },
}

/// The most recently accepted trajectory
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedServe {
    pub id: String,
    pub duration: f64,
}

#[derive(Debug, Default)]
pub struct CompletionDetector {
    config: CompletionConfig,
    frames_without_update: u32,
    last_accepted: Option<AcceptedServe>,
    phase: Phase,
}

impl CompletionDetector {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            config,
            frames_without_update: 0,
            last_accepted: None,
            phase: Phase::Idle,
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn frames_without_update(&self) -> u32 {
        self.frames_without_update
    }

    #[inline]
    pub fn last_accepted(&self) -> Option<&AcceptedServe> {
        self.last_accepted.as_ref()
    }

    /// Speed in km/h over the reference distance, rounded to a whole unit
    pub fn speed(&self, duration: f64) -> Option<f64> {
        if !(duration.is_finite() && duration > 0.0) {
            return None;
        }

        Some((self.config.kmh_per_ms * self.config.reference_distance_m / duration).round())
    }

    /// Advances the detector by one detection cycle.
    pub fn tick(&mut self, accepted: Option<AcceptedServe>) -> Status {
        if self.phase == Phase::Finalized {
            self.phase = Phase::Idle;
        }

        if let Some(serve) = accepted {
            if self.phase != Phase::Measuring {
                debug!(id = %serve.id, "measuring serve");
            }

            self.frames_without_update = 0;
            self.last_accepted = Some(serve);
            self.phase = Phase::Measuring;

            return Status::Measuring;
        }

        self.frames_without_update += 1;

        if self.frames_without_update < self.config.gap_threshold {
            return match self.phase {
                Phase::Measuring => Status::Measuring,
                _ => Status::Idle,
            };
        }

        let serve = match self.last_accepted.take() {
            Some(serve) => serve,
            None => {
                self.frames_without_update = 0;
                return Status::Idle;
            }
        };

        let speed = self.speed(serve.duration);

        match speed {
            Some(speed) => info!(id = %serve.id, duration = serve.duration, speed, "serve finished"),
            None => warn!(id = %serve.id, duration = serve.duration, "serve finished with unusable duration"),
        }

        self.frames_without_update = 0;
        self.phase = Phase::Finalized;

        Status::Finalized { speed }
    }

    pub fn reset(&mut self) {
        self.frames_without_update = 0;
        self.last_accepted = None;
        self.phase = Phase::Idle;
    }
}
