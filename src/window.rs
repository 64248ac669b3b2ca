use nalgebra as na;
use serde_derive::{Deserialize, Serialize};
use tracing::debug;

use crate::circular_queue::CircularQueue;
use crate::math;
use crate::observation::{Coefficients, Observation};
use crate::Point;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Points per reported observation
    pub len: usize,
    /// Frames the ball may go unseen before the trajectory is closed
    pub max_missing: u32,
    /// Residual at which confidence falls to ~0.6
    pub residual_scale: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            len: 5,
            max_missing: 2,
            residual_scale: 0.01,
        }
    }
}

/// Builds trajectory observations from raw per-frame ball positions.
///
/// Stands in for the platform trajectory detector: keeps a sliding window of
/// the most recent points, fits a parabola over the whole trajectory so far and
/// derives a confidence from the fit residual.
#[derive(Debug)]
pub struct ObservationWindow {
    config: WindowConfig,
    prefix: String,
    seq: u32,
    recent: CircularQueue<Point>,
    track: Vec<Point>,
    started_at: f64,
    missing: u32,
}

impl ObservationWindow {
    pub fn new(prefix: impl Into<String>, config: WindowConfig) -> Self {
        let recent = CircularQueue::with_capacity(config.len.max(3));

        Self {
            config,
            prefix: prefix.into(),
            seq: 0,
            recent,
            track: Vec::new(),
            started_at: 0.0,
            missing: 0,
        }
    }

    #[inline]
    pub fn current_id(&self) -> String {
        format!("{}-{}", self.prefix, self.seq)
    }

    fn close(&mut self) {
        if !self.track.is_empty() {
            debug!(id = %self.current_id(), points = self.track.len(), "trajectory closed");
            self.seq += 1;
        }

        self.recent.clear();
        self.track.clear();
        self.missing = 0;
    }

    fn fit(&self) -> Option<(Coefficients, f64)> {
        let x = na::DVector::from_iterator(self.track.len(), self.track.iter().map(|p| p.x));
        let y = na::DVector::from_iterator(self.track.len(), self.track.iter().map(|p| p.y));
        let params = math::quadratic_ls(&x, &y)?;

        let equation = Coefficients::new(params[0], params[1], params[2]);
        let residual = math::rms_residual(&self.track, |x| equation.eval(x));

        Some((equation, math::gauss(residual, self.config.residual_scale)))
    }

    /// Feeds the ball position seen at `ts`, `None` when no ball was found.
    pub fn push(&mut self, ts: f64, ball: Option<Point>) -> Option<Observation> {
        let ball = match ball {
            Some(ball) => ball,
            None => {
                self.missing += 1;
                if self.missing > self.config.max_missing {
                    self.close();
                }
                return None;
            }
        };

        if self.track.is_empty() {
            self.started_at = ts;
        }

        self.missing = 0;
        self.recent.push(ball);
        self.track.push(ball);

        if !self.recent.is_full() {
            return None;
        }

        let (equation, confidence) = self.fit()?;

        Some(Observation::new(
            self.current_id(),
            self.recent.asc_iter().copied().collect(),
            equation,
            confidence,
            ts - self.started_at,
        ))
    }
}
