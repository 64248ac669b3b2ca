use std::collections::VecDeque;

use tracing::{debug, warn};

use crate::config::CorrectorConfig;
use crate::math;
use crate::observation::Coefficients;
use crate::Point;

// absorbs rounding from repeated subtraction near the boundary
const BOUNDARY_EPSILON: f64 = 1e-9;

/// Extends accepted trajectories back to the start boundary along their
/// fitted parabola.
#[derive(Debug, Clone, Default)]
pub struct PathCorrector {
    config: CorrectorConfig,
}

impl PathCorrector {
    pub fn new(config: CorrectorConfig) -> Self {
        Self { config }
    }

    #[inline]
    fn past_boundary(&self, x: f64) -> bool {
        x > self.config.boundary_x + BOUNDARY_EPSILON
    }

    pub fn correct(&self, points: &[Point], equation: &Coefficients) -> Vec<Point> {
        let first = match points.first() {
            Some(p) => *p,
            None => return Vec::new(),
        };

        if !self.past_boundary(first.x) {
            return points.to_vec();
        }

        let step = match math::mean_x_step(points, self.config.step_pairs) {
            Some(step) => step,
            None => return points.to_vec(),
        };

        if !(step.is_finite() && step > 0.0) {
            warn!(step, "non-positive extrapolation step, leaving path as is");
            return points.to_vec();
        }

        let mut path: VecDeque<Point> = points.iter().copied().collect();
        let mut x = first.x;

        while self.past_boundary(x) {
            let next = x - step;

            // step below the float resolution at x
            if next >= x {
                warn!(x, step, "extrapolation stalled");
                break;
            }

            x = next;

            let y = equation.eval(x);
            if y > 0.0 {
                path.push_front(Point::new(x, y));
            }
        }

        debug!(
            prepended = path.len() - points.len(),
            start_x = path.front().map(|p| p.x),
            "path corrected"
        );

        path.into()
    }
}
