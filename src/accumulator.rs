use std::collections::HashMap;

use tracing::debug;

use crate::config::AccumulatorConfig;
use crate::observation::Observation;
use crate::Point;

#[derive(Debug, Clone)]
pub struct AccumulatedTrajectory {
    pub points: Vec<Point>,
    pub last_update: u64,
}

impl AccumulatedTrajectory {
    fn new(points: Vec<Point>, cycle: u64) -> Self {
        Self {
            points,
            last_update: cycle,
        }
    }

    /// Appends the part of `window` not already present at the tail.
    ///
    /// The detector reports a sliding window of the most recent points, so the
    /// head of a new window normally repeats the tail of what is stored. With no
    /// overlap at all only the newest point is taken.
    pub fn merge(&mut self, window: &[Point]) -> usize {
        let newest = match window.last() {
            Some(p) => *p,
            None => return 0,
        };

        let max_overlap = self.points.len().min(window.len());
        let overlap = (1..=max_overlap)
            .rev()
            .find(|&k| self.points[self.points.len() - k..] == window[..k])
            .unwrap_or(0);

        if overlap > 0 {
            let fresh = &window[overlap..];
            self.points.extend_from_slice(fresh);
            fresh.len()
        } else if self.points.last() != Some(&newest) {
            self.points.push(newest);
            1
        } else {
            0
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Per-identity store of the points seen so far for every trajectory
#[derive(Debug, Default)]
pub struct Accumulator {
    config: AccumulatorConfig,
    trajectories: HashMap<String, AccumulatedTrajectory>,
}

impl Accumulator {
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            config,
            trajectories: HashMap::new(),
        }
    }

    pub fn update(&mut self, obs: &Observation, cycle: u64) -> &mut AccumulatedTrajectory {
        let traj = self
            .trajectories
            .entry(obs.id.clone())
            .or_insert_with(|| AccumulatedTrajectory::new(Vec::new(), cycle));

        if traj.is_empty() {
            traj.points = obs.points.clone();
        } else {
            traj.merge(&obs.points);
        }

        traj.last_update = cycle;
        traj
    }

    #[inline]
    pub fn get(&self, id: &str) -> Option<&AccumulatedTrajectory> {
        self.trajectories.get(id)
    }

    /// Drops trajectories idle for more than `max_idle_cycles`.
    pub fn evict(&mut self, cycle: u64) -> usize {
        let max_idle = self.config.max_idle_cycles;
        let before = self.trajectories.len();

        self.trajectories.retain(|id, t| {
            let keep = cycle.saturating_sub(t.last_update) <= max_idle;
            if !keep {
                debug!(%id, points = t.points.len(), "evicting idle trajectory");
            }
            keep
        });

        before - self.trajectories.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
    }
}
