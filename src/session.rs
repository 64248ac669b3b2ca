use serde_derive::Serialize;
use tracing::debug;

use crate::accumulator::Accumulator;
use crate::completion::{AcceptedServe, CompletionDetector, Phase, Status};
use crate::config::Config;
use crate::corrector::PathCorrector;
use crate::error::Error;
use crate::filter::ServeFilter;
use crate::roi::Roi;
use crate::{Frame, Point};

/// Display-ready path of an accepted trajectory
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServePath {
    pub id: String,
    pub points: Vec<Point>,
}

impl ServePath {
    /// Path in pixels of a view of the given size covering the ROI, y-down
    pub fn to_view(&self, width: f64, height: f64) -> Vec<Point> {
        self.points
            .iter()
            .map(|p| Roi::to_view(p, width, height))
            .collect()
    }
}

/// Result of one detection cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cycle {
    pub cycle: u64,
    pub timestamp: f64,
    pub accepted: Vec<ServePath>,
    pub status: Status,
}

impl Cycle {
    #[inline]
    pub fn speed(&self) -> Option<f64> {
        match self.status {
            Status::Finalized { speed } => speed,
            _ => None,
        }
    }

    #[inline]
    pub fn is_measuring(&self) -> bool {
        self.status == Status::Measuring
    }
}

/// All per-video state: accumulated trajectories and the completion detector.
pub struct Session {
    cycle: u64,
    accumulator: Accumulator,
    filter: ServeFilter,
    corrector: PathCorrector,
    completion: CompletionDetector,
    last_path: Option<ServePath>,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            cycle: 0,
            accumulator: Accumulator::new(config.accumulator.clone()),
            filter: ServeFilter::new(config.filter.clone()),
            corrector: PathCorrector::new(config.corrector.clone()),
            completion: CompletionDetector::new(config.completion.clone()),
            last_path: None,
        }
    }

    #[inline]
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.completion.phase()
    }

    #[inline]
    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    #[inline]
    pub fn completion(&self) -> &CompletionDetector {
        &self.completion
    }

    /// Last path handed to the display, kept until the next acceptance
    #[inline]
    pub fn last_path(&self) -> Option<&ServePath> {
        self.last_path.as_ref()
    }

    /// Runs one detection cycle.
    ///
    /// The frame is validated before any state is touched, so a malformed
    /// observation fails the cycle without affecting later ones.
    pub fn process(&mut self, frame: &Frame) -> Result<Cycle, Error> {
        frame.validate()?;

        let cycle = self.cycle;
        self.cycle += 1;

        let mut accepted = Vec::new();
        let mut last_accepted = None;

        for obs in frame.iter() {
            let equation = obs.equation()?;
            let traj = self.accumulator.update(obs, cycle);

            if let Err(reason) = self.filter.check(&traj.points, &equation, obs.confidence) {
                debug!(id = %obs.id, points = traj.points.len(), %reason, "trajectory rejected");
                continue;
            }

            let points = self.corrector.correct(&traj.points, &equation);
            traj.points = points.clone();

            debug!(id = %obs.id, points = points.len(), "trajectory accepted");

            accepted.push(ServePath {
                id: obs.id.clone(),
                points,
            });
            last_accepted = Some(AcceptedServe {
                id: obs.id.clone(),
                duration: obs.duration,
            });
        }

        let status = self.completion.tick(last_accepted);

        if let Some(path) = accepted.last() {
            self.last_path = Some(path.clone());
        }

        self.accumulator.evict(cycle);

        Ok(Cycle {
            cycle,
            timestamp: frame.timestamp,
            accepted,
            status,
        })
    }

    pub fn reset(&mut self) {
        self.cycle = 0;
        self.accumulator.clear();
        self.completion.reset();
        self.last_path = None;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{Coefficients, Observation};

    fn eq() -> Coefficients {
        Coefficients::new(-0.5, 0.1, 0.4)
    }

    fn pt(i: usize) -> Point {
        Point::new(0.2 + 0.05 * i as f64, 0.5 - 0.02 * i as f64)
    }

    fn obs(id: &str, start: usize, confidence: f64) -> Observation {
        Observation::new(id, (start..start + 5).map(pt).collect(), eq(), confidence, 0.4)
    }

    #[test]
    fn accepts_after_enough_points() {
        let mut session = Session::default();

        for i in 0..3 {
            let cycle = session.process(&Frame::new(i as f64, vec![obs("a", i, 0.95)])).unwrap();
            assert!(cycle.accepted.is_empty());
            assert_eq!(cycle.status, Status::Idle);
        }

        let cycle = session.process(&Frame::new(3.0, vec![obs("a", 3, 0.95)])).unwrap();
        assert_eq!(cycle.accepted.len(), 1);
        assert!(cycle.is_measuring());

        let path = &cycle.accepted[0].points;
        assert!(path[0].x <= 0.1 + 1e-9);
        assert_eq!(path.len(), 8 + 2);
        assert_eq!(session.accumulator().get("a").unwrap().points, *path);
        assert_eq!(session.last_path(), Some(&cycle.accepted[0]));
    }

    #[test]
    fn low_confidence_never_accepted() {
        let mut session = Session::default();

        for i in 0..6 {
            let cycle = session.process(&Frame::new(i as f64, vec![obs("a", i, 0.5)])).unwrap();
            assert!(cycle.accepted.is_empty());
        }
        assert_eq!(session.accumulator().get("a").unwrap().len(), 10);
    }

    #[test]
    fn malformed_frame_leaves_state_untouched() {
        let mut session = Session::default();
        session.process(&Frame::new(0.0, vec![obs("a", 0, 0.95)])).unwrap();

        let mut bad = obs("b", 0, 0.95);
        bad.coefficients = vec![1.0];
        let frame = Frame::new(1.0, vec![obs("a", 1, 0.95), bad]);

        assert!(matches!(
            session.process(&frame),
            Err(Error::MalformedCoefficients { .. })
        ));
        assert_eq!(session.cycle(), 1);
        assert_eq!(session.accumulator().get("a").unwrap().len(), 5);
        assert!(session.accumulator().get("b").is_none());
    }

    #[test]
    fn finalizes_four_empty_cycles_after_acceptance() {
        let mut session = Session::default();

        for i in 0..4 {
            session.process(&Frame::new(i as f64, vec![obs("a", i, 0.95)])).unwrap();
        }
        assert_eq!(session.phase(), Phase::Measuring);

        let speeds: Vec<_> = (0..6)
            .map(|i| session.process(&Frame::empty(4.0 + i as f64)).unwrap())
            .map(|c| c.speed())
            .collect();

        assert_eq!(speeds, vec![None, None, None, Some(162.0), None, None]);
        assert_eq!(session.completion().frames_without_update(), 2);
    }

    #[test]
    fn path_maps_to_view() {
        let path = ServePath {
            id: "a".into(),
            points: vec![Point::new(0.0, 1.0), Point::new(1.0, 0.0)],
        };

        assert_eq!(
            path.to_view(100.0, 50.0),
            vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0)]
        );
    }
}
