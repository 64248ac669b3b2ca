use std::fmt;

use crate::config::FilterConfig;
use crate::observation::Coefficients;
use crate::Point;

/// First predicate a trajectory failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    NotLeftToRight,
    StartsTooFarRight,
    EndsTooFarLeft,
    NotDescending,
    TooShort,
    WrongCurvature,
    LowConfidence,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Rejection::Empty => "empty trajectory",
            Rejection::NotLeftToRight => "not moving left to right",
            Rejection::StartsTooFarRight => "starts outside the start region",
            Rejection::EndsTooFarLeft => "ends outside the end region",
            Rejection::NotDescending => "end is not below start",
            Rejection::TooShort => "too few points",
            Rejection::WrongCurvature => "parabola opens the wrong way",
            Rejection::LowConfidence => "confidence too low",
        };

        f.write_str(reason)
    }
}

/// Decides whether an accumulated trajectory looks like a serve arc
#[derive(Debug, Clone, Default)]
pub struct ServeFilter {
    config: FilterConfig,
}

impl ServeFilter {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn check(
        &self,
        points: &[Point],
        equation: &Coefficients,
        confidence: f64,
    ) -> Result<(), Rejection> {
        let cfg = &self.config;

        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(Rejection::Empty),
        };

        if !(first.x < last.x) {
            return Err(Rejection::NotLeftToRight);
        }

        if !(first.x < cfg.max_start_x) {
            return Err(Rejection::StartsTooFarRight);
        }

        if !(last.x > cfg.min_end_x) {
            return Err(Rejection::EndsTooFarLeft);
        }

        if !(first.y - cfg.min_drop > last.y) {
            return Err(Rejection::NotDescending);
        }

        if points.len() < cfg.min_points {
            return Err(Rejection::TooShort);
        }

        if !(equation.a <= cfg.max_curvature) {
            return Err(Rejection::WrongCurvature);
        }

        if !(confidence > cfg.min_confidence) {
            return Err(Rejection::LowConfidence);
        }

        Ok(())
    }

    #[inline]
    pub fn accept(&self, points: &[Point], equation: &Coefficients, confidence: f64) -> bool {
        self.check(points, equation, confidence).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serve() -> Vec<Point> {
        (0..8)
            .map(|i| Point::new(0.2 + 0.05 * i as f64, 0.5 - 0.02 * i as f64))
            .collect()
    }

    fn eq() -> Coefficients {
        Coefficients::new(-0.5, 0.1, 0.4)
    }

    #[test]
    fn accepts_serve_arc() {
        let filter = ServeFilter::default();
        assert!(filter.accept(&serve(), &eq(), 0.95));
    }

    #[test]
    fn rejects_low_confidence() {
        let filter = ServeFilter::default();

        assert_eq!(
            filter.check(&serve(), &eq(), 0.5),
            Err(Rejection::LowConfidence)
        );
        // strictly greater
        assert!(!filter.accept(&serve(), &eq(), 0.6));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            ServeFilter::default().check(&[], &eq(), 0.99),
            Err(Rejection::Empty)
        );
    }

    #[test]
    fn rejects_each_geometric_condition() {
        let filter = ServeFilter::default();

        let mut reversed = serve();
        reversed.reverse();
        assert_eq!(
            filter.check(&reversed, &eq(), 0.9),
            Err(Rejection::NotLeftToRight)
        );

        let shifted: Vec<_> = serve().iter().map(|p| Point::new(p.x + 0.45, p.y)).collect();
        assert_eq!(
            filter.check(&shifted, &eq(), 0.9),
            Err(Rejection::StartsTooFarRight)
        );

        let short_x: Vec<_> = serve()
            .iter()
            .map(|p| Point::new(p.x * 0.5, p.y))
            .collect();
        assert_eq!(
            filter.check(&short_x, &eq(), 0.9),
            Err(Rejection::EndsTooFarLeft)
        );

        let flat: Vec<_> = serve().iter().map(|p| Point::new(p.x, 0.5)).collect();
        assert_eq!(filter.check(&flat, &eq(), 0.9), Err(Rejection::NotDescending));

        let steep: Vec<_> = (0..5)
            .map(|i| Point::new(0.2 + 0.1 * i as f64, 0.8 - 0.1 * i as f64))
            .collect();
        assert_eq!(filter.check(&steep, &eq(), 0.9), Err(Rejection::TooShort));

        assert_eq!(
            filter.check(&serve(), &Coefficients::new(0.3, 0.1, 0.4), 0.9),
            Err(Rejection::WrongCurvature)
        );
    }

    // n points from `first` to `last`, endpoints exact
    fn span(first: (f64, f64), last: (f64, f64), n: usize) -> Vec<Point> {
        let mut points: Vec<_> = (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Point::new(
                    first.0 + (last.0 - first.0) * t,
                    first.1 + (last.1 - first.1) * t,
                )
            })
            .collect();

        points[0] = Point::new(first.0, first.1);
        points[n - 1] = Point::new(last.0, last.1);
        points
    }

    // thresholds representable exactly in binary
    fn exact_filter() -> ServeFilter {
        ServeFilter::new(FilterConfig {
            max_start_x: 0.625,
            min_end_x: 0.375,
            min_drop: 0.125,
            ..FilterConfig::default()
        })
    }

    #[test]
    fn thresholds_are_strict() {
        let filter = exact_filter();

        assert_eq!(
            filter.check(&span((0.625, 0.75), (0.875, 0.5), 8), &eq(), 0.9),
            Err(Rejection::StartsTooFarRight)
        );
        assert!(filter.accept(&span((0.5, 0.75), (0.875, 0.5), 8), &eq(), 0.9));

        assert_eq!(
            filter.check(&span((0.125, 0.75), (0.375, 0.5), 8), &eq(), 0.9),
            Err(Rejection::EndsTooFarLeft)
        );
        assert!(filter.accept(&span((0.125, 0.75), (0.5, 0.5), 8), &eq(), 0.9));

        // 0.75 - 0.125 == 0.625 exactly
        assert_eq!(
            filter.check(&span((0.25, 0.75), (0.75, 0.625), 8), &eq(), 0.9),
            Err(Rejection::NotDescending)
        );
        assert!(filter.accept(&span((0.25, 0.75), (0.75, 0.5), 8), &eq(), 0.9));
    }

    #[test]
    fn default_x_limits_are_exclusive() {
        let filter = ServeFilter::default();

        assert_eq!(
            filter.check(&span((0.6, 0.5), (0.9, 0.3), 8), &eq(), 0.9),
            Err(Rejection::StartsTooFarRight)
        );
        assert_eq!(
            filter.check(&span((0.1, 0.5), (0.4, 0.3), 8), &eq(), 0.9),
            Err(Rejection::EndsTooFarLeft)
        );
    }

    #[test]
    fn needs_eight_points() {
        let filter = ServeFilter::default();

        let seven = span((0.2, 0.5), (0.5, 0.3), 7);
        assert_eq!(filter.check(&seven, &eq(), 0.9), Err(Rejection::TooShort));

        let eight = span((0.2, 0.5), (0.5, 0.3), 8);
        assert_eq!(filter.check(&eight, &eq(), 0.9), Ok(()));
    }

    #[test]
    fn flat_curve_is_allowed() {
        let filter = ServeFilter::default();
        assert!(filter.accept(&serve(), &Coefficients::new(0.0, -0.4, 0.58), 0.7));
    }

    #[test]
    fn is_deterministic() {
        let filter = ServeFilter::default();
        let points = serve();

        let first = filter.check(&points, &eq(), 0.61);
        for _ in 0..10 {
            assert_eq!(filter.check(&points, &eq(), 0.61), first);
        }
    }
}
