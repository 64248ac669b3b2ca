use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::Point;

/// Fitted parabola `y = a*x^2 + b*x + c` in ROI space
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Coefficients {
    #[inline]
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    #[inline(always)]
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x * x + self.b * x + self.c
    }

    #[inline]
    pub fn to_vec(self) -> Vec<f64> {
        vec![self.a, self.b, self.c]
    }
}

/// One trajectory report from the vision subsystem.
///
/// Successive reports with the same `id` describe the same physical ball and
/// carry overlapping windows of the most recent projected points.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Observation {
    pub id: String,
    pub points: Vec<Point>,
    pub coefficients: Vec<f64>,
    pub confidence: f64,
    // in seconds, covering the whole trajectory so far
    pub duration: f64,
}

impl Observation {
    pub fn new(
        id: impl Into<String>,
        points: Vec<Point>,
        equation: Coefficients,
        confidence: f64,
        duration: f64,
    ) -> Self {
        Self {
            id: id.into(),
            points,
            coefficients: equation.to_vec(),
            confidence,
            duration,
        }
    }

    pub fn equation(&self) -> Result<Coefficients, Error> {
        match self.coefficients.as_slice() {
            &[a, b, c] => Ok(Coefficients { a, b, c }),
            other => Err(Error::MalformedCoefficients {
                id: self.id.clone(),
                len: other.len(),
            }),
        }
    }

    #[inline]
    pub fn newest(&self) -> Option<&Point> {
        self.points.last()
    }
}
