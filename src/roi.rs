use serde_derive::{Deserialize, Serialize};

use crate::Point;

/// Normalized sub-rectangle of the video frame the trajectories live in.
///
/// Both ROI and frame coordinates are y-up with the origin in the lower-left
/// corner; the flip to y-down happens only when mapping into a view.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Roi {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Roi {
    fn default() -> Self {
        Self {
            x: 0.25,
            y: 0.4,
            width: 0.65,
            height: 0.5,
        }
    }
}

impl Roi {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// ROI-normalized point into frame-normalized coordinates
    #[inline]
    pub fn to_frame(&self, p: &Point) -> Point {
        Point::new(self.x + p.x * self.width, self.y + p.y * self.height)
    }

    /// Inverse of [`Roi::to_frame`]
    #[inline]
    pub fn from_frame(&self, p: &Point) -> Point {
        Point::new((p.x - self.x) / self.width, (p.y - self.y) / self.height)
    }

    /// ROI-normalized point into pixels of a view covering exactly the ROI
    #[inline]
    pub fn to_view(p: &Point, width: f64, height: f64) -> Point {
        Point::new(p.x * width, (1.0 - p.y) * height)
    }

    /// Pixel rectangle `[left, top, width, height]` of the ROI inside a frame
    /// of the given size, y-down.
    pub fn view_rect(&self, frame_width: f64, frame_height: f64) -> [f64; 4] {
        [
            self.x * frame_width,
            (1.0 - (self.y + self.height)) * frame_height,
            self.width * frame_width,
            self.height * frame_height,
        ]
    }
}
