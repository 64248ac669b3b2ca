pub mod accumulator;
pub mod completion;
pub mod config;
pub mod corrector;
pub mod error;
pub mod filter;
pub mod frame;
pub mod math;
pub mod observation;
pub mod roi;
pub mod session;
pub mod window;

mod circular_queue;

pub use completion::Status;
pub use config::Config;
pub use frame::Frame;
pub use observation::{Coefficients, Observation};
pub use session::{Cycle, ServePath, Session};

use error::Error;
use nalgebra as na;
use std::collections::HashMap;

/// Point in normalized region-of-interest space
pub type Point = na::Point2<f64>;

pub trait Tracking {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<Cycle, Error>;
    fn path(&self, src: &str) -> Option<&ServePath>;
    fn reset(&mut self, src: &str);
}

/// Serve sessions keyed by video source
pub struct ServeTracker {
    config: Config,
    sessions: HashMap<String, Session>,
}

impl ServeTracker {
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            sessions: HashMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn session(&self, src: &str) -> Option<&Session> {
        self.sessions.get(src)
    }
}

impl Default for ServeTracker {
    fn default() -> Self {
        Self {
            config: Config::default(),
            sessions: HashMap::new(),
        }
    }
}

impl crate::Tracking for ServeTracker {
    fn update(&mut self, frame: &Frame, src: &str) -> Result<Cycle, Error> {
        let config = &self.config;
        let session = self
            .sessions
            .entry(src.to_string())
            .or_insert_with(|| Session::new(config));

        session.process(frame)
    }

    #[inline]
    fn path(&self, src: &str) -> Option<&ServePath> {
        self.sessions.get(src)?.last_path()
    }

    fn reset(&mut self, src: &str) {
        if let Some(session) = self.sessions.get_mut(src) {
            session.reset();
        }
    }
}
