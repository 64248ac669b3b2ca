use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_derive::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use servetrack::roi::Roi;
use servetrack::window::ObservationWindow;
use servetrack::{Config, Cycle, Frame, Point, ServeTracker, Status, Tracking};

#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(about = "Replays recorded trajectory observations through the serve tracker", long_about = None)]
struct Args {
    /// JSON-lines file, one frame per line
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// YAML config overriding the default thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lines hold raw ball positions in frame coordinates
    /// (`{"timestamp": t, "ball": [x, y]}`)
    #[arg(long, default_value_t = false)]
    raw: bool,

    /// Print every cycle as JSON instead of only status changes
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Deserialize, Debug)]
struct RawSample {
    timestamp: f64,
    ball: Option<Point>,
}

struct Source {
    roi: Roi,
    raw: Option<ObservationWindow>,
}

impl Source {
    fn frame(&mut self, line: &str) -> Result<Frame> {
        match &mut self.raw {
            Some(window) => {
                let sample: RawSample = serde_json::from_str(line)?;
                let ball = sample.ball.map(|p| self.roi.from_frame(&p));
                let observations = window.push(sample.timestamp, ball).into_iter().collect();

                Ok(Frame::new(sample.timestamp, observations))
            }
            None => Ok(serde_json::from_str(line)?),
        }
    }
}

fn report(cycle: &Cycle, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(cycle)?);
        return Ok(());
    }

    for path in &cycle.accepted {
        info!(
            cycle = cycle.cycle,
            id = %path.id,
            points = path.points.len(),
            start_x = path.points.first().map(|p| p.x),
            "path"
        );
    }

    if let Status::Finalized { speed } = cycle.status {
        match speed {
            Some(speed) => println!("{:.3}: {:.0} km/h", cycle.timestamp, speed),
            None => println!("{:.3}: speed unavailable", cycle.timestamp),
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("servetrack=info")),
        )
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    let mut tracker = ServeTracker::new(config)?;
    let mut source = Source {
        roi: tracker.config().roi,
        raw: args
            .raw
            .then(|| ObservationWindow::new("ball", tracker.config().window.clone())),
    };

    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("opening {}", args.input.display()))?;
    let src = args.input.display().to_string();

    let mut serves = 0;
    for (lineno, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let frame = match source.frame(&line) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(line = lineno + 1, %err, "wrong file format, skipping line");
                continue;
            }
        };

        match tracker.update(&frame, &src) {
            Ok(cycle) => {
                if matches!(cycle.status, Status::Finalized { .. }) {
                    serves += 1;
                }
                report(&cycle, args.json)?;
            }
            Err(err) => warn!(line = lineno + 1, %err, "cycle skipped"),
        }
    }

    info!(serves, "replay finished");

    Ok(())
}
