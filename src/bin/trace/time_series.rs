// Per-Frame JSONL Time Series Recorder
// Outputs one JSON line per published frame for independent analysis

use serde::Serialize;
use solow_engine::{FrameResult, GrowthSimulation};
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct FrameSnapshot {
    pub wall_ms: f64,
    pub steps: u64,
    pub t: f64,
    pub k: f64,
    pub production: f64,
    pub investment: f64,
    pub consumption: f64,
    pub s: f64,
    pub a: f64,
    pub d: f64,
    pub retained: usize,
    pub window_span: f64,
    pub capital_axis_max: f64,
    pub faults: u64,
}

impl FrameSnapshot {
    pub fn from_frame(wall_ms: f64, frame: &FrameResult, sim: &GrowthSimulation) -> Self {
        let params = sim.params();
        let history = sim.history();
        let (production, investment, consumption) = history
            .newest()
            .map(|s| (s.production(), s.investment(), s.consumption()))
            .unwrap_or((0.0, 0.0, 0.0));
        let capital_axis_max = frame
            .series
            .as_ref()
            .map(|series| series.capital_axis().max)
            .unwrap_or(0.0);

        Self {
            wall_ms,
            steps: frame.steps,
            t: frame.time,
            k: frame.state,
            production,
            investment,
            consumption,
            s: params.s,
            a: params.a,
            d: params.d,
            retained: history.len(),
            window_span: history.span(),
            capital_axis_max,
            faults: sim.stats().faults,
        }
    }
}

/// Accumulates snapshots and writes JSONL
pub struct TimeSeriesRecorder {
    snapshots: Vec<FrameSnapshot>,
}

impl TimeSeriesRecorder {
    pub fn new() -> Self {
        Self { snapshots: Vec::new() }
    }

    pub fn record(&mut self, wall_ms: f64, frame: &FrameResult, sim: &GrowthSimulation) {
        self.snapshots.push(FrameSnapshot::from_frame(wall_ms, frame, sim));
    }

    /// Write all snapshots to a JSONL file
    pub fn write_jsonl(&self, path: &std::path::Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
        for snapshot in &self.snapshots {
            let line = serde_json::to_string(snapshot)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
}
