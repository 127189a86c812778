// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Simulation Core

use wasm_bindgen::prelude::*;

use crate::config::{ConfigError, SimConfig};
use crate::history::HistoryBuffer;
use crate::integrator::Integrator;
use crate::types::*;

// ─── GrowthSimulation struct ─────────────────────────────────────────────────

/// Parameters, clock state and history of one view.
///
/// Each view owns its own instance; nothing here is shared.
#[wasm_bindgen]
pub struct GrowthSimulation {
    pub(crate) config: SimConfig,
    pub(crate) params: Params,
    pub(crate) integrator: Integrator,
    pub(crate) history: HistoryBuffer,

    pub(crate) frames: u64,
    pub(crate) max_steps_per_frame: u64,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl GrowthSimulation {
    pub fn from_config(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        log::debug!(
            "simulation created: dt={} window={}s max_points={} params={:?}",
            config.dt, config.window_size, config.max_points, config.initial_params
        );
        Ok(Self::build(config))
    }

    fn build(config: SimConfig) -> Self {
        let params = config.initial_params;
        let integrator = Integrator::new(&config);
        let history = HistoryBuffer::seeded(
            config.max_points,
            config.window_size,
            integrator.seed_sample(&params),
        );
        Self {
            config,
            params,
            integrator,
            history,
            frames: 0,
            max_steps_per_frame: 0,
        }
    }

    /// Handle one display frame stamped `timestamp_ms`.
    ///
    /// The first frame only records the timestamp and publishes the seed.
    /// Later frames publish only when at least one step ran.
    pub fn frame_core(&mut self, timestamp_ms: f64) -> FrameResult {
        let first = self.frames == 0;
        self.frames += 1;
        let elapsed = self.integrator.elapsed_since_last_frame(timestamp_ms);
        let steps = self.advance_core(elapsed);
        if steps > 1_000 {
            log::debug!("catch-up burst: {} steps for {:.3}s elapsed", steps, elapsed);
        }
        FrameResult {
            steps,
            time: self.integrator.time(),
            state: self.integrator.state(),
            series: if steps > 0 || first { Some(self.history.project()) } else { None },
        }
    }

    /// Feed `elapsed` seconds of wall time directly, bypassing timestamps.
    /// Returns the number of steps taken.
    pub fn advance_core(&mut self, elapsed: f64) -> u64 {
        let batch = self.integrator.advance(elapsed, &self.params, &mut self.history);
        self.max_steps_per_frame = self.max_steps_per_frame.max(batch.steps);
        batch.steps
    }

    /// Run exactly `steps` steps.
    pub fn run_steps_core(&mut self, steps: u32) -> u64 {
        let batch = self
            .integrator
            .run_steps(steps as u64, &self.params, &mut self.history);
        batch.steps
    }

    /// Replace the parameter snapshot. Takes effect from the next step.
    pub fn set_params(&mut self, params: Params) {
        self.params = Params::clamped(params.s, params.a, params.d);
    }

    pub fn params(&self) -> Params {
        self.params
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn series(&self) -> SeriesSet {
        self.history.project()
    }

    pub fn axes(&self) -> ChartAxes {
        let series = self.series();
        ChartAxes {
            capital: series.capital_axis(),
            output: series.output_axis(),
        }
    }

    pub fn stats(&self) -> SimStats {
        SimStats {
            frames: self.frames,
            total_steps: self.integrator.steps(),
            max_steps_per_frame: self.max_steps_per_frame,
            retained: self.history.len(),
            evicted: self.history.evicted(),
            faults: self.integrator.faults(),
            last_fault_time: self.integrator.last_fault_time(),
        }
    }

    pub fn time(&self) -> f64 {
        self.integrator.time()
    }

    pub fn state(&self) -> f64 {
        self.integrator.state()
    }

    /// Back to the seed sample, keeping the current parameters.
    pub fn reset_core(&mut self) {
        self.integrator = Integrator::new(&self.config);
        self.history = HistoryBuffer::seeded(
            self.config.max_points,
            self.config.window_size,
            self.integrator.seed_sample(&self.params),
        );
        self.frames = 0;
        self.max_steps_per_frame = 0;
        log::info!("simulation reset with params {:?}", self.params);
    }
}

impl Default for GrowthSimulation {
    fn default() -> Self {
        Self::build(SimConfig::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_publishes_seed_without_stepping() {
        let mut sim = GrowthSimulation::default();
        let result = sim.frame_core(12_345.0);
        assert_eq!(result.steps, 0);
        let series = result.series.expect("seed published");
        assert_eq!(series.t, vec![0.0]);
        assert_eq!(series.k, vec![1.0]);
    }

    #[test]
    fn test_idle_frame_publishes_nothing() {
        let mut sim = GrowthSimulation::default();
        sim.frame_core(0.0);
        let result = sim.frame_core(5.0);
        assert_eq!(result.steps, 0);
        assert!(result.series.is_none());
        let result = sim.frame_core(16.0);
        assert_eq!(result.steps, 1);
        assert!(result.series.is_some());
    }

    #[test]
    fn test_set_params_clamps() {
        let mut sim = GrowthSimulation::default();
        sim.set_params(Params { s: 1.4, a: -0.1, d: f64::NAN });
        assert_eq!(sim.params(), Params { s: 1.0, a: 0.0, d: 0.0 });
    }

    #[test]
    fn test_reset_keeps_params() {
        let mut sim = GrowthSimulation::default();
        sim.set_params(Params { s: 0.3, a: 0.4, d: 0.1 });
        sim.run_steps_core(250);
        sim.reset_core();
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.state(), 1.0);
        assert_eq!(sim.history().oldest().unwrap().s, 0.3);
        assert_eq!(sim.stats().total_steps, 0);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let config = SimConfig { max_points: 0, ..SimConfig::default() };
        assert!(GrowthSimulation::from_config(config).is_err());
    }

    #[test]
    fn test_stats_track_bursts() {
        let mut sim = GrowthSimulation::default();
        sim.frame_core(0.0);
        sim.frame_core(16.0);
        sim.frame_core(2_016.0);
        let stats = sim.stats();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.total_steps, 201);
        assert_eq!(stats.max_steps_per_frame, 200);
        assert_eq!(stats.faults, 0);
    }
}
