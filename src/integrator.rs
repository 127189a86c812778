// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Fixed-Step Integrator

//! Fixed-step explicit Euler integration of `dk/dt = s·k^a − d·k`.
//!
//! Wall-clock time is converted into a whole number of steps. The number of
//! steps due is derived from the total wall time consumed so far rather than
//! from a running subtraction, so the carried remainder never drifts and the
//! same total time always yields the same step count no matter how it was
//! split across frames.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::history::HistoryBuffer;
use crate::types::{Params, Sample};

/// Slack, in units of steps, absorbing rounding in the consumed-time sum.
const STEP_EPSILON: f64 = 1e-9;

// ─── Model ───────────────────────────────────────────────────────────────────

/// Right-hand side `s·k^a − d·k`.
pub fn derivative(k: f64, params: &Params) -> f64 {
    params.s * k.powf(params.a) - params.d * k
}

/// One explicit Euler step of size `dt`.
pub fn euler_step(k: f64, params: &Params, dt: f64) -> f64 {
    k + derivative(k, params) * dt
}

/// Positive fixed point `(s/d)^(1/(1−a))`.
///
/// `None` when no finite positive fixed point exists (`d == 0`, `a == 1`
/// or `s == 0`).
pub fn steady_state(params: &Params) -> Option<f64> {
    if params.d <= 0.0 || params.a >= 1.0 || params.s <= 0.0 {
        return None;
    }
    Some((params.s / params.d).powf(1.0 / (1.0 - params.a)))
}

// ─── Fault policy ────────────────────────────────────────────────────────────

/// What to do with a step whose result is NaN, infinite or negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultPolicy {
    /// Negative → 0, +∞ → `f64::MAX`, NaN → the previous value.
    #[default]
    Clamp,
    /// Return to the initial state.
    Reset,
    /// Keep the raw value and let it propagate.
    Propagate,
}

// ─── StepBatch ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepBatch {
    pub steps: u64,
    pub faults: u64,
}

// ─── Integrator ──────────────────────────────────────────────────────────────

/// Simulation clock and state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Integrator {
    dt: f64,
    initial_state: f64,
    policy: FaultPolicy,

    t: f64,
    k: f64,
    steps: u64,
    /// Total wall time fed in so far, in seconds.
    consumed: f64,
    last_frame_ms: Option<f64>,

    faults: u64,
    last_fault_time: Option<f64>,
}

impl Integrator {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            dt: config.dt,
            initial_state: config.initial_state,
            policy: config.fault_policy,
            t: 0.0,
            k: config.initial_state,
            steps: 0,
            consumed: 0.0,
            last_frame_ms: None,
            faults: 0,
            last_fault_time: None,
        }
    }

    /// The sample a fresh history starts from.
    pub fn seed_sample(&self, params: &Params) -> Sample {
        Sample::capture(0.0, self.initial_state, params)
    }

    /// Elapsed wall time since the previous frame, in seconds.
    ///
    /// Zero on the first frame and whenever the timestamp does not move
    /// forward. Non-finite timestamps are ignored.
    pub fn elapsed_since_last_frame(&mut self, now_ms: f64) -> f64 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let elapsed = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        elapsed
    }

    /// Consume `elapsed` seconds of wall time, stepping once per whole `dt`
    /// and appending one sample per step. Bursts are not throttled.
    pub fn advance(
        &mut self,
        elapsed: f64,
        params: &Params,
        history: &mut HistoryBuffer,
    ) -> StepBatch {
        if elapsed.is_finite() && elapsed > 0.0 {
            self.consumed += elapsed;
        }
        let due = self.steps_due();
        self.run(due, params, history)
    }

    /// Take exactly `count` steps, as if `count · dt` of wall time had
    /// elapsed. Any carried remainder is kept.
    pub fn run_steps(
        &mut self,
        count: u64,
        params: &Params,
        history: &mut HistoryBuffer,
    ) -> StepBatch {
        self.consumed += count as f64 * self.dt;
        self.run(count, params, history)
    }

    fn run(&mut self, count: u64, params: &Params, history: &mut HistoryBuffer) -> StepBatch {
        let mut batch = StepBatch::default();
        for _ in 0..count {
            if self.step(params) {
                batch.faults += 1;
            }
            history.append(Sample::capture(self.t, self.k, params));
            batch.steps += 1;
        }
        batch
    }

    fn steps_due(&self) -> u64 {
        let target = (self.consumed / self.dt + STEP_EPSILON).floor();
        if target <= 0.0 {
            return 0;
        }
        (target as u64).saturating_sub(self.steps)
    }

    /// One Euler step; returns true when the guard had to intervene.
    fn step(&mut self, params: &Params) -> bool {
        let previous = self.k;
        let next = euler_step(previous, params, self.dt);
        self.steps += 1;
        self.t = self.steps as f64 * self.dt;

        if next.is_finite() && next >= 0.0 {
            self.k = next;
            return false;
        }

        self.faults += 1;
        self.last_fault_time = Some(self.t);
        if self.faults == 1 {
            log::warn!(
                "non-finite or negative state {} at t={:.2} (s={}, a={}, d={}), policy {:?}",
                next, self.t, params.s, params.a, params.d, self.policy
            );
        } else {
            log::debug!("state fault #{} at t={:.2}: {}", self.faults, self.t, next);
        }

        self.k = match self.policy {
            FaultPolicy::Propagate => next,
            FaultPolicy::Reset => self.initial_state,
            FaultPolicy::Clamp if next.is_nan() => previous,
            FaultPolicy::Clamp if next < 0.0 => 0.0,
            FaultPolicy::Clamp => f64::MAX,
        };
        true
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn state(&self) -> f64 {
        self.k
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn faults(&self) -> u64 {
        self.faults
    }

    pub fn last_fault_time(&self) -> Option<f64> {
        self.last_fault_time
    }

    /// Wall time fed in but not yet turned into a step.
    pub fn carried(&self) -> f64 {
        (self.consumed - self.steps as f64 * self.dt).max(0.0)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
