// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Type Definitions

use serde::{Deserialize, Serialize};

use crate::axis::AxisRange;

// ─── Defaults ────────────────────────────────────────────────────────────────

pub const DEFAULT_DT: f64 = 0.01;
pub const DEFAULT_WINDOW_SIZE: f64 = 5.0;
pub const DEFAULT_MAX_POINTS: usize = 3000;
pub const DEFAULT_INITIAL_STATE: f64 = 1.0;

pub const DEFAULT_SAVINGS_RATE: f64 = 1.0;
pub const DEFAULT_ELASTICITY: f64 = 0.5;
pub const DEFAULT_DEPRECIATION_RATE: f64 = 0.2;

// ─── Parameter errors ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("{name} must be finite, got {value}")]
    NotFinite { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
}

// ─── Params ──────────────────────────────────────────────────────────────────

/// One consistent snapshot of the model parameters.
///
/// Updates always replace the whole snapshot, so a step never sees a mix of
/// old and new values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Savings rate: share of output reinvested.
    pub s: f64,
    /// Output elasticity of capital.
    pub a: f64,
    /// Depreciation rate.
    pub d: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            s: DEFAULT_SAVINGS_RATE,
            a: DEFAULT_ELASTICITY,
            d: DEFAULT_DEPRECIATION_RATE,
        }
    }
}

impl Params {
    /// Strict constructor, rejecting anything outside `[0, 1]`.
    pub fn new(s: f64, a: f64, d: f64) -> Result<Self, ParamError> {
        Ok(Self {
            s: check_unit("s", s)?,
            a: check_unit("a", a)?,
            d: check_unit("d", d)?,
        })
    }

    /// Lenient constructor used behind range-restricted inputs.
    pub fn clamped(s: f64, a: f64, d: f64) -> Self {
        Self {
            s: clamp_unit(s),
            a: clamp_unit(a),
            d: clamp_unit(d),
        }
    }

    pub fn validate(&self) -> Result<(), ParamError> {
        Self::new(self.s, self.a, self.d).map(|_| ())
    }

    pub fn with_savings_rate(self, s: f64) -> Self {
        Self { s: clamp_unit(s), ..self }
    }

    pub fn with_elasticity(self, a: f64) -> Self {
        Self { a: clamp_unit(a), ..self }
    }

    pub fn with_depreciation_rate(self, d: f64) -> Self {
        Self { d: clamp_unit(d), ..self }
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if !value.is_finite() {
        return Err(ParamError::NotFinite { name, value });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ParamError::OutOfRange { name, value });
    }
    Ok(value)
}

/// Clamp to `[0, 1]`; NaN maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

// ─── Sample ──────────────────────────────────────────────────────────────────

/// One retained point of the trajectory, with the parameters in effect when
/// it was produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub k: f64,
    pub a: f64,
    pub s: f64,
}

impl Sample {
    pub fn capture(t: f64, k: f64, params: &Params) -> Self {
        Self { t, k, a: params.a, s: params.s }
    }

    /// Output `k^a` under the captured elasticity.
    pub fn production(&self) -> f64 {
        self.k.powf(self.a)
    }

    pub fn investment(&self) -> f64 {
        self.s * self.production()
    }

    pub fn consumption(&self) -> f64 {
        (1.0 - self.s) * self.production()
    }
}

// ─── SeriesSet ───────────────────────────────────────────────────────────────

/// Parallel series handed to the charting side, aligned by index with `t`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    pub t: Vec<f64>,
    pub k: Vec<f64>,
    pub production: Vec<f64>,
    pub investment: Vec<f64>,
    pub consumption: Vec<f64>,
}

impl SeriesSet {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            t: Vec::with_capacity(n),
            k: Vec::with_capacity(n),
            production: Vec::with_capacity(n),
            investment: Vec::with_capacity(n),
            consumption: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, sample: &Sample) {
        let y = sample.production();
        self.t.push(sample.t);
        self.k.push(sample.k);
        self.production.push(y);
        self.investment.push(sample.s * y);
        self.consumption.push((1.0 - sample.s) * y);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn capital_axis(&self) -> AxisRange {
        AxisRange::for_values(&self.k)
    }

    pub fn output_axis(&self) -> AxisRange {
        AxisRange::for_values(&self.production)
    }
}

// ─── Axes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartAxes {
    pub capital: AxisRange,
    pub output: AxisRange,
}

// ─── FrameResult ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct FrameResult {
    /// Steps taken during this frame.
    pub steps: u64,
    /// Simulation time after the frame.
    pub time: f64,
    /// State after the frame.
    pub state: f64,
    /// Republished series, present only when the window changed.
    pub series: Option<SeriesSet>,
}

// ─── SimStats ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub frames: u64,
    pub total_steps: u64,
    pub max_steps_per_frame: u64,
    pub retained: usize,
    pub evicted: u64,
    pub faults: u64,
    #[serde(default)]
    pub last_fault_time: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_match_viewer() {
        let p = Params::default();
        assert_eq!(p.s, 1.0);
        assert_eq!(p.a, 0.5);
        assert_eq!(p.d, 0.2);
    }

    #[test]
    fn test_strict_params_reject_out_of_range() {
        assert_eq!(
            Params::new(1.5, 0.5, 0.2),
            Err(ParamError::OutOfRange { name: "s", value: 1.5 })
        );
        assert!(matches!(
            Params::new(0.5, f64::NAN, 0.2),
            Err(ParamError::NotFinite { name: "a", .. })
        ));
        assert!(Params::new(0.0, 1.0, 0.0).is_ok());
    }

    #[test]
    fn test_clamped_params() {
        let p = Params::clamped(-0.3, 2.0, f64::NAN);
        assert_eq!(p, Params { s: 0.0, a: 1.0, d: 0.0 });
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_with_setters_replace_one_field() {
        let p = Params::default().with_savings_rate(0.3).with_depreciation_rate(1.7);
        assert_eq!(p.s, 0.3);
        assert_eq!(p.a, DEFAULT_ELASTICITY);
        assert_eq!(p.d, 1.0);
    }

    #[test]
    fn test_sample_derived_values_use_captured_params() {
        let sample = Sample::capture(0.5, 4.0, &Params { s: 0.25, a: 0.5, d: 0.1 });
        assert!((sample.production() - 2.0).abs() < 1e-12);
        assert!((sample.investment() - 0.5).abs() < 1e-12);
        assert!((sample.consumption() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_series_push_keeps_columns_aligned() {
        let mut series = SeriesSet::with_capacity(2);
        series.push(&Sample { t: 0.0, k: 1.0, a: 0.5, s: 0.4 });
        series.push(&Sample { t: 0.01, k: 9.0, a: 0.5, s: 0.4 });
        assert_eq!(series.len(), 2);
        assert_eq!(series.production, vec![1.0, 3.0]);
        assert!((series.investment[1] - 1.2).abs() < 1e-12);
        assert!((series.consumption[1] - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_params_serde_roundtrip() {
        let p = Params { s: 0.3, a: 0.4, d: 0.05 };
        let json = serde_json::to_string(&p).unwrap();
        let back: Params = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
