// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Configuration

//! Engine configuration.
//!
//! The defaults reproduce the interactive viewer: 10 ms steps, a 5 s window
//! and at most 3000 retained samples. Hosts may load overrides from JSON;
//! every field is optional there and falls back to its default.

use serde::{Deserialize, Serialize};

use crate::integrator::FaultPolicy;
use crate::types::{
    ParamError, Params, DEFAULT_DT, DEFAULT_INITIAL_STATE, DEFAULT_MAX_POINTS,
    DEFAULT_WINDOW_SIZE,
};

const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("step size must be positive and finite, got {0}")]
    InvalidStep(f64),

    #[error("window size must be positive and finite, got {0}")]
    InvalidWindow(f64),

    #[error("max_points must be at least 1")]
    EmptyBuffer,

    #[error("initial state must be finite and non-negative, got {0}")]
    InvalidInitialState(f64),

    #[error("frame interval must be at least 1 ms")]
    InvalidFrameInterval,

    #[error("invalid initial parameters: {0}")]
    Params(#[from] ParamError),

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed integration step, in simulation seconds.
    pub dt: f64,
    /// Trailing span of simulation time kept in the history.
    pub window_size: f64,
    /// Hard cap on retained samples.
    pub max_points: usize,
    /// State of the seed sample at `t = 0`.
    pub initial_state: f64,
    pub initial_params: Params,
    pub fault_policy: FaultPolicy,
    /// Frame period of the native loop. Browser hosts follow the display.
    pub frame_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            window_size: DEFAULT_WINDOW_SIZE,
            max_points: DEFAULT_MAX_POINTS,
            initial_state: DEFAULT_INITIAL_STATE,
            initial_params: Params::default(),
            fault_policy: FaultPolicy::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidStep(self.dt));
        }
        if !(self.window_size.is_finite() && self.window_size > 0.0) {
            return Err(ConfigError::InvalidWindow(self.window_size));
        }
        if self.max_points == 0 {
            return Err(ConfigError::EmptyBuffer);
        }
        if !(self.initial_state.is_finite() && self.initial_state >= 0.0) {
            return Err(ConfigError::InvalidInitialState(self.initial_state));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::InvalidFrameInterval);
        }
        self.initial_params.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.dt, 0.01);
        assert_eq!(config.window_size, 5.0);
        assert_eq!(config.max_points, 3000);
        assert_eq!(config.initial_state, 1.0);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = SimConfig::from_json(r#"{ "window_size": 2.5 }"#).unwrap();
        assert_eq!(config.window_size, 2.5);
        assert_eq!(config.dt, DEFAULT_DT);
        assert_eq!(config.fault_policy, FaultPolicy::Clamp);
    }

    #[test]
    fn test_json_with_params_and_policy() {
        let json = r#"{
            "initial_params": { "s": 0.3, "a": 0.33, "d": 0.05 },
            "fault_policy": "reset"
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.initial_params.s, 0.3);
        assert_eq!(config.fault_policy, FaultPolicy::Reset);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_dt = SimConfig { dt: 0.0, ..SimConfig::default() };
        assert!(matches!(bad_dt.validate(), Err(ConfigError::InvalidStep(_))));

        let bad_window = SimConfig { window_size: f64::NAN, ..SimConfig::default() };
        assert!(matches!(bad_window.validate(), Err(ConfigError::InvalidWindow(_))));

        let empty = SimConfig { max_points: 0, ..SimConfig::default() };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyBuffer)));

        let negative = SimConfig { initial_state: -1.0, ..SimConfig::default() };
        assert!(matches!(negative.validate(), Err(ConfigError::InvalidInitialState(_))));

        let params = SimConfig {
            initial_params: Params { s: 2.0, a: 0.5, d: 0.2 },
            ..SimConfig::default()
        };
        assert!(matches!(params.validate(), Err(ConfigError::Params(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            SimConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
