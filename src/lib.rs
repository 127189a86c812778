// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - real-time integration of dk/dt = s·k^a − d·k

pub mod types;
pub mod axis;
pub mod config;
pub mod history;
pub mod integrator;
pub mod simulation;

#[cfg(not(target_arch = "wasm32"))]
pub mod scheduler;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use types::*;
pub use axis::AxisRange;
pub use config::{ConfigError, SimConfig};
pub use history::HistoryBuffer;
pub use integrator::{derivative, euler_step, steady_state, FaultPolicy, Integrator, StepBatch};
pub use simulation::GrowthSimulation;

use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

/// Route `log` output to the browser console.
///
/// Level is one of "trace", "debug", "info", "warn", "error"; anything else
/// means "info".
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("solow engine logging at {}", level);
}

#[wasm_bindgen]
impl GrowthSimulation {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        GrowthSimulation::default()
    }

    /// Build from a JSON config; missing fields take their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(json: &str) -> Result<GrowthSimulation, JsValue> {
        #[cfg(target_arch = "wasm32")]
        console_error_panic_hook::set_once();

        SimConfig::from_json(json)
            .and_then(GrowthSimulation::from_config)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Advance to the display frame stamped `timestamp_ms`.
    pub fn frame(&mut self, timestamp_ms: f64) -> JsValue {
        let result = self.frame_core(timestamp_ms);
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    /// Run N steps without returning results.
    #[wasm_bindgen(js_name = runSteps)]
    pub fn run_steps(&mut self, steps: u32) -> u32 {
        self.run_steps_core(steps) as u32
    }

    #[wasm_bindgen(js_name = setSavingsRate)]
    pub fn set_savings_rate(&mut self, val: f64) {
        self.set_params(self.params.with_savings_rate(val));
    }

    #[wasm_bindgen(js_name = setElasticity)]
    pub fn set_elasticity(&mut self, val: f64) {
        self.set_params(self.params.with_elasticity(val));
    }

    #[wasm_bindgen(js_name = setDepreciationRate)]
    pub fn set_depreciation_rate(&mut self, val: f64) {
        self.set_params(self.params.with_depreciation_rate(val));
    }

    /// Replace all three parameters at once.
    #[wasm_bindgen(js_name = setParams)]
    pub fn set_all_params(&mut self, s: f64, a: f64, d: f64) {
        self.set_params(Params::clamped(s, a, d));
    }

    #[wasm_bindgen(js_name = getParams)]
    pub fn get_params(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.params).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getSeries)]
    pub fn get_series(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.series()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getAxes)]
    pub fn get_axes(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.axes()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> JsValue {
        serde_wasm_bindgen::to_value(&self.stats()).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(js_name = getTime)]
    pub fn get_time(&self) -> f64 {
        self.time()
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> f64 {
        self.state()
    }

    /// Reset to the seed sample, keeping the current parameters.
    pub fn reset(&mut self) {
        self.reset_core();
    }
}
