//! Browser-side checks of the exported API. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use solow_engine::{GrowthSimulation, SeriesSet, SimStats};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn frame_returns_serializable_result() {
    let mut sim = GrowthSimulation::new();
    let first = sim.frame(0.0);
    assert!(first.is_object());
    sim.frame(100.0);

    let series: SeriesSet = serde_wasm_bindgen::from_value(sim.get_series()).unwrap();
    assert_eq!(series.len(), 11);
    let stats: SimStats = serde_wasm_bindgen::from_value(sim.get_stats()).unwrap();
    assert_eq!(stats.total_steps, 10);
}

#[wasm_bindgen_test]
fn with_config_rejects_bad_json() {
    assert!(GrowthSimulation::with_config("{ \"dt\": -1 }").is_err());
    assert!(GrowthSimulation::with_config("{ \"max_points\": 10 }").is_ok());
}

#[wasm_bindgen_test]
fn setters_clamp_slider_values() {
    let mut sim = GrowthSimulation::new();
    sim.set_savings_rate(1.5);
    sim.set_depreciation_rate(-0.2);
    assert_eq!(sim.params().s, 1.0);
    assert_eq!(sim.params().d, 0.0);
}
