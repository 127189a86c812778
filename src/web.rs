// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Browser Animation Loop

//! `requestAnimationFrame` driver for the browser.
//!
//! The loop owns its simulation. Each frame runs the core, then hands the
//! republished series to a JS callback. `stop()` cancels the pending frame
//! once; later calls are no-ops.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::simulation::GrowthSimulation;
use crate::types::Params;

struct LoopState {
    sim: GrowthSimulation,
    on_series: js_sys::Function,
    pending: Option<i32>,
    running: bool,
    callback: Option<Closure<dyn FnMut(f64)>>,
}

#[wasm_bindgen]
pub struct AnimationLoop {
    state: Rc<RefCell<LoopState>>,
}

fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

fn schedule(state: &Rc<RefCell<LoopState>>) -> Result<(), JsValue> {
    let mut inner = state.borrow_mut();
    if !inner.running || inner.pending.is_some() {
        return Ok(());
    }
    let handle = match inner.callback.as_ref() {
        Some(cb) => window()?.request_animation_frame(cb.as_ref().unchecked_ref())?,
        None => return Ok(()),
    };
    inner.pending = Some(handle);
    Ok(())
}

fn on_frame(state: &Rc<RefCell<LoopState>>, timestamp_ms: f64) {
    let (series, on_series) = {
        let mut inner = state.borrow_mut();
        inner.pending = None;
        if !inner.running {
            return;
        }
        let result = inner.sim.frame_core(timestamp_ms);
        (result.series, inner.on_series.clone())
    };

    // The callback may call back into the loop (stop, setters), so no borrow
    // is held while it runs.
    if let Some(series) = series {
        match serde_wasm_bindgen::to_value(&series) {
            Ok(value) => {
                if let Err(e) = on_series.call1(&JsValue::NULL, &value) {
                    log::error!("series callback failed: {:?}", e);
                }
            }
            Err(e) => log::error!("failed to convert series: {}", e),
        }
    }

    if let Err(e) = schedule(state) {
        log::error!("failed to schedule next frame: {:?}", e);
        state.borrow_mut().running = false;
    }
}

#[wasm_bindgen]
impl AnimationLoop {
    /// `on_series` receives the series object after every batch of steps.
    #[wasm_bindgen(constructor)]
    pub fn new(on_series: js_sys::Function) -> AnimationLoop {
        console_error_panic_hook::set_once();

        let state = Rc::new(RefCell::new(LoopState {
            sim: GrowthSimulation::default(),
            on_series,
            pending: None,
            running: false,
            callback: None,
        }));

        let weak = Rc::downgrade(&state);
        let callback = Closure::wrap(Box::new(move |timestamp_ms: f64| {
            if let Some(state) = weak.upgrade() {
                on_frame(&state, timestamp_ms);
            }
        }) as Box<dyn FnMut(f64)>);
        state.borrow_mut().callback = Some(callback);

        AnimationLoop { state }
    }

    pub fn start(&self) -> Result<(), JsValue> {
        {
            let mut inner = self.state.borrow_mut();
            if inner.running {
                return Ok(());
            }
            inner.running = true;
        }
        log::info!("animation loop started");
        schedule(&self.state)
    }

    pub fn stop(&self) -> Result<(), JsValue> {
        let pending = {
            let mut inner = self.state.borrow_mut();
            if !inner.running {
                return Ok(());
            }
            inner.running = false;
            inner.pending.take()
        };
        if let Some(handle) = pending {
            window()?.cancel_animation_frame(handle)?;
        }
        log::info!("animation loop stopped");
        Ok(())
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    #[wasm_bindgen(js_name = setParams)]
    pub fn set_params(&self, s: f64, a: f64, d: f64) {
        self.state.borrow_mut().sim.set_params(Params::clamped(s, a, d));
    }

    #[wasm_bindgen(js_name = setSavingsRate)]
    pub fn set_savings_rate(&self, val: f64) {
        self.state.borrow_mut().sim.set_savings_rate(val);
    }

    #[wasm_bindgen(js_name = setElasticity)]
    pub fn set_elasticity(&self, val: f64) {
        self.state.borrow_mut().sim.set_elasticity(val);
    }

    #[wasm_bindgen(js_name = setDepreciationRate)]
    pub fn set_depreciation_rate(&self, val: f64) {
        self.state.borrow_mut().sim.set_depreciation_rate(val);
    }

    #[wasm_bindgen(js_name = getSeries)]
    pub fn get_series(&self) -> JsValue {
        self.state.borrow().sim.get_series()
    }

    #[wasm_bindgen(js_name = getAxes)]
    pub fn get_axes(&self) -> JsValue {
        self.state.borrow().sim.get_axes()
    }

    #[wasm_bindgen(js_name = getStats)]
    pub fn get_stats(&self) -> JsValue {
        self.state.borrow().sim.get_stats()
    }

    pub fn reset(&self) {
        self.state.borrow_mut().sim.reset_core();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("failed to cancel animation frame on drop: {:?}", e);
        }
    }
}
