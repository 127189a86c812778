// Trace Scenarios — parameter schedules and frame patterns
// Parameter curves map wall-clock seconds to a full parameter snapshot

use solow_engine::Params;

use crate::frames::FramePattern;

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: &'static str,
    pub label: &'static str,
    /// Wall-clock duration of the run.
    pub seconds: f64,
    pub params: Params,
    pub param_curve: Option<fn(f64) -> Params>,
    pub frames: FramePattern,
}

const SIXTY_HZ: f64 = 1000.0 / 60.0;

// ─── Curve Functions ────────────────────────────────────────────────────────

fn savings_shock(secs: f64) -> Params {
    let s = if secs < 5.0 { 0.3 } else { 0.6 };
    Params { s, a: 0.4, d: 0.1 }
}

/// Elasticity slider dragged from 0.10 to 0.90 over 8 s, in 0.01 notches.
fn elasticity_sweep(secs: f64) -> Params {
    let raw = 0.1 + 0.8 * (secs / 8.0).min(1.0);
    let a = (raw * 100.0).round() / 100.0;
    Params { s: 0.5, a, d: 0.2 }
}

fn depreciation_spike(secs: f64) -> Params {
    let d = if (4.0..6.0).contains(&secs) { 1.0 } else { 0.05 };
    Params { s: 0.4, a: 0.5, d }
}

// ─── Scenario List ──────────────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "STEADY_DEFAULT",
            label: "Viewer defaults at 60 Hz",
            seconds: 20.0,
            params: Params::default(),
            param_curve: None,
            frames: FramePattern::Steady { interval_ms: SIXTY_HZ },
        },
        Scenario {
            name: "LOW_REFRESH",
            label: "Viewer defaults at 24 Hz",
            seconds: 20.0,
            params: Params::default(),
            param_curve: None,
            frames: FramePattern::Steady { interval_ms: 1000.0 / 24.0 },
        },
        Scenario {
            name: "JITTERED_FRAMES",
            label: "60 Hz with ±12 ms jitter",
            seconds: 20.0,
            params: Params { s: 0.35, a: 0.33, d: 0.08 },
            param_curve: None,
            frames: FramePattern::Jitter { mean_ms: SIXTY_HZ, spread_ms: 12.0 },
        },
        Scenario {
            name: "PAUSE_BURST",
            label: "Hidden tab for 3 s, then catch-up",
            seconds: 12.0,
            params: Params { s: 0.5, a: 0.5, d: 0.2 },
            param_curve: None,
            frames: FramePattern::Stall { interval_ms: SIXTY_HZ, at_ms: 4_000.0, pause_ms: 3_000.0 },
        },
        Scenario {
            name: "SAVINGS_SHOCK",
            label: "Savings 0.3 -> 0.6 at 5 s",
            seconds: 15.0,
            params: savings_shock(0.0),
            param_curve: Some(savings_shock),
            frames: FramePattern::Steady { interval_ms: SIXTY_HZ },
        },
        Scenario {
            name: "ELASTICITY_SWEEP",
            label: "Elasticity slider 0.10 -> 0.90",
            seconds: 10.0,
            params: elasticity_sweep(0.0),
            param_curve: Some(elasticity_sweep),
            frames: FramePattern::Jitter { mean_ms: SIXTY_HZ, spread_ms: 4.0 },
        },
        Scenario {
            name: "DEPRECIATION_SPIKE",
            label: "Depreciation 1.0 between 4 s and 6 s",
            seconds: 12.0,
            params: depreciation_spike(0.0),
            param_curve: Some(depreciation_spike),
            frames: FramePattern::Steady { interval_ms: SIXTY_HZ },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curves_stay_in_unit_range() {
        for scenario in scenarios() {
            assert!(scenario.params.validate().is_ok(), "{}", scenario.name);
            if let Some(curve) = scenario.param_curve {
                for i in 0..=200 {
                    let p = curve(i as f64 * 0.1);
                    assert!(p.validate().is_ok(), "{} at {}", scenario.name, i);
                }
            }
        }
    }

    #[test]
    fn test_sweep_uses_slider_notches() {
        let p = elasticity_sweep(3.3);
        assert!(((p.a * 100.0).round() - p.a * 100.0).abs() < 1e-9);
        assert_eq!(elasticity_sweep(20.0).a, 0.9);
    }
}
