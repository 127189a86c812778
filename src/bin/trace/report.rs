// Trace Report Types
// One row per scenario, serialized alongside the console table

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TraceResult {
    pub scenario: String,
    pub label: String,
    pub seed: u64,
    pub pass: bool,
    pub frames: u64,
    pub steps: u64,
    /// floor(wall time / dt) for the frames actually delivered.
    pub expected_steps: u64,
    pub sim_time: f64,
    pub final_k: f64,
    pub steady_state: Option<f64>,
    /// Relative distance of final k from the steady state, in percent.
    pub gap_pct: Option<f64>,
    pub retained: usize,
    pub evicted: u64,
    pub max_burst: u64,
    pub faults: u64,
    pub window_violations: u64,
    pub elapsed_ms: f64,
}

impl TraceResult {
    pub fn gap_pct(final_k: f64, steady_state: Option<f64>) -> Option<f64> {
        steady_state
            .filter(|k_star| *k_star > 0.0)
            .map(|k_star| (final_k - k_star).abs() / k_star * 100.0)
    }
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

#[derive(Debug, Serialize)]
pub struct TraceReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub base_seed: u64,
    pub summary: Summary,
    pub scenarios: Vec<TraceResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gap_pct() {
        assert_eq!(TraceResult::gap_pct(1.0, None), None);
        assert_eq!(TraceResult::gap_pct(1.0, Some(0.0)), None);
        let gap = TraceResult::gap_pct(0.9, Some(1.0)).unwrap();
        assert!((gap - 10.0).abs() < 1e-9);
    }
}
