// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Chart Axis Scaling

use serde::{Deserialize, Serialize};

/// Upper bound never drops below this, so a flat series still gets a range.
const MIN_UPPER: f64 = 1.0;
const MARGIN: f64 = 0.1;

/// Y-axis range for a chart: lower bound pinned to zero, upper bound at the
/// observed maximum plus a 10% margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Non-finite values are ignored.
    pub fn for_values(values: &[f64]) -> Self {
        let observed = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(MIN_UPPER, f64::max);
        Self {
            min: 0.0,
            max: observed * (1.0 + MARGIN),
        }
    }
}
