// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Solow Growth Viewer - Windowed History

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{Sample, SeriesSet};

// ---------------------------------------------------------------------------
// HistoryBuffer - trailing window of samples for plotting
// ---------------------------------------------------------------------------

/// Time-ordered samples bounded by count and by time span.
///
/// After every append, `len() <= max_points` and
/// `newest.t - oldest.t <= window_size`. Samples leave from the front only.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<Sample>,
    max_points: usize,
    window_size: f64,
    evicted: u64,
}

impl HistoryBuffer {
    pub fn new(max_points: usize, window_size: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(max_points.saturating_add(1).min(1 << 16)),
            max_points: max_points.max(1),
            window_size,
            evicted: 0,
        }
    }

    /// A buffer holding only `seed`.
    pub fn seeded(max_points: usize, window_size: f64, seed: Sample) -> Self {
        let mut buffer = Self::new(max_points, window_size);
        buffer.append(seed);
        buffer
    }

    /// Push to the back and evict stale samples. Callers keep time monotonic.
    pub fn append(&mut self, sample: Sample) {
        debug_assert!(
            self.samples.back().map_or(true, |last| sample.t >= last.t),
            "history samples must arrive in time order"
        );
        self.samples.push_back(sample);
        self.evict();
    }

    fn evict(&mut self) {
        let newest_t = match self.samples.back() {
            Some(s) => s.t,
            None => return,
        };
        let horizon = newest_t - self.window_size;
        while let Some(front) = self.samples.front() {
            if self.samples.len() > self.max_points || front.t < horizon {
                self.samples.pop_front();
                self.evicted += 1;
            } else {
                break;
            }
        }
    }

    /// Derived series for every retained sample, each computed from that
    /// sample's own parameters.
    pub fn project(&self) -> SeriesSet {
        let mut series = SeriesSet::with_capacity(self.samples.len());
        for sample in &self.samples {
            series.push(sample);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn newest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&Sample> {
        self.samples.front()
    }

    /// Time covered by the retained samples.
    pub fn span(&self) -> f64 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.t - first.t,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn max_points(&self) -> usize {
        self.max_points
    }

    pub fn window_size(&self) -> f64 {
        self.window_size
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(t: f64, k: f64) -> Sample {
        Sample { t, k, a: 0.5, s: 0.5 }
    }

    #[test]
    fn test_seeded_buffer_has_one_sample() {
        let buffer = HistoryBuffer::seeded(10, 5.0, sample(0.0, 1.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.span(), 0.0);
        assert_eq!(buffer.newest(), buffer.oldest());
    }

    #[test]
    fn test_count_cap_evicts_oldest_first() {
        let mut buffer = HistoryBuffer::new(3, 100.0);
        for i in 0..5 {
            buffer.append(sample(i as f64, i as f64));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.oldest().unwrap().t, 2.0);
        assert_eq!(buffer.newest().unwrap().t, 4.0);
        assert_eq!(buffer.evicted(), 2);
    }

    #[test]
    fn test_time_window_keeps_boundary_sample() {
        let mut buffer = HistoryBuffer::new(100, 2.0);
        for t in [0.0, 1.0, 2.0, 3.0] {
            buffer.append(sample(t, 1.0));
        }
        // 1.0 sits exactly on the horizon (3.0 - 2.0) and stays
        assert_eq!(buffer.oldest().unwrap().t, 1.0);
        assert_eq!(buffer.span(), 2.0);
    }

    #[test]
    fn test_time_jump_evicts_many_at_once() {
        let mut buffer = HistoryBuffer::new(100, 1.0);
        for i in 0..10 {
            buffer.append(sample(i as f64 * 0.1, 1.0));
        }
        assert_eq!(buffer.len(), 10);
        buffer.append(sample(50.0, 1.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.evicted(), 10);
    }

    #[test]
    fn test_project_uses_captured_params() {
        let mut buffer = HistoryBuffer::new(10, 10.0);
        buffer.append(Sample { t: 0.0, k: 4.0, a: 0.5, s: 0.25 });
        buffer.append(Sample { t: 1.0, k: 4.0, a: 1.0, s: 0.75 });
        let series = buffer.project();
        assert_eq!(series.t, vec![0.0, 1.0]);
        assert_eq!(series.production, vec![2.0, 4.0]);
        assert_eq!(series.investment, vec![0.5, 3.0]);
        assert_eq!(series.consumption, vec![1.5, 1.0]);
    }

    #[test]
    fn test_zero_max_points_is_raised_to_one() {
        let mut buffer = HistoryBuffer::new(0, 10.0);
        buffer.append(sample(0.0, 1.0));
        buffer.append(sample(1.0, 2.0));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.newest().unwrap().k, 2.0);
    }

    proptest! {
        #[test]
        fn prop_window_invariant_holds(
            gaps in prop::collection::vec(0.0f64..0.5, 1..400),
            max_points in 1usize..64,
            window in 0.1f64..5.0,
        ) {
            let mut buffer = HistoryBuffer::seeded(max_points, window, sample(0.0, 1.0));
            let mut t = 0.0;
            for gap in gaps {
                t += gap;
                buffer.append(sample(t, 1.0));
                prop_assert!(buffer.len() <= max_points);
                prop_assert!(buffer.span() <= window + 1e-9);
                prop_assert!(!buffer.is_empty());
            }
            let times: Vec<f64> = buffer.iter().map(|s| s.t).collect();
            prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
