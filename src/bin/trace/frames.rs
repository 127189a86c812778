// Frame Timing Generator — seedable display-refresh patterns
// Stands in for requestAnimationFrame: steady, jittered, or stalled delivery

use rand::Rng;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy)]
pub enum FramePattern {
    /// Fixed refresh interval.
    Steady { interval_ms: f64 },
    /// Interval drawn uniformly from `mean ± spread`, floored at 1 ms.
    Jitter { mean_ms: f64, spread_ms: f64 },
    /// Steady refresh with a single pause, as when a tab is hidden.
    Stall { interval_ms: f64, at_ms: f64, pause_ms: f64 },
}

pub struct FrameTimer {
    rng: ChaCha8Rng,
    pattern: FramePattern,
    now_ms: f64,
    started: bool,
    stalled: bool,
}

impl FrameTimer {
    pub fn new(rng: ChaCha8Rng, pattern: FramePattern, origin_ms: f64) -> Self {
        Self {
            rng,
            pattern,
            now_ms: origin_ms,
            started: false,
            stalled: false,
        }
    }

    /// Timestamp of the next frame.
    pub fn next_frame(&mut self) -> f64 {
        if !self.started {
            self.started = true;
            return self.now_ms;
        }
        let gap = match self.pattern {
            FramePattern::Steady { interval_ms } => interval_ms,
            FramePattern::Jitter { mean_ms, spread_ms } => {
                let spread = spread_ms.abs();
                if spread > 0.0 {
                    self.rng.gen_range(mean_ms - spread..=mean_ms + spread).max(1.0)
                } else {
                    mean_ms.max(1.0)
                }
            }
            FramePattern::Stall { interval_ms, at_ms, pause_ms } => {
                if !self.stalled && self.now_ms >= at_ms {
                    self.stalled = true;
                    interval_ms + pause_ms
                } else {
                    interval_ms
                }
            }
        };
        self.now_ms += gap;
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_first_frame_is_origin() {
        let rng = ChaCha8Rng::seed_from_u64(0);
        let mut timer = FrameTimer::new(rng, FramePattern::Steady { interval_ms: 16.0 }, 500.0);
        assert_eq!(timer.next_frame(), 500.0);
        assert_eq!(timer.next_frame(), 516.0);
    }

    #[test]
    fn test_jitter_is_seeded_and_bounded() {
        let pattern = FramePattern::Jitter { mean_ms: 16.7, spread_ms: 10.0 };
        let mut a = FrameTimer::new(ChaCha8Rng::seed_from_u64(7), pattern, 0.0);
        let mut b = FrameTimer::new(ChaCha8Rng::seed_from_u64(7), pattern, 0.0);
        let mut last = a.next_frame();
        b.next_frame();
        for _ in 0..200 {
            let ts = a.next_frame();
            assert_eq!(ts, b.next_frame());
            let gap = ts - last;
            assert!((6.7..=26.7).contains(&gap));
            last = ts;
        }
    }

    #[test]
    fn test_stall_happens_once() {
        let rng = ChaCha8Rng::seed_from_u64(0);
        let pattern = FramePattern::Stall { interval_ms: 10.0, at_ms: 30.0, pause_ms: 1000.0 };
        let mut timer = FrameTimer::new(rng, pattern, 0.0);
        let frames: Vec<f64> = (0..7).map(|_| timer.next_frame()).collect();
        assert_eq!(frames, vec![0.0, 10.0, 20.0, 30.0, 1040.0, 1050.0, 1060.0]);
    }
}
