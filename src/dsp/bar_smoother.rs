//! Cross-frame smoothing of bar heights.
//!
//! Two stages: the last few mapped snapshots are averaged, then each bar eases
//! towards that average at a rate scaled by the frame time. The steady state
//! does not depend on the frame rate, only the approach speed does.

use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct TemporalBarSmoother {
    history: VecDeque<Vec<f32>>,
    target: Vec<f32>,
    average: Vec<f32>,
}

impl TemporalBarSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes `heights` and returns the eased bar heights for this frame.
    ///
    /// * `bound` - snapshots kept in the history (at least 1)
    /// * `speed` - easing rate per second
    /// * `dt` - seconds since the previous frame
    pub fn update(&mut self, heights: &[f32], bound: usize, speed: f32, dt: f32) -> &[f32] {
        let bins = heights.len();
        if self.target.len() != bins {
            self.resize(bins);
        }

        let bound = bound.max(1);
        let mut snapshot = if self.history.len() >= bound {
            self.history.pop_front().unwrap_or_default()
        } else {
            Vec::with_capacity(bins)
        };
        while self.history.len() >= bound {
            self.history.pop_front();
        }
        snapshot.clear();
        snapshot.extend_from_slice(heights);
        self.history.push_back(snapshot);

        self.average.iter_mut().for_each(|a| *a = 0.0);
        for snapshot in &self.history {
            for (a, &h) in self.average.iter_mut().zip(snapshot) {
                *a += h;
            }
        }
        let count = self.history.len() as f32;

        let t = (dt * speed).clamp(0.0, 1.0);
        for (target, &sum) in self.target.iter_mut().zip(&self.average) {
            let avg = sum / count;
            *target += (avg - *target) * t;
        }

        &self.target
    }

    /// Current eased heights.
    #[cfg(test)]
    pub fn heights(&self) -> &[f32] {
        &self.target
    }

    #[cfg(test)]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Drops the history and zeroes the targets for a new bin count.
    fn resize(&mut self, bins: usize) {
        if !self.target.is_empty() {
            log::debug!("Bar count changed {} -> {bins}, resetting bar state", self.target.len());
        }
        self.history.clear();
        self.target = vec![0.0; bins];
        self.average = vec![0.0; bins];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(dt: f32, seconds: f32, value: f32) -> f32 {
        let mut smoother = TemporalBarSmoother::new();
        let input = vec![value; 16];
        let frames = (seconds / dt).round() as usize;
        for _ in 0..frames {
            smoother.update(&input, 2, 5.0, dt);
        }
        smoother.heights()[0]
    }

    #[test]
    fn targets_start_at_zero() {
        let mut smoother = TemporalBarSmoother::new();
        assert!(smoother.heights().is_empty());
        let out = smoother.update(&[1.0; 8], 2, 5.0, 0.0);
        assert_eq!(out, &[0.0; 8]);
    }

    #[test]
    fn history_never_exceeds_bound() {
        let mut smoother = TemporalBarSmoother::new();
        for i in 0..100 {
            smoother.update(&[i as f32; 4], 3, 5.0, 0.016);
            assert!(smoother.history_len() <= 3);
        }
        assert_eq!(smoother.history_len(), 3);

        // Shrinking the bound evicts down to it
        smoother.update(&[0.0; 4], 1, 5.0, 0.016);
        assert_eq!(smoother.history_len(), 1);
    }

    #[test]
    fn averages_history_before_easing() {
        let mut smoother = TemporalBarSmoother::new();
        smoother.update(&[2.0], 2, 1.0, 0.0);
        // dt * speed = 1 jumps straight to the average of [2, 4]
        let out = smoother.update(&[4.0], 2, 1.0, 1.0);
        assert!((out[0] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn converges_independent_of_frame_rate() {
        let slow = settle(1.0 / 30.0, 2.0, 2.5);
        let fast = settle(1.0 / 144.0, 2.0, 2.5);
        assert!((slow - 2.5).abs() < 0.025, "30 fps settled at {slow}");
        assert!((fast - 2.5).abs() < 0.025, "144 fps settled at {fast}");
        assert!((slow - fast).abs() < 0.025);
    }

    #[test]
    fn bin_count_change_resets_state() {
        let mut smoother = TemporalBarSmoother::new();
        for _ in 0..10 {
            smoother.update(&[1.0; 8], 2, 5.0, 0.1);
        }
        assert!(smoother.heights()[0] > 0.5);

        let out = smoother.update(&[1.0; 16], 2, 5.0, 0.0);
        assert_eq!(out.len(), 16);
        assert!(out.iter().all(|&h| h == 0.0));
        assert_eq!(smoother.history_len(), 1);
    }
}
