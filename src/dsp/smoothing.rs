//! Centered moving-average filters for the waveform and spectrum windows.

use crate::consts;
use std::num::NonZeroUsize;

/// Width of a moving-average window. Never zero, so every output element
/// averages at least one input element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmoothingWindow(NonZeroUsize);

impl SmoothingWindow {
    /// Window of one element: the filter passes its input through unchanged.
    pub const IDENTITY: Self = Self(NonZeroUsize::MIN);

    /// Builds a window, treating zero and negative sizes as 1.
    pub fn new(size: i64) -> Self {
        let size = usize::try_from(size).unwrap_or(0);
        Self(NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN))
    }

    /// Coarser window used for the spectrum: `max(1, round(W / 5))`.
    pub fn for_spectrum(self) -> Self {
        let scaled = (self.get() as f32 / consts::SPECTRUM_SMOOTHING_DIVISOR).round();
        Self::new(scaled as i64)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl From<u32> for SmoothingWindow {
    fn from(size: u32) -> Self {
        Self::new(size as i64)
    }
}

/// Writes the centered moving average of `input` into `output`.
///
/// Element `i` averages `input[i - W/2 ..= i + W/2]` clipped to the slice.
/// Near the edges the window is truncated rather than padded or wrapped, so
/// the first and last elements average fewer samples.
pub fn moving_average(input: &[f32], window: SmoothingWindow, output: &mut [f32]) {
    debug_assert_eq!(input.len(), output.len());
    let n = input.len().min(output.len());
    let half = window.get() / 2;

    if half == 0 {
        output[..n].copy_from_slice(&input[..n]);
        return;
    }
    if n == 0 {
        return;
    }

    // Running sum over [lo, hi]; f64 keeps drift negligible across long windows
    let mut lo = 0usize;
    let mut hi = half.min(n - 1);
    let mut sum: f64 = input[lo..=hi].iter().map(|&v| v as f64).sum();

    for i in 0..n {
        let want_lo = i.saturating_sub(half);
        let want_hi = (i + half).min(n - 1);
        while hi < want_hi {
            hi += 1;
            sum += input[hi] as f64;
        }
        while lo < want_lo {
            sum -= input[lo] as f64;
            lo += 1;
        }
        output[i] = (sum / (hi - lo + 1) as f64) as f32;
    }
}

/// Smooths the raw sample window with the UI-selected window size.
pub fn smooth_waveform(samples: &[f32], window: SmoothingWindow, output: &mut [f32]) {
    moving_average(samples, window, output);
}

/// Smooths spectrum bins with a fifth of the UI-selected window size.
pub fn smooth_spectrum(bins: &[f32], window: SmoothingWindow, output: &mut [f32]) {
    moving_average(bins, window.for_spectrum(), output);
}
