use rustfft::{FftPlanner, num_complex::Complex};
use std::f32::consts::TAU;

/// Window applied to the time-domain block before the FFT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisWindow {
    #[default]
    BlackmanHarris,
}

impl AnalysisWindow {
    pub fn coefficients(self, len: usize) -> Vec<f32> {
        if len <= 1 {
            return vec![1.0; len];
        }

        match self {
            AnalysisWindow::BlackmanHarris => {
                cosine_sum(len, &[0.35875, -0.48829, 0.14128, -0.01168])
            }
        }
    }
}

fn cosine_sum(len: usize, coeffs: &[f32]) -> Vec<f32> {
    let step = TAU / (len - 1) as f32;
    (0..len)
        .map(|n| {
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &a)| a * (step * (k * n) as f32).cos())
                .sum()
        })
        .collect()
}

/// Windowed FFT magnitude provider.
///
/// Keeps the planner and the last window table so repeated frames of the same
/// size do not allocate.
pub struct SpectrumAnalyzer {
    fft_planner: FftPlanner<f32>,
    window: Option<(AnalysisWindow, Vec<f32>)>,
    buffer: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            fft_planner: FftPlanner::new(),
            window: None,
            buffer: Vec::new(),
        }
    }

    /// Writes `block.len() / 2` magnitudes into `dest`.
    ///
    /// `block` holds `2 * dest.len()` time-domain samples, oldest first.
    /// Magnitudes are divided by the FFT size, so a full-scale sine peaks
    /// around the window's coherent gain over two.
    pub fn magnitudes(&mut self, block: &[f32], window: AnalysisWindow, dest: &mut [f32]) {
        let fft_size = block.len();
        if fft_size == 0 {
            dest.fill(0.0);
            return;
        }

        let cached = matches!(
            &self.window,
            Some((kind, table)) if *kind == window && table.len() == fft_size
        );
        if !cached {
            self.window = Some((window, window.coefficients(fft_size)));
        }
        let coefficients: &[f32] = self
            .window
            .as_ref()
            .map(|(_, table)| table.as_slice())
            .unwrap_or(&[]);

        self.buffer.clear();
        self.buffer.extend(
            block
                .iter()
                .zip(coefficients)
                .map(|(&x, &w)| Complex::new(x * w, 0.0)),
        );

        let fft = self.fft_planner.plan_fft_forward(fft_size);
        fft.process(&mut self.buffer);

        let scale = 1.0 / fft_size as f32;
        for (out, bin) in dest.iter_mut().zip(&self.buffer[..fft_size / 2]) {
            *out = bin.norm() * scale;
        }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
