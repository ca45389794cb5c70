use crate::audio::analyzer::AnalysisWindow;
use crate::audio::host::Capture;

/// Pulls windowed FFT magnitudes from the capture into a fixed bin array.
#[derive(Debug, Clone)]
pub struct SpectrumSource {
    bins: Vec<f32>,
    window: AnalysisWindow,
}

impl SpectrumSource {
    pub fn new(bins: usize) -> Self {
        Self {
            bins: vec![0.0; bins],
            window: AnalysisWindow::BlackmanHarris,
        }
    }

    pub fn refresh<C: Capture>(&mut self, capture: &mut C) {
        capture.spectrum_magnitudes(&mut self.bins, self.window);
        // Downstream mapping assumes finite, non-negative magnitudes
        for bin in &mut self.bins {
            if !bin.is_finite() || *bin < 0.0 {
                *bin = 0.0;
            }
        }
    }

    pub fn bins(&self) -> &[f32] {
        &self.bins
    }
}
