use crate::audio::host::Capture;

/// The rolling sample window shown as the waveform.
///
/// Its length is fixed at construction. Each refresh overwrites it with the
/// most recent samples ending at the capture's write cursor.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    samples: Vec<f32>,
}

impl CaptureBuffer {
    pub fn new(num_samples: usize) -> Self {
        Self {
            samples: vec![0.0; num_samples],
        }
    }

    pub fn refresh<C: Capture>(&mut self, capture: &C) {
        let len = capture.buffer_len().max(1);
        let start = (capture.position() + len - self.samples.len() % len) % len;
        capture.read_samples(&mut self.samples, start);
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}
