//! In-memory host and capture used by unit tests.

use crate::audio::analyzer::AnalysisWindow;
use crate::audio::host::{AudioHost, Capture};
use crate::error::{PipelineError, PipelineResult};

#[derive(Debug, Default)]
pub struct FakeCapture {
    pub samples: Vec<f32>,
    pub position: usize,
    pub spectrum: Vec<f32>,
    pub stopped: bool,
    pub last_window: Option<AnalysisWindow>,
    /// Cursor value reported once `polls_until_ready` polls have been made.
    pub ready_position: usize,
    pub polls_until_ready: Option<u32>,
    polls: std::cell::Cell<u32>,
}

impl FakeCapture {
    pub fn with_samples(samples: Vec<f32>) -> Self {
        Self {
            samples,
            ..Self::default()
        }
    }
}

impl Capture for FakeCapture {
    fn position(&self) -> usize {
        let polls = self.polls.get() + 1;
        self.polls.set(polls);
        match self.polls_until_ready {
            Some(ready) if polls >= ready => self.ready_position,
            _ => self.position,
        }
    }

    fn is_capturing(&self) -> bool {
        !self.stopped
    }

    fn stop(&mut self) {
        self.stopped = true;
    }

    fn sample_rate(&self) -> u32 {
        44100
    }

    fn buffer_len(&self) -> usize {
        self.samples.len()
    }

    fn read_samples(&self, dest: &mut [f32], start: usize) {
        let len = self.samples.len().max(1);
        for (i, out) in dest.iter_mut().enumerate() {
            *out = self.samples.get((start + i) % len).copied().unwrap_or(0.0);
        }
    }

    fn spectrum_magnitudes(&mut self, dest: &mut [f32], window: AnalysisWindow) {
        self.last_window = Some(window);
        for (i, out) in dest.iter_mut().enumerate() {
            *out = self.spectrum.get(i).copied().unwrap_or(0.0);
        }
    }
}

/// Host whose captures start delivering after a configurable number of polls.
#[derive(Debug, Default)]
pub struct FakeHost {
    pub devices: Vec<String>,
    /// `None` means the cursor never advances.
    pub polls_until_ready: Option<u32>,
    pub opened: Vec<String>,
}

impl FakeHost {
    pub fn new(devices: &[&str]) -> Self {
        Self {
            devices: devices.iter().map(|d| d.to_string()).collect(),
            polls_until_ready: Some(1),
            opened: Vec::new(),
        }
    }
}

impl AudioHost for FakeHost {
    type Capture = FakeCapture;

    fn list_input_devices(&self) -> PipelineResult<Vec<String>> {
        Ok(self.devices.clone())
    }

    fn open_capture(
        &mut self,
        device: &str,
        _looping: bool,
        length_secs: u32,
        sample_rate: u32,
    ) -> PipelineResult<FakeCapture> {
        if !self.devices.iter().any(|d| d == device) {
            return Err(PipelineError::DeviceUnavailable(format!(
                "Input device '{device}' not found"
            )));
        }
        self.opened.push(device.to_string());

        let len = (length_secs * sample_rate) as usize;
        Ok(FakeCapture {
            samples: vec![0.0; len],
            ready_position: 512,
            polls_until_ready: self.polls_until_ready,
            ..FakeCapture::default()
        })
    }
}
