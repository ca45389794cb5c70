//! Seams between the pipeline and the platform audio subsystem.

use crate::audio::analyzer::AnalysisWindow;
use crate::error::PipelineResult;

/// Enumerates input devices and opens captures on them.
pub trait AudioHost {
    type Capture: Capture;

    /// Names of the available input devices, in enumeration order.
    fn list_input_devices(&self) -> PipelineResult<Vec<String>>;

    /// Opens and starts a capture on `device`.
    ///
    /// The capture writes into a buffer of `length_secs * sample_rate` samples,
    /// wrapping around when `looping` is set. Fails with `DeviceUnavailable`
    /// if no device has that name.
    fn open_capture(
        &mut self,
        device: &str,
        looping: bool,
        length_secs: u32,
        sample_rate: u32,
    ) -> PipelineResult<Self::Capture>;
}

/// A running capture on one input device.
pub trait Capture {
    /// Write cursor into the capture buffer. Zero until the first samples arrive.
    fn position(&self) -> usize;

    fn is_capturing(&self) -> bool;

    /// Stops delivering samples. The buffer contents stay readable.
    fn stop(&mut self);

    /// Sample rate the device is actually running at.
    fn sample_rate(&self) -> u32;

    /// Capacity of the capture buffer in samples.
    fn buffer_len(&self) -> usize;

    /// Fills `dest` starting at `start`, wrapping around the buffer end.
    fn read_samples(&self, dest: &mut [f32], start: usize);

    /// Fills `dest` with magnitudes of the most recent `2 * dest.len()` samples.
    fn spectrum_magnitudes(&mut self, dest: &mut [f32], window: AnalysisWindow);
}
