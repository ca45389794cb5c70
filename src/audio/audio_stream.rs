use crate::audio::analyzer::{AnalysisWindow, SpectrumAnalyzer};
use crate::audio::host::{AudioHost, Capture};
use crate::error::{PipelineError, PipelineResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

/// Fixed-length capture buffer written by the audio callback.
///
/// Mono samples are written at `position`, which wraps to zero at the end
/// when looping. A non-looping buffer stops accepting samples once full.
#[derive(Debug)]
pub struct LoopBuffer {
    samples: Vec<f32>,
    position: usize,
    looping: bool,
    full: bool,
}

impl LoopBuffer {
    pub fn new(len: usize, looping: bool) -> Self {
        Self {
            samples: vec![0.0; len.max(1)],
            position: 0,
            looping,
            full: false,
        }
    }

    pub fn push(&mut self, sample: f32) {
        if self.full {
            return;
        }
        self.samples[self.position] = sample;
        self.position += 1;
        if self.position == self.samples.len() {
            if self.looping {
                self.position = 0;
            } else {
                self.full = true;
            }
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether further samples will be accepted.
    pub fn accepting(&self) -> bool {
        !self.full
    }

    /// Copies `dest.len()` samples from `start`, wrapping at the end.
    pub fn read(&self, dest: &mut [f32], start: usize) {
        let len = self.samples.len();
        let mut index = start % len;
        for out in dest.iter_mut() {
            *out = self.samples[index];
            index += 1;
            if index == len {
                index = 0;
            }
        }
    }

    /// Copies the `dest.len()` samples that end at the write cursor.
    pub fn read_latest(&self, dest: &mut [f32]) {
        let len = self.samples.len();
        let start = (self.position + len - dest.len() % len) % len;
        self.read(dest, start);
    }
}

/// A running cpal input stream feeding a [`LoopBuffer`].
pub struct CpalCapture {
    stream: Option<cpal::Stream>,
    buffer: Arc<Mutex<LoopBuffer>>,
    sample_rate: u32,
    analyzer: SpectrumAnalyzer,
    block: Vec<f32>,
}

impl Capture for CpalCapture {
    fn position(&self) -> usize {
        self.buffer.lock().position()
    }

    fn is_capturing(&self) -> bool {
        self.stream.is_some() && self.buffer.lock().accepting()
    }

    fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                debug!("Pausing stream before drop failed: {e}");
            }
            debug!("Capture stream stopped");
        }
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn buffer_len(&self) -> usize {
        self.buffer.lock().len()
    }

    fn read_samples(&self, dest: &mut [f32], start: usize) {
        self.buffer.lock().read(dest, start);
    }

    fn spectrum_magnitudes(&mut self, dest: &mut [f32], window: AnalysisWindow) {
        self.block.resize(dest.len() * 2, 0.0);
        self.buffer.lock().read_latest(&mut self.block);
        self.analyzer.magnitudes(&self.block, window, dest);
    }
}

/// The platform's default cpal host.
pub struct CpalHost {
    host: cpal::Host,
}

impl CpalHost {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    /// Name of the system default input device, if any.
    pub fn default_input_device_name(&self) -> Option<String> {
        self.host.default_input_device().and_then(|d| d.name().ok())
    }

    fn find_device(&self, name: &str) -> PipelineResult<cpal::Device> {
        self.host
            .input_devices()?
            .find(|d| d.name().map(|n| n == name).unwrap_or(false))
            .ok_or_else(|| PipelineError::DeviceUnavailable(format!("Input device '{name}' not found")))
    }
}

impl Default for CpalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHost for CpalHost {
    type Capture = CpalCapture;

    fn list_input_devices(&self) -> PipelineResult<Vec<String>> {
        Ok(self
            .host
            .input_devices()?
            .filter_map(|d| d.name().ok())
            .collect())
    }

    fn open_capture(
        &mut self,
        device_name: &str,
        looping: bool,
        length_secs: u32,
        sample_rate: u32,
    ) -> PipelineResult<CpalCapture> {
        let device = self.find_device(device_name)?;

        let supported = pick_input_range(device.supported_input_configs()?, sample_rate);

        let supported_config = match supported {
            Some(config) => config,
            None => {
                let config = device.default_input_config()?;
                warn!(
                    "No capturable config at {}Hz on '{}', using default {:?} @ {}Hz",
                    sample_rate,
                    device_name,
                    config.sample_format(),
                    config.sample_rate().0
                );
                config
            }
        };

        let sample_format = supported_config.sample_format();
        let stream_config: cpal::StreamConfig = supported_config.into();
        let actual_rate = stream_config.sample_rate.0;

        debug!(
            "Capture config for '{}': {:?} @ {}Hz, {} channels",
            device_name, sample_format, actual_rate, stream_config.channels
        );

        let buffer_len = (length_secs.max(1) as usize) * actual_rate as usize;
        let buffer = Arc::new(Mutex::new(LoopBuffer::new(buffer_len, looping)));

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, buffer.clone())?,
            SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, buffer.clone())?,
            SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, buffer.clone())?,
            other => {
                return Err(PipelineError::Stream(format!(
                    "Unsupported sample format {other:?}"
                )));
            }
        };

        stream.play()?;
        info!("Capturing from '{device_name}' at {actual_rate}Hz");

        Ok(CpalCapture {
            stream: Some(stream),
            buffer,
            sample_rate: actual_rate,
            analyzer: SpectrumAnalyzer::new(),
            block: Vec::new(),
        })
    }
}

/// Sample formats the input callback can convert.
fn capturable(format: SampleFormat) -> bool {
    matches!(format, SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16)
}

/// Picks a range that covers `sample_rate` in a capturable format, F32 first.
fn pick_input_range(
    ranges: impl IntoIterator<Item = cpal::SupportedStreamConfigRange>,
    sample_rate: u32,
) -> Option<cpal::SupportedStreamConfig> {
    ranges
        .into_iter()
        .filter(|range| {
            capturable(range.sample_format())
                && range.min_sample_rate().0 <= sample_rate
                && range.max_sample_rate().0 >= sample_rate
        })
        .min_by_key(|range| range.sample_format() != SampleFormat::F32)
        .map(|range| range.with_sample_rate(cpal::SampleRate(sample_rate)))
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: Arc<Mutex<LoopBuffer>>,
) -> PipelineResult<cpal::Stream>
where
    T: Sample + cpal::SizedSample,
    f32: FromSample<T>,
{
    let channels = (config.channels as usize).max(1);

    let stream = device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            let mut buffer = buffer.lock();
            // Downmix interleaved frames to mono by averaging
            for frame in data.chunks_exact(channels) {
                let sum: f32 = frame.iter().map(|&s| s.to_sample::<f32>()).sum();
                buffer.push(sum / channels as f32);
            }
        },
        |err| error!("Capture stream error: {err}"),
        None,
    )?;

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looping_buffer_wraps_cursor() {
        let mut buffer = LoopBuffer::new(4, true);
        assert_eq!(buffer.position(), 0);
        for s in [1.0, 2.0, 3.0] {
            buffer.push(s);
        }
        assert_eq!(buffer.position(), 3);
        buffer.push(4.0);
        buffer.push(5.0);
        assert_eq!(buffer.position(), 1);
        assert!(buffer.accepting());

        let mut out = [0.0; 4];
        buffer.read(&mut out, 1);
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn one_shot_buffer_stops_when_full() {
        let mut buffer = LoopBuffer::new(2, false);
        buffer.push(1.0);
        buffer.push(2.0);
        buffer.push(3.0);
        assert!(!buffer.accepting());

        let mut out = [0.0; 2];
        buffer.read(&mut out, 0);
        assert_eq!(out, [1.0, 2.0]);
    }

    fn range(format: SampleFormat, min: u32, max: u32) -> cpal::SupportedStreamConfigRange {
        cpal::SupportedStreamConfigRange::new(
            2,
            cpal::SampleRate(min),
            cpal::SampleRate(max),
            cpal::SupportedBufferSize::Unknown,
            format,
        )
    }

    #[test]
    fn input_range_skips_formats_the_callback_cannot_convert() {
        let ranges = vec![
            range(SampleFormat::I32, 8000, 96000),
            range(SampleFormat::I16, 8000, 96000),
            range(SampleFormat::F32, 8000, 96000),
        ];
        let picked = pick_input_range(ranges, 44100);
        assert_eq!(picked.as_ref().map(|c| c.sample_format()), Some(SampleFormat::F32));
        assert_eq!(picked.map(|c| c.sample_rate().0), Some(44100));

        // Integer formats are fine when no float range covers the rate
        let ranges = vec![
            range(SampleFormat::I8, 8000, 96000),
            range(SampleFormat::F32, 48000, 48000),
            range(SampleFormat::I16, 8000, 48000),
        ];
        let picked = pick_input_range(ranges, 44100);
        assert_eq!(picked.map(|c| c.sample_format()), Some(SampleFormat::I16));

        let ranges = vec![range(SampleFormat::I32, 8000, 96000)];
        assert!(pick_input_range(ranges, 44100).is_none());
    }

    #[test]
    fn read_latest_ends_at_cursor() {
        let mut buffer = LoopBuffer::new(5, true);
        for s in 1..=7 {
            buffer.push(s as f32);
        }
        // Buffer holds [6, 7, 3, 4, 5] with the cursor at 2
        let mut out = [0.0; 3];
        buffer.read_latest(&mut out);
        assert_eq!(out, [5.0, 6.0, 7.0]);
    }
}
