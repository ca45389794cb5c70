//! Per-frame pipeline from captured samples to drawable points and colors.

use crate::audio::host::{AudioHost, Capture};
use crate::audio::{CaptureBuffer, SpectrumSource};
use crate::color::{ColorMapper, ColorMode};
use crate::config::{CaptureConfig, VisualizerConfig};
use crate::consts;
use crate::controller::DeviceSessionController;
use crate::dsp::smoothing::{smooth_spectrum, smooth_waveform};
use crate::dsp::{SmoothingWindow, TemporalBarSmoother, bar_mapper};
use crate::error::PipelineError;
use egui::Color32;
use log::{debug, warn};

/// Height and color for one bar, addressed by bin index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarUpdate {
    pub index: usize,
    pub x: f32,
    pub height: f32,
    pub color: Color32,
    pub visible: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SpectrumFrame {
    /// No spectrum this frame, or the spectrum is disabled.
    #[default]
    Empty,
    Line {
        points: Vec<[f32; 2]>,
        colors: Vec<Color32>,
    },
    Bars(Vec<BarUpdate>),
}

/// Everything the renderer needs for one frame, in world units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameOutput {
    pub waveform: Vec<[f32; 2]>,
    pub waveform_colors: Vec<Color32>,
    pub spectrum: SpectrumFrame,
    /// Background override; `None` leaves the renderer's default.
    pub background: Option<Color32>,
    /// Baseline bars and the spectrum line are drawn from.
    pub baseline: f32,
    pub line_width: f32,
    /// Horizontal extent the points are spread over, centered on zero.
    pub span: f32,
}

pub struct VisualEngine {
    capture_buffer: CaptureBuffer,
    smoothed_waveform: Vec<f32>,
    spectrum_source: Option<SpectrumSource>,
    smoothed_spectrum: Vec<f32>,
    mapped_heights: Vec<f32>,
    bar_smoother: TemporalBarSmoother,
    output: FrameOutput,
}

/// x coordinate of element `index` out of `count`, spread over `span`.
fn spread(index: usize, count: usize, span: f32) -> f32 {
    (index as f32 / count as f32) * span - span / 2.0
}

impl VisualEngine {
    pub fn new(capture: &CaptureConfig) -> Self {
        let bins = capture.spectrum_samples;
        let spectrum_source = if bins.is_power_of_two() && bins >= 8 {
            Some(SpectrumSource::new(bins))
        } else {
            let e = PipelineError::ConfigurationMissing(format!(
                "spectrum_samples = {bins} is not a power of two >= 8"
            ));
            warn!("{e}; spectrum disabled");
            None
        };

        Self {
            capture_buffer: CaptureBuffer::new(capture.num_samples),
            smoothed_waveform: vec![0.0; capture.num_samples],
            spectrum_source,
            smoothed_spectrum: vec![0.0; bins],
            mapped_heights: vec![0.0; bins],
            bar_smoother: TemporalBarSmoother::new(),
            output: FrameOutput::default(),
        }
    }

    /// Last frame produced. Held unchanged while capture is not ready.
    pub fn last_output(&self) -> &FrameOutput {
        &self.output
    }

    pub fn spectrum_enabled(&self) -> bool {
        self.spectrum_source.is_some()
    }

    /// Runs one frame if the session is recording, otherwise keeps the
    /// previous output.
    pub fn update<H: AudioHost>(
        &mut self,
        session: &mut DeviceSessionController<H>,
        config: &VisualizerConfig,
        dt: f32,
        time: f32,
    ) -> &FrameOutput {
        match session.recording_capture() {
            Ok(capture) => {
                self.frame(capture, config, dt, time);
            }
            Err(e) => debug!("Frame skipped: {e}"),
        }
        &self.output
    }

    /// Reads the capture and rebuilds the frame output.
    pub fn frame<C: Capture>(
        &mut self,
        capture: &mut C,
        config: &VisualizerConfig,
        dt: f32,
        time: f32,
    ) -> &FrameOutput {
        let display = &config.display;
        let colors = ColorMapper {
            mode: ColorMode::from_index(display.palette_index),
            hue_shift_speed: display.hue_shift_speed,
            complementary_background: display.complementary_background,
        };
        let window = SmoothingWindow::from(display.smoothing_window);
        let span = consts::WAVE_SPAN * display.wave_density;

        // Waveform
        self.capture_buffer.refresh(&*capture);
        smooth_waveform(
            self.capture_buffer.samples(),
            window,
            &mut self.smoothed_waveform,
        );

        let n = self.smoothed_waveform.len();
        self.output.waveform.clear();
        self.output.waveform.extend(
            self.smoothed_waveform
                .iter()
                .enumerate()
                .map(|(i, &s)| [spread(i, n, span), s * display.waveform_height]),
        );
        colors.fill(&mut self.output.waveform_colors, n, time);

        // Spectrum
        self.output.spectrum = match self.spectrum_source.as_mut() {
            Some(source) => {
                source.refresh(capture);
                smooth_spectrum(source.bins(), window, &mut self.smoothed_spectrum);
                bar_mapper::map_heights(
                    &self.smoothed_spectrum,
                    &config.bars,
                    &mut self.mapped_heights,
                );
                let heights = self.bar_smoother.update(
                    &self.mapped_heights,
                    config.bars.smoothing_samples,
                    config.bars.transition_speed,
                    dt,
                );
                spectrum_frame(heights, &colors, config, span, time)
            }
            None => SpectrumFrame::Empty,
        };

        self.output.background = colors.background(time);
        self.output.baseline = config.bars.vertical_offset;
        self.output.line_width = display.line_width;
        self.output.span = span;

        &self.output
    }
}

fn spectrum_frame(
    heights: &[f32],
    colors: &ColorMapper,
    config: &VisualizerConfig,
    span: f32,
    time: f32,
) -> SpectrumFrame {
    let m = heights.len();
    let baseline = config.bars.vertical_offset;

    if config.display.bar_visualization {
        let first_visible = consts::HIDDEN_LOW_BINS;
        let last_visible = m.saturating_sub(consts::HIDDEN_HIGH_BINS);
        let bars = heights
            .iter()
            .enumerate()
            .map(|(i, &height)| {
                let visible = i >= first_visible && i < last_visible;
                BarUpdate {
                    index: i,
                    x: spread(i, m, span),
                    height,
                    color: if visible {
                        colors.color(i, m, time)
                    } else {
                        Color32::TRANSPARENT
                    },
                    visible,
                }
            })
            .collect();
        SpectrumFrame::Bars(bars)
    } else {
        let points = heights
            .iter()
            .enumerate()
            .map(|(i, &h)| [spread(i, m, span), baseline + h])
            .collect();
        let mut line_colors = Vec::with_capacity(m);
        colors.fill(&mut line_colors, m, time);
        SpectrumFrame::Line {
            points,
            colors: line_colors,
        }
    }
}
