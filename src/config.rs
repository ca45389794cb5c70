use crate::consts;
use crate::error::PipelineError;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const APP_VERSION: &str = "v0.1.0";

/// Capture and device-restart settings. Read when a session (re)starts.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Requested sample rate in Hz. The device may only support its own rate,
    /// in which case capture runs at the device rate.
    pub sample_rate: u32,

    /// Length of the looping capture buffer in seconds.
    pub recording_length_secs: u32,

    /// Samples shown in the waveform. Fixed for the lifetime of the engine.
    pub num_samples: usize,

    /// Spectrum bins. Must be a power of two; the FFT runs at twice this size.
    pub spectrum_samples: usize,

    /// Pause between releasing the old capture and opening the new one.
    pub restart_delay_secs: f32,

    /// How many frames to wait for the first captured sample.
    pub first_sample_poll_budget: u32,

    /// Duration of the post-restart gain ramp.
    pub fade_in_secs: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: consts::SAMPLE_RATE,
            recording_length_secs: consts::RECORDING_LENGTH_SECS,
            num_samples: consts::NUM_SAMPLES,
            spectrum_samples: consts::SPECTRUM_SAMPLES,
            restart_delay_secs: consts::RESTART_DELAY_SECS,
            first_sample_poll_budget: consts::FIRST_SAMPLE_POLL_BUDGET,
            fade_in_secs: consts::FADE_IN_SECS,
        }
    }
}

/// Display settings adjusted live from the control panel.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Vertical scale of the waveform.
    pub waveform_height: f32,

    /// Horizontal spread of the waveform and spectrum.
    /// 1 = normal, <1 = compressed, >1 = stretched.
    pub wave_density: f32,

    /// Stroke width in world units.
    pub line_width: f32,

    /// Moving-average window for the waveform. The spectrum uses a fifth of it.
    pub smoothing_window: u32,

    /// Hue rotation speed of the rainbow mode, in cycles per second.
    pub hue_shift_speed: f32,

    /// 0 = rainbow, 1..=14 = fixed palette colors.
    pub palette_index: usize,

    /// Paint the background with the complement of the foreground hue.
    pub complementary_background: bool,

    /// Draw the spectrum as bars instead of a line.
    pub bar_visualization: bool,

    /// Index into the enumerated input devices.
    pub selected_device_index: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            waveform_height: consts::WAVEFORM_HEIGHT_DEFAULT,
            wave_density: consts::WAVE_DENSITY_DEFAULT,
            line_width: consts::LINE_WIDTH_DEFAULT,
            smoothing_window: consts::SMOOTHING_WINDOW_DEFAULT,
            hue_shift_speed: consts::HUE_SHIFT_SPEED_DEFAULT,
            palette_index: 0,
            complementary_background: false,
            bar_visualization: true,
            selected_device_index: 0,
        }
    }
}

/// Bar height mapping and temporal smoothing.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BarConfig {
    /// Noise gate. Smoothed magnitudes below this count as silence.
    pub minimum_threshold: f32,

    /// Gain applied to compensated magnitudes before log compression.
    pub scale_factor: f32,

    /// Power applied after log compression, in (0, 1].
    pub exponent: f32,

    /// Baseline the renderer draws bars from. Not part of the height mapping.
    pub vertical_offset: f32,

    /// Ceiling of every mapped height.
    pub max_bar_height: f32,

    /// Snapshots averaged before easing.
    pub smoothing_samples: usize,

    /// Easing rate towards the averaged height, per second.
    pub transition_speed: f32,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            minimum_threshold: consts::MINIMUM_THRESHOLD_DEFAULT,
            scale_factor: consts::SPECTRUM_SCALE_DEFAULT,
            exponent: consts::SPECTRUM_EXPONENT_DEFAULT,
            vertical_offset: consts::VERTICAL_OFFSET_DEFAULT,
            max_bar_height: consts::MAX_BAR_HEIGHT_DEFAULT,
            smoothing_samples: consts::BAR_SMOOTHING_SAMPLES_DEFAULT,
            transition_speed: consts::BAR_TRANSITION_SPEED_DEFAULT,
        }
    }
}

/// Everything the pipeline reads, passed explicitly into each frame.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
    pub bars: BarConfig,
}

fn clamp_logged(name: &str, value: f32, (min, max): (f32, f32)) -> f32 {
    // NaN from a hand-edited file falls back to the lower bound
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        warn!("{name} = {value} is outside [{min}, {max}], using {clamped}");
    }
    clamped
}

impl VisualizerConfig {
    /// Returns a copy with every field forced into its documented range.
    pub fn clamped(&self) -> Self {
        let mut c = self.clone();

        let d = &mut c.display;
        d.waveform_height =
            clamp_logged("waveform_height", d.waveform_height, consts::WAVEFORM_HEIGHT_RANGE);
        d.wave_density = clamp_logged("wave_density", d.wave_density, consts::WAVE_DENSITY_RANGE);
        d.line_width = clamp_logged("line_width", d.line_width, consts::LINE_WIDTH_RANGE);
        d.smoothing_window = d.smoothing_window.clamp(
            consts::SMOOTHING_WINDOW_RANGE.0,
            consts::SMOOTHING_WINDOW_RANGE.1,
        );
        d.hue_shift_speed =
            clamp_logged("hue_shift_speed", d.hue_shift_speed, consts::HUE_SHIFT_SPEED_RANGE);
        d.palette_index = crate::color::ColorMode::from_index(d.palette_index).index();

        let b = &mut c.bars;
        b.minimum_threshold =
            clamp_logged("minimum_threshold", b.minimum_threshold, consts::MINIMUM_THRESHOLD_RANGE);
        b.scale_factor = clamp_logged("scale_factor", b.scale_factor, consts::SPECTRUM_SCALE_RANGE);
        b.exponent = clamp_logged("exponent", b.exponent, consts::SPECTRUM_EXPONENT_RANGE);
        b.vertical_offset =
            clamp_logged("vertical_offset", b.vertical_offset, consts::VERTICAL_OFFSET_RANGE);
        b.max_bar_height =
            clamp_logged("max_bar_height", b.max_bar_height, consts::MAX_BAR_HEIGHT_RANGE);
        b.smoothing_samples = b.smoothing_samples.clamp(
            consts::BAR_SMOOTHING_SAMPLES_RANGE.0,
            consts::BAR_SMOOTHING_SAMPLES_RANGE.1,
        );
        b.transition_speed = clamp_logged(
            "transition_speed",
            b.transition_speed,
            consts::BAR_TRANSITION_SPEED_RANGE,
        );

        let cap = &mut c.capture;
        cap.sample_rate = cap.sample_rate.max(8000);
        cap.recording_length_secs = cap.recording_length_secs.max(1);
        cap.num_samples = cap.num_samples.max(2);
        cap.restart_delay_secs = cap.restart_delay_secs.max(0.0);
        cap.first_sample_poll_budget = cap.first_sample_poll_budget.max(1);
        cap.fade_in_secs = cap.fade_in_secs.max(0.0);

        c
    }

    /// Clamps the selected device against the enumerated list.
    ///
    /// Falls back to device 0 when the index is out of range. Returns
    /// `DeviceUnavailable` when there is nothing to select.
    pub fn resolve_device<'a>(&mut self, devices: &'a [String]) -> Result<&'a str, PipelineError> {
        if devices.is_empty() {
            return Err(PipelineError::DeviceUnavailable(
                "No input devices found".to_string(),
            ));
        }
        if self.display.selected_device_index >= devices.len() {
            warn!(
                "Selected device index {} is out of range, defaulting to device 0",
                self.display.selected_device_index
            );
            self.display.selected_device_index = 0;
        }
        Ok(&devices[self.display.selected_device_index])
    }

    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load_or_default() -> Self {
        let path = match config_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}; using default settings");
                return Self::default();
            }
        };

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<VisualizerConfig>(&content) {
                Ok(config) => {
                    info!("Loaded settings from {}", path.display());
                    config.clamped()
                }
                Err(e) => {
                    warn!("Ignoring malformed {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(e) => {
                debug!("No settings at {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Writes the settings to the config file.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        info!("Settings saved to {}", path.display());
        Ok(path)
    }
}

fn config_path() -> Result<PathBuf, PipelineError> {
    let dir = dirs::config_dir().ok_or_else(|| {
        PipelineError::ConfigurationMissing("could not determine config directory".to_string())
    })?;
    Ok(dir.join("micviz").join("micviz.toml"))
}
