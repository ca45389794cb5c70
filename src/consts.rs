//! Defaults and bounds for every configurable value.

/// Requested capture sample rate in Hz. The device may force another rate.
pub const SAMPLE_RATE: u32 = 44100;

/// Length of the looping capture buffer in seconds.
pub const RECORDING_LENGTH_SECS: u32 = 1;

/// Samples read into the waveform window each frame.
pub const NUM_SAMPLES: usize = 1024;

/// Spectrum bins per frame. The analyzer runs an FFT of twice this size.
pub const SPECTRUM_SAMPLES: usize = 64;

/// Wait between releasing the old capture and opening the new one.
pub const RESTART_DELAY_SECS: f32 = 0.1;

/// Polls of the capture cursor before a restart is abandoned.
pub const FIRST_SAMPLE_POLL_BUDGET: u32 = 50;

/// Gain ramp duration after a restart.
pub const FADE_IN_SECS: f32 = 0.5;

pub const WAVEFORM_HEIGHT_DEFAULT: f32 = 1.0;
pub const WAVEFORM_HEIGHT_RANGE: (f32, f32) = (0.01, 100.0);

pub const WAVE_DENSITY_DEFAULT: f32 = 1.0;
pub const WAVE_DENSITY_RANGE: (f32, f32) = (0.1, 5.0);

pub const LINE_WIDTH_DEFAULT: f32 = 0.02;
pub const LINE_WIDTH_RANGE: (f32, f32) = (0.005, 0.5);

pub const SMOOTHING_WINDOW_DEFAULT: u32 = 1;
pub const SMOOTHING_WINDOW_RANGE: (u32, u32) = (1, 50);

/// The spectrum smoothing window is the waveform window divided by this.
pub const SPECTRUM_SMOOTHING_DIVISOR: f32 = 5.0;

pub const SPECTRUM_SCALE_DEFAULT: f32 = 50.0;
pub const SPECTRUM_SCALE_RANGE: (f32, f32) = (1.0, 200.0);

/// Exponent applied after log compression. 0.5 is square-root compression.
pub const SPECTRUM_EXPONENT_DEFAULT: f32 = 0.5;
pub const SPECTRUM_EXPONENT_RANGE: (f32, f32) = (0.1, 1.0);

pub const HUE_SHIFT_SPEED_DEFAULT: f32 = 0.1;
pub const HUE_SHIFT_SPEED_RANGE: (f32, f32) = (0.0, 2.0);

/// Magnitudes below this are gated to zero before mapping.
pub const MINIMUM_THRESHOLD_DEFAULT: f32 = 0.0005;
pub const MINIMUM_THRESHOLD_RANGE: (f32, f32) = (0.0, 1.0);

/// Floor of every mapped bar height.
pub const MIN_BAR_HEIGHT: f32 = 0.01;

pub const MAX_BAR_HEIGHT_DEFAULT: f32 = 4.0;
pub const MAX_BAR_HEIGHT_RANGE: (f32, f32) = (0.1, 50.0);

pub const VERTICAL_OFFSET_DEFAULT: f32 = 0.0;
pub const VERTICAL_OFFSET_RANGE: (f32, f32) = (-10.0, 10.0);

/// Snapshots kept in the bar history.
pub const BAR_SMOOTHING_SAMPLES_DEFAULT: usize = 2;
pub const BAR_SMOOTHING_SAMPLES_RANGE: (usize, usize) = (1, 30);

/// Easing rate towards the averaged bar height, per second.
pub const BAR_TRANSITION_SPEED_DEFAULT: f32 = 5.0;
pub const BAR_TRANSITION_SPEED_RANGE: (f32, f32) = (0.1, 60.0);

/// Horizontal extent of the waveform at density 1, in world units.
pub const WAVE_SPAN: f32 = 10.0;

/// Bins at the low end of the bar view that are never shown.
pub const HIDDEN_LOW_BINS: usize = 3;

/// Bins at the high end of the bar view that are never shown.
pub const HIDDEN_HIGH_BINS: usize = 1;

/// Background saturation in complementary mode.
pub const BACKGROUND_SATURATION: f32 = 0.8;

/// Background value in complementary mode.
pub const BACKGROUND_VALUE: f32 = 0.6;
