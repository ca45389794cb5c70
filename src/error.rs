//! Error taxonomy for the capture pipeline

use std::fmt;

/// Errors raised by the capture and visualization pipeline.
///
/// None of these halt the frame loop. `DeviceStartTimeout` ends the current
/// restart attempt; every other variant degrades a feature or skips a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A required collaborator or setting is absent; the dependent feature is disabled
    ConfigurationMissing(String),
    /// No input devices, an unknown device name, or an out-of-range index
    DeviceUnavailable(String),
    /// The capture is not in its recording state yet; the frame is skipped
    CaptureNotReady,
    /// The capture cursor never advanced within the poll budget
    DeviceStartTimeout { device: String, attempts: u32 },
    /// The audio backend failed to build or start a stream
    Stream(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::ConfigurationMissing(msg) => write!(f, "Configuration missing: {}", msg),
            PipelineError::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            PipelineError::CaptureNotReady => write!(f, "Capture not ready"),
            PipelineError::DeviceStartTimeout { device, attempts } => write!(
                f,
                "Device '{}' did not deliver samples after {} polls",
                device, attempts
            ),
            PipelineError::Stream(msg) => write!(f, "Audio stream error: {}", msg),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<cpal::DevicesError> for PipelineError {
    fn from(err: cpal::DevicesError) -> Self {
        PipelineError::DeviceUnavailable(format!("Failed to enumerate devices: {}", err))
    }
}

impl From<cpal::DeviceNameError> for PipelineError {
    fn from(err: cpal::DeviceNameError) -> Self {
        PipelineError::DeviceUnavailable(format!("Failed to get device name: {}", err))
    }
}

impl From<cpal::DefaultStreamConfigError> for PipelineError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        PipelineError::DeviceUnavailable(format!("Failed to get default stream config: {}", err))
    }
}

impl From<cpal::SupportedStreamConfigsError> for PipelineError {
    fn from(err: cpal::SupportedStreamConfigsError) -> Self {
        PipelineError::DeviceUnavailable(format!("Failed to get supported stream configs: {}", err))
    }
}

impl From<cpal::BuildStreamError> for PipelineError {
    fn from(err: cpal::BuildStreamError) -> Self {
        PipelineError::Stream(format!("Failed to build audio stream: {}", err))
    }
}

impl From<cpal::PlayStreamError> for PipelineError {
    fn from(err: cpal::PlayStreamError) -> Self {
        PipelineError::Stream(format!("Failed to play audio stream: {}", err))
    }
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
