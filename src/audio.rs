pub mod analyzer;
pub mod audio_stream;
pub mod capture_buffer;
pub mod host;
pub mod spectrum_source;

#[cfg(test)]
pub mod testing;

pub use audio_stream::CpalHost;
pub use capture_buffer::CaptureBuffer;
pub use host::{AudioHost, Capture};
pub use spectrum_source::SpectrumSource;
