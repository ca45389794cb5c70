pub mod bar_mapper;
pub mod bar_smoother;
pub mod smoothing;

pub use bar_smoother::TemporalBarSmoother;
pub use smoothing::SmoothingWindow;
