mod config_panel;
mod scene;
mod session_status;
mod spectrum;
mod waveform;

pub use config_panel::render_config_panel;
pub use scene::render_scene;
pub use session_status::render_session_status;
