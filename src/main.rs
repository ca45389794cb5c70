mod audio;
mod color;
mod config;
mod consts;
mod controller;
mod dsp;
mod error;
mod gui;
mod visual_engine;

use config::VisualizerConfig;
use log::{debug, info};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting up...");

    let config = VisualizerConfig::load_or_default();
    debug!(
        "Capture settings: sample_rate={}, num_samples={}, spectrum_samples={}",
        config.capture.sample_rate, config.capture.num_samples, config.capture.spectrum_samples
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 800.0])
            .with_title("micviz"),
        ..Default::default()
    };

    debug!("Launching GUI...");
    eframe::run_native(
        "micviz audio visualizer",
        options,
        Box::new(move |_cc| Ok(Box::new(gui::AppState::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {e}"))?;

    info!("Clean shutdown complete");
    Ok(())
}
