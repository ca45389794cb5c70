use crate::audio::{AudioHost, CpalHost};
use crate::config::{APP_VERSION, VisualizerConfig};
use crate::controller::DeviceSessionController;
use crate::visual_engine::VisualEngine;
use eframe::egui;
use log::{debug, info, warn};

use super::components::{render_config_panel, render_scene, render_session_status};

pub struct AppState {
    config: VisualizerConfig,
    saved_config: VisualizerConfig,
    devices: Vec<String>,
    default_device: Option<String>,
    host: CpalHost,
    session: DeviceSessionController<CpalHost>,
    engine: VisualEngine,
    save_status: Option<String>,
    visuals_window_open: bool,
}

impl eframe::App for AppState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (dt, time) = ctx.input(|i| (i.stable_dt, i.time as f32));
        self.step(dt, time);

        self.render_top_panel(ctx);
        self.render_bottom_panel(ctx);
        self.render_central_panel(ctx);
        self.render_visualizer_window(ctx);

        ctx.request_repaint();
    }
}

impl AppState {
    pub fn new(config: VisualizerConfig) -> Self {
        debug!("Initializing GUI state...");
        let host = CpalHost::new();

        let devices = host.list_input_devices().unwrap_or_else(|e| {
            warn!("{e}");
            Vec::new()
        });
        debug!("Found {} audio input devices", devices.len());

        let mut config = config.clamped();
        let mut session = DeviceSessionController::new(config.capture.clone());
        match config.resolve_device(&devices) {
            Ok(device) => {
                info!("Selected initial audio device: {device}");
                session.request_device_change(device, &config.capture);
            }
            Err(e) => warn!("{e}"),
        }

        let engine = VisualEngine::new(&config.capture);
        let default_device = host.default_input_device_name();

        Self {
            saved_config: config.clone(),
            config,
            devices,
            default_device,
            host,
            session,
            engine,
            save_status: None,
            visuals_window_open: false,
        }
    }

    /// Advances the device session and renders the next frame into the engine.
    fn step(&mut self, dt: f32, time: f32) {
        // Failures are logged and kept as last_error by the controller
        if let Err(e) = self.session.tick(dt, &mut self.host) {
            debug!("Device session step failed: {e}");
        }
        self.engine.update(&mut self.session, &self.config, dt, time);
    }

    fn select_device(&mut self, index: usize) {
        self.config.display.selected_device_index = index;
        match self.config.resolve_device(&self.devices) {
            Ok(device) => self
                .session
                .request_device_change(device, &self.config.capture),
            Err(e) => warn!("{e}"),
        }
    }

    fn reset_to_default(&mut self) {
        debug!("Resetting config to defaults");
        let device = self.config.display.selected_device_index;
        let capture_changed = self.config.capture != VisualizerConfig::default().capture;

        self.config = VisualizerConfig::default();
        self.config.display.selected_device_index = device;

        if capture_changed {
            // Buffer sizes are fixed per engine, so rebuild and restart capture
            self.engine = VisualEngine::new(&self.config.capture);
            self.select_device(device);
        }
    }

    fn save_settings(&mut self) {
        self.config = self.config.clamped();
        self.save_status = Some(match self.config.save() {
            Ok(path) => {
                self.saved_config = self.config.clone();
                format!("Saved to {}", path.display())
            }
            Err(e) => {
                warn!("Failed to save settings: {e:#}");
                format!("Save failed: {e}")
            }
        });
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.heading(format!("micviz {APP_VERSION}"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.session.is_recording() {
                        ui.colored_label(egui::Color32::GREEN, "Listening");
                    } else {
                        ui.colored_label(egui::Color32::RED, "No Audio Stream");
                    }
                });
            });
            ui.add_space(4.0);
            ui.separator();
            ui.add_space(4.0);

            // Device Selection
            let mut selected = self.config.display.selected_device_index;
            ui.horizontal(|ui| {
                ui.label("Audio Device:");
                egui::ComboBox::from_id_salt("device_selector")
                    .selected_text(
                        self.devices
                            .get(selected)
                            .map(|name| name.as_str())
                            .unwrap_or("No devices"),
                    )
                    .show_ui(ui, |ui| {
                        for (idx, name) in self.devices.iter().enumerate() {
                            let label = if self.default_device.as_deref() == Some(name.as_str()) {
                                format!("{name} (default)")
                            } else {
                                name.clone()
                            };
                            ui.selectable_value(&mut selected, idx, label);
                        }
                    });
            });
            if selected != self.config.display.selected_device_index {
                self.select_device(selected);
            }
            ui.add_space(4.0);
        });
    }

    fn render_bottom_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("bottom_panel").show(ctx, |ui| {
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.add_space(4.0);
                let unsaved = self.config != self.saved_config;

                ui.add_enabled_ui(unsaved, |ui| {
                    if ui.button("Save Settings").clicked() {
                        self.save_settings();
                    }
                });

                if ui.button("↺ Reset to Default").clicked() {
                    self.reset_to_default();
                }

                ui.separator();

                ui.add_enabled_ui(!self.visuals_window_open, |ui| {
                    if ui.button("Open Visualizer").clicked() {
                        self.visuals_window_open = true;
                        info!("Visualizer window opened");
                    }
                });

                if self.visuals_window_open {
                    ui.colored_label(egui::Color32::GREEN, "● Visuals Active");
                }
            });
            if let Some(status) = &self.save_status {
                ui.small(status);
            }
            ui.add_space(8.0);
        });
    }

    fn render_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(8.0);

                    render_session_status(ui, &self.session, self.engine.spectrum_enabled());

                    // Preview of the visualizer output
                    ui.group(|ui| {
                        ui.label("Preview");
                        render_scene(ui, self.engine.last_output(), Some(160.0));
                    });

                    ui.add_space(20.0);

                    render_config_panel(ui, &mut self.config);
                });
        });
    }

    fn render_visualizer_window(&mut self, ctx: &egui::Context) {
        if self.visuals_window_open {
            let visualizer_id = egui::ViewportId::from_hash_of("micviz_visualizer");

            ctx.show_viewport_immediate(
                visualizer_id,
                egui::ViewportBuilder::default()
                    .with_title("micviz")
                    .with_inner_size([800.0, 600.0])
                    .with_resizable(true),
                |ctx, _class| {
                    if ctx.input(|i| i.viewport().close_requested()) {
                        self.visuals_window_open = false;
                    }
                    egui::CentralPanel::default()
                        .frame(egui::Frame::NONE)
                        .show(ctx, |ui| {
                            render_scene(ui, self.engine.last_output(), None);
                        });
                },
            );
        }
    }
}
