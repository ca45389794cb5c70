use eframe::egui;

use crate::audio::{AudioHost, Capture};
use crate::controller::{DeviceSessionController, SessionState};

pub fn render_session_status<H: AudioHost>(
    ui: &mut egui::Ui,
    session: &DeviceSessionController<H>,
    spectrum_enabled: bool,
) {
    ui.label(egui::RichText::new("Session").size(16.0));
    ui.add_space(8.0);

    ui.group(|ui| {
        ui.horizontal(|ui| {
            let state = session.state();
            let color = match state {
                SessionState::Recording => egui::Color32::GREEN,
                SessionState::Idle => egui::Color32::RED,
                _ => egui::Color32::YELLOW,
            };
            ui.colored_label(color, state.label());

            ui.separator();

            ui.label("Device:");
            ui.strong(session.device_name().unwrap_or("None"));

            if let Some(active) = session.session() {
                ui.separator();
                ui.label(format!(
                    "{} Hz, {} s buffer",
                    active.sample_rate, active.length_secs
                ));
                if !active.capture.is_capturing() {
                    ui.colored_label(egui::Color32::LIGHT_RED, "Stream stopped");
                }
            }
        });

        if matches!(session.state(), SessionState::FadingIn { .. }) {
            ui.add(
                egui::ProgressBar::new(session.gain())
                    .desired_width(160.0)
                    .text("Fading in"),
            );
        }

        if let Some(e) = session.last_error() {
            ui.colored_label(egui::Color32::LIGHT_RED, e.to_string());
        }

        if !spectrum_enabled {
            ui.colored_label(
                egui::Color32::GRAY,
                "Spectrum disabled: bin count must be a power of two",
            );
        }
    });
    ui.add_space(12.0);
}
