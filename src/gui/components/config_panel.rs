use eframe::egui;

use crate::color::ColorMode;
use crate::config::{BarConfig, DisplayConfig, VisualizerConfig};
use crate::consts;

/// Slider range from a `(min, max)` bounds pair.
fn range<T: Copy>(bounds: (T, T)) -> std::ops::RangeInclusive<T> {
    bounds.0..=bounds.1
}

pub fn render_config_panel(ui: &mut egui::Ui, config: &mut VisualizerConfig) {
    ui.label(egui::RichText::new("Configuration").size(16.0));
    ui.add_space(8.0);

    render_waveform_settings(ui, &mut config.display);

    ui.add_space(8.0);

    render_color_settings(ui, &mut config.display);

    ui.add_space(8.0);

    render_spectrum_settings(ui, &mut config.display.bar_visualization, &mut config.bars);

    ui.add_space(20.0);
}

fn render_waveform_settings(ui: &mut egui::Ui, display: &mut DisplayConfig) {
    egui::CollapsingHeader::new("Waveform")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("waveform_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Height:").on_hover_text("Vertical scale of the waveform");
                    ui.add(egui::Slider::new(
                        &mut display.waveform_height,
                        range(consts::WAVEFORM_HEIGHT_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Density:").on_hover_text("Horizontal spread of waveform and bars");
                    ui.add(egui::Slider::new(
                        &mut display.wave_density,
                        range(consts::WAVE_DENSITY_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Line Width:");
                    ui.add(egui::Slider::new(
                        &mut display.line_width,
                        range(consts::LINE_WIDTH_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Smoothing:")
                        .on_hover_text("Moving-average window; the spectrum uses a fifth of it");
                    ui.add(
                        egui::Slider::new(
                            &mut display.smoothing_window,
                            range(consts::SMOOTHING_WINDOW_RANGE),
                        )
                        .suffix(" samples"),
                    );
                    ui.end_row();
                });
        });
}

fn render_color_settings(ui: &mut egui::Ui, display: &mut DisplayConfig) {
    egui::CollapsingHeader::new("Colors")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("color_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    let mode = ColorMode::from_index(display.palette_index);
                    ui.label("Color:");
                    if ui.button(format!("{} ▶", mode.name())).clicked() {
                        display.palette_index = mode.next().index();
                    }
                    ui.end_row();

                    ui.label("Hue Shift Speed:")
                        .on_hover_text("0 freezes the rainbow in place");
                    ui.add(egui::Slider::new(
                        &mut display.hue_shift_speed,
                        range(consts::HUE_SHIFT_SPEED_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Background:");
                    ui.checkbox(&mut display.complementary_background, "Complementary");
                    ui.end_row();
                });
        });
}

fn render_spectrum_settings(ui: &mut egui::Ui, bar_visualization: &mut bool, bars: &mut BarConfig) {
    egui::CollapsingHeader::new("Spectrum")
        .default_open(true)
        .show(ui, |ui| {
            ui.add_space(4.0);
            egui::Grid::new("spectrum_settings_grid")
                .num_columns(2)
                .spacing([20.0, 8.0])
                .show(ui, |ui| {
                    ui.label("Style:");
                    ui.horizontal(|ui| {
                        ui.radio_value(bar_visualization, true, "Bars");
                        ui.radio_value(bar_visualization, false, "Line");
                    });
                    ui.end_row();

                    ui.label("Noise Gate:")
                        .on_hover_text("Magnitudes below this are drawn at minimum height");
                    ui.add(
                        egui::Slider::new(
                            &mut bars.minimum_threshold,
                            range(consts::MINIMUM_THRESHOLD_RANGE),
                        )
                        .logarithmic(true),
                    );
                    ui.end_row();

                    ui.label("Scale:");
                    ui.add(egui::Slider::new(
                        &mut bars.scale_factor,
                        range(consts::SPECTRUM_SCALE_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Exponent:").on_hover_text("Lower = flatter bars");
                    ui.add(egui::Slider::new(
                        &mut bars.exponent,
                        range(consts::SPECTRUM_EXPONENT_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Vertical Offset:");
                    ui.add(egui::Slider::new(
                        &mut bars.vertical_offset,
                        range(consts::VERTICAL_OFFSET_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Max Height:");
                    ui.add(egui::Slider::new(
                        &mut bars.max_bar_height,
                        range(consts::MAX_BAR_HEIGHT_RANGE),
                    ));
                    ui.end_row();

                    ui.label("Bar Smoothing:")
                        .on_hover_text("Frames averaged before easing");
                    ui.add(
                        egui::Slider::new(
                            &mut bars.smoothing_samples,
                            range(consts::BAR_SMOOTHING_SAMPLES_RANGE),
                        )
                        .suffix(" frames"),
                    );
                    ui.end_row();

                    ui.label("Transition Speed:");
                    ui.add(egui::Slider::new(
                        &mut bars.transition_speed,
                        range(consts::BAR_TRANSITION_SPEED_RANGE),
                    ));
                    ui.end_row();
                });
        });
}
