use eframe::egui;

use super::{spectrum, waveform};
use crate::visual_engine::FrameOutput;

/// World units visible across the width of the scene.
const VIEW_WIDTH: f32 = 12.0;

/// Maps world coordinates (origin at the center, y up) into a screen rect.
#[derive(Debug, Clone, Copy)]
pub struct WorldView {
    rect: egui::Rect,
    scale: f32,
}

impl WorldView {
    pub fn fit(rect: egui::Rect) -> Self {
        Self {
            rect,
            scale: rect.width() / VIEW_WIDTH,
        }
    }

    pub fn to_screen(&self, point: [f32; 2]) -> egui::Pos2 {
        let center = self.rect.center();
        egui::pos2(center.x + point[0] * self.scale, center.y - point[1] * self.scale)
    }

    /// World length in pixels, for stroke widths.
    pub fn length(&self, world: f32) -> f32 {
        world * self.scale
    }
}

/// Paints one frame into a region of `height` pixels (or all remaining space).
pub fn render_scene(ui: &mut egui::Ui, output: &FrameOutput, height: Option<f32>) {
    let size = egui::vec2(
        ui.available_width(),
        height.unwrap_or_else(|| ui.available_height()),
    );
    let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
    let rect = response.rect;
    let painter = painter.with_clip_rect(rect);

    let background = output.background.unwrap_or(egui::Color32::from_gray(20));
    painter.rect_filled(rect, 0.0, background);

    let view = WorldView::fit(rect);

    // Center line
    painter.line_segment(
        [
            egui::pos2(rect.left(), rect.center().y),
            egui::pos2(rect.right(), rect.center().y),
        ],
        egui::Stroke::new(0.5, egui::Color32::from_gray(80)),
    );

    spectrum::paint_spectrum(&painter, &view, output);
    waveform::paint_waveform(&painter, &view, output);
}
