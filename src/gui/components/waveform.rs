use eframe::egui;

use super::scene::WorldView;
use crate::visual_engine::FrameOutput;

pub fn paint_waveform(painter: &egui::Painter, view: &WorldView, output: &FrameOutput) {
    let width = view.length(output.line_width).max(1.0);

    // One segment per point pair, colored by the starting point
    for (pair, &color) in output
        .waveform
        .windows(2)
        .zip(output.waveform_colors.iter())
    {
        painter.line_segment(
            [view.to_screen(pair[0]), view.to_screen(pair[1])],
            egui::Stroke::new(width, color),
        );
    }
}
