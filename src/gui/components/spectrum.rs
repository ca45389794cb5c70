use eframe::egui;

use super::scene::WorldView;
use crate::visual_engine::{FrameOutput, SpectrumFrame};

/// Fraction of each bar slot that is filled; the rest is the gap.
const BAR_FILL: f32 = 0.8;

pub fn paint_spectrum(painter: &egui::Painter, view: &WorldView, output: &FrameOutput) {
    match &output.spectrum {
        SpectrumFrame::Empty => {}
        SpectrumFrame::Line { points, colors } => {
            let width = view.length(output.line_width).max(1.0);
            for (pair, &color) in points.windows(2).zip(colors.iter()) {
                painter.line_segment(
                    [view.to_screen(pair[0]), view.to_screen(pair[1])],
                    egui::Stroke::new(width, color),
                );
            }
        }
        SpectrumFrame::Bars(bars) => {
            if bars.is_empty() {
                return;
            }
            let slot = output.span / bars.len() as f32;
            for bar in bars.iter().filter(|b| b.visible) {
                let rect = egui::Rect::from_two_pos(
                    view.to_screen([bar.x, output.baseline]),
                    view.to_screen([bar.x + slot * BAR_FILL, output.baseline + bar.height]),
                );
                painter.rect_filled(rect, 0.0, bar.color);
            }
        }
    }
}
