//! Foreground and background colors for the waveform and spectrum.

use crate::consts;
use egui::Color32;
use egui::ecolor::Hsva;

/// Fixed palette, in selection order after the rainbow mode.
pub const PALETTE: [(&str, Color32); 14] = [
    ("Red", Color32::from_rgb(255, 0, 0)),
    ("Orange", Color32::from_rgb(255, 128, 0)),
    ("Yellow", Color32::from_rgb(255, 235, 4)),
    ("Green", Color32::from_rgb(0, 255, 0)),
    ("Teal", Color32::from_rgb(0, 128, 128)),
    ("Light Blue", Color32::from_rgb(173, 216, 230)),
    ("Cyan", Color32::from_rgb(0, 255, 255)),
    ("Blue", Color32::from_rgb(0, 0, 255)),
    ("Purple", Color32::from_rgb(128, 0, 128)),
    ("Magenta", Color32::from_rgb(255, 0, 255)),
    ("Pink", Color32::from_rgb(255, 192, 203)),
    ("Brown", Color32::from_rgb(139, 69, 19)),
    ("White", Color32::from_rgb(255, 255, 255)),
    ("Gray", Color32::from_rgb(128, 128, 128)),
];

/// Number of selectable modes: rainbow plus every palette entry.
pub const MODE_COUNT: usize = PALETTE.len() + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Hue cycles over time and across elements.
    Rainbow,
    /// One palette color for every element.
    Fixed(usize),
}

impl ColorMode {
    /// Index 0 is rainbow, 1..=14 select the palette. Larger indices wrap.
    pub fn from_index(index: usize) -> Self {
        match index % MODE_COUNT {
            0 => ColorMode::Rainbow,
            i => ColorMode::Fixed(i - 1),
        }
    }

    pub fn index(self) -> usize {
        match self {
            ColorMode::Rainbow => 0,
            ColorMode::Fixed(i) => i + 1,
        }
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorMode::Rainbow => "Rainbow",
            ColorMode::Fixed(i) => PALETTE[i].0,
        }
    }
}

/// Reflects `t` into `[0, length]` with a triangle wave of period `2 * length`.
pub fn pingpong(t: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let repeated = t.rem_euclid(length * 2.0);
    length - (repeated - length).abs()
}

fn hsv(hue: f32, saturation: f32, value: f32) -> Color32 {
    Color32::from(Hsva::new(hue, saturation, value, 1.0))
}

/// Selects element and background colors from the current color state.
#[derive(Debug, Clone, Copy)]
pub struct ColorMapper {
    pub mode: ColorMode,
    pub hue_shift_speed: f32,
    pub complementary_background: bool,
}

impl ColorMapper {
    /// Hue of element `index` out of `count` at time `t`, for rainbow mode.
    pub fn hue(&self, index: usize, count: usize, t: f32) -> f32 {
        let offset = if count > 0 {
            index as f32 / count as f32
        } else {
            0.0
        };
        pingpong(t * self.hue_shift_speed + offset, 1.0)
    }

    pub fn color(&self, index: usize, count: usize, t: f32) -> Color32 {
        match self.mode {
            ColorMode::Rainbow => hsv(self.hue(index, count, t), 1.0, 1.0),
            ColorMode::Fixed(i) => PALETTE[i].1,
        }
    }

    /// Fills `out` with one color per element.
    pub fn fill(&self, out: &mut Vec<Color32>, count: usize, t: f32) {
        out.clear();
        out.extend((0..count).map(|i| self.color(i, count, t)));
    }

    /// Foreground hue of element 0.
    fn base_hue(&self, t: f32) -> f32 {
        match self.mode {
            ColorMode::Rainbow => self.hue(0, 1, t),
            ColorMode::Fixed(i) => Hsva::from(PALETTE[i].1).h,
        }
    }

    /// Complement of the foreground hue, or `None` when the background is
    /// left to the renderer.
    pub fn background(&self, t: f32) -> Option<Color32> {
        if !self.complementary_background || self.hue_shift_speed <= 0.0 {
            return None;
        }
        let hue = (self.base_hue(t) + 0.5).rem_euclid(1.0);
        Some(hsv(
            hue,
            consts::BACKGROUND_SATURATION,
            consts::BACKGROUND_VALUE,
        ))
    }
}
