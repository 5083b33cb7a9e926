// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Intensity;
use crate::runtime::ColorMode;

pub const HUE_COUNT: u8 = 7;

// red, yellow, green, cyan, blue, magenta, white
const BASE_HUES: [Color; HUE_COUNT as usize] = [
    Color::DarkRed,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkBlue,
    Color::DarkMagenta,
    Color::Grey,
];

const BRIGHT_HUES: [Color; HUE_COUNT as usize] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::White,
];

const SINGLE_HUE: usize = 2;

/// Foreground used for hidden cells; matches the terminal background.
pub const HIDDEN_FG: Color = Color::Black;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Faint,
    Normal,
    Bold,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphStyle {
    pub fg: Color,
    pub weight: Weight,
}

/// Maps a cell's attributes to the color and weight it is drawn with.
///
/// In single-hue mode `color_index` is not read at all.
pub fn glyph_style(
    mode: ColorMode,
    intensity: Intensity,
    bold: bool,
    color_index: u8,
) -> GlyphStyle {
    let hue = match mode {
        ColorMode::SingleHue => SINGLE_HUE,
        ColorMode::MultiHue => (color_index % HUE_COUNT) as usize,
    };

    let (fg, weight) = match intensity {
        Intensity::Invisible => (HIDDEN_FG, Weight::Normal),
        Intensity::Dim => (BASE_HUES[hue], Weight::Faint),
        Intensity::Normal => (BASE_HUES[hue], Weight::Normal),
        Intensity::Bright => (BASE_HUES[hue], Weight::Bold),
        Intensity::Head => (BRIGHT_HUES[hue], Weight::Bold),
    };

    let weight = if bold && intensity > Intensity::Dim {
        Weight::Bold
    } else {
        weight
    };

    GlyphStyle { fg, weight }
}
