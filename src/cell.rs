// Copyright (c) 2026 rezky_nightky

/// Brightness of a painted cell, ordered from hidden to the drop head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intensity {
    Invisible,
    Dim,
    Normal,
    Bright,
    Head,
}

impl Intensity {
    #[cfg(test)]
    pub const ALL: [Intensity; 5] = [
        Intensity::Invisible,
        Intensity::Dim,
        Intensity::Normal,
        Intensity::Bright,
        Intensity::Head,
    ];

    /// One level darker, saturating at `Invisible`.
    pub fn dimmer(self) -> Self {
        match self {
            Intensity::Invisible | Intensity::Dim => Intensity::Invisible,
            Intensity::Normal => Intensity::Dim,
            Intensity::Bright => Intensity::Normal,
            Intensity::Head => Intensity::Bright,
        }
    }

    pub fn is_visible(self) -> bool {
        self > Intensity::Invisible
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub intensity: Intensity,
    pub bold: bool,
    pub color_index: u8,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        intensity: Intensity::Invisible,
        bold: false,
        color_index: 0,
    };
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
