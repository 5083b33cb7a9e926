// Copyright (c) 2026 rezky_nightky

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    SingleHue,
    MultiHue,
}

impl ColorMode {
    pub fn label(self) -> &'static str {
        match self {
            ColorMode::SingleHue => "Classic Matrix Green",
            ColorMode::MultiHue => "Rainbow Colors",
        }
    }
}

/// Everything the engine can be told from outside. Dimensions and trail
/// length are never configured; they are derived from the terminal.
#[derive(Clone, Debug)]
pub struct RainConfig {
    pub mode: ColorMode,
    pub adaptive: bool,
    pub frames: u32,
    pub duration: Option<Duration>,
    pub interval: Duration,
    pub resync_every: u32,
    pub intro: Duration,
    pub seed: Option<u64>,
}

impl RainConfig {
    pub fn new(mode: ColorMode) -> Self {
        Self {
            mode,
            adaptive: true,
            frames: 1000,
            duration: None,
            interval: Duration::from_millis(80),
            resync_every: 50,
            intro: Duration::from_millis(3000),
            seed: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u32,
    pub width: u16,
    pub height: u16,
    pub resizes: u32,
}
