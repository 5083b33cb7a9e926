// Copyright (c) 2026 rezky_nightky

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::runtime::{ColorMode, RainConfig};

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  rainfall --frames 1000 --interval-ms 80 --resync-every 50 --intro-ms 3000";

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        let (head, rest) = DEFAULT_PARAMS_USAGE
            .split_once('\n')
            .unwrap_or((DEFAULT_PARAMS_USAGE, ""));
        format!("\x1b[1;36m{}\x1b[0m\n{}", head, rest)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    #[value(name = "single", alias = "green")]
    Single,
    #[value(name = "multi", alias = "rainbow")]
    Multi,
}

impl From<ModeArg> for ColorMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Single => ColorMode::SingleHue,
            ModeArg::Multi => ColorMode::MultiHue,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainfall", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        short = 'm',
        long = "mode",
        value_enum,
        help_heading = "GENERAL",
        help = "Run once in this mode instead of showing the menu (single, multi)"
    )]
    pub mode: Option<ModeArg>,

    #[arg(
        long = "fixed",
        help_heading = "GENERAL",
        help = "Do not follow terminal resizes"
    )]
    pub fixed: bool,

    #[arg(
        short = 'n',
        long = "frames",
        default_value_t = 1000,
        help_heading = "TIMING",
        help = "Frames per run (min 1 max 1000000)"
    )]
    pub frames: u32,

    #[arg(
        long = "duration",
        help_heading = "TIMING",
        help = "Also stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        short = 'i',
        long = "interval-ms",
        default_value_t = 80,
        help_heading = "TIMING",
        help = "Sleep between frames in ms (min 1 max 10000)"
    )]
    pub interval_ms: u64,

    #[arg(
        long = "resync-every",
        default_value_t = 50,
        help_heading = "TIMING",
        help = "Frames between terminal size checks (min 1 max 10000)"
    )]
    pub resync_every: u32,

    #[arg(
        long = "intro-ms",
        default_value_t = 3000,
        help_heading = "TIMING",
        help = "How long the intro banner stays up in ms (0 skips it, max 60000)"
    )]
    pub intro_ms: u64,

    #[arg(
        long = "seed",
        help_heading = "ADVANCED",
        help = "Seed the random generator for a reproducible run"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-file",
        help_heading = "ADVANCED",
        help = "Write diagnostic logs to this file"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "info",
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

/// An argument that parsed but is outside its allowed range.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeError {
    pub name: &'static str,
    pub value: String,
    pub limits: String,
}

impl std::fmt::Display for RangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to apply {} {} ({})", self.name, self.value, self.limits)
    }
}

impl std::error::Error for RangeError {}

fn require_range<T>(name: &'static str, v: T, min: T, max: T) -> Result<T, RangeError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if v < min || v > max {
        return Err(RangeError {
            name,
            value: v.to_string(),
            limits: format!("min {} max {}", min, max),
        });
    }
    Ok(v)
}

fn require_duration(v: Option<f64>) -> Result<Option<Duration>, RangeError> {
    match v {
        None => Ok(None),
        Some(s) if !s.is_finite() => Err(RangeError {
            name: "--duration",
            value: s.to_string(),
            limits: "must be a finite number".to_string(),
        }),
        Some(s) if s <= 0.0 => Ok(None),
        Some(s) => require_range("--duration", s, 0.1, 86400.0)
            .map(|s| Some(Duration::from_secs_f64(s))),
    }
}

impl Args {
    /// Validated engine settings for `mode`.
    pub fn rain_config(&self, mode: ColorMode) -> Result<RainConfig, RangeError> {
        let mut cfg = RainConfig::new(mode);
        cfg.adaptive = !self.fixed;
        cfg.frames = require_range("--frames", self.frames, 1, 1_000_000)?;
        cfg.duration = require_duration(self.duration)?;
        cfg.interval = Duration::from_millis(require_range(
            "--interval-ms",
            self.interval_ms,
            1,
            10_000,
        )?);
        cfg.resync_every = require_range("--resync-every", self.resync_every, 1, 10_000)?;
        cfg.intro = Duration::from_millis(require_range("--intro-ms", self.intro_ms, 0, 60_000)?);
        cfg.seed = self.seed;
        Ok(cfg)
    }
}
