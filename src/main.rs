// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod cloud;
mod config;
mod droplet;
mod error;
mod frame;
mod menu;
mod palette;
mod renderer;
mod runtime;
mod session;
mod terminal;

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Mutex;

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::cloud::Cloud;
use crate::config::{color_enabled_stdout, default_params_usage_for_help, Args};
use crate::error::InitError;
use crate::runtime::{ColorMode, RainConfig, RunSummary};
use crate::terminal::{restore_terminal_best_effort, Canvas};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn init_logging(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();
    Ok(())
}

fn install_interrupt_handler() {
    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    // The render loop is not stopped first. A frame written
                    // concurrently with the restore can stay on screen; frames
                    // go out in a single write, so at most one can leak.
                    if !session::restore_active() {
                        tracing::debug!(sig, "interrupt with no engine running");
                    }
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            // Same race with the render loop as the unix handler.
            session::restore_active();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn fatal(e: InitError) -> ! {
    restore_terminal_best_effort();
    tracing::error!(error = %e, "rain aborted");
    eprintln!("Fatal error: {}", e);
    std::process::exit(1);
}

fn run_once(config: RainConfig) -> Result<RunSummary, InitError> {
    let mut cloud = Cloud::new(config, Canvas::stdout())?;
    cloud.run()
}

fn print_summary(summary: &RunSummary) {
    println!("Rain completed!");
    println!(
        "Final terminal size was: {}x{}",
        summary.width, summary.height
    );
}

fn main() -> io::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    install_interrupt_handler();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("RAINFALL_BUILD"));
        let sha = env!("RAINFALL_GIT_SHA");
        if !sha.is_empty() {
            println!("Commit: {}", sha);
        }
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let base = match args.rain_config(ColorMode::SingleHue) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(args.log_file.as_deref()) {
        eprintln!("failed to open log file: {}", e);
        std::process::exit(1);
    }

    if let Some(mode) = args.mode {
        let summary = run_once(RainConfig {
            mode: mode.into(),
            ..base
        })
        .unwrap_or_else(|e| fatal(e));
        print_summary(&summary);
        return Ok(());
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    loop {
        menu::show_menu(&mut out)?;
        let choice = menu::read_choice(&mut input, &mut out)?;
        let Some(mode) = choice.mode() else {
            menu::show_goodbye(&mut out)?;
            return Ok(());
        };

        tracing::info!(?mode, "starting run from menu");
        let summary = run_once(RainConfig {
            mode,
            ..base.clone()
        })
        .unwrap_or_else(|e| fatal(e));
        print_summary(&summary);
        menu::press_enter_to_continue(&mut input, &mut out)?;
    }
}
