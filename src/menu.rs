// Copyright (c) 2026 rezky_nightky

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crossterm::{
    cursor,
    style::{Color, Stylize},
    terminal, QueueableCommand,
};

use crate::runtime::ColorMode;

const INNER_WIDTH: usize = 39;

const RAINBOW: [Color; 7] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::White,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Classic,
    Rainbow,
    Exit,
}

impl MenuChoice {
    pub fn mode(self) -> Option<ColorMode> {
        match self {
            MenuChoice::Classic => Some(ColorMode::SingleHue),
            MenuChoice::Rainbow => Some(ColorMode::MultiHue),
            MenuChoice::Exit => None,
        }
    }
}

pub fn parse_choice(line: &str) -> Option<MenuChoice> {
    match line.trim().parse::<u8>().ok()? {
        1 => Some(MenuChoice::Classic),
        2 => Some(MenuChoice::Rainbow),
        3 => Some(MenuChoice::Exit),
        _ => None,
    }
}

fn border<W: Write>(out: &mut W, left: char, right: char) -> io::Result<()> {
    let line = "═".repeat(INNER_WIDTH);
    writeln!(out, "{}", format!("{left}{line}{right}").green().bold())
}

fn row<W: Write>(out: &mut W, visible_len: usize, body: impl Display) -> io::Result<()> {
    let pad = INNER_WIDTH.saturating_sub(visible_len + 2);
    write!(out, "{}", "║  ".green().bold())?;
    write!(out, "{}", body)?;
    writeln!(out, "{}", format!("{}║", " ".repeat(pad)).green().bold())
}

fn rainbow_label(text: &str) -> String {
    let mut s = String::new();
    for (i, ch) in text.chars().enumerate() {
        s.push_str(&ch.with(RAINBOW[i % RAINBOW.len()]).bold().to_string());
    }
    s
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    out.queue(cursor::MoveTo(0, 0))?;
    out.flush()
}

pub fn show_menu<W: Write>(out: &mut W) -> io::Result<()> {
    clear_screen(out)?;

    let title = format!("{:^width$}", "DIGITAL RAIN", width = INNER_WIDTH);
    border(out, '╔', '╗')?;
    writeln!(out, "{}", format!("║{title}║").green().bold())?;
    border(out, '╠', '╣')?;
    row(out, 0, "")?;

    let classic = "1. Classic Matrix Green";
    row(out, classic.len(), classic.green().bold())?;
    let rainbow = "2. Rainbow Colors";
    row(out, rainbow.len(), rainbow_label(rainbow))?;
    let exit = "3. Exit";
    row(out, exit.len(), exit.dark_red().bold())?;

    row(out, 0, "")?;
    border(out, '╚', '╝')?;

    write!(out, "\nEnter your choice (1-3): ")?;
    out.flush()
}

/// Reads lines until one names a valid entry. End of input counts as exit.
pub fn read_choice<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<MenuChoice> {
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(MenuChoice::Exit);
        }
        if let Some(choice) = parse_choice(&line) {
            return Ok(choice);
        }
        tracing::debug!(input = line.trim(), "rejected menu input");
        write!(
            out,
            "{}",
            "Invalid choice! Please enter 1, 2, or 3: ".red().bold()
        )?;
        out.flush()?;
    }
}

pub fn show_goodbye<W: Write>(out: &mut W) -> io::Result<()> {
    clear_screen(out)?;
    writeln!(out, "{}", "Goodbye! Thanks for watching the rain!".green().bold())?;
    out.flush()
}

pub fn press_enter_to_continue<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    write!(
        out,
        "{}",
        "Press Enter to return to menu or Ctrl+C to exit...".cyan().bold()
    )?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}
