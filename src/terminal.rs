// Copyright (c) 2026 rezky_nightky

use std::io::{self, stdout, Stdout, Write};

use crossterm::{
    cursor,
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, Command, ExecutableCommand, QueueableCommand,
};

use crate::cell::Cell;
use crate::palette::{glyph_style, Weight};
use crate::runtime::ColorMode;

pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

/// Source of the live terminal size in character cells.
pub trait SizeProbe {
    fn probe(&mut self) -> io::Result<(u16, u16)>;
}

pub struct TerminalSize;

impl SizeProbe for TerminalSize {
    fn probe(&mut self) -> io::Result<(u16, u16)> {
        terminal::size()
    }
}

const FRAME_BUFFER_BYTES: usize = 64 * 1024;

/// Raw drawing surface. Paint primitives only append to a staging buffer;
/// `flush` hands the whole buffer to the sink in one `write_all`, so a frame
/// never reaches the terminal in pieces. Write failures are not reported to
/// the caller of a primitive; the first one is kept for `take_error`.
pub struct Canvas<W: Write> {
    out: W,
    pending: Vec<u8>,
    error: Option<io::Error>,
    probe: Box<dyn SizeProbe>,
}

impl Canvas<Stdout> {
    pub fn stdout() -> Self {
        Self::new(stdout(), Box::new(TerminalSize))
    }
}

impl<W: Write> Canvas<W> {
    pub fn new(out: W, probe: Box<dyn SizeProbe>) -> Self {
        Self {
            out,
            pending: Vec::with_capacity(FRAME_BUFFER_BYTES),
            error: None,
            probe,
        }
    }

    #[allow(dead_code)]
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Current size, or 80x24 when the query fails or reports an empty
    /// terminal.
    pub fn query_dimensions(&mut self) -> (u16, u16) {
        match self.probe.probe() {
            Ok((w, h)) if w > 0 && h > 0 => (w, h),
            Ok((w, h)) => {
                tracing::warn!(width = w, height = h, "terminal reported empty size, using fallback");
                FALLBACK_SIZE
            }
            Err(e) => {
                tracing::warn!(error = %e, "terminal size query failed, using fallback");
                FALLBACK_SIZE
            }
        }
    }

    fn emit(&mut self, cmd: impl Command) {
        let _ = self.pending.queue(cmd);
    }

    fn try_flush(&mut self) -> io::Result<()> {
        let res = self.out.write_all(&self.pending);
        self.pending.clear();
        res?;
        self.out.flush()
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.try_flush() {
            self.error.get_or_insert(e);
        }
    }

    /// First write failure since the last call, if any.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    pub fn clear(&mut self) {
        self.emit(terminal::Clear(terminal::ClearType::All));
        self.emit(cursor::MoveTo(0, 0));
        self.flush();
    }

    pub fn hide_cursor(&mut self) {
        self.emit(cursor::Hide);
        self.flush();
    }

    pub fn show_cursor(&mut self) {
        self.emit(cursor::Show);
        self.flush();
    }

    pub fn move_to_origin(&mut self) {
        self.emit(cursor::MoveTo(0, 0));
    }

    pub fn reset_attributes(&mut self) {
        self.emit(SetAttribute(Attribute::Reset));
        self.emit(ResetColor);
    }

    /// Draws one cell with its mapped color and weight, then resets.
    pub fn paint_glyph(&mut self, cell: &Cell, mode: ColorMode) {
        let style = glyph_style(mode, cell.intensity, cell.bold, cell.color_index);
        match style.weight {
            Weight::Faint => self.emit(SetAttribute(Attribute::Dim)),
            Weight::Bold => self.emit(SetAttribute(Attribute::Bold)),
            Weight::Normal => {}
        }
        self.emit(SetForegroundColor(style.fg));
        self.emit(Print(cell.ch));
        self.emit(SetAttribute(Attribute::Reset));
    }

    pub fn blank(&mut self) {
        self.emit(Print(' '));
    }

    pub fn newline(&mut self) {
        self.emit(Print('\n'));
    }

    pub fn print_line(&mut self, text: &str) {
        self.emit(Print(text));
        self.emit(Print('\n'));
    }

    /// Clears and hides the cursor, reporting failure. Used once at startup
    /// where a dead output stream should abort the run.
    pub fn prepare(&mut self) -> io::Result<()> {
        self.error = None;
        self.clear();
        self.hide_cursor();
        self.take_error().map_or(Ok(()), Err)
    }
}

/// Puts the real terminal back into a usable state. Safe to call from a
/// signal thread or panic hook; every step ignores errors.
pub fn restore_terminal_best_effort() {
    let mut out = stdout();
    let _ = out.execute(SetAttribute(Attribute::Reset));
    let _ = out.execute(ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::Clear(terminal::ClearType::All));
    let _ = out.execute(cursor::MoveTo(0, 0));
    let _ = out.flush();
}


#[cfg(test)]
mod tests {
    use std::io;

    use std::io::{LineWriter, Write};

    use super::testing::{canvas, output, ScriptedSize};
    use super::*;
    use crate::cell::Intensity;
    use crate::frame::Frame;
    use crate::renderer::render_frame;

    /// Sink that counts how many writes reach it.
    #[derive(Default)]
    struct CountingSink {
        writes: usize,
        bytes: usize,
    }

    impl Write for CountingSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            self.bytes += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn busy_frame() -> Frame {
        let mut f = Frame::new(80, 24).unwrap();
        for y in 0..24 {
            for x in 0..80 {
                f.paint_trail_segment(
                    x,
                    y,
                    Cell {
                        ch: '#',
                        intensity: Intensity::Head,
                        bold: true,
                        color_index: (x % 7) as u8,
                    },
                );
            }
        }
        f
    }

    #[test]
    fn query_falls_back_on_error() {
        let mut c = canvas(ScriptedSize::new(vec![Err(io::Error::other("no tty"))]));
        assert_eq!(c.query_dimensions(), FALLBACK_SIZE);
    }

    #[test]
    fn query_falls_back_on_zero_size() {
        let mut c = canvas(ScriptedSize::new(vec![Ok((0, 40))]));
        assert_eq!(c.query_dimensions(), (80, 24));
    }

    #[test]
    fn query_passes_real_size_through() {
        let mut c = canvas(ScriptedSize::fixed(132, 43));
        assert_eq!(c.query_dimensions(), (132, 43));
        assert_eq!(c.query_dimensions(), (132, 43));
    }

    #[test]
    fn clear_and_cursor_emit_escape_sequences() {
        let mut c = canvas(ScriptedSize::fixed(10, 10));
        c.clear();
        c.hide_cursor();
        c.show_cursor();
        let out = output(&c);
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains("\x1b[?25l"));
        assert!(out.contains("\x1b[?25h"));
    }

    #[test]
    fn paint_glyph_wraps_char_in_style_and_reset() {
        let mut c = canvas(ScriptedSize::fixed(10, 10));
        let cell = Cell {
            ch: 'K',
            intensity: Intensity::Dim,
            bold: false,
            color_index: 0,
        };
        c.paint_glyph(&cell, ColorMode::SingleHue);
        assert!(output(&c).is_empty());
        c.flush();
        let out = output(&c);
        assert!(out.starts_with("\x1b[2m"), "{out:?}");
        assert!(out.ends_with("K\x1b[0m"), "{out:?}");
    }

    #[test]
    fn full_frame_reaches_sink_in_one_write() {
        let frame = busy_frame();
        let mut c = Canvas::new(CountingSink::default(), Box::new(ScriptedSize::fixed(80, 24)));
        render_frame(&mut c, &frame, ColorMode::MultiHue);
        assert_eq!(c.get_ref().writes, 1);
        assert!(c.get_ref().bytes > 4096);
    }

    #[test]
    fn line_buffered_sink_still_gets_one_write_per_frame() {
        let mut c = Canvas::new(
            LineWriter::new(CountingSink::default()),
            Box::new(ScriptedSize::fixed(80, 24)),
        );
        render_frame(&mut c, &Frame::new(80, 24).unwrap(), ColorMode::SingleHue);
        render_frame(&mut c, &busy_frame(), ColorMode::SingleHue);
        assert_eq!(c.get_ref().get_ref().writes, 2);
    }

    #[test]
    fn prepare_reports_a_dead_output() {
        let mut c = Canvas::new(BrokenSink, Box::new(ScriptedSize::fixed(80, 24)));
        let err = c.prepare().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(c.take_error().is_none());
    }

    #[test]
    fn prepare_clears_then_hides_cursor() {
        let mut c = canvas(ScriptedSize::fixed(10, 10));
        c.prepare().unwrap();
        assert_eq!(output(&c), "\x1b[2J\x1b[1;1H\x1b[?25l");
    }
}
