// Copyright (c) 2026 rezky_nightky

use std::io::Write;

use crate::frame::Frame;
use crate::runtime::ColorMode;
use crate::terminal::Canvas;

/// Paints `frame` from the top-left corner, one full row at a time.
///
/// The bottom row is never written so a full-height frame cannot push the
/// terminal into scrolling. Output is flushed once, at the end.
pub fn render_frame<W: Write>(canvas: &mut Canvas<W>, frame: &Frame, mode: ColorMode) {
    canvas.move_to_origin();
    for y in 0..frame.height.saturating_sub(1) {
        for cell in frame.row(y) {
            if cell.intensity.is_visible() {
                canvas.paint_glyph(cell, mode);
            } else {
                canvas.blank();
            }
        }
        canvas.newline();
    }
    canvas.flush();
}
