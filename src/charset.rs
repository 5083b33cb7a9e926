// Copyright (c) 2026 rezky_nightky

use rand::Rng;

/// Uppercase letters, digits and a handful of symbols. ASCII only, so every
/// glyph is exactly one column wide.
pub const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*";

pub fn random_glyph<R: Rng + ?Sized>(rng: &mut R) -> char {
    GLYPHS[rng.random_range(0..GLYPHS.len())] as char
}

#[cfg(test)]
pub fn is_glyph(ch: char) -> bool {
    ch.is_ascii() && GLYPHS.contains(&(ch as u8))
}
