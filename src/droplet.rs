// Copyright (c) 2026 rezky_nightky

use rand::Rng;

use crate::cell::Intensity;

pub const MIN_SPEED: i32 = 1;
pub const MAX_SPEED: i32 = 3;

/// Visible trail length for a terminal of the given height.
pub fn trail_length_for(height: u16) -> u16 {
    match height {
        0..=24 => 12,
        25..=40 => 18,
        41..=60 => 25,
        _ => 30,
    }
}

/// One falling column. `head` goes negative while the droplet waits above
/// the top row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Droplet {
    pub head: i32,
    pub speed: i32,
}

fn random_speed<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(MIN_SPEED..=MAX_SPEED)
}

/// Uniform in `[-span, 0)`; a zero span still yields -1.
fn random_offscreen<R: Rng + ?Sized>(rng: &mut R, span: i32) -> i32 {
    -rng.random_range(1..=span.max(1))
}

impl Droplet {
    /// Start position used at startup and after every resize.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, height: u16) -> Self {
        Self {
            head: random_offscreen(rng, height as i32),
            speed: random_speed(rng),
        }
    }

    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, height: u16, trail_len: u16) {
        self.head += self.speed;
        if self.head > height as i32 + trail_len as i32 {
            self.respawn(rng, height);
        }
    }

    fn respawn<R: Rng + ?Sized>(&mut self, rng: &mut R, height: u16) {
        self.head = random_offscreen(rng, (height / 2) as i32);
        self.speed = random_speed(rng);
    }
}

/// Which part of the trail a row falls in, counted from the head.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Band {
    Head,
    Near,
    Middle,
    Fading,
    Faint,
}

impl Band {
    pub fn at(offset: u16, trail_len: u16) -> Option<Band> {
        let l = trail_len as u32;
        let i = offset as u32;
        if i >= l {
            return None;
        }
        Some(if i == 0 {
            Band::Head
        } else if i < l / 4 {
            Band::Near
        } else if i < l / 2 {
            Band::Middle
        } else if i < (l * 3) / 4 {
            Band::Fading
        } else {
            Band::Faint
        })
    }

    /// Denominator of the bold chance, `None` when never bold.
    pub fn bold_one_in(self) -> Option<u32> {
        match self {
            Band::Head => Some(3),
            Band::Near => Some(5),
            Band::Middle => Some(8),
            Band::Fading | Band::Faint => None,
        }
    }
}

/// Intensity and boldness for the cell `offset` rows behind the head.
/// Offsets past the trail are invisible.
pub fn trail_intensity_at<R: Rng + ?Sized>(
    rng: &mut R,
    offset: u16,
    trail_len: u16,
) -> (Intensity, bool) {
    let Some(band) = Band::at(offset, trail_len) else {
        return (Intensity::Invisible, false);
    };

    let intensity = match band {
        Band::Head => Intensity::Head,
        Band::Near => Intensity::Bright,
        Band::Middle => Intensity::Normal,
        Band::Fading => Intensity::Dim,
        Band::Faint => {
            if rng.random_bool(0.5) {
                Intensity::Dim
            } else {
                Intensity::Invisible
            }
        }
    };
    let bold = band
        .bold_one_in()
        .is_some_and(|n| rng.random_ratio(1, n));

    (intensity, bold)
}

/// One in twenty cells drop a level each tick.
pub fn flicker<R: Rng + ?Sized>(rng: &mut R, intensity: Intensity) -> Intensity {
    if rng.random_ratio(1, 20) {
        intensity.dimmer()
    } else {
        intensity
    }
}
