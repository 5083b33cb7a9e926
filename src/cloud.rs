// Copyright (c) 2026 rezky_nightky

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    cell::Cell,
    charset::random_glyph,
    droplet::{flicker, trail_intensity_at, trail_length_for, Droplet},
    error::InitError,
    frame::Frame,
    palette::HUE_COUNT,
    renderer::render_frame,
    runtime::{ColorMode, RainConfig, RunSummary},
    session::{self, Session},
    terminal::Canvas,
};

fn spawn_droplets(rng: &mut StdRng, width: u16, height: u16) -> Result<Vec<Droplet>, InitError> {
    let mut droplets = Vec::new();
    droplets
        .try_reserve_exact(width as usize)
        .map_err(|_| InitError::BufferAllocation { width, height })?;
    droplets.extend((0..width).map(|_| Droplet::spawn(rng, height)));
    Ok(droplets)
}

/// The rain engine: one droplet per column, a frame rebuilt every tick and
/// the canvas it is painted on.
pub struct Cloud<W: Write> {
    config: RainConfig,
    canvas: Canvas<W>,

    width: u16,
    height: u16,
    trail_len: u16,

    frame: Frame,
    droplets: Vec<Droplet>,

    mt: StdRng,
    session: Arc<Session>,
    resizes: u32,
}

impl<W: Write> Cloud<W> {
    pub fn new(config: RainConfig, mut canvas: Canvas<W>) -> Result<Self, InitError> {
        let mut mt = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let (width, height) = canvas.query_dimensions();
        let frame = Frame::new(width, height)?;
        let droplets = spawn_droplets(&mut mt, width, height)?;
        let session = Session::new(config.mode);
        session::register(&session);

        let cloud = Self {
            trail_len: trail_length_for(height),
            config,
            canvas,
            width,
            height,
            frame,
            droplets,
            mt,
            session,
            resizes: 0,
        };
        cloud.log_geometry("initialized");
        Ok(cloud)
    }
}

#[allow(dead_code)]
impl<W: Write> Cloud<W> {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn trail_length(&self) -> u16 {
        self.trail_len
    }

    pub fn droplets(&self) -> &[Droplet] {
        &self.droplets
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn canvas(&self) -> &Canvas<W> {
        &self.canvas
    }

    pub fn resizes(&self) -> u32 {
        self.resizes
    }
}

impl<W: Write> Cloud<W> {
    fn log_geometry(&self, what: &str) {
        tracing::info!(
            width = self.width,
            height = self.height,
            trail_length = self.trail_len,
            mode = self.config.mode.label(),
            "{}",
            what
        );
    }

    /// Rebuilds all size-dependent state. On failure the previous state is
    /// left untouched.
    fn reinitialize(&mut self, width: u16, height: u16) -> Result<(), InitError> {
        let frame = Frame::new(width, height)?;
        let droplets = spawn_droplets(&mut self.mt, width, height)?;
        self.width = width;
        self.height = height;
        self.trail_len = trail_length_for(height);
        self.frame = frame;
        self.droplets = droplets;
        Ok(())
    }

    /// Re-queries the terminal; on any change reinitializes everything and
    /// clears the screen. Returns whether a resize happened.
    pub fn check_and_resync(&mut self) -> Result<bool, InitError> {
        let (width, height) = self.canvas.query_dimensions();
        tracing::debug!(width, height, "checked terminal size");
        if width == self.width && height == self.height {
            return Ok(false);
        }

        self.reinitialize(width, height)?;
        self.canvas.clear();
        self.resizes = self.resizes.saturating_add(1);
        self.log_geometry("resized");
        Ok(true)
    }

    /// Advances the simulation one tick, rebuilding the frame from blank.
    pub fn rain(&mut self) {
        self.frame.clear();
        let multi = self.config.mode == ColorMode::MultiHue;
        let height = self.height as i32;

        for (x, droplet) in self.droplets.iter_mut().enumerate() {
            for i in 0..self.trail_len {
                let row = droplet.head - i as i32;
                if !(0..height).contains(&row) {
                    continue;
                }
                let (intensity, bold) = trail_intensity_at(&mut self.mt, i, self.trail_len);
                let ch = random_glyph(&mut self.mt);
                let color_index = if multi {
                    self.mt.random_range(0..HUE_COUNT)
                } else {
                    0
                };
                let intensity = flicker(&mut self.mt, intensity);
                self.frame.paint_trail_segment(
                    x as u16,
                    row,
                    Cell {
                        ch,
                        intensity,
                        bold,
                        color_index,
                    },
                );
            }
            droplet.advance(&mut self.mt, self.height, self.trail_len);
        }
    }

    pub fn draw(&mut self) {
        render_frame(&mut self.canvas, &self.frame, self.config.mode);
    }

    /// One animation step: optional size check, simulate, paint.
    pub fn tick(&mut self, n: u32) -> Result<(), InitError> {
        if self.config.adaptive && n % self.config.resync_every.max(1) == 0 {
            self.check_and_resync()?;
        }
        self.rain();
        self.draw();
        Ok(())
    }

    fn intro(&mut self) {
        if self.config.intro.is_zero() {
            return;
        }
        let kind = if self.config.adaptive {
            "adaptive"
        } else {
            "fixed size"
        };
        self.canvas
            .print_line(&format!("Digital rain: full screen, {}", kind));
        self.canvas
            .print_line(&format!("Mode: {}", self.config.mode.label()));
        if self.config.adaptive {
            self.canvas.print_line("Resize your terminal and watch it adapt!");
        }
        self.canvas.flush();
        thread::sleep(self.config.intro);
    }

    fn finish(&mut self) {
        self.canvas.show_cursor();
        self.canvas.reset_attributes();
        self.canvas.clear();
    }

    /// Runs the fixed-length animation and leaves the screen clean.
    pub fn run(&mut self) -> Result<RunSummary, InitError> {
        self.canvas.prepare()?;
        self.intro();

        let deadline = self.config.duration.map(|d| Instant::now() + d);
        let mut frames = 0u32;
        for n in 0..self.config.frames {
            if deadline.is_some_and(|end| Instant::now() >= end) {
                break;
            }
            self.tick(n)?;
            frames += 1;
            thread::sleep(self.config.interval);
        }

        self.finish();
        let summary = RunSummary {
            frames,
            width: self.width,
            height: self.height,
            resizes: self.resizes,
        };
        tracing::info!(
            frames = summary.frames,
            width = summary.width,
            height = summary.height,
            resizes = summary.resizes,
            "rain finished"
        );
        Ok(summary)
    }
}

impl<W: Write> Drop for Cloud<W> {
    fn drop(&mut self) {
        session::unregister(&self.session);
        self.canvas.reset_attributes();
        self.canvas.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::cell::Intensity;
    use crate::charset::is_glyph;
    use crate::terminal::testing::{canvas, output, ScriptedSize};

    fn config(mode: ColorMode) -> RainConfig {
        RainConfig {
            interval: Duration::ZERO,
            intro: Duration::ZERO,
            seed: Some(0x1234567),
            ..RainConfig::new(mode)
        }
    }

    fn make_cloud(mode: ColorMode, sizes: ScriptedSize) -> Cloud<Vec<u8>> {
        Cloud::new(config(mode), canvas(sizes)).unwrap()
    }

    fn visible_cells(cloud: &Cloud<Vec<u8>>) -> Vec<Cell> {
        cloud
            .frame()
            .cells()
            .iter()
            .copied()
            .filter(|c| c.intensity.is_visible())
            .collect()
    }

    #[test]
    fn standard_terminal_geometry() {
        let cloud = make_cloud(ColorMode::SingleHue, ScriptedSize::fixed(80, 24));
        assert_eq!(cloud.trail_length(), 12);
        assert_eq!(cloud.droplets().len(), 80);
        assert!(cloud.droplets().iter().all(|d| (-24..0).contains(&d.head)));
        assert!(cloud.droplets().iter().all(|d| (1..=3).contains(&d.speed)));
        assert_eq!((cloud.frame().width, cloud.frame().height), (80, 24));
    }

    #[test]
    fn failed_size_query_uses_fallback() {
        let sizes = ScriptedSize::new(vec![Err(std::io::Error::other("not a tty"))]);
        let cloud = make_cloud(ColorMode::SingleHue, sizes);
        assert_eq!((cloud.width(), cloud.height()), (80, 24));
    }

    #[test]
    fn cells_stay_in_known_states_over_many_ticks() {
        let mut cloud = make_cloud(ColorMode::MultiHue, ScriptedSize::fixed(40, 20));
        let mut painted = 0;
        for _ in 0..300 {
            cloud.rain();
            for c in cloud.frame().cells() {
                assert!(Intensity::ALL.contains(&c.intensity));
                if *c != Cell::BLANK {
                    assert!(is_glyph(c.ch), "glyph {:?}", c.ch);
                    painted += 1;
                }
            }
        }
        assert!(painted > 0);
    }

    #[test]
    fn multi_hue_cells_carry_palette_index() {
        let mut cloud = make_cloud(ColorMode::MultiHue, ScriptedSize::fixed(60, 20));
        let mut seen = [false; HUE_COUNT as usize];
        for _ in 0..100 {
            cloud.rain();
            for c in visible_cells(&cloud) {
                assert!(c.color_index < HUE_COUNT);
                seen[c.color_index as usize] = true;
            }
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn single_hue_cells_leave_palette_index_at_zero() {
        let mut cloud = make_cloud(ColorMode::SingleHue, ScriptedSize::fixed(60, 20));
        for _ in 0..100 {
            cloud.rain();
            assert!(visible_cells(&cloud).iter().all(|c| c.color_index == 0));
        }
    }

    #[test]
    fn trail_hangs_above_the_head() {
        let mut cloud = make_cloud(ColorMode::SingleHue, ScriptedSize::fixed(10, 24));
        cloud.droplets = vec![Droplet { head: 5, speed: 1 }; 10];
        cloud.rain();
        for x in 0..10 {
            let head = cloud.frame().get(x, 5).unwrap();
            assert!(matches!(head.intensity, Intensity::Head | Intensity::Bright));
            for y in 6..24 {
                assert_eq!(*cloud.frame().get(x, y).unwrap(), Cell::BLANK);
            }
        }
        assert!(cloud.droplets().iter().all(|d| d.head == 6));
    }

    #[test]
    fn trail_below_screen_is_clipped() {
        let mut cloud = make_cloud(ColorMode::SingleHue, ScriptedSize::fixed(4, 24));
        cloud.droplets = vec![Droplet { head: 24 + 5, speed: 1 }; 4];
        cloud.rain();
        for x in 0..4 {
            for y in 0..18 {
                assert_eq!(*cloud.frame().get(x, y).unwrap(), Cell::BLANK);
            }
        }
    }

    #[test]
    fn resync_reinitializes_to_new_size() {
        let sizes = ScriptedSize::new(vec![Ok((80, 24)), Ok((100, 50))]);
        let mut cloud = make_cloud(ColorMode::SingleHue, sizes);
        assert!(cloud.check_and_resync().unwrap());
        assert_eq!((cloud.width(), cloud.height()), (100, 50));
        assert_eq!((cloud.frame().width, cloud.frame().height), (100, 50));
        assert_eq!(cloud.frame().cells().len(), 100 * 50);
        assert_eq!(cloud.droplets().len(), 100);
        assert_eq!(cloud.trail_length(), trail_length_for(50));
        assert!(cloud.droplets().iter().all(|d| (-50..0).contains(&d.head)));
        assert!(output(cloud.canvas()).contains("\x1b[2J"));
        assert_eq!(cloud.resizes(), 1);

        assert!(!cloud.check_and_resync().unwrap());
        assert_eq!(cloud.resizes(), 1);
    }

    #[test]
    fn unchanged_size_does_not_touch_the_screen() {
        let mut cloud = make_cloud(ColorMode::MultiHue, ScriptedSize::fixed(30, 12));
        cloud.droplets = vec![Droplet { head: 3, speed: 2 }; 30];
        assert!(!cloud.check_and_resync().unwrap());
        assert!(cloud.canvas().get_ref().is_empty());
        assert!(cloud.droplets().iter().all(|d| d.head == 3));
    }

    #[test]
    fn size_is_checked_every_resync_period() {
        let sizes = ScriptedSize::new(vec![Ok((20, 10)), Ok((20, 10)), Ok((30, 12)), Ok((40, 30))]);
        let mut cloud = make_cloud(ColorMode::SingleHue, sizes);
        cloud.tick(0).unwrap();
        assert_eq!(cloud.width(), 20);
        for n in 1..50 {
            cloud.tick(n).unwrap();
        }
        assert_eq!(cloud.width(), 20);
        cloud.tick(50).unwrap();
        assert_eq!((cloud.width(), cloud.height()), (30, 12));
        assert_eq!(cloud.resizes(), 1);
    }

    #[test]
    fn fixed_mode_never_resyncs() {
        let sizes = ScriptedSize::new(vec![Ok((20, 10)), Ok((90, 40))]);
        let cfg = RainConfig {
            adaptive: false,
            ..config(ColorMode::SingleHue)
        };
        let mut cloud = Cloud::new(cfg, canvas(sizes)).unwrap();
        for n in 0..120 {
            cloud.tick(n).unwrap();
        }
        assert_eq!((cloud.width(), cloud.height()), (20, 10));
    }

    #[test]
    fn run_draws_requested_frames_and_restores_cursor() {
        let cfg = RainConfig {
            frames: 3,
            ..config(ColorMode::MultiHue)
        };
        let mut cloud = Cloud::new(cfg, canvas(ScriptedSize::fixed(8, 4))).unwrap();
        let summary = cloud.run().unwrap();
        assert_eq!(
            summary,
            RunSummary {
                frames: 3,
                width: 8,
                height: 4,
                resizes: 0
            }
        );
        let out = output(cloud.canvas());
        let hide = out.find("\x1b[?25l").unwrap();
        let show = out.rfind("\x1b[?25h").unwrap();
        assert!(hide < show);
        assert!(out.matches("\x1b[1;1H").count() >= 3);
    }

    #[test]
    fn elapsed_duration_stops_the_run() {
        let cfg = RainConfig {
            duration: Some(Duration::ZERO),
            ..config(ColorMode::SingleHue)
        };
        let mut cloud = Cloud::new(cfg, canvas(ScriptedSize::fixed(8, 4))).unwrap();
        assert_eq!(cloud.run().unwrap().frames, 0);
    }

    #[test]
    fn dropping_the_engine_releases_the_session() {
        let cloud = make_cloud(ColorMode::SingleHue, ScriptedSize::fixed(8, 4));
        let s = cloud.session.clone();
        drop(cloud);
        assert!(!session::is_active(&s));
    }
}
