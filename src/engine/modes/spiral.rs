// Spiral galaxy: stars on three arms, positioned purely from their polar
// parameters and the frame time. Each star reads the bin for its distance
// from the core, so the rim and the core react to different bands.

use std::f32::consts::TAU;

use super::{ensure_area, mode_rng, range, scaled_count, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const STAR_COUNT: usize = 600;
pub const ARMS: usize = 3;
/// Extra rotation per unit of distance, which winds the arms.
const ARM_TWIST: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SpiralStar {
    pub base_angle: f32,
    /// Normalized distance from the core, 0..1.
    pub distance: f32,
    /// Radial scatter in pixels.
    pub spread: f32,
    pub speed: f32,
    pub size: f32,
}

/// Where `star` sits at `time`.
pub fn star_position(star: &SpiralStar, time: f32, center: Point, max_radius: f32) -> Point {
    let angle = star.base_angle
        + time * star.speed * (1.0 - 0.5 * star.distance)
        + star.distance * ARM_TWIST;
    let radius = star.distance * max_radius + star.spread;
    center.polar(angle, radius)
}

/// Frequency bin read by a star at normalized `distance`.
pub fn band_for_distance(distance: f32, bins: usize) -> usize {
    ((distance.clamp(0.0, 1.0) * 0.75 * bins as f32) as usize).min(bins.saturating_sub(1))
}

pub struct SpiralGalaxy {
    stars: Vec<SpiralStar>,
    pending: bool,
    rng: fastrand::Rng,
}

impl Default for SpiralGalaxy {
    fn default() -> Self {
        Self {
            stars: Vec::new(),
            pending: false,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl SpiralGalaxy {
    pub fn stars(&self) -> &[SpiralStar] {
        &self.stars
    }
}

impl ModeBehavior for SpiralGalaxy {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::SpiralGalaxy);
        self.pending = true;
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        if !self.pending {
            return Ok(true);
        }
        let rng = &mut self.rng;
        self.stars = (0..STAR_COUNT)
            .map(|i| {
                let distance = rng.f32().powf(0.7);
                SpiralStar {
                    base_angle: (i % ARMS) as f32 * TAU / ARMS as f32 + range(rng, -0.25, 0.25),
                    distance,
                    spread: range(rng, -10.0, 10.0) * distance,
                    speed: range(rng, 0.002, 0.006),
                    size: range(rng, 0.6, 2.0),
                }
            })
            .collect();
        self.pending = false;
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);
        let max_radius = frame.width.min(frame.height) * 0.48;
        let bass = frame.sample.bass();
        let bins = frame.sample.len();

        surface.glow(
            center,
            max_radius * 0.25 * (0.5 + bass),
            Rgb::new(255, 214, 170),
            0.3 + bass * 0.5,
        )?;

        let visible = scaled_count(self.stars.len(), frame.quality);
        for star in self.stars.iter().take(visible) {
            let pos = star_position(star, frame.time, center, max_radius);
            let amp = frame.sample.amplitude(band_for_distance(star.distance, bins));
            let color = Rgb::from_hsl(200.0 + star.distance * 120.0 + amp * 40.0, 0.8, 0.5 + amp * 0.3);
            surface.fill_circle(pos, star.size * (1.0 + amp * 2.0), color, 0.4 + amp * 0.6)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.stars.clear();
        self.pending = false;
    }

    fn entity_count(&self) -> usize {
        self.stars.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.25)
    }
}
