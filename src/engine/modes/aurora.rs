// Aurora curtains: four ribbons hanging from a rolling sine outline, drawn
// as translucent vertical strokes that fade toward the ground.

use std::f32::consts::TAU;

use super::{approach, ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const RIBBON_COUNT: usize = 4;
const BASE_STEP: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AuroraRibbon {
    /// Resting height as a fraction of the surface height.
    pub base: f32,
    pub hue: f32,
    pub phase: f32,
    pub speed: f32,
    pub energy: f32,
}

impl AuroraRibbon {
    /// Top edge of the curtain at `x`.
    pub fn edge_at(&self, x: f32, width: f32, height: f32) -> f32 {
        let t = x / width.max(1.0);
        let sum = (t * TAU * 1.5 + self.phase).sin() * 18.0 + (t * TAU * 3.7 - self.phase * 1.3).sin() * 8.0;
        self.base * height + sum - self.energy * 60.0
    }
}

/// Horizontal sampling step at `quality`.
pub fn sample_step(quality: f32) -> f32 {
    (BASE_STEP / quality.max(0.1)).ceil()
}

pub struct AuroraCurtains {
    ribbons: Vec<AuroraRibbon>,
    pending: bool,
    rng: fastrand::Rng,
}

impl Default for AuroraCurtains {
    fn default() -> Self {
        Self {
            ribbons: Vec::new(),
            pending: false,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl AuroraCurtains {
    pub fn ribbons(&self) -> &[AuroraRibbon] {
        &self.ribbons
    }
}

impl ModeBehavior for AuroraCurtains {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::AuroraCurtains);
        self.pending = true;
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        if !self.pending {
            return Ok(true);
        }
        let rng = &mut self.rng;
        self.ribbons = (0..RIBBON_COUNT)
            .map(|i| AuroraRibbon {
                base: 0.25 + i as f32 * 0.08,
                hue: 120.0 + i as f32 * 40.0 + range(rng, -10.0, 10.0),
                phase: range(rng, 0.0, TAU),
                speed: range(rng, 0.004, 0.012),
                energy: 0.0,
            })
            .collect();
        self.pending = false;
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let bins = frame.sample.len();
        for (i, ribbon) in self.ribbons.iter_mut().enumerate() {
            let level = frame.sample.band_average(i * bins / RIBBON_COUNT..(i + 1) * bins / RIBBON_COUNT);
            ribbon.energy = approach(ribbon.energy, level, 0.08);
            ribbon.phase += ribbon.speed * (1.0 + ribbon.energy);
        }

        let step = sample_step(frame.quality);
        for ribbon in &self.ribbons {
            let color = Rgb::from_hsl(ribbon.hue, 0.8, 0.55);
            let length = frame.height * (0.2 + ribbon.energy * 0.3);
            let mut x = 0.0;
            while x < frame.width {
                let top = ribbon.edge_at(x, frame.width, frame.height);
                let alpha = 0.08 + ribbon.energy * 0.3;
                // Two stacked strokes read as a downward fade.
                surface.stroke_line(Point::new(x, top), Point::new(x, top + length), step * 0.8, color, alpha * 0.5)?;
                surface.stroke_line(Point::new(x, top), Point::new(x, top + length * 0.4), step * 0.8, color, alpha)?;
                x += step;
            }
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.ribbons.clear();
        self.pending = false;
    }

    fn entity_count(&self) -> usize {
        self.ribbons.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.2)
    }
}
