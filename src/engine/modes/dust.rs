// Cosmic dust: particles fly toward the viewer through a simple pinhole
// projection and respawn far away once they pass the camera plane.

use super::{approach, ensure_area, mode_rng, range, scaled_count, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const PARTICLE_COUNT: usize = 500;
pub const FAR_DEPTH: f32 = 1000.0;
pub const NEAR_DEPTH: f32 = 1.0;
pub const FOCAL_LENGTH: f32 = 300.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DustParticle {
    /// Offset from the center in world units.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub hue: f32,
}

/// Screen position of `p` around `center`.
pub fn project(p: &DustParticle, center: Point) -> Point {
    let scale = FOCAL_LENGTH / p.z.max(NEAR_DEPTH);
    Point::new(center.x + p.x * scale, center.y + p.y * scale)
}

/// Depth travelled in one frame at `energy`.
pub fn approach_speed(energy: f32) -> f32 {
    4.0 * (1.0 + 4.0 * energy)
}

pub struct CosmicDust {
    particles: Vec<DustParticle>,
    energy: f32,
    spread: f32,
    pending: bool,
    rng: fastrand::Rng,
}

impl Default for CosmicDust {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            energy: 0.0,
            spread: 0.0,
            pending: false,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl CosmicDust {
    pub fn particles(&self) -> &[DustParticle] {
        &self.particles
    }

    fn scatter(rng: &mut fastrand::Rng, spread: f32, z: f32) -> DustParticle {
        DustParticle {
            x: range(rng, -spread, spread),
            y: range(rng, -spread, spread),
            z,
            hue: range(rng, 180.0, 320.0),
        }
    }
}

impl ModeBehavior for CosmicDust {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::CosmicDust);
        self.spread = ctx.width.max(ctx.height) * 2.0;
        self.pending = true;
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        if !self.pending {
            return Ok(true);
        }
        let rng = &mut self.rng;
        let spread = self.spread;
        self.particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let z = FAR_DEPTH - rng.f32() * (FAR_DEPTH - NEAR_DEPTH);
                Self::scatter(rng, spread, z)
            })
            .collect();
        self.pending = false;
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let level = frame.sample.band_average(0..frame.sample.len() / 2);
        self.energy = approach(self.energy, level, 0.1);
        let speed = approach_speed(self.energy);
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);

        for p in &mut self.particles {
            p.z -= speed;
            if p.z <= NEAR_DEPTH {
                *p = Self::scatter(&mut self.rng, self.spread, FAR_DEPTH);
            }
        }

        let visible = scaled_count(self.particles.len(), frame.quality);
        for p in self.particles.iter().take(visible) {
            let at = project(p, center);
            if at.x < 0.0 || at.y < 0.0 || at.x >= frame.width || at.y >= frame.height {
                continue;
            }
            let nearness = 1.0 - p.z / FAR_DEPTH;
            let color = Rgb::from_hsl(p.hue, 0.6, 0.5 + nearness * 0.4);
            surface.fill_circle(at, 0.4 + nearness * 2.2, color, 0.2 + nearness * 0.8)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.particles.clear();
        self.energy = 0.0;
        self.pending = false;
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.35)
    }
}
