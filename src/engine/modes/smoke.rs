// Smoke plume: puffs rise from five bottom emitters and drift in from both
// sides. Each puff grows as it fades and is dropped once it leaves the
// surface or burns out.

use super::{ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const BOTTOM_EMITTERS: usize = 5;
pub const SIDE_HEIGHT: f32 = 0.6;
pub const MAX_PARTICLES: usize = 260;
pub const BOTTOM_DECAY: f32 = 0.006;
pub const SIDE_DECAY: f32 = 0.009;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokeOrigin {
    Bottom,
    Side,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmokeParticle {
    pub origin: SmokeOrigin,
    pub position: Point,
    pub velocity: Point,
    pub size: f32,
    pub life: f32,
    pub phase: f32,
    pub shade: u8,
}

impl SmokeParticle {
    fn on_canvas(&self, width: f32, height: f32) -> bool {
        let m = self.size;
        self.position.x > -m && self.position.x < width + m && self.position.y > -m && self.position.y < height + m
    }
}

/// Puffs spawned in one frame for amplitude `amp` at `quality`.
pub fn spawn_count(amp: f32, quality: f32) -> usize {
    (amp * 6.0 * quality).ceil().max(0.0) as usize
}

pub struct SmokePlume {
    particles: Vec<SmokeParticle>,
    rng: fastrand::Rng,
}

impl Default for SmokePlume {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl SmokePlume {
    pub fn particles(&self) -> &[SmokeParticle] {
        &self.particles
    }

    fn emit(&mut self, width: f32, height: f32, amp: f32) {
        let slot = self.particles.len();
        let side = self.rng.f32() < 0.3;
        let particle = if side {
            let left = self.rng.bool();
            let inward = if left { 1.0 } else { -1.0 };
            SmokeParticle {
                origin: SmokeOrigin::Side,
                position: Point::new(if left { 0.0 } else { width }, height * SIDE_HEIGHT),
                velocity: Point::new(
                    inward * range(&mut self.rng, 0.6, 1.4) * (1.0 + amp),
                    range(&mut self.rng, -0.3, 0.3),
                ),
                size: range(&mut self.rng, 4.0, 8.0),
                life: 1.0,
                phase: range(&mut self.rng, 0.0, std::f32::consts::TAU),
                shade: self.rng.u8(120..200),
            }
        } else {
            let emitter = slot % BOTTOM_EMITTERS;
            let x = width * (emitter as f32 + 0.5) / BOTTOM_EMITTERS as f32;
            SmokeParticle {
                origin: SmokeOrigin::Bottom,
                position: Point::new(x + range(&mut self.rng, -6.0, 6.0), height),
                velocity: Point::new(range(&mut self.rng, -0.2, 0.2), -range(&mut self.rng, 0.8, 1.6) * (1.0 + amp)),
                size: range(&mut self.rng, 5.0, 10.0),
                life: 1.0,
                phase: range(&mut self.rng, 0.0, std::f32::consts::TAU),
                shade: self.rng.u8(140..220),
            }
        };
        self.particles.push(particle);
    }
}

impl ModeBehavior for SmokePlume {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::SmokePlume);
        Ok(())
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        for p in &mut self.particles {
            p.phase += 0.05;
            match p.origin {
                SmokeOrigin::Bottom => {
                    p.position.x += p.velocity.x + p.phase.sin() * 0.6;
                    p.position.y += p.velocity.y;
                    p.life -= BOTTOM_DECAY;
                }
                SmokeOrigin::Side => {
                    p.position.x += p.velocity.x;
                    p.position.y += p.velocity.y + p.phase.cos() * 0.5;
                    p.life -= SIDE_DECAY;
                }
            }
            p.size = p.size * 1.01 + 0.15;
        }
        self.particles
            .retain(|p| p.life > 0.0 && p.on_canvas(frame.width, frame.height));

        let amp = frame.sample.amplitude(frame.sample.len() / 8);
        let room = MAX_PARTICLES.saturating_sub(self.particles.len());
        for _ in 0..spawn_count(amp, frame.quality).min(room) {
            self.emit(frame.width, frame.height, amp);
        }

        for p in &self.particles {
            let color = Rgb::new(p.shade, p.shade, p.shade.saturating_add(12));
            surface.fill_circle(p.position, p.size, color, p.life * 0.12)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.particles.clear();
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.25)
    }
}
