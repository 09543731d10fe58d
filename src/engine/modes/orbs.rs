// Energy orbs: a bass-driven core that sheds short-lived particles. A bass
// level above the threshold spawns a small burst each frame, bounded by the
// concurrent cap; particles coast with drag and fade out.

use std::f32::consts::TAU;

use super::{ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const MAX_ORBS: usize = 30;
pub const BASS_THRESHOLD: f32 = 0.7;
pub const BURST: usize = 2;
pub const DRAG: f32 = 0.98;
pub const LIFE_DECAY: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbParticle {
    pub position: Point,
    pub velocity: Point,
    pub life: f32,
    pub size: f32,
    pub hue: f32,
}

pub struct EnergyOrbs {
    particles: Vec<OrbParticle>,
    spawned_total: u64,
    rng: fastrand::Rng,
}

impl Default for EnergyOrbs {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            spawned_total: 0,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl EnergyOrbs {
    pub fn particles(&self) -> &[OrbParticle] {
        &self.particles
    }

    /// Particles spawned since the last reset.
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    fn spawn(&mut self, center: Point, bass: f32) {
        let room = MAX_ORBS.saturating_sub(self.particles.len());
        for _ in 0..BURST.min(room) {
            let angle = range(&mut self.rng, 0.0, TAU);
            let speed = 2.0 + bass * 4.0;
            self.particles.push(OrbParticle {
                position: center,
                velocity: Point::new(angle.cos() * speed, angle.sin() * speed),
                life: 1.0,
                size: range(&mut self.rng, 3.0, 8.0),
                hue: range(&mut self.rng, 260.0, 340.0),
            });
            self.spawned_total += 1;
        }
    }
}

impl ModeBehavior for EnergyOrbs {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::EnergyOrbs);
        Ok(())
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);
        let bass = frame.sample.bass();

        for p in &mut self.particles {
            p.velocity.x *= DRAG;
            p.velocity.y *= DRAG;
            p.position.x += p.velocity.x;
            p.position.y += p.velocity.y;
            p.life -= LIFE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);

        if bass > BASS_THRESHOLD {
            self.spawn(center, bass);
        }

        let core = bass * frame.width.min(frame.height) * 0.15;
        if core >= 0.5 {
            surface.glow(center, core * 2.0, Rgb::new(170, 90, 255), bass * 0.6)?;
            surface.fill_circle(center, core, Rgb::from_hsl(280.0, 0.8, 0.55 + bass * 0.2), 0.8)?;
        }

        for p in &self.particles {
            let color = Rgb::from_hsl(p.hue, 0.85, 0.6);
            if frame.quality >= 0.5 {
                surface.glow(p.position, p.size * 3.0 * p.life, color, p.life * 0.5)?;
            }
            surface.fill_circle(p.position, p.size * p.life, color, p.life)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.particles.clear();
        self.spawned_total = 0;
    }

    fn entity_count(&self) -> usize {
        self.particles.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.2)
    }
}
