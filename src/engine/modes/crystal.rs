// Crystal formation: eight faceted crystals on fixed orbits. Positions come
// from index and time rather than integrated velocity, so they can never
// drift off the surface.

use std::f32::consts::TAU;

use super::{approach, ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const CRYSTAL_COUNT: usize = 8;
pub const FACES: usize = 6;

#[derive(Debug, Clone, PartialEq)]
pub struct Crystal {
    pub index: usize,
    pub orbit_radius: f32,
    pub orbit_speed: f32,
    pub position: Point,
    pub energy: f32,
    pub shard_angles: [f32; FACES],
    pub pulse: f32,
    pub hue: f32,
}

/// Orbit position for crystal `index` at `time`.
pub fn orbit_position(index: usize, radius: f32, speed: f32, time: f32, center: Point) -> Point {
    let angle = index as f32 * TAU / CRYSTAL_COUNT as f32 + time * speed;
    center.polar(angle, radius)
}

pub struct CrystalFormation {
    crystals: Vec<Crystal>,
    layout: Option<(f32, f32)>,
    rng: fastrand::Rng,
}

impl Default for CrystalFormation {
    fn default() -> Self {
        Self {
            crystals: Vec::new(),
            layout: None,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl CrystalFormation {
    pub fn crystals(&self) -> &[Crystal] {
        &self.crystals
    }
}

impl ModeBehavior for CrystalFormation {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::CrystalFormation);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let min_side = width.min(height);
        let center = Point::new(width / 2.0, height / 2.0);
        for index in 0..CRYSTAL_COUNT {
            let orbit_radius = min_side * (0.18 + 0.06 * (index % 3) as f32);
            let orbit_speed = 0.004 + 0.0015 * index as f32;
            let shard_angles =
                std::array::from_fn(|k| k as f32 * TAU / FACES as f32 + range(&mut self.rng, -0.3, 0.3));
            self.crystals.push(Crystal {
                index,
                orbit_radius,
                orbit_speed,
                position: orbit_position(index, orbit_radius, orbit_speed, 0.0, center),
                energy: 0.0,
                shard_angles,
                pulse: range(&mut self.rng, 0.0, TAU),
                hue: index as f32 * 45.0,
            });
        }
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);
        let base = frame.width.min(frame.height) * 0.06;
        let bins = frame.sample.len();

        for crystal in &mut self.crystals {
            crystal.position = orbit_position(
                crystal.index,
                crystal.orbit_radius,
                crystal.orbit_speed,
                frame.time,
                center,
            );
            let amp = frame.sample.amplitude(crystal.index * bins / CRYSTAL_COUNT);
            crystal.energy = approach(crystal.energy, amp, 0.1);
        }

        // Lattice lines between orbit neighbors.
        for (i, crystal) in self.crystals.iter().enumerate() {
            let next = &self.crystals[(i + 1) % self.crystals.len()];
            let alpha = (crystal.energy + next.energy) * 0.15;
            surface.stroke_line(crystal.position, next.position, 1.0, Rgb::from_hsl(crystal.hue, 0.6, 0.6), alpha)?;
        }

        for crystal in &self.crystals {
            let color = Rgb::from_hsl(crystal.hue + crystal.energy * 30.0, 0.85, 0.55 + crystal.energy * 0.2);
            surface.glow(crystal.position, base * 2.0 * (0.5 + crystal.energy), color, 0.25 + crystal.energy * 0.4)?;

            let pulse = 1.0 + 0.15 * (crystal.pulse + frame.time * 0.05).sin();
            let length = base * (1.0 + crystal.energy) * pulse;
            for &angle in &crystal.shard_angles {
                let tip = crystal.position.polar(angle, length);
                let left = crystal.position.polar(angle - 0.35, length * 0.35);
                let right = crystal.position.polar(angle + 0.35, length * 0.35);
                surface.fill_polygon(&[crystal.position, left, tip, right], color, 0.35 + crystal.energy * 0.5)?;
                surface.stroke_line(crystal.position, tip, 1.0, Rgb::WHITE, 0.2 + crystal.energy * 0.4)?;
            }
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.crystals.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.crystals.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.3)
    }
}
