// Frequency rings: 24 concentric outlines, each wobbling with its own bin.

use std::f32::consts::TAU;

use super::{approach, ensure_area, Backdrop, FrameContext, ModeBehavior, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const RING_COUNT: usize = 24;
pub const BASE_VERTICES: f32 = 64.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyRing {
    pub base_radius: f32,
    pub energy: f32,
    pub hue: f32,
    /// Lobe count of the wobble.
    pub lobes: f32,
}

/// Vertices per ring outline at `quality`.
pub fn vertex_count(quality: f32) -> usize {
    ((BASE_VERTICES * quality.clamp(0.0, 1.0)).ceil() as usize).max(3)
}

/// Bin read by ring `index` out of `bins`.
pub fn ring_bin(index: usize, bins: usize) -> usize {
    index * bins / RING_COUNT
}

#[derive(Default)]
pub struct FrequencyRings {
    rings: Vec<FrequencyRing>,
    layout: Option<(f32, f32)>,
    outline: Vec<Point>,
}

impl FrequencyRings {
    pub fn rings(&self) -> &[FrequencyRing] {
        &self.rings
    }
}

impl ModeBehavior for FrequencyRings {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let max_radius = width.min(height) * 0.46;
        self.rings = (0..RING_COUNT)
            .map(|i| FrequencyRing {
                base_radius: max_radius * (i + 1) as f32 / RING_COUNT as f32,
                energy: 0.0,
                hue: i as f32 * 360.0 / RING_COUNT as f32,
                lobes: (3 + i % 5) as f32,
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);
        let bins = frame.sample.len();
        let vertices = vertex_count(frame.quality);
        let spacing = frame.width.min(frame.height) * 0.46 / RING_COUNT as f32;

        for (i, ring) in self.rings.iter_mut().enumerate() {
            let amp = frame.sample.amplitude(ring_bin(i, bins));
            ring.energy = approach(ring.energy, amp, 0.2);
            if ring.energy < 0.01 {
                continue;
            }

            self.outline.clear();
            let wobble = ring.energy * amp * spacing * 2.0;
            for k in 0..vertices {
                let theta = k as f32 * TAU / vertices as f32;
                let r = ring.base_radius + wobble * (ring.lobes * theta + frame.time * 0.03).sin();
                self.outline.push(center.polar(theta, r.max(0.0)));
            }
            self.outline.push(self.outline[0]);

            let color = Rgb::from_hsl(ring.hue + frame.time * 0.5, 0.8, 0.45 + ring.energy * 0.3);
            surface.stroke_polyline(&self.outline, 1.0 + ring.energy * 2.0, color, 0.3 + ring.energy * 0.7)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.rings.clear();
        self.outline.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.rings.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.35)
    }
}
