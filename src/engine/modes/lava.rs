// Lava lamp: eight blobs heated by their bins. Hot blobs rise, cool ones
// sink, and neighbors push apart when overlapping and drift together when
// close.

use super::{approach, ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const BLOB_COUNT: usize = 8;
pub const HEAT_SMOOTHING: f32 = 0.08;
pub const BUOYANCY: f32 = 0.08;
pub const REPULSION: f32 = 0.02;
pub const ATTRACTION: f32 = 0.0005;
pub const DAMPING: f32 = 0.98;

#[derive(Debug, Clone, PartialEq)]
pub struct LavaBlob {
    pub position: Point,
    pub velocity: Point,
    pub radius: f32,
    pub heat: f32,
}

/// Velocity change on `a` from its interaction with `b`.
pub fn interaction(a: &LavaBlob, b: &LavaBlob) -> Point {
    let dx = b.position.x - a.position.x;
    let dy = b.position.y - a.position.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < f32::EPSILON {
        return Point::new(0.0, 0.0);
    }
    let combined = a.radius + b.radius;
    let (nx, ny) = (dx / dist, dy / dist);
    if dist < combined {
        let push = (combined - dist) * REPULSION;
        Point::new(-nx * push, -ny * push)
    } else if dist < combined * 2.0 {
        Point::new(nx * ATTRACTION * dist, ny * ATTRACTION * dist)
    } else {
        Point::new(0.0, 0.0)
    }
}

pub struct LavaLamp {
    blobs: Vec<LavaBlob>,
    layout: Option<(f32, f32)>,
    rng: fastrand::Rng,
}

impl Default for LavaLamp {
    fn default() -> Self {
        Self {
            blobs: Vec::new(),
            layout: None,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl LavaLamp {
    pub fn blobs(&self) -> &[LavaBlob] {
        &self.blobs
    }
}

impl ModeBehavior for LavaLamp {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::LavaLamp);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let base = width.min(height);
        let rng = &mut self.rng;
        self.blobs = (0..BLOB_COUNT)
            .map(|_| {
                let radius = base * range(rng, 0.06, 0.12);
                LavaBlob {
                    position: Point::new(range(rng, radius, width - radius), range(rng, radius, height - radius)),
                    velocity: Point::new(range(rng, -0.3, 0.3), range(rng, -0.3, 0.3)),
                    radius,
                    heat: 0.5,
                }
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let bins = frame.sample.len();
        for (i, blob) in self.blobs.iter_mut().enumerate() {
            let amp = frame.sample.amplitude(i * bins / BLOB_COUNT);
            blob.heat = approach(blob.heat, amp, HEAT_SMOOTHING);
            blob.velocity.y -= (blob.heat - 0.5) * BUOYANCY;
        }

        let n = self.blobs.len();
        for i in 0..n {
            let mut dv = Point::new(0.0, 0.0);
            for j in 0..n {
                if i != j {
                    let d = interaction(&self.blobs[i], &self.blobs[j]);
                    dv.x += d.x;
                    dv.y += d.y;
                }
            }
            let blob = &mut self.blobs[i];
            blob.velocity.x += dv.x;
            blob.velocity.y += dv.y;
        }

        for blob in &mut self.blobs {
            blob.velocity.x *= DAMPING;
            blob.velocity.y *= DAMPING;
            blob.position.x += blob.velocity.x;
            blob.position.y += blob.velocity.y;
            let (lo_x, hi_x) = (blob.radius, (frame.width - blob.radius).max(blob.radius));
            let (lo_y, hi_y) = (blob.radius, (frame.height - blob.radius).max(blob.radius));
            if blob.position.x < lo_x || blob.position.x > hi_x {
                blob.velocity.x = -blob.velocity.x;
                blob.position.x = blob.position.x.clamp(lo_x, hi_x);
            }
            if blob.position.y < lo_y || blob.position.y > hi_y {
                blob.velocity.y = -blob.velocity.y;
                blob.position.y = blob.position.y.clamp(lo_y, hi_y);
            }
        }

        for blob in &self.blobs {
            let color = Rgb::new(255, 80, 40).lerp(Rgb::new(255, 200, 60), blob.heat);
            if frame.quality >= 0.5 {
                surface.glow(blob.position, blob.radius * 1.8, color, 0.35)?;
            }
            surface.fill_circle(blob.position, blob.radius * (0.9 + blob.heat * 0.2), color, 0.85)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.blobs.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.blobs.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.4)
    }
}
