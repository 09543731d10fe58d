// Fireflies: eighty wanderers that glow with the treble and string faint
// threads between close neighbors.

use std::f32::consts::TAU;

use super::{approach, ensure_area, mode_rng, range, scaled_count, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::spatial::SpatialGrid;
use crate::engine::surface::{Point, Rgb, Surface};

pub const FIREFLY_COUNT: usize = 80;
pub const LINK_DISTANCE: f32 = 70.0;
pub const MAX_LINKS: usize = 60;
const MAX_SPEED: f32 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Firefly {
    pub position: Point,
    pub velocity: Point,
    pub glow_phase: f32,
    pub energy: f32,
    pub hue: f32,
}

pub struct Fireflies {
    flies: Vec<Firefly>,
    layout: Option<(f32, f32)>,
    grid: SpatialGrid<usize>,
    neighbors: Vec<usize>,
    links_drawn: usize,
    rng: fastrand::Rng,
}

impl Default for Fireflies {
    fn default() -> Self {
        Self {
            flies: Vec::new(),
            layout: None,
            grid: SpatialGrid::new(LINK_DISTANCE),
            neighbors: Vec::new(),
            links_drawn: 0,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

/// Wrap `value` into `[0, extent)`. `rem_euclid` rounds tiny negative
/// values up to `extent` itself, which would sit one pixel off-canvas.
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

impl Fireflies {
    pub fn flies(&self) -> &[Firefly] {
        &self.flies
    }

    /// Links drawn in the last frame.
    pub fn links_drawn(&self) -> usize {
        self.links_drawn
    }

    fn wander(&mut self, width: f32, height: f32) {
        for fly in &mut self.flies {
            fly.velocity.x += range(&mut self.rng, -0.15, 0.15);
            fly.velocity.y += range(&mut self.rng, -0.15, 0.15);
            let speed = (fly.velocity.x * fly.velocity.x + fly.velocity.y * fly.velocity.y).sqrt();
            if speed > MAX_SPEED {
                fly.velocity.x *= MAX_SPEED / speed;
                fly.velocity.y *= MAX_SPEED / speed;
            }
            fly.position.x = wrap_coordinate(fly.position.x + fly.velocity.x, width);
            fly.position.y = wrap_coordinate(fly.position.y + fly.velocity.y, height);
        }
    }

    fn draw_links(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        self.grid.clear();
        for (i, fly) in self.flies.iter().enumerate() {
            self.grid.insert(fly.position, i);
        }

        let budget = scaled_count(MAX_LINKS, frame.quality);
        let mut drawn = 0;
        'outer: for (i, a) in self.flies.iter().enumerate() {
            self.neighbors.clear();
            self.grid.query_into(a.position, LINK_DISTANCE, &mut self.neighbors);
            for &j in &self.neighbors {
                if j <= i {
                    continue;
                }
                let b = &self.flies[j];
                let d = a.position.distance(b.position);
                if d > LINK_DISTANCE {
                    continue;
                }
                let alpha = (1.0 - d / LINK_DISTANCE) * (a.energy + b.energy) * 0.3;
                surface.stroke_line(a.position, b.position, 1.0, Rgb::new(220, 255, 150), alpha)?;
                drawn += 1;
                if drawn >= budget {
                    break 'outer;
                }
            }
        }
        self.links_drawn = drawn;
        Ok(())
    }
}

impl ModeBehavior for Fireflies {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::Fireflies);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let rng = &mut self.rng;
        self.flies = (0..FIREFLY_COUNT)
            .map(|_| Firefly {
                position: Point::new(rng.f32() * width, rng.f32() * height),
                velocity: Point::new(range(rng, -0.5, 0.5), range(rng, -0.5, 0.5)),
                glow_phase: range(rng, 0.0, TAU),
                energy: 0.0,
                hue: range(rng, 60.0, 100.0),
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        self.wander(frame.width, frame.height);
        let treble = frame.sample.treble();
        for fly in &mut self.flies {
            fly.glow_phase += 0.04 + treble * 0.2;
            let pulse = 0.5 + 0.5 * fly.glow_phase.sin();
            fly.energy = approach(fly.energy, pulse * (0.3 + treble * 0.7), 0.1);
        }

        self.draw_links(frame, surface)?;

        for fly in &self.flies {
            let color = Rgb::from_hsl(fly.hue, 0.9, 0.6);
            if frame.quality >= 0.5 {
                surface.glow(fly.position, 6.0 + fly.energy * 12.0, color, fly.energy * 0.6)?;
            }
            surface.fill_circle(fly.position, 1.5, color, 0.3 + fly.energy * 0.7)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.flies.clear();
        self.grid.clear();
        self.neighbors.clear();
        self.layout = None;
        self.links_drawn = 0;
    }

    fn entity_count(&self) -> usize {
        self.flies.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.3)
    }
}
