// Voronoi cells: fifteen drifting seeds partition the surface. Cells are
// shaded on a coarse lattice whose step widens as quality drops.

use super::{approach, ensure_area, mode_rng, range, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const POINT_COUNT: usize = 15;
const BASE_STEP: f32 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiPoint {
    pub position: Point,
    pub velocity: Point,
    pub energy: f32,
    pub hue: f32,
}

/// Move `pos` by `vel`, reflecting off `0..=limit` on one axis.
pub(crate) fn reflect(pos: &mut f32, vel: &mut f32, limit: f32) {
    *pos += *vel;
    if *pos < 0.0 {
        *pos = -*pos;
        *vel = vel.abs();
    } else if *pos > limit {
        *pos = 2.0 * limit - *pos;
        *vel = -vel.abs();
    }
    *pos = pos.clamp(0.0, limit);
}

pub struct VoronoiCells {
    points: Vec<VoronoiPoint>,
    layout: Option<(f32, f32)>,
    rng: fastrand::Rng,
}

impl Default for VoronoiCells {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            layout: None,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl VoronoiCells {
    pub fn points(&self) -> &[VoronoiPoint] {
        &self.points
    }

    /// Index of the nearest seed and the distances to the nearest and
    /// second-nearest seeds.
    fn nearest(&self, p: Point) -> (usize, f32, f32) {
        let mut best = (0, f32::INFINITY);
        let mut second = f32::INFINITY;
        for (i, seed) in self.points.iter().enumerate() {
            let d = seed.position.distance_sq(p);
            if d < best.1 {
                second = best.1;
                best = (i, d);
            } else if d < second {
                second = d;
            }
        }
        (best.0, best.1.sqrt(), second.sqrt())
    }
}

impl ModeBehavior for VoronoiCells {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::VoronoiCells);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let rng = &mut self.rng;
        self.points = (0..POINT_COUNT)
            .map(|i| VoronoiPoint {
                position: Point::new(rng.f32() * width, rng.f32() * height),
                velocity: Point::new(range(rng, -1.0, 1.0), range(rng, -1.0, 1.0)),
                energy: 0.0,
                hue: i as f32 * 360.0 / POINT_COUNT as f32,
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let bins = frame.sample.len();
        for (i, point) in self.points.iter_mut().enumerate() {
            reflect(&mut point.position.x, &mut point.velocity.x, frame.width);
            reflect(&mut point.position.y, &mut point.velocity.y, frame.height);
            let amp = frame.sample.amplitude(i * bins / POINT_COUNT);
            point.energy = approach(point.energy, amp, 0.1);
        }
        if self.points.is_empty() {
            return Ok(());
        }

        let step = (BASE_STEP / frame.quality.max(0.1)).ceil().max(1.0);
        let edge_width = 3.0 * step / BASE_STEP;
        let mut y = 0.0;
        while y < frame.height {
            let mut x = 0.0;
            while x < frame.width {
                let sample_at = Point::new(x + step / 2.0, y + step / 2.0);
                let (owner, d1, d2) = self.nearest(sample_at);
                let seed = &self.points[owner];
                if d2 - d1 < edge_width {
                    surface.fill_rect(x, y, step, step, Rgb::from_hsl(seed.hue, 0.4, 0.8), 0.5 + seed.energy * 0.4)?;
                } else {
                    let shade = Rgb::from_hsl(seed.hue, 0.6, 0.15 + seed.energy * 0.35);
                    surface.fill_rect(x, y, step, step, shade, 0.9)?;
                }
                x += step;
            }
            y += step;
        }

        for seed in &self.points {
            let color = Rgb::from_hsl(seed.hue, 0.9, 0.7);
            surface.fill_circle(seed.position, 3.0 + seed.energy * 6.0, color, 0.9)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.points.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.points.len()
    }
}
