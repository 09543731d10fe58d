// Magnetic field: four moving poles bend a lattice of short field-line
// segments. The lattice is expensive, so it is recomputed on a throttled
// cadence and the cached segments are redrawn in between.

use super::voronoi::reflect;
use super::{approach, ensure_area, mode_rng, range, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const SOURCE_COUNT: usize = 4;
pub const LATTICE_STEP: f32 = 28.0;
const BASE_INTERVAL: f32 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct MagneticSource {
    pub position: Point,
    pub velocity: Point,
    /// +1 or -1.
    pub polarity: f32,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldLine {
    pub from: Point,
    pub to: Point,
    pub magnitude: f32,
}

/// Frames between lattice recomputations at `quality`.
pub fn recompute_interval(quality: f32) -> u64 {
    (BASE_INTERVAL / quality.max(0.1)).ceil().max(1.0) as u64
}

/// Field vector at `p`: inverse-distance weighted pull of every source.
pub fn field_at(sources: &[MagneticSource], p: Point) -> Point {
    let mut fx = 0.0;
    let mut fy = 0.0;
    for s in sources {
        let dx = p.x - s.position.x;
        let dy = p.y - s.position.y;
        let dist = (dx * dx + dy * dy).sqrt().max(1.0);
        let weight = s.polarity * s.strength / dist;
        fx += dx / dist * weight;
        fy += dy / dist * weight;
    }
    Point::new(fx, fy)
}

pub struct MagneticField {
    sources: Vec<MagneticSource>,
    lines: Vec<FieldLine>,
    layout: Option<(f32, f32)>,
    frames_since: u64,
    recomputations: u64,
    rng: fastrand::Rng,
}

impl Default for MagneticField {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            lines: Vec::new(),
            layout: None,
            frames_since: 0,
            recomputations: 0,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl MagneticField {
    pub fn sources(&self) -> &[MagneticSource] {
        &self.sources
    }

    pub fn lines(&self) -> &[FieldLine] {
        &self.lines
    }

    /// Lattice recomputations since the last reset.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    fn recompute(&mut self, width: f32, height: f32) {
        self.lines.clear();
        let half = LATTICE_STEP * 0.45;
        let mut y = LATTICE_STEP / 2.0;
        while y < height {
            let mut x = LATTICE_STEP / 2.0;
            while x < width {
                let at = Point::new(x, y);
                let f = field_at(&self.sources, at);
                let magnitude = (f.x * f.x + f.y * f.y).sqrt();
                if magnitude > f32::EPSILON {
                    let ux = f.x / magnitude * half;
                    let uy = f.y / magnitude * half;
                    self.lines.push(FieldLine {
                        from: Point::new(x - ux, y - uy),
                        to: Point::new(x + ux, y + uy),
                        magnitude,
                    });
                }
                x += LATTICE_STEP;
            }
            y += LATTICE_STEP;
        }
        self.recomputations += 1;
        self.frames_since = 0;
    }
}

impl ModeBehavior for MagneticField {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::MagneticField);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let rng = &mut self.rng;
        self.sources = (0..SOURCE_COUNT)
            .map(|i| MagneticSource {
                position: Point::new(rng.f32() * width, rng.f32() * height),
                velocity: Point::new(range(rng, -1.0, 1.0), range(rng, -1.0, 1.0)),
                polarity: if i % 2 == 0 { 1.0 } else { -1.0 },
                strength: 0.5,
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let bins = frame.sample.len();
        for (i, s) in self.sources.iter_mut().enumerate() {
            reflect(&mut s.position.x, &mut s.velocity.x, frame.width);
            reflect(&mut s.position.y, &mut s.velocity.y, frame.height);
            let band = frame.sample.band_average(i * bins / SOURCE_COUNT..(i + 1) * bins / SOURCE_COUNT);
            s.strength = approach(s.strength, 0.5 + band, 0.2);
        }

        self.frames_since += 1;
        if self.lines.is_empty() || self.frames_since >= recompute_interval(frame.quality) {
            self.recompute(frame.width, frame.height);
        }

        for line in &self.lines {
            let t = (line.magnitude * 20.0).min(1.0);
            let color = Rgb::new(80, 140, 255).lerp(Rgb::new(255, 90, 160), t);
            surface.stroke_line(line.from, line.to, 1.0, color, 0.25 + t * 0.6)?;
        }
        for s in &self.sources {
            let color = if s.polarity > 0.0 { Rgb::new(255, 110, 140) } else { Rgb::new(110, 170, 255) };
            surface.glow(s.position, 12.0 + s.strength * 18.0, color, 0.6)?;
            surface.fill_circle(s.position, 4.0, color, 1.0)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.sources.clear();
        self.lines.clear();
        self.layout = None;
        self.frames_since = 0;
        self.recomputations = 0;
    }

    fn entity_count(&self) -> usize {
        self.sources.len()
    }
}
