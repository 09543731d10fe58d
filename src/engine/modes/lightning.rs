// Lightning storm: bass energy in the low quarter of the spectrum triggers
// bolts. The generator style rotates every ten seconds between a fractal
// branch, a plasma waveform and a radial burst.

use std::f32::consts::TAU;

use super::{ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const MIN_INTENSITY: f32 = 0.25;
pub const MAX_INTENSITY: f32 = 3.0;
pub const BASE_THRESHOLD: f32 = 0.45;
pub const SPAWN_CHANCE: f32 = 0.25;
pub const BASE_DECAY: f32 = 0.04;
pub const MAX_BOLTS: f32 = 8.0;
const STYLE_PERIOD_MS: f64 = 10_000.0;
const FRACTAL_DEPTH: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoltStyle {
    Fractal,
    Plasma,
    Radial,
}

impl BoltStyle {
    /// Generator in effect at `now_ms`.
    pub fn at(now_ms: f64) -> Self {
        match ((now_ms.max(0.0) / STYLE_PERIOD_MS).floor() as u64) % 3 {
            0 => Self::Fractal,
            1 => Self::Plasma,
            _ => Self::Radial,
        }
    }
}

/// Band level that triggers a bolt at `intensity`.
pub fn trigger_threshold(intensity: f32) -> f32 {
    BASE_THRESHOLD / intensity.clamp(MIN_INTENSITY, MAX_INTENSITY)
}

/// Life lost per frame at `intensity`.
pub fn decay_rate(intensity: f32) -> f32 {
    BASE_DECAY * intensity.clamp(0.5, 2.0)
}

/// Live-bolt cap at `quality`.
pub fn bolt_cap(quality: f32) -> usize {
    ((MAX_BOLTS * quality.clamp(0.0, 1.0)).ceil() as usize).max(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightningBolt {
    pub style: BoltStyle,
    pub segments: Vec<Vec<Point>>,
    pub life: f32,
    pub width: f32,
    pub hue: f32,
}

pub struct LightningStorm {
    bolts: Vec<LightningBolt>,
    flash: f32,
    spawned_total: u64,
    rng: fastrand::Rng,
}

impl Default for LightningStorm {
    fn default() -> Self {
        Self {
            bolts: Vec::new(),
            flash: 0.0,
            spawned_total: 0,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl LightningStorm {
    pub fn bolts(&self) -> &[LightningBolt] {
        &self.bolts
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    fn spawn(&mut self, style: BoltStyle, width: f32, height: f32, energy: f32) {
        let mut segments = Vec::new();
        match style {
            BoltStyle::Fractal => {
                let start = Point::new(range(&mut self.rng, width * 0.2, width * 0.8), 0.0);
                let end = Point::new(start.x + range(&mut self.rng, -width * 0.2, width * 0.2), height);
                fractal(&mut self.rng, start, end, height * 0.15, FRACTAL_DEPTH, &mut segments);
            }
            BoltStyle::Plasma => {
                let y = range(&mut self.rng, height * 0.25, height * 0.75);
                segments.push(plasma(&mut self.rng, width, y, height * 0.12 * (0.5 + energy)));
            }
            BoltStyle::Radial => {
                let origin = Point::new(
                    range(&mut self.rng, width * 0.3, width * 0.7),
                    range(&mut self.rng, height * 0.3, height * 0.7),
                );
                let reach = width.min(height) * (0.25 + energy * 0.2);
                radial(&mut self.rng, origin, reach, &mut segments);
            }
        }
        self.bolts.push(LightningBolt {
            style,
            segments,
            life: 1.0,
            width: 1.0 + energy * 2.5,
            hue: range(&mut self.rng, 200.0, 280.0),
        });
        self.spawned_total += 1;
    }
}

/// Midpoint displacement from `a` to `b`, with occasional side branches.
fn fractal(rng: &mut fastrand::Rng, a: Point, b: Point, offset: f32, depth: u32, out: &mut Vec<Vec<Point>>) {
    let mut path = vec![a, b];
    let mut spread = offset;
    for level in 0..depth {
        let mut next = Vec::with_capacity(path.len() * 2);
        for pair in path.windows(2) {
            let mid = pair[0].lerp(pair[1], 0.5);
            let displaced = Point::new(mid.x + range(rng, -spread, spread), mid.y);
            next.push(pair[0]);
            next.push(displaced);
            if level + 2 < depth && rng.f32() < 0.2 {
                let angle = (pair[1].y - pair[0].y).atan2(pair[1].x - pair[0].x) + range(rng, -0.8, 0.8);
                let length = pair[0].distance(pair[1]) * 0.7;
                let tip = displaced.polar(angle, length);
                fractal(rng, displaced, tip, spread * 0.5, depth - level - 2, out);
            }
        }
        if let Some(&last) = path.last() {
            next.push(last);
        }
        path = next;
        spread *= 0.5;
    }
    out.push(path);
}

/// Horizontal sine waveform with jitter across the full width.
fn plasma(rng: &mut fastrand::Rng, width: f32, y: f32, amplitude: f32) -> Vec<Point> {
    let steps = 48;
    let phase = range(rng, 0.0, TAU);
    let cycles = range(rng, 2.0, 5.0);
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let wave = (t * cycles * TAU + phase).sin() * amplitude;
            Point::new(t * width, y + wave + range(rng, -amplitude, amplitude) * 0.2)
        })
        .collect()
}

/// 6 to 10 jagged rays out of `origin`.
fn radial(rng: &mut fastrand::Rng, origin: Point, reach: f32, out: &mut Vec<Vec<Point>>) {
    let rays = rng.usize(6..=10);
    for r in 0..rays {
        let angle = r as f32 * TAU / rays as f32 + range(rng, -0.2, 0.2);
        let steps = 8;
        let ray = (0..=steps)
            .map(|s| {
                let dist = reach * s as f32 / steps as f32;
                let jag = if s == 0 { 0.0 } else { range(rng, -0.15, 0.15) };
                origin.polar(angle + jag, dist)
            })
            .collect();
        out.push(ray);
    }
}

impl ModeBehavior for LightningStorm {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::LightningStorm);
        Ok(())
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let intensity = frame.intensity.clamp(MIN_INTENSITY, MAX_INTENSITY);
        let decay = decay_rate(intensity);
        for bolt in &mut self.bolts {
            bolt.life -= decay;
        }
        self.bolts.retain(|b| b.life > 0.0);
        self.flash = (self.flash - 0.1).max(0.0);

        let bins = frame.sample.len();
        let energy = frame.sample.band_average(0..bins / 4);
        if energy > trigger_threshold(intensity)
            && self.bolts.len() < bolt_cap(frame.quality)
            && self.rng.f32() < SPAWN_CHANCE * intensity
        {
            self.spawn(BoltStyle::at(frame.now_ms), frame.width, frame.height, energy);
            self.flash = 1.0;
        }

        if self.flash > 0.0 {
            surface.fill_rect(0.0, 0.0, frame.width, frame.height, Rgb::new(180, 190, 255), self.flash * 0.15)?;
        }
        for bolt in &self.bolts {
            let color = Rgb::from_hsl(bolt.hue, 0.7, 0.75);
            for path in &bolt.segments {
                if frame.quality >= 0.5 {
                    surface.stroke_polyline(path, bolt.width * 3.0, color, bolt.life * 0.25)?;
                }
                surface.stroke_polyline(path, bolt.width, Rgb::WHITE, bolt.life)?;
            }
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.bolts.clear();
        self.flash = 0.0;
        self.spawned_total = 0;
    }

    fn entity_count(&self) -> usize {
        self.bolts.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.3)
    }
}
