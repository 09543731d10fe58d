// Ocean waves: four stacked wave layers summed from sines, with bubbles
// rising through the water and wrapping back to the bottom.

use std::f32::consts::TAU;

use super::{approach, ensure_area, mode_rng, range, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{ClipRect, Point, Rgb, Surface};

pub const WAVE_LAYERS: usize = 4;
pub const BUBBLE_COUNT: usize = 40;
const BASE_STEP: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct OceanWave {
    /// Resting line as a fraction of the height.
    pub base: f32,
    pub phase: f32,
    pub speed: f32,
    pub wavelength: f32,
    pub energy: f32,
    pub hue: f32,
}

impl OceanWave {
    /// Height of the wave line at `x`, with `swell` pixels of amplitude.
    pub fn height_at(&self, x: f32, surface_height: f32, swell: f32) -> f32 {
        let k = TAU / self.wavelength;
        let sum = (x * k + self.phase).sin() * 0.6
            + (x * k * 2.3 + self.phase * 1.7).sin() * 0.3
            + (x * k * 0.5 - self.phase * 0.6).sin() * 0.1;
        self.base * surface_height + sum * swell
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub position: Point,
    pub speed: f32,
    pub radius: f32,
    pub wobble: f32,
}

/// Horizontal sampling step at `quality`.
pub fn sample_step(quality: f32) -> f32 {
    (BASE_STEP / quality.max(0.1)).ceil()
}

pub struct OceanWaves {
    waves: Vec<OceanWave>,
    bubbles: Vec<Bubble>,
    layout: Option<(f32, f32)>,
    outline: Vec<Point>,
    rng: fastrand::Rng,
}

impl Default for OceanWaves {
    fn default() -> Self {
        Self {
            waves: Vec::new(),
            bubbles: Vec::new(),
            layout: None,
            outline: Vec::new(),
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl OceanWaves {
    pub fn waves(&self) -> &[OceanWave] {
        &self.waves
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    /// Top of the water: the highest resting line.
    pub fn waterline(&self, height: f32) -> f32 {
        self.waves
            .iter()
            .map(|w| w.base * height)
            .fold(height, f32::min)
    }

    fn draw_bubbles(&self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let alpha = 0.25 + frame.sample.treble() * 0.5;
        for bubble in &self.bubbles {
            let at = Point::new(bubble.position.x + bubble.wobble.sin() * 2.0, bubble.position.y);
            surface.stroke_circle(at, bubble.radius, 1.0, Rgb::new(200, 235, 255), alpha)?;
        }
        Ok(())
    }
}

impl ModeBehavior for OceanWaves {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::OceanWaves);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let rng = &mut self.rng;
        self.waves = (0..WAVE_LAYERS)
            .map(|i| OceanWave {
                base: 0.4 + i as f32 * 0.12,
                phase: range(rng, 0.0, TAU),
                speed: 0.01 + i as f32 * 0.006,
                wavelength: width * range(rng, 0.35, 0.7),
                energy: 0.0,
                hue: 195.0 + i as f32 * 8.0,
            })
            .collect();
        self.bubbles = (0..BUBBLE_COUNT)
            .map(|_| Bubble {
                position: Point::new(rng.f32() * width, range(rng, height * 0.45, height)),
                speed: range(rng, 0.2, 1.0),
                radius: range(rng, 1.0, 4.0),
                wobble: range(rng, 0.0, TAU),
            })
            .collect();
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let bins = frame.sample.len();
        let bass = frame.sample.bass();
        for (i, wave) in self.waves.iter_mut().enumerate() {
            let amp = frame.sample.band_average(i * bins / WAVE_LAYERS..(i + 1) * bins / WAVE_LAYERS);
            wave.energy = approach(wave.energy, amp, 0.1);
            wave.phase += wave.speed * (1.0 + wave.energy * 2.0);
        }

        let waterline = self.waterline(frame.height);
        for bubble in &mut self.bubbles {
            bubble.position.y -= 0.5 + bubble.speed * (1.0 + bass);
            bubble.wobble += 0.1;
            if bubble.position.y < waterline {
                bubble.position.y = frame.height + bubble.radius;
                bubble.position.x = self.rng.f32() * frame.width;
            }
        }

        let step = sample_step(frame.quality);
        for wave in &self.waves {
            let swell = 10.0 + wave.energy * 40.0;
            self.outline.clear();
            let mut x = 0.0;
            while x < frame.width + step {
                let sx = x.min(frame.width);
                self.outline.push(Point::new(sx, wave.height_at(sx, frame.height, swell)));
                x += step;
            }
            self.outline.push(Point::new(frame.width, frame.height));
            self.outline.push(Point::new(0.0, frame.height));

            let color = Rgb::from_hsl(wave.hue, 0.7, 0.2 + wave.energy * 0.25);
            surface.fill_polygon(&self.outline, color, 0.55)?;
            let crest = &self.outline[..self.outline.len() - 2];
            surface.stroke_polyline(crest, 1.5, Rgb::from_hsl(wave.hue, 0.6, 0.7), 0.3 + wave.energy * 0.5)?;
        }

        surface.set_clip(Some(ClipRect {
            x: 0.0,
            y: waterline,
            width: frame.width,
            height: frame.height - waterline,
        }));
        let drawn = self.draw_bubbles(frame, surface);
        surface.set_clip(None);
        drawn
    }

    fn dispose(&mut self) {
        self.waves.clear();
        self.bubbles.clear();
        self.outline.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.waves.len() + self.bubbles.len()
    }
}
