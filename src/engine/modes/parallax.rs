// Parallax starfield: three depth layers scrolling sideways at different
// speeds, sped up by the mid band. Stars wrap around the left edge.

use super::{ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const LAYER_COUNTS: [usize; 3] = [70, 50, 30];
pub const LAYER_SPEEDS: [f32; 3] = [0.3, 0.8, 1.6];

#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxStar {
    pub position: Point,
    pub layer: usize,
    pub twinkle: f32,
}

/// Horizontal speed of `layer` for a given mid-band level.
pub fn layer_speed(layer: usize, mid: f32) -> f32 {
    LAYER_SPEEDS[layer.min(LAYER_SPEEDS.len() - 1)] * (1.0 + 3.0 * mid)
}

pub struct ParallaxStarfield {
    stars: Vec<ParallaxStar>,
    layout: Option<(f32, f32)>,
    rng: fastrand::Rng,
}

impl Default for ParallaxStarfield {
    fn default() -> Self {
        Self {
            stars: Vec::new(),
            layout: None,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl ParallaxStarfield {
    pub fn stars(&self) -> &[ParallaxStar] {
        &self.stars
    }
}

impl ModeBehavior for ParallaxStarfield {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::ParallaxStarfield);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        for (layer, &count) in LAYER_COUNTS.iter().enumerate() {
            for _ in 0..count {
                self.stars.push(ParallaxStar {
                    position: Point::new(self.rng.f32() * width, self.rng.f32() * height),
                    layer,
                    twinkle: range(&mut self.rng, 0.0, std::f32::consts::TAU),
                });
            }
        }
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let mid = frame.sample.mid();
        let treble = frame.sample.treble();

        for star in &mut self.stars {
            star.position.x -= layer_speed(star.layer, mid);
            if star.position.x < 0.0 {
                star.position.x += frame.width;
                star.position.y = self.rng.f32() * frame.height;
            }
            star.twinkle += 0.05 + treble * 0.2;
        }

        for star in &self.stars {
            let depth = (star.layer + 1) as f32 / LAYER_COUNTS.len() as f32;
            let flicker = 0.5 + 0.5 * star.twinkle.sin() * treble;
            let color = Rgb::new(200, 210, 255).lerp(Rgb::WHITE, depth);
            let alpha = (0.3 + depth * 0.5) * flicker.clamp(0.2, 1.0);
            if star.layer == LAYER_COUNTS.len() - 1 && frame.quality >= 0.5 {
                let tail = Point::new(star.position.x + 4.0 * (1.0 + 3.0 * mid), star.position.y);
                surface.stroke_line(star.position, tail, 1.0, color, alpha * 0.5)?;
            }
            surface.fill_circle(star.position, 0.6 + depth * 1.4, color, alpha)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.stars.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.stars.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.5)
    }
}
