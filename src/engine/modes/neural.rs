// Neural network: a layered feed-forward graph. Edges between adjacent
// layers are drawn once at init with a coin flip each; neuron energy
// tracks its bin with fast (15%) smoothing and hot neurons fire pulses
// down their outgoing edges.

use super::{approach, ensure_area, mode_rng, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::surface::{Point, Rgb, Surface};

pub const LAYERS: [usize; 5] = [5, 8, 10, 8, 5];
pub const EDGE_PROBABILITY: f32 = 0.5;
pub const ENERGY_SMOOTHING: f32 = 0.15;
const PULSE_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub struct Neuron {
    pub position: Point,
    pub layer: usize,
    pub energy: f32,
    /// Indices of neurons in the next layer.
    pub connections: Vec<usize>,
}

pub struct NeuralNetwork {
    neurons: Vec<Neuron>,
    layout: Option<(f32, f32)>,
    rng: fastrand::Rng,
}

impl Default for NeuralNetwork {
    fn default() -> Self {
        Self {
            neurons: Vec::new(),
            layout: None,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

impl NeuralNetwork {
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn edge_count(&self) -> usize {
        self.neurons.iter().map(|n| n.connections.len()).sum()
    }
}

impl ModeBehavior for NeuralNetwork {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        self.rng = mode_rng(ctx.seed, ModeKind::NeuralNetwork);
        self.layout = Some((ctx.width, ctx.height));
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some((width, height)) = self.layout.take() else {
            return Ok(true);
        };
        let mut layer_start = Vec::with_capacity(LAYERS.len());
        for (layer, &count) in LAYERS.iter().enumerate() {
            layer_start.push(self.neurons.len());
            let x = width * (layer + 1) as f32 / (LAYERS.len() + 1) as f32;
            for k in 0..count {
                let y = height * (k + 1) as f32 / (count + 1) as f32;
                self.neurons.push(Neuron {
                    position: Point::new(x, y),
                    layer,
                    energy: 0.0,
                    connections: Vec::new(),
                });
            }
        }
        for layer in 0..LAYERS.len() - 1 {
            let next_start = layer_start[layer + 1];
            for i in layer_start[layer]..next_start {
                for j in next_start..next_start + LAYERS[layer + 1] {
                    if self.rng.f32() < EDGE_PROBABILITY {
                        self.neurons[i].connections.push(j);
                    }
                }
            }
        }
        Ok(true)
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let total = self.neurons.len().max(1);
        let bins = frame.sample.len();
        for (i, neuron) in self.neurons.iter_mut().enumerate() {
            let amp = frame.sample.amplitude(i * bins / total);
            neuron.energy = approach(neuron.energy, amp, ENERGY_SMOOTHING);
        }

        let pulses = frame.quality >= 0.5;
        for (i, neuron) in self.neurons.iter().enumerate() {
            for &j in &neuron.connections {
                let target = &self.neurons[j];
                let alpha = 0.05 + (neuron.energy + target.energy) * 0.3;
                let color = Rgb::from_hsl(190.0 + neuron.layer as f32 * 25.0, 0.7, 0.55);
                surface.stroke_line(neuron.position, target.position, 1.0, color, alpha)?;
                if pulses && neuron.energy > PULSE_THRESHOLD {
                    let progress = (frame.time * 0.02 + i as f32 * 0.13 + j as f32 * 0.07).fract();
                    let at = neuron.position.lerp(target.position, progress);
                    surface.fill_circle(at, 2.0, Rgb::new(200, 240, 255), neuron.energy)?;
                }
            }
        }

        for neuron in &self.neurons {
            let color = Rgb::from_hsl(190.0 + neuron.layer as f32 * 25.0, 0.85, 0.6);
            surface.glow(neuron.position, 6.0 + neuron.energy * 14.0, color, neuron.energy)?;
            surface.fill_circle(neuron.position, 3.0 + neuron.energy * 3.0, color, 0.9)?;
        }
        Ok(())
    }

    fn dispose(&mut self) {
        self.neurons.clear();
        self.layout = None;
    }

    fn entity_count(&self) -> usize {
        self.neurons.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Fade(0.4)
    }
}
