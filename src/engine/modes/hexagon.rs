// Hexagon grid: a honeycomb whose cells light up with their frequency bin
// and a radial wave rolling out from the center. Energetic neighbors are
// linked with lines found through the spatial grid.
//
// The grid scales with surface area, so it is built `INIT_BATCH` cells per
// frame instead of all at once.

use std::f32::consts::PI;

use super::{approach, ensure_area, mode_rng, range, Backdrop, FrameContext, ModeBehavior, ModeKind, ResetContext};
use crate::engine::spatial::SpatialGrid;
use crate::engine::surface::{Point, Rgb, Surface};

pub const DEFAULT_HEX_SIZE: f32 = 30.0;
pub const INIT_BATCH: usize = 60;
/// Hexagons above this energy are drawn filled and tracked as active.
pub const ACTIVE_THRESHOLD: f32 = 0.05;
/// Active hexagons above this energy may be linked.
pub const LINK_THRESHOLD: f32 = 0.3;
pub const LINK_MIN_DISTANCE: f32 = 20.0;
pub const LINK_MAX_DISTANCE: f32 = 100.0;
pub const MAX_LINKS: usize = 120;

#[derive(Debug, Clone, PartialEq)]
pub struct Hexagon {
    pub center: Point,
    pub size: f32,
    pub energy: f32,
    pub target_energy: f32,
    pub hue: f32,
    pub phase: f32,
    pub fade_in: f32,
}

/// Remaining work of a batched build.
#[derive(Debug, Clone, Copy)]
struct BuildPlan {
    cols: usize,
    rows: usize,
    next: usize,
}

impl BuildPlan {
    fn total(&self) -> usize {
        self.cols * self.rows
    }
}

pub struct HexagonGrid {
    hex_size: f32,
    width: f32,
    height: f32,
    hexagons: Vec<Hexagon>,
    active_hexagons: Vec<usize>,
    plan: Option<BuildPlan>,
    grid: SpatialGrid<usize>,
    neighbors: Vec<usize>,
    links_drawn: usize,
    rng: fastrand::Rng,
}

impl Default for HexagonGrid {
    fn default() -> Self {
        Self {
            hex_size: DEFAULT_HEX_SIZE,
            width: 0.0,
            height: 0.0,
            hexagons: Vec::new(),
            active_hexagons: Vec::new(),
            plan: None,
            grid: SpatialGrid::new(LINK_MAX_DISTANCE),
            neighbors: Vec::new(),
            links_drawn: 0,
            rng: fastrand::Rng::with_seed(0),
        }
    }
}

/// Columns and rows needed to cover `width`×`height`, including one margin
/// row and column on each side.
pub fn layout_dimensions(width: f32, height: f32, size: f32) -> (usize, usize) {
    let spacing_x = size * 3f32.sqrt();
    let spacing_y = size * 1.5;
    let cols = (width / spacing_x).ceil() as usize + 2;
    let rows = (height / spacing_y).ceil() as usize + 2;
    (cols, rows)
}

/// Pointy-top hexagon corners.
pub fn hex_vertices(center: Point, size: f32) -> [Point; 6] {
    std::array::from_fn(|k| center.polar(PI / 3.0 * k as f32 - PI / 6.0, size))
}

impl HexagonGrid {
    pub fn hexagons(&self) -> &[Hexagon] {
        &self.hexagons
    }

    /// Indices of hexagons whose energy exceeded `ACTIVE_THRESHOLD` last frame.
    pub fn active_hexagons(&self) -> &[usize] {
        &self.active_hexagons
    }

    pub fn hex_size(&self) -> f32 {
        self.hex_size
    }

    pub fn is_building(&self) -> bool {
        self.plan.is_some_and(|p| p.next < p.total())
    }

    /// Links drawn in the most recent frame.
    pub fn links_drawn(&self) -> usize {
        self.links_drawn
    }

    fn build_cell(&mut self, index: usize, cols: usize) -> Hexagon {
        let spacing_x = self.hex_size * 3f32.sqrt();
        let spacing_y = self.hex_size * 1.5;
        let row = index / cols;
        let col = index % cols;
        let offset = if row % 2 == 1 { spacing_x / 2.0 } else { 0.0 };
        let center = Point::new(
            (col as f32 - 1.0) * spacing_x + offset,
            (row as f32 - 1.0) * spacing_y,
        );
        let hue = 180.0 + (center.x / self.width.max(1.0)) * 120.0 + range(&mut self.rng, -10.0, 10.0);
        Hexagon {
            center,
            size: self.hex_size,
            energy: 0.0,
            target_energy: 0.0,
            hue,
            phase: range(&mut self.rng, 0.0, 2.0 * PI),
            fade_in: 0.0,
        }
    }

    fn draw_links(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        self.grid.clear();
        for &i in &self.active_hexagons {
            if self.hexagons[i].energy > LINK_THRESHOLD {
                self.grid.insert(self.hexagons[i].center, i);
            }
        }

        let budget = super::scaled_count(MAX_LINKS, frame.quality);
        let mut drawn = 0;
        'outer: for &i in &self.active_hexagons {
            let a = &self.hexagons[i];
            if a.energy <= LINK_THRESHOLD {
                continue;
            }
            self.neighbors.clear();
            self.grid.query_into(a.center, LINK_MAX_DISTANCE, &mut self.neighbors);
            for &j in &self.neighbors {
                if j <= i {
                    continue;
                }
                let b = &self.hexagons[j];
                let d = a.center.distance(b.center);
                if !(LINK_MIN_DISTANCE..=LINK_MAX_DISTANCE).contains(&d) {
                    continue;
                }
                let alpha = a.energy.min(b.energy) * (1.0 - d / LINK_MAX_DISTANCE) * 0.6;
                let color = Rgb::from_hsl((a.hue + b.hue) / 2.0, 0.8, 0.7);
                surface.stroke_line(a.center, b.center, 1.0, color, alpha)?;
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

impl ModeBehavior for HexagonGrid {
    fn reset(&mut self, ctx: &ResetContext) -> anyhow::Result<()> {
        self.dispose();
        ensure_area(ctx.width, ctx.height)?;
        anyhow::ensure!(ctx.hex_size >= 1.0, "hexagon size too small: {}", ctx.hex_size);
        self.hex_size = ctx.hex_size;
        self.width = ctx.width;
        self.height = ctx.height;
        self.rng = mode_rng(ctx.seed, ModeKind::HexagonGrid);
        let (cols, rows) = layout_dimensions(ctx.width, ctx.height, ctx.hex_size);
        self.plan = Some(BuildPlan { cols, rows, next: 0 });
        Ok(())
    }

    fn init_step(&mut self) -> anyhow::Result<bool> {
        let Some(mut plan) = self.plan else {
            return Ok(true);
        };
        let end = (plan.next + INIT_BATCH).min(plan.total());
        self.hexagons.reserve(end - plan.next);
        for index in plan.next..end {
            let hex = self.build_cell(index, plan.cols);
            self.hexagons.push(hex);
        }
        plan.next = end;
        self.plan = Some(plan);
        Ok(plan.next >= plan.total())
    }

    fn update_and_draw(&mut self, frame: &FrameContext, surface: &mut dyn Surface) -> anyhow::Result<()> {
        let center = Point::new(frame.width / 2.0, frame.height / 2.0);
        let t = frame.time;

        self.active_hexagons.clear();
        for (i, hex) in self.hexagons.iter_mut().enumerate() {
            let amp = frame.sample.amplitude(i);
            let dist = hex.center.distance(center);
            let wave = (t * 0.02 - dist * 0.01).sin() * 0.5 + 0.5;
            hex.target_energy = amp * 0.7 + wave * amp * 0.3;
            hex.energy = approach(hex.energy, hex.target_energy, 0.1);
            hex.fade_in = (hex.fade_in + 0.05).min(1.0);
            hex.phase += 0.02;
            if hex.energy > ACTIVE_THRESHOLD {
                self.active_hexagons.push(i);
            }
        }

        let outlines = frame.quality >= 0.5;
        for hex in &self.hexagons {
            let corners = hex_vertices(hex.center, hex.size * 0.92);
            if hex.energy > ACTIVE_THRESHOLD {
                let pulse = 0.9 + 0.1 * hex.phase.sin();
                let color = Rgb::from_hsl(hex.hue + hex.energy * 60.0, 0.75, 0.3 + hex.energy * 0.4);
                surface.fill_polygon(&corners, color, hex.energy * hex.fade_in * 0.8 * pulse)?;
            }
            if outlines {
                let mut ring = corners.to_vec();
                ring.push(corners[0]);
                let color = Rgb::from_hsl(hex.hue, 0.5, 0.5);
                surface.stroke_polyline(&ring, 1.0, color, 0.08 * hex.fade_in + hex.energy * 0.3)?;
            }
        }

        self.draw_links(frame, surface)
    }

    fn dispose(&mut self) {
        self.hexagons.clear();
        self.active_hexagons.clear();
        self.grid.clear();
        self.plan = None;
        self.links_drawn = 0;
    }

    fn entity_count(&self) -> usize {
        self.hexagons.len()
    }

    fn backdrop(&self) -> Backdrop {
        Backdrop::Clear
    }
}
