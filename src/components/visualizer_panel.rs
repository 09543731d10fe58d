// Visualizer panel: presents the engine's raster in the terminal.
//
// Each terminal cell shows two vertically stacked pixels using the upper
// half-block glyph (foreground = top, background = bottom). The raster is
// rendered `supersample` times larger than that and box-filtered down, so
// thin lines and small particles survive the trip to cell resolution.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use crate::components::Component;
use crate::config::MAX_SUPERSAMPLE;
use crate::engine::surface::{Raster, Rgb};
use crate::theme::Theme;

const UPPER_HALF: char = '▀';

/// Raster dimensions that fill `area` at `supersample` pixels per column.
pub fn raster_size(area: Rect, supersample: u16) -> (u32, u32) {
    let s = supersample.clamp(1, MAX_SUPERSAMPLE) as u32;
    let width = (area.width as u32 * s).max(1);
    let height = (area.height as u32 * 2 * s).max(1);
    (width, height)
}

/// Average color of the `x0..x1` × `y0..y1` block.
fn box_average(raster: &Raster, x0: usize, x1: usize, y0: usize, y1: usize) -> Rgb {
    let (mut r, mut g, mut b, mut n) = (0u32, 0u32, 0u32, 0u32);
    for y in y0..y1 {
        for x in x0..x1 {
            if let Some(px) = raster.pixel(x, y) {
                r += px.r as u32;
                g += px.g as u32;
                b += px.b as u32;
                n += 1;
            }
        }
    }
    if n == 0 {
        return Rgb::BLACK;
    }
    Rgb::new((r / n) as u8, (g / n) as u8, (b / n) as u8)
}

/// Cell-resolution copy of the last captured raster.
#[derive(Default)]
pub struct VisualizerPanel {
    supersample: u16,
    cols: u16,
    rows: u16,
    /// `[top, bottom]` per cell, row-major.
    cells: Vec<[Rgb; 2]>,
    enabled: bool,
}

impl VisualizerPanel {
    pub fn new(supersample: u16) -> Self {
        Self {
            supersample: supersample.clamp(1, MAX_SUPERSAMPLE),
            enabled: true,
            ..Self::default()
        }
    }

    pub fn supersample(&self) -> u16 {
        self.supersample
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Captured size in cells.
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Colors of the cell at (`col`, `row`), top then bottom.
    pub fn cell(&self, col: u16, row: u16) -> Option<[Rgb; 2]> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row as usize * self.cols as usize + col as usize).copied()
    }

    /// Downsample `raster` into cells.
    pub fn capture(&mut self, raster: &Raster) {
        let s = self.supersample as usize;
        let cols = raster.pixel_width() / s;
        let rows = raster.pixel_height() / (2 * s);
        self.cols = cols.min(u16::MAX as usize) as u16;
        self.rows = rows.min(u16::MAX as usize) as u16;
        self.cells.clear();
        self.cells.reserve(self.cols as usize * self.rows as usize);
        for row in 0..self.rows as usize {
            let top = row * 2 * s;
            for col in 0..self.cols as usize {
                let x = col * s;
                self.cells.push([
                    box_average(raster, x, x + s, top, top + s),
                    box_average(raster, x, x + s, top + s, top + 2 * s),
                ]);
            }
        }
    }
}

fn to_color(c: Rgb) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

impl Component for VisualizerPanel {
    fn draw(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        if !self.enabled {
            let y = area.y + area.height / 2;
            let line = Line::styled(
                "Visualizer paused. Press Space to resume.",
                Style::default().fg(theme.text_dim),
            );
            let row = Rect::new(area.x, y, area.width, 1.min(area.height));
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
            return;
        }

        let buf = frame.buffer_mut();
        for row in 0..area.height.min(self.rows) {
            for col in 0..area.width.min(self.cols) {
                let Some([top, bottom]) = self.cell(col, row) else {
                    continue;
                };
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(UPPER_HALF);
                    cell.set_fg(to_color(top));
                    cell.set_bg(to_color(bottom));
                }
            }
        }
    }
}
