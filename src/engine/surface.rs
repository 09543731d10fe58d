// Drawing surface used by every mode, plus the software raster the TUI
// presents. Geometry primitives validate their arguments the way a 2D
// canvas does (a negative arc radius is an error), so a misbehaving mode
// shows up as a per-frame fault instead of garbage pixels.

use anyhow::ensure;

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Linear interpolation in RGB space, `t` clamped to 0..1.
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    /// HSL to RGB. Hue in degrees (any range), saturation and lightness in 0..1.
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Rgb {
        let h = hue.rem_euclid(360.0) / 60.0;
        let s = saturation.clamp(0.0, 1.0);
        let l = lightness.clamp(0.0, 1.0);
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to_byte = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to_byte(r), to_byte(g), to_byte(b))
    }
}

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        self.distance_sq(other).sqrt()
    }

    pub fn distance_sq(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Point at `radius` from `self` in direction `angle` (radians).
    pub fn polar(self, angle: f32, radius: f32) -> Point {
        Point::new(self.x + angle.cos() * radius, self.y + angle.sin() * radius)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis-aligned clip rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The 2D drawing surface the engine renders into.
///
/// Alpha is always a separate `0..1` argument; colors are opaque RGB.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Resize the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32);

    fn clear(&mut self, color: Rgb);

    /// Blend `color` over the whole surface at `alpha`, leaving motion trails.
    fn fade(&mut self, color: Rgb, alpha: f32);

    /// Restrict subsequent drawing to `clip`, or lift the restriction.
    fn set_clip(&mut self, clip: Option<ClipRect>);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()>;

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()>;

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgb,
        alpha: f32,
    ) -> anyhow::Result<()>;

    fn fill_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32) -> anyhow::Result<()>;

    fn stroke_line(&mut self, a: Point, b: Point, width: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()>;

    /// Radial gradient from `color` at `alpha` in the center to transparent at `radius`.
    fn glow(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32) -> anyhow::Result<()>;

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        for pair in points.windows(2) {
            self.stroke_line(pair[0], pair[1], width, color, alpha)?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn stroke_arc(
        &mut self,
        center: Point,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Rgb,
        alpha: f32,
    ) -> anyhow::Result<()> {
        ensure!(
            radius.is_finite() && radius >= 0.0,
            "arc radius must be non-negative, got {radius}"
        );
        let sweep = end - start;
        let steps = ((sweep.abs() * radius / 4.0).ceil() as usize).clamp(2, 128);
        let points: Vec<Point> = (0..=steps)
            .map(|i| center.polar(start + sweep * i as f32 / steps as f32, radius))
            .collect();
        self.stroke_polyline(&points, width, color, alpha)
    }

    fn center(&self) -> Point {
        Point::new(self.width() / 2.0, self.height() / 2.0)
    }

    fn is_empty(&self) -> bool {
        self.width() < 1.0 || self.height() < 1.0
    }
}

/// Software RGB raster with alpha compositing and scanline polygon fill.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    clip: Option<ClipRect>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as usize, height as usize);
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
            clip: None,
        }
    }

    pub fn pixel_width(&self) -> usize {
        self.width
    }

    pub fn pixel_height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// True when every pixel equals `color`.
    pub fn is_uniform(&self, color: Rgb) -> bool {
        self.pixels.iter().all(|&p| p == color)
    }

    /// Integer drawing bounds after clipping: (x0, y0, x1, y1), ends exclusive.
    fn bounds(&self) -> (usize, usize, usize, usize) {
        match self.clip {
            None => (0, 0, self.width, self.height),
            Some(c) => {
                let x0 = c.x.floor().max(0.0) as usize;
                let y0 = c.y.floor().max(0.0) as usize;
                let x1 = ((c.x + c.width).ceil().max(0.0) as usize).min(self.width);
                let y1 = ((c.y + c.height).ceil().max(0.0) as usize).min(self.height);
                (x0.min(x1), y0.min(y1), x1, y1)
            }
        }
    }

    /// Pixel ranges covering `[min, max]` in one axis, clamped to `lo..hi`.
    fn span(min: f32, max: f32, lo: usize, hi: usize) -> std::ops::Range<usize> {
        let start = (min.floor().max(lo as f32) as usize).min(hi);
        let end = ((max.ceil() + 1.0).max(0.0) as usize).clamp(start, hi);
        start..end
    }

    fn blend(&mut self, x: usize, y: usize, color: Rgb, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let idx = y * self.width + x;
        if alpha >= 1.0 {
            self.pixels[idx] = color;
            return;
        }
        let p = self.pixels[idx];
        let mix = |a: u8, b: u8| {
            let v = (a as f32 + (b as f32 - a as f32) * alpha).round() as i32;
            // Always move at least one step so fades converge on the target.
            if v == a as i32 && a != b {
                if b > a {
                    a + 1
                } else {
                    a - 1
                }
            } else {
                v.clamp(0, 255) as u8
            }
        };
        self.pixels[idx] = Rgb::new(mix(p.r, color.r), mix(p.g, color.g), mix(p.b, color.b));
    }

    fn scan_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32) {
        let (bx0, by0, bx1, by1) = self.bounds();
        let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let mut crossings: Vec<f32> = Vec::with_capacity(8);

        for y in Self::span(min_y, max_y, by0, by1) {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, &a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    let t = (sy - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let start = (pair[0] - 0.5).ceil().max(bx0 as f32);
                let end = (pair[1] - 0.5).floor().min(bx1 as f32 - 1.0);
                if end < start {
                    continue;
                }
                for x in start as usize..=end as usize {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Visit every pixel center within `reach` of `center` with its distance.
    fn for_each_near(&mut self, center: Point, reach: f32, mut visit: impl FnMut(&mut Self, usize, usize, f32)) {
        let (bx0, by0, bx1, by1) = self.bounds();
        let xs = Self::span(center.x - reach, center.x + reach, bx0, bx1);
        for y in Self::span(center.y - reach, center.y + reach, by0, by1) {
            for x in xs.clone() {
                let d = Point::new(x as f32 + 0.5, y as f32 + 0.5).distance(center);
                if d <= reach {
                    visit(self, x, y, d);
                }
            }
        }
    }
}

fn check_radius(center: Point, radius: f32) -> anyhow::Result<()> {
    ensure!(center.is_finite(), "non-finite center ({}, {})", center.x, center.y);
    ensure!(
        radius.is_finite() && radius >= 0.0,
        "radius must be non-negative, got {radius}"
    );
    Ok(())
}

impl Surface for Raster {
    fn width(&self) -> f32 {
        self.width as f32
    }

    fn height(&self) -> f32 {
        self.height as f32
    }

    fn resize(&mut self, width: u32, height: u32) {
        *self = Raster::new(width, height);
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        let (x0, y0, x1, y1) = self.bounds();
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, alpha);
            }
        }
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.clip = clip;
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        ensure!(
            x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite(),
            "non-finite rectangle"
        );
        let (left, right) = if w < 0.0 { (x + w, x) } else { (x, x + w) };
        let (top, bottom) = if h < 0.0 { (y + h, y) } else { (y, y + h) };
        let (bx0, by0, bx1, by1) = self.bounds();
        let x_start = (left.round().max(bx0 as f32) as usize).min(bx1);
        let x_end = (right.round().max(0.0) as usize).clamp(x_start, bx1);
        let y_start = (top.round().max(by0 as f32) as usize).min(by1);
        let y_end = (bottom.round().max(0.0) as usize).clamp(y_start, by1);
        for py in y_start..y_end {
            for px in x_start..x_end {
                self.blend(px, py, color, alpha);
            }
        }
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        check_radius(center, radius)?;
        self.for_each_near(center, radius + 0.5, |s, x, y, d| {
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            s.blend(x, y, color, alpha * coverage);
        });
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgb,
        alpha: f32,
    ) -> anyhow::Result<()> {
        check_radius(center, radius)?;
        let half = width.max(1.0) / 2.0;
        self.for_each_near(center, radius + half + 0.5, |s, x, y, d| {
            let coverage = (half + 0.5 - (d - radius).abs()).clamp(0.0, 1.0);
            s.blend(x, y, color, alpha * coverage);
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32) -> anyhow::Result<()> {
        ensure!(
            points.iter().all(|p| p.is_finite()),
            "polygon has non-finite vertices"
        );
        if points.len() < 3 {
            return Ok(());
        }
        self.scan_polygon(points, color, alpha);
        Ok(())
    }

    fn stroke_line(&mut self, a: Point, b: Point, width: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        ensure!(a.is_finite() && b.is_finite(), "line has non-finite endpoints");
        let half = width.max(1.0) / 2.0;
        let length = a.distance(b);
        if length < 1e-3 {
            return self.fill_circle(a, half, color, alpha);
        }
        let nx = -(b.y - a.y) / length * half;
        let ny = (b.x - a.x) / length * half;
        let quad = [
            Point::new(a.x + nx, a.y + ny),
            Point::new(b.x + nx, b.y + ny),
            Point::new(b.x - nx, b.y - ny),
            Point::new(a.x - nx, a.y - ny),
        ];
        self.scan_polygon(&quad, color, alpha);
        Ok(())
    }

    fn glow(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32) -> anyhow::Result<()> {
        check_radius(center, radius)?;
        if radius < 0.5 {
            return Ok(());
        }
        self.for_each_near(center, radius, |s, x, y, d| {
            let falloff = 1.0 - d / radius;
            s.blend(x, y, color, alpha * falloff * falloff);
        });
        Ok(())
    }
}
