// Uniform spatial hash for neighbor queries. Modes rebuild it once per
// frame; `clear` keeps bucket allocations so rebuilding doesn't allocate.

use std::collections::HashMap;

use super::surface::Point;

/// Pack a cell coordinate into one map key.
pub fn cell_key(cx: i32, cy: i32) -> u64 {
    ((cx as u32 as u64) << 32) | cy as u32 as u64
}

fn unpack_key(key: u64) -> (i32, i32) {
    ((key >> 32) as u32 as i32, key as u32 as i32)
}

/// Above this many cells in the search square, scan the occupied buckets
/// instead of probing every cell.
const MAX_PROBED_CELLS: u64 = 4096;

#[derive(Debug, Clone)]
pub struct SpatialGrid<T> {
    cell_size: f32,
    cells: HashMap<u64, Vec<T>>,
    len: usize,
}

impl<T: Copy> SpatialGrid<T> {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: HashMap::new(),
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Cell containing `pos`. Coordinates beyond the `i32` range saturate
    /// into the edge cells.
    pub fn cell_of(&self, pos: Point) -> (i32, i32) {
        (
            (pos.x / self.cell_size).floor() as i32,
            (pos.y / self.cell_size).floor() as i32,
        )
    }

    /// Add `value` to the bucket for `pos`. Non-finite positions are ignored.
    pub fn insert(&mut self, pos: Point, value: T) {
        if !pos.is_finite() {
            return;
        }
        let (cx, cy) = self.cell_of(pos);
        self.cells.entry(cell_key(cx, cy)).or_default().push(value);
        self.len += 1;
    }

    /// Everything bucketed within `⌈radius / cell⌉` rings of `pos`'s cell.
    /// May include values outside `radius`; callers distance-check.
    pub fn query(&self, pos: Point, radius: f32) -> Vec<T> {
        let mut out = Vec::new();
        self.query_into(pos, radius, &mut out);
        out
    }

    /// Like `query`, appending into a caller-owned buffer.
    pub fn query_into(&self, pos: Point, radius: f32, out: &mut Vec<T>) {
        if !pos.is_finite() || !radius.is_finite() {
            return;
        }
        let (cx, cy) = self.cell_of(pos);
        let (cx, cy) = (cx as i64, cy as i64);
        let rings = (radius.max(0.0) / self.cell_size).ceil().min(i32::MAX as f32) as i64;
        let side = (2 * rings + 1) as u64;

        if side.saturating_mul(side) > MAX_PROBED_CELLS.max(self.cells.len() as u64) {
            for (&key, bucket) in &self.cells {
                let (kx, ky) = unpack_key(key);
                if (kx as i64 - cx).abs() <= rings && (ky as i64 - cy).abs() <= rings {
                    out.extend_from_slice(bucket);
                }
            }
            return;
        }

        let cell_range = i32::MIN as i64..=i32::MAX as i64;
        for y in cy - rings..=cy + rings {
            for x in cx - rings..=cx + rings {
                if !cell_range.contains(&x) || !cell_range.contains(&y) {
                    continue;
                }
                if let Some(bucket) = self.cells.get(&cell_key(x as i32, y as i32)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
    }
}
