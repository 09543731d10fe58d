// Spatial hash grid: neighbor queries and rebuild behavior.

use radiolume::engine::spatial::{cell_key, SpatialGrid};
use radiolume::engine::surface::Point;

fn scattered_points(count: usize, seed: u64) -> Vec<Point> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count)
        .map(|_| Point::new(rng.f32() * 400.0 - 50.0, rng.f32() * 300.0 - 50.0))
        .collect()
}

// ── Queries ──────────────────────────────────────────────────────────────────

#[test]
fn test_query_is_superset_of_brute_force() {
    let points = scattered_points(300, 3);
    let mut grid = SpatialGrid::new(40.0);
    for (i, &p) in points.iter().enumerate() {
        grid.insert(p, i);
    }

    for &probe in points.iter().take(40) {
        for radius in [10.0, 40.0, 95.0] {
            let found = grid.query(probe, radius);
            for (i, &p) in points.iter().enumerate() {
                if p.distance(probe) <= radius {
                    assert!(found.contains(&i), "missed point {i} within {radius}");
                }
            }
        }
    }
}

#[test]
fn test_query_into_appends() {
    let mut grid = SpatialGrid::new(10.0);
    grid.insert(Point::new(5.0, 5.0), 1u32);
    let mut out = vec![99];
    grid.query_into(Point::new(6.0, 6.0), 1.0, &mut out);
    assert_eq!(out, vec![99, 1]);
}

#[test]
fn test_negative_coordinates_use_their_own_cells() {
    let mut grid = SpatialGrid::new(10.0);
    grid.insert(Point::new(-5.0, -5.0), 'a');
    grid.insert(Point::new(5.0, 5.0), 'b');
    assert_eq!(grid.cell_of(Point::new(-5.0, -5.0)), (-1, -1));
    // Radius 0 only looks at the probe's own cell.
    assert_eq!(grid.query(Point::new(-1.0, -1.0), 0.0), vec!['a']);
    assert_eq!(grid.query(Point::new(1.0, 1.0), 0.0), vec!['b']);
}

#[test]
fn test_cell_keys_are_distinct() {
    let keys = [
        cell_key(0, 0),
        cell_key(-1, 0),
        cell_key(0, -1),
        cell_key(1, 0),
        cell_key(0, 1),
        cell_key(-1, -1),
    ];
    for (i, a) in keys.iter().enumerate() {
        for b in &keys[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

// ── Rebuild ──────────────────────────────────────────────────────────────────

#[test]
fn test_clear_empties_grid() {
    let mut grid = SpatialGrid::new(20.0);
    for (i, p) in scattered_points(50, 9).into_iter().enumerate() {
        grid.insert(p, i);
    }
    assert_eq!(grid.len(), 50);
    grid.clear();
    assert!(grid.is_empty());
    assert!(grid.query(Point::new(100.0, 100.0), 500.0).is_empty());
}

#[test]
fn test_non_finite_positions_are_ignored() {
    let mut grid = SpatialGrid::new(20.0);
    grid.insert(Point::new(f32::NAN, 1.0), 1);
    grid.insert(Point::new(1.0, f32::INFINITY), 2);
    assert!(grid.is_empty());
    assert!(grid.query(Point::new(f32::NAN, 0.0), 10.0).is_empty());
}

#[test]
fn test_cell_size_has_floor() {
    let grid: SpatialGrid<u8> = SpatialGrid::new(0.0);
    assert_eq!(grid.cell_size(), 1.0);
}

// ── Extreme inputs ───────────────────────────────────────────────────────────

#[test]
fn test_far_positions_saturate_into_edge_cells() {
    let mut grid = SpatialGrid::new(100.0);
    grid.insert(Point::new(1e20, 0.0), 7);
    grid.insert(Point::new(-1e20, -1e20), 8);
    assert_eq!(grid.cell_of(Point::new(1e20, 0.0)).0, i32::MAX);

    assert_eq!(grid.query(Point::new(1e20, 0.0), 10.0), vec![7]);
    assert_eq!(grid.query(Point::new(-1e20, -1e20), 10.0), vec![8]);
    assert!(grid.query(Point::new(0.0, 0.0), 10.0).is_empty());
}

#[test]
fn test_huge_radius_returns_every_entry() {
    let mut grid = SpatialGrid::new(10.0);
    grid.insert(Point::new(0.0, 0.0), 1);
    grid.insert(Point::new(5_000.0, -3_000.0), 2);
    grid.insert(Point::new(1e20, 1e20), 3);

    let mut found = grid.query(Point::new(0.0, 0.0), f32::MAX);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2, 3]);

    // Large but not saturating: everything inside the square, nothing outside.
    let mut found = grid.query(Point::new(0.0, 0.0), 1e6);
    found.sort_unstable();
    assert_eq!(found, vec![1, 2]);
}
