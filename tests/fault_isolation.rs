// Fault containment: a failing draw skips one frame, a failing reset
// parks the mode, and the loop keeps running either way.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use radiolume::engine::lifecycle::{FrameOutcome, LifecycleState};
use radiolume::engine::surface::{ClipRect, Point, Raster, Rgb, Surface};
use radiolume::engine::{Engine, EngineOptions};

/// Raster whose circle primitives fail while `fail` is set.
struct FlakySurface {
    inner: Raster,
    fail: Arc<AtomicBool>,
}

impl FlakySurface {
    fn check(&self) -> anyhow::Result<()> {
        if self.fail.load(Ordering::Relaxed) {
            anyhow::bail!("surface unavailable");
        }
        Ok(())
    }
}

impl Surface for FlakySurface {
    fn width(&self) -> f32 {
        self.inner.width()
    }

    fn height(&self) -> f32 {
        self.inner.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }

    fn clear(&mut self, color: Rgb) {
        self.inner.clear(color);
    }

    fn fade(&mut self, color: Rgb, alpha: f32) {
        self.inner.fade(color, alpha);
    }

    fn set_clip(&mut self, clip: Option<ClipRect>) {
        self.inner.set_clip(clip);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        self.inner.fill_rect(x, y, w, h, color, alpha)
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        self.check()?;
        self.inner.fill_circle(center, radius, color, alpha)
    }

    fn stroke_circle(
        &mut self,
        center: Point,
        radius: f32,
        width: f32,
        color: Rgb,
        alpha: f32,
    ) -> anyhow::Result<()> {
        self.check()?;
        self.inner.stroke_circle(center, radius, width, color, alpha)
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgb, alpha: f32) -> anyhow::Result<()> {
        self.inner.fill_polygon(points, color, alpha)
    }

    fn stroke_line(&mut self, a: Point, b: Point, width: f32, color: Rgb, alpha: f32)
        -> anyhow::Result<()> {
        self.inner.stroke_line(a, b, width, color, alpha)
    }

    fn glow(&mut self, center: Point, radius: f32, color: Rgb, alpha: f32) -> anyhow::Result<()> {
        self.check()?;
        self.inner.glow(center, radius, color, alpha)
    }
}

fn flaky_engine(mode: usize) -> (Engine<FlakySurface>, Arc<AtomicBool>) {
    let fail = Arc::new(AtomicBool::new(false));
    let surface = FlakySurface {
        inner: Raster::new(120, 80),
        fail: fail.clone(),
    };
    let options = EngineOptions {
        mode,
        seed: 7,
        ..EngineOptions::default()
    };
    (Engine::new(surface, options), fail)
}

// ── Draw faults ──────────────────────────────────────────────────────────────

#[test]
fn test_draw_fault_skips_frame_and_continues() {
    // Voronoi draws its seeds with fill_circle.
    let (mut engine, fail) = flaky_engine(3);
    assert_eq!(engine.frame(0.0), FrameOutcome::Drawn);

    fail.store(true, Ordering::Relaxed);
    for i in 1..=5 {
        assert_eq!(engine.frame(i as f64 * 16.0), FrameOutcome::Fault);
    }
    assert_eq!(engine.stats().faults, 5);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
    assert_eq!(engine.active_slot().entity_count(), 15);
    assert!(engine.is_running());

    fail.store(false, Ordering::Relaxed);
    assert_eq!(engine.frame(96.0), FrameOutcome::Drawn);
    assert_eq!(engine.stats().frames, 7);
}

#[test]
fn test_fault_in_one_mode_does_not_leak_into_next() {
    let (mut engine, fail) = flaky_engine(3);
    fail.store(true, Ordering::Relaxed);
    assert_eq!(engine.frame(0.0), FrameOutcome::Fault);

    fail.store(false, Ordering::Relaxed);
    engine.request_mode(6);
    assert_eq!(engine.frame(16.0), FrameOutcome::Drawn);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
}

// ── Reset faults ─────────────────────────────────────────────────────────────

#[test]
fn test_zero_area_reset_parks_mode() {
    let mut engine = Engine::new(Raster::new(0, 0), EngineOptions::default());
    assert_eq!(engine.active_slot().state(), LifecycleState::Faulted);
    assert_eq!(engine.active_slot().entity_count(), 0);

    for i in 0..3 {
        assert_eq!(engine.frame(i as f64 * 16.0), FrameOutcome::Skipped);
    }
    assert_eq!(engine.stats().skipped, 3);
    assert!(engine.is_running());

    // A usable size brings it back.
    engine.request_resize(64, 64);
    engine.frame(48.0);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
    assert!(engine.active_slot().entity_count() > 0);
}

#[test]
fn test_every_mode_faults_cleanly_on_zero_area() {
    for family in [
        radiolume::engine::modes::Family::Geometric,
        radiolume::engine::modes::Family::Elemental,
    ] {
        for mode in 0..8 {
            let options = EngineOptions {
                family,
                mode,
                ..EngineOptions::default()
            };
            let mut engine = Engine::new(Raster::new(0, 0), options);
            assert_eq!(
                engine.active_slot().state(),
                LifecycleState::Faulted,
                "{:?} accepted an empty surface",
                engine.active_kind()
            );
            assert_eq!(engine.frame(0.0), FrameOutcome::Skipped);
        }
    }
}

#[test]
fn test_bad_hex_size_faults_only_hexagon_mode() {
    let options = EngineOptions {
        hex_size: 0.5,
        ..EngineOptions::default()
    };
    let mut engine = Engine::new(Raster::new(64, 64), options);
    assert_eq!(engine.active_slot().state(), LifecycleState::Faulted);

    engine.request_mode(1);
    assert_eq!(engine.frame(0.0), FrameOutcome::Drawn);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
}
