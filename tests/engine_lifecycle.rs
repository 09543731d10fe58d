// Frame scheduler: request coalescing, mode lifecycle and the end-to-end
// scenarios the engine must satisfy.

use radiolume::engine::driver::FixedStepDriver;
use radiolume::engine::lifecycle::{FrameOutcome, LifecycleState};
use radiolume::engine::modes::hexagon::{layout_dimensions, INIT_BATCH};
use radiolume::engine::modes::{Family, Mode, ModeKind, MODES_PER_FAMILY};
use radiolume::engine::sampler::SharedSpectrum;
use radiolume::engine::surface::{Raster, Rgb, Surface};
use radiolume::engine::{Engine, EngineOptions};

fn options(mode: usize) -> EngineOptions {
    EngineOptions {
        mode,
        seed: 42,
        ..EngineOptions::default()
    }
}

/// Engine fed from a spectrum the test controls. Starts silent.
fn fed_engine(width: u32, height: u32, options: EngineOptions) -> (Engine<Raster>, SharedSpectrum) {
    let mut engine = Engine::new(Raster::new(width, height), options);
    let spectrum = SharedSpectrum::new();
    engine.sampler_mut().attach(Box::new(spectrum.clone()));
    (engine, spectrum)
}

fn run_frames(engine: &mut Engine<Raster>, start_ms: f64, frames: usize) -> f64 {
    let mut now = start_ms;
    for _ in 0..frames {
        engine.frame(now);
        now += 16.0;
    }
    now
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn test_tiny_surface_gets_margin_grid() {
    let opts = EngineOptions {
        hex_size: 150.0,
        ..options(0)
    };
    let (mut engine, _spectrum) = fed_engine(2, 2, opts);
    assert_eq!(engine.active_kind(), ModeKind::HexagonGrid);
    assert_eq!(engine.active_slot().entity_count(), 0);

    assert_eq!(engine.frame(0.0), FrameOutcome::Drawn);
    let Mode::HexagonGrid(grid) = engine.active_slot().mode() else {
        panic!("expected hexagon grid");
    };
    assert_eq!(grid.hexagons().len(), 9);
    assert!(grid.active_hexagons().is_empty());
}

#[test]
fn test_mode_switch_disposes_previous_mode() {
    let mut engine = Engine::new(Raster::new(320, 180), options(0));
    engine.frame(0.0);
    assert!(engine.slot(0).entity_count() > 0);

    engine.request_mode(3);
    assert_eq!(engine.active_index(), 0, "requests wait for the next frame");
    engine.frame(16.0);

    assert_eq!(engine.slot(0).entity_count(), 0);
    assert_eq!(engine.slot(0).state(), LifecycleState::Disposed);
    assert_eq!(engine.active_kind(), ModeKind::VoronoiCells);
    let Mode::VoronoiCells(cells) = engine.active_slot().mode() else {
        panic!("expected voronoi cells");
    };
    assert_eq!(cells.points().len(), 15);
    for p in cells.points() {
        assert!((0.0..=320.0).contains(&p.position.x));
        assert!((0.0..=180.0).contains(&p.position.y));
    }
}

#[test]
fn test_silent_input_spawns_no_orbs() {
    let (mut engine, _spectrum) = fed_engine(160, 90, options(5));
    assert_eq!(engine.active_kind(), ModeKind::EnergyOrbs);
    run_frames(&mut engine, 0.0, 200);

    let Mode::EnergyOrbs(orbs) = engine.active_slot().mode() else {
        panic!("expected energy orbs");
    };
    assert_eq!(orbs.spawned_total(), 0);
    assert!(orbs.particles().is_empty());
    assert!(engine.surface().is_uniform(engine.background()));
}

#[test]
fn test_bass_burst_spawns_two_orbs() {
    let (mut engine, spectrum) = fed_engine(160, 90, options(5));
    spectrum.publish(&[230; 128]);
    engine.frame(0.0);

    let Mode::EnergyOrbs(orbs) = engine.active_slot().mode() else {
        panic!("expected energy orbs");
    };
    assert_eq!(orbs.particles().len(), 2);
    assert!(orbs.particles().iter().all(|p| p.life == 1.0));
}

#[test]
fn test_orbs_respect_cap_and_expire() {
    let (mut engine, spectrum) = fed_engine(160, 90, options(5));
    spectrum.publish(&[255; 128]);
    let mut now = 0.0;
    for _ in 0..300 {
        engine.frame(now);
        now += 16.0;
        assert!(engine.active_slot().entity_count() <= 30);
    }
    assert!(engine.active_slot().entity_count() > 0);

    spectrum.publish(&[]);
    run_frames(&mut engine, now, 110);
    assert_eq!(engine.active_slot().entity_count(), 0);
}

// ── Initialization ───────────────────────────────────────────────────────────

#[test]
fn test_hexagon_grid_builds_in_batches() {
    let opts = EngineOptions {
        hex_size: 10.0,
        ..options(0)
    };
    let (mut engine, _spectrum) = fed_engine(400, 300, opts);
    let (cols, rows) = layout_dimensions(400.0, 300.0, 10.0);
    let total = cols * rows;
    let steps = total.div_ceil(INIT_BATCH);
    assert!(steps > 1);

    let mut previous = 0;
    for step in 1..steps {
        assert_eq!(engine.frame(step as f64 * 16.0), FrameOutcome::Initializing);
        assert_eq!(engine.active_slot().state(), LifecycleState::Initializing);
        let built = engine.active_slot().entity_count();
        assert_eq!(built, step * INIT_BATCH);
        assert!(built > previous);
        previous = built;
    }
    assert_eq!(engine.frame(steps as f64 * 16.0), FrameOutcome::Drawn);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
    assert_eq!(engine.active_slot().entity_count(), total);
}

#[test]
fn test_switch_during_init_cancels_batches() {
    let opts = EngineOptions {
        hex_size: 10.0,
        ..options(0)
    };
    let mut engine = Engine::new(Raster::new(400, 300), opts);
    engine.frame(0.0);
    assert_eq!(engine.active_slot().state(), LifecycleState::Initializing);

    engine.request_mode(1);
    engine.frame(16.0);
    assert_eq!(engine.slot(0).entity_count(), 0);
    assert_eq!(engine.slot(0).state(), LifecycleState::Disposed);

    // Coming back starts the build from scratch.
    engine.request_mode(0);
    engine.frame(32.0);
    assert_eq!(engine.active_slot().entity_count(), INIT_BATCH);
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[test]
fn test_mode_requests_coalesce() {
    let mut engine = Engine::new(Raster::new(64, 64), options(0));
    let resets = engine.stats().resets;
    engine.request_mode(1);
    engine.request_mode(2);
    engine.request_mode(6);
    engine.frame(0.0);
    assert_eq!(engine.active_index(), 6);
    assert_eq!(engine.stats().resets, resets + 1);
}

#[test]
fn test_mode_index_wraps() {
    let mut engine = Engine::new(Raster::new(64, 64), options(0));
    engine.request_mode(11);
    engine.frame(0.0);
    assert_eq!(engine.active_index(), 3);

    let mut engine = Engine::new(Raster::new(64, 64), options(MODES_PER_FAMILY + 2));
    assert_eq!(engine.active_index(), 2);
    engine.step_mode(false);
    engine.step_mode(false);
    engine.step_mode(false);
    engine.frame(0.0);
    assert_eq!(engine.active_index(), 7);
}

#[test]
fn test_selecting_active_mode_does_not_reset() {
    let mut engine = Engine::new(Raster::new(64, 64), options(2));
    engine.frame(0.0);
    let resets = engine.stats().resets;
    engine.request_mode(2);
    engine.frame(16.0);
    assert_eq!(engine.stats().resets, resets);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
}

#[test]
fn test_family_switch_starts_at_first_mode() {
    let mut engine = Engine::new(Raster::new(120, 80), options(4));
    engine.frame(0.0);
    engine.request_family(Family::Elemental);
    engine.frame(16.0);
    assert_eq!(engine.family(), Family::Elemental);
    assert_eq!(engine.active_kind(), ModeKind::LightningStorm);
    assert_eq!(engine.active_slot().state(), LifecycleState::Active);
}

#[test]
fn test_family_switch_with_mode() {
    let mut engine = Engine::new(Raster::new(120, 80), options(0));
    engine.request_family(Family::Elemental);
    engine.request_mode(4);
    engine.frame(0.0);
    assert_eq!(engine.active_kind(), ModeKind::MagneticField);
    for i in (0..MODES_PER_FAMILY).filter(|&i| i != 4) {
        assert_eq!(engine.slot(i).entity_count(), 0);
    }
}

#[test]
fn test_only_active_mode_holds_entities() {
    let mut engine = Engine::new(Raster::new(200, 120), options(0));
    let mut now = 0.0;
    for index in [1, 2, 3, 4, 5, 6, 7, 0, 3] {
        engine.request_mode(index);
        now = run_frames(&mut engine, now, 3);
        for i in (0..MODES_PER_FAMILY).filter(|&i| i != index) {
            assert_eq!(engine.slot(i).entity_count(), 0, "slot {i} still live");
        }
    }
}

#[test]
fn test_disable_and_enable() {
    let mut engine = Engine::new(Raster::new(80, 60), options(3));
    engine.frame(0.0);
    assert!(engine.active_slot().entity_count() > 0);

    engine.toggle_enabled();
    assert_eq!(engine.frame(16.0), FrameOutcome::Skipped);
    assert!(!engine.is_enabled());
    assert_eq!(engine.active_slot().state(), LifecycleState::Disposed);
    assert_eq!(engine.active_slot().entity_count(), 0);
    assert!(engine.surface().is_uniform(engine.background()));
    assert_eq!(engine.frame(32.0), FrameOutcome::Skipped);

    engine.request_enabled(true);
    assert_eq!(engine.frame(48.0), FrameOutcome::Drawn);
    assert_eq!(engine.active_slot().entity_count(), 15);
}

#[test]
fn test_starting_disabled_builds_nothing() {
    let opts = EngineOptions {
        enabled: false,
        ..options(0)
    };
    let mut engine = Engine::new(Raster::new(80, 60), opts);
    assert_eq!(engine.stats().resets, 0);
    assert_eq!(engine.frame(0.0), FrameOutcome::Skipped);
    assert_eq!(engine.active_slot().state(), LifecycleState::Uninitialized);
}

#[test]
fn test_resize_resets_active_mode() {
    let mut engine = Engine::new(Raster::new(80, 60), options(3));
    engine.frame(0.0);
    let resets = engine.stats().resets;

    engine.request_resize(100, 50);
    engine.frame(16.0);
    assert_eq!(engine.surface().width(), 100.0);
    assert_eq!(engine.surface().height(), 50.0);
    assert_eq!(engine.stats().resets, resets + 1);

    // Same size again is a no-op.
    engine.request_resize(100, 50);
    engine.frame(32.0);
    assert_eq!(engine.stats().resets, resets + 1);
}

#[test]
fn test_background_and_intensity_requests() {
    let (mut engine, _spectrum) = fed_engine(40, 30, options(5));
    let color = Rgb::new(1, 2, 3);
    engine.request_background(color);
    engine.request_intensity(10.0);
    assert_eq!(engine.pending_intensity(), 10.0);
    engine.frame(0.0);
    assert_eq!(engine.background(), color);
    assert_eq!(engine.intensity(), 3.0);
    assert!(engine.surface().is_uniform(color));

    engine.request_intensity(0.0);
    engine.frame(16.0);
    assert_eq!(engine.intensity(), 0.25);
}

// ── Loop ─────────────────────────────────────────────────────────────────────

#[test]
fn test_run_drives_every_frame() {
    let mut engine = Engine::new(Raster::new(64, 48), options(1));
    let mut driver = FixedStepDriver::new(16.0, 10);
    engine.run(&mut driver);
    let stats = engine.stats();
    assert_eq!(stats.frames, 10);
    assert_eq!(stats.drawn + stats.faults + stats.skipped, 10);
    assert_eq!(engine.active_slot().ticks(), stats.drawn + stats.faults);
}

#[test]
fn test_destroy_stops_loop() {
    let mut engine = Engine::new(Raster::new(64, 48), options(0));
    engine.frame(0.0);
    engine.destroy();
    assert!(!engine.is_running());
    for i in 0..MODES_PER_FAMILY {
        assert_eq!(engine.slot(i).state(), LifecycleState::Disposed);
        assert_eq!(engine.slot(i).entity_count(), 0);
    }
    let frames = engine.stats().frames;
    assert_eq!(engine.frame(16.0), FrameOutcome::Skipped);
    engine.run(&mut FixedStepDriver::new(16.0, 5));
    assert_eq!(engine.stats().frames, frames);
}

#[test]
fn test_same_seed_renders_same_pixels() {
    let render = || {
        let mut engine = Engine::new(Raster::new(96, 64), options(3));
        engine.run(&mut FixedStepDriver::new(16.0, 30));
        engine.surface().pixels().to_vec()
    };
    assert_eq!(render(), render());
}
