// Headless runs: drive the engine against an offscreen raster without a
// terminal and summarize what happened. Used by `--headless` and by tests.

use serde::Serialize;
use tracing::info;

use crate::engine::driver::FrameDriver;
use crate::engine::performance::PerformanceState;
use crate::engine::surface::Raster;
use crate::engine::{Engine, EngineOptions, EngineStats};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub mode: &'static str,
    pub family: &'static str,
    pub width: u32,
    pub height: u32,
    pub state: String,
    pub entities: usize,
    pub stats: EngineStats,
    pub performance: PerformanceState,
}

impl RunReport {
    pub fn from_engine(engine: &Engine<Raster>) -> Self {
        let slot = engine.active_slot();
        Self {
            mode: slot.kind().label(),
            family: engine.family().label(),
            width: engine.surface().pixel_width() as u32,
            height: engine.surface().pixel_height() as u32,
            state: format!("{:?}", slot.state()),
            entities: slot.entity_count(),
            stats: engine.stats(),
            performance: engine.performance(),
        }
    }
}

/// Render frames until `driver` stops, then tear the engine down.
pub fn run(options: EngineOptions, width: u32, height: u32, driver: &mut dyn FrameDriver) -> RunReport {
    let mut engine = Engine::new(Raster::new(width, height), options);
    engine.run(driver);
    let report = RunReport::from_engine(&engine);
    info!(
        frames = report.stats.frames,
        faults = report.stats.faults,
        quality = report.performance.quality,
        "headless run finished"
    );
    engine.destroy();
    report
}
