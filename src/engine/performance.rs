// Frame-time tracking and the adaptive quality scalar.
//
// Quality degrades 5% per frame while the smoothed frame time is above
// 20 ms and recovers 2% per frame below 14 ms. Between the two it holds,
// which keeps the scalar from oscillating around the 16.7 ms target.

use serde::Serialize;

pub const MIN_QUALITY: f32 = 0.3;
pub const MAX_QUALITY: f32 = 1.0;
pub const DEGRADE_ABOVE_MS: f64 = 20.0;
pub const RECOVER_BELOW_MS: f64 = 14.0;
pub const DEGRADE_FACTOR: f32 = 0.95;
pub const RECOVER_FACTOR: f32 = 1.02;
const EMA_WEIGHT: f64 = 0.1;
const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;

/// Snapshot handed to modes each frame. Read-only outside the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceState {
    pub ema_frame_time_ms: f64,
    pub fps: f64,
    pub quality: f32,
}

impl Default for PerformanceState {
    fn default() -> Self {
        Self {
            ema_frame_time_ms: TARGET_FRAME_MS,
            fps: 1000.0 / TARGET_FRAME_MS,
            quality: MAX_QUALITY,
        }
    }
}

#[derive(Debug, Default)]
pub struct PerformanceMonitor {
    state: PerformanceState,
    last_frame_ms: Option<f64>,
}

impl PerformanceMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PerformanceState {
        self.state
    }

    /// Forget the previous timestamp so a pause doesn't register as one huge frame.
    pub fn reset_clock(&mut self) {
        self.last_frame_ms = None;
    }

    pub fn tick(&mut self, now_ms: f64) -> PerformanceState {
        let Some(last) = self.last_frame_ms.replace(now_ms) else {
            return self.state;
        };
        let delta = (now_ms - last).max(0.0);
        let ema = self.state.ema_frame_time_ms * (1.0 - EMA_WEIGHT) + delta * EMA_WEIGHT;
        self.state.ema_frame_time_ms = ema;
        self.state.fps = if ema > 0.0 { 1000.0 / ema } else { 0.0 };

        let before = self.state.quality;
        let mut quality = before;
        if ema > DEGRADE_ABOVE_MS {
            quality *= DEGRADE_FACTOR;
        } else if ema < RECOVER_BELOW_MS && quality < MAX_QUALITY {
            quality *= RECOVER_FACTOR;
        }
        self.state.quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);

        if (before * 10.0).floor() != (self.state.quality * 10.0).floor() {
            tracing::debug!(
                quality = self.state.quality,
                ema_ms = ema,
                "render quality changed"
            );
        }
        self.state
    }
}
