// The rendering engine: frame scheduler plus the pieces it coordinates.
//
// One `Engine` owns its surface, sampler, performance monitor and the eight
// mode slots of the active family. Everything runs inside `frame()`; input
// arrives as requests that are coalesced and applied at the next frame
// boundary so a mode is never reset halfway through drawing.

pub mod driver;
pub mod lifecycle;
pub mod modes;
pub mod performance;
pub mod sampler;
pub mod spatial;
pub mod surface;

use serde::Serialize;
use tracing::info;

use self::driver::FrameDriver;
use self::lifecycle::{FrameOutcome, LifecycleState, ModeSlot};
use self::modes::hexagon::DEFAULT_HEX_SIZE;
use self::modes::{Backdrop, Family, FrameContext, ModeKind, ResetContext, MODES_PER_FAMILY};
use self::performance::{PerformanceMonitor, PerformanceState};
use self::sampler::{FrequencySampler, DEFAULT_FFT_SIZE};
use self::surface::{Rgb, Surface};

/// Construction-time settings.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub family: Family,
    pub mode: usize,
    pub enabled: bool,
    pub background: Rgb,
    pub lightning_intensity: f32,
    pub fft_size: usize,
    pub hex_size: f32,
    pub seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            family: Family::Geometric,
            mode: 0,
            enabled: true,
            background: Rgb::new(6, 6, 14),
            lightning_intensity: 1.0,
            fft_size: DEFAULT_FFT_SIZE,
            hex_size: DEFAULT_HEX_SIZE,
            seed: 0,
        }
    }
}

/// Running counters, reported by the headless runner and the status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub frames: u64,
    pub drawn: u64,
    pub faults: u64,
    pub skipped: u64,
    pub resets: u64,
}

/// Requests received between frames. Latest value wins.
#[derive(Debug, Default)]
struct PendingRequests {
    family: Option<Family>,
    mode: Option<usize>,
    resize: Option<(u32, u32)>,
    enabled: Option<bool>,
    background: Option<Rgb>,
    intensity: Option<f32>,
}

pub struct Engine<S: Surface> {
    surface: S,
    sampler: FrequencySampler,
    monitor: PerformanceMonitor,
    performance: PerformanceState,
    family: Family,
    slots: Vec<ModeSlot>,
    active: usize,
    enabled: bool,
    background: Rgb,
    intensity: f32,
    hex_size: f32,
    seed: u64,
    pending: PendingRequests,
    stats: EngineStats,
    running: bool,
    clear_next: bool,
}

fn family_slots(family: Family) -> Vec<ModeSlot> {
    family.modes().into_iter().map(ModeSlot::new).collect()
}

impl<S: Surface> Engine<S> {
    pub fn new(surface: S, options: EngineOptions) -> Self {
        let mut engine = Self {
            surface,
            sampler: FrequencySampler::new(options.fft_size),
            monitor: PerformanceMonitor::new(),
            performance: PerformanceState::default(),
            family: options.family,
            slots: family_slots(options.family),
            active: options.mode % MODES_PER_FAMILY,
            enabled: options.enabled,
            background: options.background,
            intensity: options.lightning_intensity,
            hex_size: options.hex_size,
            seed: options.seed,
            pending: PendingRequests::default(),
            stats: EngineStats::default(),
            running: true,
            clear_next: true,
        };
        if engine.enabled {
            engine.reset_active();
        }
        engine
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn sampler(&self) -> &FrequencySampler {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut FrequencySampler {
        &mut self.sampler
    }

    pub fn performance(&self) -> PerformanceState {
        self.performance
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_kind(&self) -> ModeKind {
        self.slots[self.active].kind()
    }

    pub fn active_slot(&self) -> &ModeSlot {
        &self.slots[self.active]
    }

    /// Slot at `index` within the current family, wrapped.
    pub fn slot(&self, index: usize) -> &ModeSlot {
        &self.slots[index % MODES_PER_FAMILY]
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    // ── Requests (applied at the next frame boundary) ────────────────────────

    pub fn request_mode(&mut self, index: usize) {
        self.pending.mode = Some(index % MODES_PER_FAMILY);
    }

    /// Step forward or backward from the most recently requested mode.
    pub fn step_mode(&mut self, forward: bool) {
        let current = self.pending.mode.unwrap_or(self.active);
        let next = if forward {
            current + 1
        } else {
            current + MODES_PER_FAMILY - 1
        };
        self.request_mode(next);
    }

    /// Switch family; the new family starts at its first mode unless a mode
    /// request follows.
    pub fn request_family(&mut self, family: Family) {
        self.pending.family = Some(family);
        self.pending.mode = None;
    }

    pub fn request_resize(&mut self, width: u32, height: u32) {
        self.pending.resize = Some((width, height));
    }

    pub fn request_enabled(&mut self, enabled: bool) {
        self.pending.enabled = Some(enabled);
    }

    pub fn toggle_enabled(&mut self) {
        let current = self.pending.enabled.unwrap_or(self.enabled);
        self.request_enabled(!current);
    }

    pub fn request_background(&mut self, background: Rgb) {
        self.pending.background = Some(background);
    }

    pub fn request_intensity(&mut self, intensity: f32) {
        self.pending.intensity = Some(intensity);
    }

    /// Most recently requested intensity, falling back to the applied one.
    pub fn pending_intensity(&self) -> f32 {
        self.pending.intensity.unwrap_or(self.intensity)
    }

    // ── Frame loop ───────────────────────────────────────────────────────────

    /// Run frames until the driver stops or the engine is destroyed.
    pub fn run(&mut self, driver: &mut dyn FrameDriver) {
        while self.running {
            let Some(now_ms) = driver.request_next_frame() else {
                break;
            };
            self.frame(now_ms);
        }
    }

    /// One frame: apply requests, sample, tick performance, prepare the
    /// surface and let the active mode update and draw.
    pub fn frame(&mut self, now_ms: f64) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Skipped;
        }
        self.stats.frames += 1;
        self.apply_pending();

        if !self.enabled {
            self.stats.skipped += 1;
            return FrameOutcome::Skipped;
        }

        self.performance = self.monitor.tick(now_ms);
        let sample = self.sampler.sample(now_ms);

        self.surface.set_clip(None);
        let backdrop = self.slots[self.active].backdrop();
        match backdrop {
            Backdrop::Fade(alpha) if !self.clear_next => self.surface.fade(self.background, alpha),
            _ => self.surface.clear(self.background),
        }
        self.clear_next = false;

        let frame = FrameContext {
            sample,
            quality: self.performance.quality,
            time: 0.0,
            now_ms,
            width: self.surface.width(),
            height: self.surface.height(),
            intensity: self.intensity,
            background: self.background,
        };
        let outcome = self.slots[self.active].frame(frame, &mut self.surface);
        self.surface.set_clip(None);

        match outcome {
            FrameOutcome::Drawn => self.stats.drawn += 1,
            FrameOutcome::Fault => self.stats.faults += 1,
            FrameOutcome::Initializing | FrameOutcome::Skipped => self.stats.skipped += 1,
        }
        outcome
    }

    /// Stop the loop and release every mode. Further frames are no-ops.
    pub fn destroy(&mut self) {
        for slot in &mut self.slots {
            slot.dispose();
        }
        self.running = false;
        info!("engine destroyed");
    }

    fn apply_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let mut needs_reset = false;

        if let Some(intensity) = pending.intensity {
            self.intensity = intensity.clamp(0.25, 3.0);
        }
        if let Some(background) = pending.background {
            self.background = background;
            self.clear_next = true;
        }
        if let Some(family) = pending.family {
            if family != self.family {
                for slot in &mut self.slots {
                    slot.dispose();
                }
                self.family = family;
                self.slots = family_slots(family);
                self.active = 0;
                needs_reset = true;
                info!(family = family.label(), "family changed");
            }
        }
        if let Some((width, height)) = pending.resize {
            if width as f32 != self.surface.width() || height as f32 != self.surface.height() {
                self.surface.resize(width, height);
                needs_reset = true;
            }
        }
        if let Some(index) = pending.mode {
            if index != self.active {
                self.slots[self.active].dispose();
                self.active = index;
                needs_reset = true;
            }
        }
        if let Some(enabled) = pending.enabled {
            if enabled != self.enabled {
                self.enabled = enabled;
                if enabled {
                    self.monitor.reset_clock();
                    needs_reset = true;
                } else {
                    self.slots[self.active].dispose();
                    self.surface.clear(self.background);
                }
            }
        }

        if needs_reset && self.enabled {
            self.reset_active();
        }
    }

    fn reset_active(&mut self) {
        // Exactly one live mode: everything else stays released.
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if i != self.active && slot.state() != LifecycleState::Uninitialized {
                slot.dispose();
            }
        }
        let ctx = ResetContext {
            width: self.surface.width(),
            height: self.surface.height(),
            seed: self
                .seed
                .wrapping_add(self.stats.resets.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            hex_size: self.hex_size,
        };
        self.slots[self.active].reset(&ctx);
        self.stats.resets += 1;
        self.clear_next = true;
        info!(
            mode = self.active_kind().label(),
            family = self.family.label(),
            "mode activated"
        );
    }
}
