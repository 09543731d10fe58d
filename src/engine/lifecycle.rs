// Per-mode lifecycle: Uninitialized → Initializing → Active → Disposed,
// with Faulted for a mode whose reset failed. The slot owns the mode, runs
// batched initialization one step per frame, and contains draw faults so a
// broken frame never takes the loop down.

use tracing::{debug, info, warn};

use super::modes::{Backdrop, FrameContext, Mode, ModeBehavior, ModeKind, ResetContext};
use super::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Active,
    /// Reset or initialization failed; draws nothing until the next reset.
    Faulted,
    Disposed,
}

/// What happened to a mode during one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Drawn,
    /// An init batch ran; nothing was drawn.
    Initializing,
    /// `update_and_draw` returned an error; the frame was skipped.
    Fault,
    Skipped,
}

pub struct ModeSlot {
    mode: Mode,
    state: LifecycleState,
    ticks: u64,
    faults_since_reset: u64,
}

impl ModeSlot {
    pub fn new(kind: ModeKind) -> Self {
        Self {
            mode: Mode::new(kind),
            state: LifecycleState::Uninitialized,
            ticks: 0,
            faults_since_reset: 0,
        }
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn entity_count(&self) -> usize {
        self.mode.behavior().entity_count()
    }

    pub fn backdrop(&self) -> Backdrop {
        match self.state {
            LifecycleState::Active => self.mode.behavior().backdrop(),
            _ => Backdrop::Clear,
        }
    }

    /// Frames drawn since the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn reset(&mut self, ctx: &ResetContext) {
        self.ticks = 0;
        self.faults_since_reset = 0;
        match self.mode.behavior_mut().reset(ctx) {
            Ok(()) => {
                info!(mode = self.kind().label(), width = ctx.width, height = ctx.height, "mode reset");
                self.state = LifecycleState::Initializing;
            }
            Err(err) => self.fault_reset(err),
        }
    }

    pub fn dispose(&mut self) {
        self.mode.behavior_mut().dispose();
        self.state = LifecycleState::Disposed;
    }

    pub fn frame(&mut self, mut frame: FrameContext<'_>, surface: &mut dyn Surface) -> FrameOutcome {
        if self.state == LifecycleState::Initializing {
            match self.mode.behavior_mut().init_step() {
                Ok(true) => {
                    debug!(
                        mode = self.kind().label(),
                        entities = self.entity_count(),
                        "mode initialized"
                    );
                    self.state = LifecycleState::Active;
                }
                Ok(false) => return FrameOutcome::Initializing,
                Err(err) => {
                    self.fault_reset(err);
                    return FrameOutcome::Skipped;
                }
            }
        }
        if self.state != LifecycleState::Active {
            return FrameOutcome::Skipped;
        }

        frame.time = self.ticks as f32;
        self.ticks += 1;
        match self.mode.behavior_mut().update_and_draw(&frame, surface) {
            Ok(()) => FrameOutcome::Drawn,
            Err(err) => {
                self.faults_since_reset += 1;
                if self.faults_since_reset == 1 {
                    warn!(mode = self.kind().label(), error = %err, "draw fault, skipping frame");
                } else {
                    debug!(
                        mode = self.kind().label(),
                        faults = self.faults_since_reset,
                        error = %err,
                        "draw fault, skipping frame"
                    );
                }
                FrameOutcome::Fault
            }
        }
    }

    fn fault_reset(&mut self, err: anyhow::Error) {
        warn!(mode = self.kind().label(), error = %err, "mode reset failed");
        self.mode.behavior_mut().dispose();
        self.state = LifecycleState::Faulted;
    }
}
