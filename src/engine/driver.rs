// Frame drivers: whatever decides when the next frame happens. The engine
// asks for one frame at a time and stops as soon as the driver declines,
// so cancelling is just not re-arming.

use std::time::{Duration, Instant};

pub trait FrameDriver {
    /// Arm the next frame. Returns its timestamp in milliseconds, or `None`
    /// once the driver has stopped.
    fn request_next_frame(&mut self) -> Option<f64>;
}

/// Deterministic driver: fixed timestamps `start, start + step, ...`.
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    now_ms: f64,
    step_ms: f64,
    remaining: u64,
}

impl FixedStepDriver {
    pub fn new(step_ms: f64, frames: u64) -> Self {
        Self::starting_at(0.0, step_ms, frames)
    }

    pub fn starting_at(start_ms: f64, step_ms: f64, frames: u64) -> Self {
        Self {
            now_ms: start_ms - step_ms,
            step_ms,
            remaining: frames,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl FrameDriver for FixedStepDriver {
    fn request_next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.now_ms += self.step_ms;
        Some(self.now_ms)
    }
}

/// Wall-clock driver paced at a target frame rate.
#[derive(Debug)]
pub struct ClockDriver {
    start: Instant,
    interval: Duration,
    next_deadline: Instant,
    remaining: u64,
}

impl ClockDriver {
    pub fn new(fps: f64, frames: u64) -> Self {
        let start = Instant::now();
        Self {
            start,
            interval: Duration::from_secs_f64(1.0 / fps.max(1.0)),
            next_deadline: start,
            remaining: frames,
        }
    }
}

impl FrameDriver for ClockDriver {
    fn request_next_frame(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let now = Instant::now();
        if self.next_deadline > now {
            std::thread::sleep(self.next_deadline - now);
        }
        self.next_deadline = self.next_deadline.max(now) + self.interval;
        Some(self.start.elapsed().as_secs_f64() * 1000.0)
    }
}
