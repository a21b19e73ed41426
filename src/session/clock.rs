use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Source of frame timestamps in milliseconds. `None` ends the loop.
///
/// Timestamps are monotonically non-decreasing.
pub trait FrameClock {
    fn next_timestamp(&mut self) -> Option<f64>;
}

/// Deterministic clock: tick `i` is `start_ms + i * frame_duration`.
#[derive(Clone, Debug)]
pub struct FixedStepClock {
    start_ms: f64,
    step_ms: f64,
    tick: u64,
    limit: Option<u64>,
}

impl FixedStepClock {
    pub fn new(fps: Fps) -> Self {
        Self {
            start_ms: 0.0,
            step_ms: fps.frame_duration_ms(),
            tick: 0,
            limit: None,
        }
    }

    pub fn starting_at(mut self, start_ms: f64) -> Self {
        self.start_ms = start_ms;
        self
    }

    /// Stop after `ticks` timestamps.
    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }

    pub fn step_ms(&self) -> f64 {
        self.step_ms
    }
}

impl FrameClock for FixedStepClock {
    fn next_timestamp(&mut self) -> Option<f64> {
        if self.limit.is_some_and(|l| self.tick >= l) {
            return None;
        }
        let t = self.start_ms + self.tick as f64 * self.step_ms;
        self.tick += 1;
        Some(t)
    }
}

/// Wall-clock timestamps, paced to `fps` by sleeping until the next frame is due.
#[derive(Debug)]
pub struct RealtimeClock {
    origin: Instant,
    step: Duration,
    next_due: Duration,
    ticks: u64,
    limit: Option<u64>,
}

impl RealtimeClock {
    pub fn new(fps: Fps) -> Self {
        Self {
            origin: Instant::now(),
            step: Duration::from_secs_f64(fps.frame_duration_ms() / 1000.0),
            next_due: Duration::ZERO,
            ticks: 0,
            limit: None,
        }
    }

    pub fn with_limit(mut self, ticks: u64) -> Self {
        self.limit = Some(ticks);
        self
    }
}

impl FrameClock for RealtimeClock {
    fn next_timestamp(&mut self) -> Option<f64> {
        if self.limit.is_some_and(|l| self.ticks >= l) {
            return None;
        }
        let elapsed = self.origin.elapsed();
        if elapsed < self.next_due {
            std::thread::sleep(self.next_due - elapsed);
        }
        // Late frames do not queue up; the next one is due a full step after this one.
        let now = self.origin.elapsed();
        self.next_due = now.max(self.next_due) + self.step;
        self.ticks += 1;
        Some(now.as_secs_f64() * 1000.0)
    }
}

/// Cooperative stop flag shared between a running loop and whoever wants it to end.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/clock.rs"]
mod tests;
