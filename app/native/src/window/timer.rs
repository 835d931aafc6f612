//! Deferred deadlines for debounced behavior.
//!
//! The core never spawns threads or sleeps. Timers are plain deadlines that an
//! event loop polls through `Window::dispatch_timers`, using an injected
//! `Clock` so tests and scenario replay can drive time by hand.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Source of the current time.
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall clock backed by `Instant::now`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant { Instant::now() }
}

/// Manually advanced clock for tests and scenario replay.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    current: Mutex<Instant>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Arc<Self> {
        let origin = Instant::now();
        Arc::new(Self { origin, current: Mutex::new(origin) })
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) { *self.current.lock() += by; }

    /// Set the time as an offset from creation. Never moves backwards.
    pub fn set_elapsed(&self, elapsed: Duration) {
        let target = self.origin + elapsed;
        let mut current = self.current.lock();
        if target > *current {
            *current = target;
        }
    }

    /// Time elapsed since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration { *self.current.lock() - self.origin }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant { *self.current.lock() }
}

/// A single-shot timer with a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct DelayTimer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl DelayTimer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self { Self { delay, deadline: None } }

    /// Arm (or re-arm) the timer relative to `now`.
    pub fn arm(&mut self, now: Instant) { self.deadline = Some(now + self.delay); }

    pub const fn cancel(&mut self) { self.deadline = None; }

    #[must_use]
    pub const fn is_armed(&self) -> bool { self.deadline.is_some() }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> { self.deadline }

    #[must_use]
    pub const fn delay(&self) -> Duration { self.delay }

    /// Disarms and returns `true` when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}
