use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of wall-clock time in milliseconds.
///
/// Cooldowns and hysteresis delays are measured against a clock rather than
/// accumulated frame deltas, so a stalled frame still counts as elapsed time.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Monotonic clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Used for headless runs and tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// Polled one-shot timer.
///
/// A timer that was never started, or was reset, is ready. Readiness is a
/// pure function of the time passed in; nothing runs in the background.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timer {
    duration_ms: f64,
    started_at: f64,
}

impl Timer {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            started_at: f64::NEG_INFINITY,
        }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        now_ms - self.started_at >= self.duration_ms
    }

    pub fn start(&mut self, now_ms: f64) {
        self.started_at = now_ms;
    }

    pub fn reset(&mut self) {
        self.started_at = f64::NEG_INFINITY;
    }

    /// Milliseconds left before the timer is ready, zero when it already is.
    pub fn remaining(&self, now_ms: f64) -> f64 {
        (self.duration_ms - (now_ms - self.started_at)).max(0.0)
    }
}
