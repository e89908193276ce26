//! Trailing-edge debounce: a single cancellable scheduled callback.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};

/// Default resize debounce delay in milliseconds.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 300;

/// Holds at most one pending value. Scheduling again cancels the pending one
/// and restarts the delay; the value fires once the delay elapses quietly.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value`, replacing anything pending.
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.delay, value));
    }

    /// Cancel the pending value, returning it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    /// Whether a value is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.cancel(),
            _ => None,
        }
    }
}
