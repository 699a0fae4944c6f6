//! Time source for animated tints

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds, injectable so renders can be frozen in tests
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> f64;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock stopped at a fixed instant
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixedClock(pub f64);

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.0
    }
}
