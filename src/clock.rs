//! Monotonic time source, abstracted so the periodic scanner (spec.md S4.7)
//! can be driven deterministically in tests instead of sleeping for real
//! `refresh_interval`s. Mirrors `rd_clock()` in the original C source:
//! microsecond resolution, monotonic, not tied to wall-clock time.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Instant;

pub trait Clock: Send + Sync {
    /// Current time in microseconds, monotonic.
    fn now(&self) -> i64;
}

#[derive(Clone)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        self.epoch.elapsed().as_micros() as i64
    }
}

/// A clock the test suite can advance explicitly (spec.md S8 scenario 6).
#[derive(Clone, Default)]
pub struct ManualClock {
    micros: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            micros: Arc::new(AtomicI64::new(0)),
        }
    }

    pub fn advance(&self, micros: i64) {
        self.micros.fetch_add(micros, Ordering::SeqCst);
    }

    pub fn set(&self, micros: i64) {
        self.micros.store(micros, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.micros.load(Ordering::SeqCst)
    }
}
