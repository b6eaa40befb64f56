//=========================================================================
// Clock
//=========================================================================
//
// Time source for gesture timing.
//
// SystemClock reads the monotonic clock. ManualClock only moves when told
// to, which makes timeout behaviour reproducible in tests and replays.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

//=== Clock ===============================================================

/// Monotonic time source.
pub trait Clock: Send + 'static {
    fn now(&self) -> Instant;
}

//=== SystemClock =========================================================

/// Wall-clock time via [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

//=== ManualClock =========================================================

/// Clock advanced explicitly with [`advance`](ManualClock::advance).
///
/// Clones share the same timeline, so a test can keep one handle while the
/// recognizer owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Moves time forward by `by`.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.offset_nanos.fetch_add(nanos, Ordering::AcqRel);
    }

    /// Total time advanced since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::Acquire))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
