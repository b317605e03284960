//! Fake clock for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::pal::Clock;

/// Clock that only moves when a test tells it to.
///
/// Clones share the same underlying time, so a test can keep one clone and
/// advance time while the profiler holds another.
#[derive(Clone, Debug)]
pub(crate) struct FakeClock {
    now: Arc<Mutex<Duration>>,
}

impl FakeClock {
    /// Creates a new fake clock that reads zero.
    pub(crate) fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Sets the current time of this clock and all its clones.
    pub(crate) fn set(&self, now: Duration) {
        *self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned") = now;
    }

    /// Moves the clock forward by `delta`.
    pub(crate) fn advance(&self, delta: Duration) {
        let mut now = self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned");
        *now = now.saturating_add(delta);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        *self
            .now
            .lock()
            .expect("FakeClock state lock should not be poisoned")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn initializes_with_zero_time() {
        let clock = FakeClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
    }

    #[test]
    fn set_and_advance() {
        let clock = FakeClock::new();

        clock.set(Duration::from_millis(150));
        assert_eq!(clock.now(), Duration::from_millis(150));

        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.now(), Duration::from_millis(200));
    }

    #[test]
    fn shared_state_between_clones() {
        let clock1 = FakeClock::new();
        let clock2 = clock1.clone();

        clock1.set(Duration::from_millis(100));
        assert_eq!(clock2.now(), Duration::from_millis(100));
    }
}
