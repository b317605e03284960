use std::time::{Duration, Instant};

use crate::pal::Clock;

/// Monotonic wall clock, measured from the moment the clock was created.
#[derive(Debug)]
pub(crate) struct RealClock {
    origin: Instant,
}

impl RealClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for RealClock {
    #[cfg_attr(test, mutants::skip)] // Real time cannot be asserted on exactly.
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn never_goes_backwards() {
        let clock = RealClock::new();

        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }
}
