use std::sync::Arc;
use std::time::Duration;

#[cfg(test)]
use crate::pal::FakeClock;
use crate::pal::{Clock, RealClock};

/// Dispatches to either the real or the fake clock without dynamic dispatch
/// in non-test builds.
#[derive(Clone, Debug)]
pub(crate) enum ClockFacade {
    Real(Arc<RealClock>),

    #[cfg(test)]
    Fake(FakeClock),
}

impl ClockFacade {
    pub(crate) fn real() -> Self {
        Self::Real(Arc::new(RealClock::new()))
    }

    #[cfg(test)]
    pub(crate) fn fake(clock: FakeClock) -> Self {
        Self::Fake(clock)
    }
}

impl Clock for ClockFacade {
    fn now(&self) -> Duration {
        match self {
            Self::Real(clock) => clock.now(),
            #[cfg(test)]
            Self::Fake(clock) => clock.now(),
        }
    }
}
