//! Platform abstraction layer for reading the time.
//!
//! Timed blocks and the profiler lifetime read the time through this layer, which
//! allows tests to substitute a fake clock that only moves when told to.

mod abstractions;
mod facade;
#[cfg(test)]
mod fake;
mod real;

pub(crate) use abstractions::Clock;
pub(crate) use facade::ClockFacade;
#[cfg(test)]
pub(crate) use fake::FakeClock;
pub(crate) use real::RealClock;
