//! Guards that tie profiler operations to a scope.

use std::marker::PhantomData;

use crate::Profiler;

/// A timed block that ends when the guard is dropped.
///
/// Created by [`Profiler::scoped_block()`]. The block is recorded in the ledger of the
/// thread that created the guard, so the guard cannot be sent to another thread.
///
/// # Example
///
/// ```
/// use ledger_profiler::Profiler;
///
/// let profiler = Profiler::new();
///
/// for _ in 0..3 {
///     let _block = profiler.scoped_block("iteration");
///     std::hint::black_box(42 * 2);
/// }
///
/// let report = profiler.report(true);
/// let merged = report.ledgers().next().unwrap();
/// # if cfg!(feature = "measure") {
/// assert_eq!(merged.block("iteration").unwrap().sample_count(), 3);
/// # }
/// ```
#[derive(Debug)]
#[must_use = "The block ends when the guard is dropped"]
pub struct BlockGuard<'a> {
    profiler: &'a Profiler,
    name: &'a str,

    _single_threaded: PhantomData<*const ()>,
}

impl<'a> BlockGuard<'a> {
    pub(crate) fn new(profiler: &'a Profiler, name: &'a str) -> Self {
        profiler.begin_block(name);

        Self {
            profiler,
            name,
            _single_threaded: PhantomData,
        }
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.profiler.end_block(self.name);
    }
}

/// Keeps the profiler running until the guard is dropped.
///
/// Created by [`Profiler::scoped_start()`]. If the profiler was already running when
/// the guard was created, dropping the guard leaves it running.
///
/// # Example
///
/// ```
/// use ledger_profiler::Profiler;
///
/// let profiler = Profiler::new();
///
/// {
///     let _running = profiler.scoped_start();
///     # if cfg!(feature = "measure") {
///     assert!(profiler.is_running());
///     # }
/// }
///
/// assert!(!profiler.is_running());
/// ```
#[derive(Debug)]
#[must_use = "The profiler is stopped when the guard is dropped"]
pub struct RunningGuard<'a> {
    profiler: &'a Profiler,

    // Whether this guard moved the profiler into the running state.
    started: bool,
}

impl<'a> RunningGuard<'a> {
    pub(crate) fn new(profiler: &'a Profiler) -> Self {
        let started = profiler.start_inner();

        Self { profiler, started }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        if self.started {
            self.profiler.stop();
        }
    }
}

#[cfg(all(test, feature = "measure"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn block_guard_records_one_sample() {
        let profiler = Profiler::new();

        {
            let _block = profiler.scoped_block("scoped");
        }

        let report = profiler.report(true);
        let merged = report.ledgers().next().unwrap();
        assert_eq!(merged.block("scoped").unwrap().sample_count(), 1);
    }

    #[test]
    fn running_guard_stops_what_it_started() {
        let profiler = Profiler::new();

        {
            let _running = profiler.scoped_start();
            assert!(profiler.is_running());
        }

        assert!(!profiler.is_running());
    }

    #[test]
    fn running_guard_leaves_running_profiler_running() {
        let profiler = Profiler::new();
        profiler.start();

        {
            let _running = profiler.scoped_start();
        }

        assert!(profiler.is_running());
    }

    static_assertions::assert_not_impl_any!(BlockGuard<'static>: Send, Sync);
    static_assertions::assert_impl_all!(RunningGuard<'static>: Send, Sync);
}
