use crate::Profiler;
use crate::pal::ClockFacade;

/// Creates instances of [`Profiler`].
///
/// All parameters are optional. Use `Profiler::builder()` to create a new instance of this builder.
///
/// # Example
///
/// ```
/// use ledger_profiler::Profiler;
///
/// let profiler = Profiler::builder()
///     .auto_start(true)
///     .strict_blocks(true)
///     .build();
///
/// # if cfg!(feature = "measure") {
/// assert!(profiler.is_running());
/// # }
/// ```
#[derive(Debug)]
pub struct ProfilerBuilder {
    auto_start: bool,
    strict_blocks: bool,
    report_on_drop: bool,

    clock: ClockFacade,
}

impl ProfilerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            auto_start: false,
            strict_blocks: false,
            report_on_drop: false,
            clock: ClockFacade::real(),
        }
    }

    /// Starts the lifetime timer as soon as the profiler is built.
    ///
    /// The default is to start in the stopped state, waiting for [`Profiler::start()`].
    #[must_use]
    pub fn auto_start(self, auto_start: bool) -> Self {
        Self { auto_start, ..self }
    }

    /// Enables strict handling of timed blocks.
    ///
    /// By default, calling [`Profiler::begin_block()`] for a name that already has an open
    /// interval on the same thread discards the earlier start time. In strict mode the
    /// repeated begin is ignored instead, keeping the original start time, and a warning is
    /// logged. An [`Profiler::end_block()`] without a matching begin is also logged as a
    /// warning in strict mode. Neither case records a sample.
    #[must_use]
    pub fn strict_blocks(self, strict_blocks: bool) -> Self {
        Self {
            strict_blocks,
            ..self
        }
    }

    /// Logs the merged report at `info` level when the profiler is dropped, unless a report
    /// has already been taken since the last recorded data.
    #[must_use]
    pub fn report_on_drop(self, report_on_drop: bool) -> Self {
        Self {
            report_on_drop,
            ..self
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn clock(self, clock: ClockFacade) -> Self {
        Self { clock, ..self }
    }

    /// Creates the profiler.
    #[must_use]
    pub fn build(self) -> Profiler {
        let profiler = Profiler::new_inner(self.clock, self.strict_blocks, self.report_on_drop);

        if self.auto_start {
            profiler.start();
        }

        profiler
    }
}
