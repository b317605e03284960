use std::io::{self, Write};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use foldhash::{HashMap, HashMapExt};
use tracing::{debug, info, trace, warn};

use crate::interval::TimedInterval;
use crate::ledger::{BeginOutcome, ThreadLedger};
use crate::pal::{Clock, ClockFacade};
use crate::{
    BlockGuard, LedgerReport, ProfilerBuilder, Report, RunningGuard, ThreadLabel, TimeAccumulator,
};

/// Whether measurements are taken at all. Without the `measure` feature, every
/// recording operation returns immediately and reports stay empty.
const ENABLED: bool = cfg!(feature = "measure");

static GLOBAL: LazyLock<Profiler> = LazyLock::new(Profiler::new);

/// Accumulates event counters, averages and timed blocks from any number of threads
/// and renders them as a report on demand.
///
/// Each thread records into its own ledger, created the first time that thread calls a
/// recording method. A report either merges all ledgers into one or shows them one thread
/// at a time.
///
/// The profiler also has a lifetime timer that runs between [`start()`][Self::start] and
/// [`stop()`][Self::stop]. Recording works regardless of whether the profiler is running;
/// the lifetime only serves as the reference total for the percentages in a report.
///
/// # Examples
///
/// ```
/// use ledger_profiler::Profiler;
///
/// let profiler = Profiler::new();
/// profiler.start();
///
/// profiler.record_event("requests", 1);
/// profiler.record_average("payload_bytes", 512.0);
///
/// profiler.begin_block("parse");
/// // Work happens here.
/// profiler.end_block("parse");
///
/// {
///     let _block = profiler.scoped_block("respond");
///     // The block ends when the guard is dropped.
/// }
///
/// print!("{}", profiler.report(true));
/// ```
///
/// # Timed blocks are not reentrant
///
/// A block name can have at most one open interval per thread. Beginning a block that is
/// already open on the current thread discards the earlier start time, so nested or
/// recursive use of the same block name on the same thread measures only the innermost
/// part. Use [`ProfilerBuilder::strict_blocks()`] to keep the earlier start time instead.
///
/// # Thread safety
///
/// All methods may be called from any thread at any time. A single lock guards all the
/// state and is only held for the duration of one short update. The cost of finding the
/// ledger of the calling thread grows with the number of distinct threads that have
/// recorded, not with the number of calls.
#[derive(Debug)]
pub struct Profiler {
    state: Mutex<ProfilerState>,
    clock: ClockFacade,

    strict_blocks: bool,
    report_on_drop: bool,
}

#[derive(Debug)]
struct ProfilerState {
    // Present while the profiler is running.
    lifetime_interval: Option<TimedInterval>,
    lifetime: TimeAccumulator,

    ledgers: HashMap<ThreadId, LedgerEntry>,

    // Handed out to ledgers on creation so per-thread reports follow first-use order.
    next_sequence: u64,

    // Whether anything was recorded since the last report was taken.
    unreported: bool,
}

#[derive(Debug)]
struct LedgerEntry {
    label: ThreadLabel,
    sequence: u64,
    ledger: ThreadLedger,
}

impl Profiler {
    /// Creates a stopped profiler with the default configuration.
    ///
    /// Use [`Profiler::builder()`] for other configurations.
    #[expect(
        clippy::new_without_default,
        reason = "a default profiler would be easy to confuse with the global one"
    )]
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new profiler builder with the default builder configuration.
    #[must_use]
    #[cfg_attr(test, mutants::skip)] // Gets replaced with itself by different name, bad mutation.
    pub fn builder() -> ProfilerBuilder {
        ProfilerBuilder::new()
    }

    /// The process-wide profiler, created with the default configuration on first access.
    ///
    /// Prefer passing an explicitly created [`Profiler`] to the code that records into it.
    /// This function exists for code that cannot easily be given one.
    ///
    /// # Example
    ///
    /// ```
    /// use ledger_profiler::Profiler;
    ///
    /// Profiler::global().record_event("started_from_anywhere", 1);
    /// ```
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    pub(crate) fn new_inner(clock: ClockFacade, strict_blocks: bool, report_on_drop: bool) -> Self {
        Self {
            state: Mutex::new(ProfilerState {
                lifetime_interval: None,
                lifetime: TimeAccumulator::new(),
                ledgers: HashMap::new(),
                next_sequence: 0,
                unreported: false,
            }),
            clock,
            strict_blocks,
            report_on_drop,
        }
    }

    /// Starts the lifetime timer. Does nothing if the profiler is already running.
    pub fn start(&self) {
        self.start_inner();
    }

    /// Starts the lifetime timer, returning whether this call moved the profiler from
    /// stopped to running.
    pub(crate) fn start_inner(&self) -> bool {
        if !ENABLED {
            return false;
        }

        let mut state = self.lock_state();

        if state.lifetime_interval.is_some() {
            return false;
        }

        state.lifetime_interval = Some(TimedInterval::open(self.clock.now()));
        debug!("profiler started");

        true
    }

    /// Stops the lifetime timer, adding the time since the last start to the lifetime.
    /// Does nothing if the profiler is not running.
    pub fn stop(&self) {
        let mut state = self.lock_state();

        if let Some(interval) = state.lifetime_interval.take() {
            let elapsed = interval.close(self.clock.now());
            state.lifetime.record(elapsed);

            debug!(
                elapsed_seconds = elapsed.as_secs_f64(),
                lifetime_seconds = state.lifetime.total().as_secs_f64(),
                "profiler stopped"
            );
        }
    }

    /// Discards all recorded data of all threads and resets the lifetime to zero.
    ///
    /// The running state is not changed. If the profiler is running, the lifetime
    /// continues counting from the moment of the clear.
    pub fn clear(&self) {
        let mut state = self.lock_state();

        state.ledgers.clear();
        state.lifetime = TimeAccumulator::new();
        state.next_sequence = 0;
        state.unreported = false;

        if state.lifetime_interval.is_some() {
            state.lifetime_interval = Some(TimedInterval::open(self.clock.now()));
        }

        debug!("profiler cleared");
    }

    /// Whether the lifetime timer is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock_state().lifetime_interval.is_some()
    }

    /// Adds `increment` to the named event counter of the current thread.
    ///
    /// Counters saturate at `u64::MAX`.
    pub fn record_event(&self, name: &str, increment: u64) {
        if !ENABLED {
            return;
        }

        self.with_ledger(|ledger| ledger.record_event(name, increment));
    }

    /// Adds one to the named event counter of the current thread.
    pub fn record_event_once(&self, name: &str) {
        self.record_event(name, 1);
    }

    /// Adds a value to the named average of the current thread.
    pub fn record_average(&self, name: &str, value: f64) {
        if !ENABLED {
            return;
        }

        self.with_ledger(|ledger| ledger.record_average(name, value));
    }

    /// Opens the named timed block on the current thread.
    ///
    /// If the block is already open on this thread, the earlier start time is discarded
    /// (or, in strict mode, the new start time is).
    pub fn begin_block(&self, name: &str) {
        if !ENABLED {
            return;
        }

        let keep_open = self.strict_blocks;
        let outcome = self.with_ledger(|ledger| {
            ledger.begin_block(name, self.clock.now(), keep_open)
        });

        match outcome {
            BeginOutcome::Opened => {}
            BeginOutcome::Replaced => {
                trace!(
                    block = name,
                    "block begun again before it ended, earlier start time discarded"
                );
            }
            BeginOutcome::Rejected => {
                warn!(
                    block = name,
                    "block begun again before it ended, keeping the earlier start time"
                );
            }
        }
    }

    /// Closes the named timed block on the current thread and records its duration.
    ///
    /// Does nothing if the block is not open on this thread.
    pub fn end_block(&self, name: &str) {
        if !ENABLED {
            return;
        }

        // Taken before locking so that waiting for the lock is not measured.
        let now = self.clock.now();

        let thread_id = thread::current().id();

        let elapsed = {
            let mut state = self.lock_state();

            // A thread that never began a block has no ledger to close it in.
            let elapsed = state
                .ledgers
                .get_mut(&thread_id)
                .and_then(|entry| entry.ledger.end_block(name, now));

            if elapsed.is_some() {
                state.unreported = true;
            }

            elapsed
        };

        if elapsed.is_none() {
            if self.strict_blocks {
                warn!(block = name, "block ended without having begun");
            } else {
                trace!(block = name, "block ended without having begun");
            }
        }
    }

    /// Opens the named timed block and returns a guard that closes it when dropped.
    ///
    /// The guard must be dropped on the thread that created it.
    ///
    /// # Example
    ///
    /// ```
    /// use ledger_profiler::Profiler;
    ///
    /// let profiler = Profiler::new();
    ///
    /// {
    ///     let _block = profiler.scoped_block("load_config");
    ///     // Work happens here.
    /// }
    ///
    /// let report = profiler.report(true);
    /// let merged = report.ledgers().next().unwrap();
    /// # if cfg!(feature = "measure") {
    /// assert_eq!(merged.block("load_config").unwrap().sample_count(), 1);
    /// # }
    /// ```
    pub fn scoped_block<'a>(&'a self, name: &'a str) -> BlockGuard<'a> {
        BlockGuard::new(self, name)
    }

    /// Starts the profiler and returns a guard that stops it when dropped, unless the
    /// profiler was already running when the guard was created.
    pub fn scoped_start(&self) -> RunningGuard<'_> {
        RunningGuard::new(self)
    }

    /// Stops the profiler and takes a snapshot of everything recorded so far.
    ///
    /// With `merge`, the ledgers of all threads are combined into one: counters and
    /// averages are summed, block totals and sample counts are summed and the shortest and
    /// longest block durations are taken across all threads. Without `merge`, the report
    /// contains one ledger per thread.
    ///
    /// Either way, every percentage is relative to the single profiler lifetime.
    pub fn report(&self, merge: bool) -> Report {
        self.stop();

        let mut state = self.lock_state();
        state.unreported = false;

        let lifetime = state.lifetime.total();

        if merge {
            let mut combined = ThreadLedger::new();

            for entry in state.ledgers.values() {
                combined.merge_from(&entry.ledger);
            }

            drop(state);

            Report::new(lifetime, vec![LedgerReport::new(None, &combined, lifetime)])
        } else {
            let mut entries = state
                .ledgers
                .values()
                .map(|entry| (entry.sequence, entry.label.clone(), entry.ledger.clone()))
                .collect::<Vec<_>>();

            drop(state);

            entries.sort_by_key(|(sequence, _, _)| *sequence);

            let ledgers = entries
                .into_iter()
                .map(|(_, label, ledger)| LedgerReport::new(Some(label), &ledger, lifetime))
                .collect();

            Report::new(lifetime, ledgers)
        }
    }

    /// Stops the profiler and writes a report to `out`.
    ///
    /// # Errors
    ///
    /// Returns any error reported by `out`.
    pub fn write_report(&self, out: &mut impl Write, merge: bool) -> io::Result<()> {
        let report = self.report(merge);
        write!(out, "{report}")
    }

    /// Stops the profiler and logs the merged report as a single `info` event.
    #[cfg_attr(test, mutants::skip)] // Log output is not captured in tests.
    pub fn console(&self) {
        let report = self.report(true);
        info!("\n{report}");
    }

    fn with_ledger<R>(&self, f: impl FnOnce(&mut ThreadLedger) -> R) -> R {
        let thread_id = thread::current().id();

        let mut state = self.lock_state();
        let ProfilerState {
            ledgers,
            next_sequence,
            unreported,
            ..
        } = &mut *state;

        *unreported = true;

        let entry = ledgers.entry(thread_id).or_insert_with(|| {
            let sequence = *next_sequence;
            *next_sequence = next_sequence.saturating_add(1);

            trace!(thread = ?thread_id, sequence, "creating ledger for thread");

            LedgerEntry {
                label: ThreadLabel::current(),
                sequence,
                ledger: ThreadLedger::new(),
            }
        });

        f(&mut entry.ledger)
    }

    fn lock_state(&self) -> MutexGuard<'_, ProfilerState> {
        // No code that can panic runs while the state is half-updated,
        // so the data behind a poisoned lock is still consistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Profiler {
    #[cfg_attr(test, mutants::skip)] // Log output is not captured in tests.
    fn drop(&mut self) {
        if !self.report_on_drop {
            return;
        }

        if self.lock_state().unreported {
            self.console();
        }
    }
}


#[cfg(all(test, not(feature = "measure")))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests_without_measure {
    use super::*;

    #[test]
    fn recording_is_a_no_op() {
        let profiler = Profiler::new();

        profiler.start();
        profiler.record_event("hit", 3);
        profiler.record_event_once("hit");
        profiler.record_average("latency", 4.0);
        profiler.begin_block("io");
        profiler.end_block("io");

        {
            let _block = profiler.scoped_block("scoped");
        }

        assert!(!profiler.is_running());

        let report = profiler.report(true);
        assert!(report.is_empty());
        assert_eq!(report.lifetime(), std::time::Duration::ZERO);

        assert_eq!(profiler.report(false).ledgers().count(), 0);
    }

    #[test]
    fn builder_auto_start_does_not_start() {
        let profiler = Profiler::builder().auto_start(true).build();

        assert!(!profiler.is_running());
    }

    #[test]
    fn running_guard_does_not_start() {
        let profiler = Profiler::new();

        {
            let _running = profiler.scoped_start();
            assert!(!profiler.is_running());
        }

        assert!(!profiler.is_running());
    }
}
