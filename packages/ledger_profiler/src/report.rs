//! Profiling reports.

use std::fmt;
use std::thread::{self, ThreadId};
use std::time::Duration;

use crate::ledger::ThreadLedger;
use crate::{TimeAccumulator, ValueAccumulator};

/// Snapshot of everything a [`Profiler`][1] had recorded when the report was taken.
///
/// For human-readable output, use the `Display` trait implementation. This is intended
/// for writing to a terminal or a log and uses only the basic ASCII character set.
///
/// For machine-readable output, inspect report contents via the provided methods.
///
/// # Example
///
/// ```
/// use ledger_profiler::Profiler;
///
/// let profiler = Profiler::new();
/// profiler.start();
/// profiler.record_event("cache_hit", 3);
///
/// let report = profiler.report(true);
/// println!("{report}");
///
/// for ledger in report.ledgers() {
///     for event in ledger.events() {
///         println!("{} happened {} times", event.name(), event.count());
///     }
/// }
/// ```
///
/// [1]: crate::Profiler
#[derive(Clone, Debug)]
pub struct Report {
    lifetime: Duration,

    // Either one merged ledger or one per thread, in first-use order.
    ledgers: Box<[LedgerReport]>,
}

impl Report {
    pub(crate) fn new(lifetime: Duration, ledgers: Vec<LedgerReport>) -> Self {
        Self {
            lifetime,
            ledgers: ledgers.into_boxed_slice(),
        }
    }

    /// Total time the profiler has spent in the running state since it was last cleared.
    ///
    /// This is the denominator of every percentage in the report, for merged and
    /// per-thread reports alike.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// The ledgers in this report.
    ///
    /// A merged report contains exactly one ledger without a thread label.
    /// A per-thread report contains one labeled ledger for each thread that has
    /// recorded anything, in the order the threads first recorded.
    pub fn ledgers(&self) -> impl Iterator<Item = &LedgerReport> {
        self.ledgers.iter()
    }

    /// Whether no events, averages or blocks are present in the report.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ledgers.iter().all(LedgerReport::is_empty)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Profiling statistics. Total counted time: {} seconds",
            self.lifetime.as_secs_f64()
        )?;

        for ledger in &self.ledgers {
            writeln!(f)?;
            write!(f, "{ledger}")?;
        }

        Ok(())
    }
}

/// Identifies the thread a per-thread ledger belongs to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThreadLabel {
    id: ThreadId,
    name: Option<String>,
}

impl ThreadLabel {
    pub(crate) fn current() -> Self {
        let thread = thread::current();

        Self {
            id: thread.id(),
            name: thread.name().map(ToOwned::to_owned),
        }
    }

    /// The identifier of the thread.
    #[must_use]
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// The name of the thread, if it had one when it first recorded data.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for ThreadLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.id)?;

        if let Some(name) = &self.name {
            write!(f, " ({name})")?;
        }

        Ok(())
    }
}

/// The report section for one ledger, either a single thread's or the merge of all threads.
#[derive(Clone, Debug)]
pub struct LedgerReport {
    // None for the merged ledger.
    thread: Option<ThreadLabel>,

    lifetime: Duration,

    // Sorted by count descending, then name ascending.
    events: Box<[EventCount]>,

    // Sorted by mean descending, then name ascending.
    averages: Box<[AverageStats]>,

    // Sorted by total duration descending, then name ascending.
    blocks: Box<[BlockStats]>,
}

impl LedgerReport {
    pub(crate) fn new(
        thread: Option<ThreadLabel>,
        ledger: &ThreadLedger,
        lifetime: Duration,
    ) -> Self {
        let mut events = ledger
            .events()
            .map(|(name, count)| EventCount {
                name: name.to_owned(),
                count,
            })
            .collect::<Vec<_>>();
        events.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

        let mut averages = ledger
            .averages()
            .map(|(name, accumulator)| AverageStats {
                name: name.to_owned(),
                accumulator: *accumulator,
            })
            .collect::<Vec<_>>();
        averages.sort_by(|a, b| {
            b.mean()
                .total_cmp(&a.mean())
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut blocks = ledger
            .blocks()
            .map(|(name, slot)| BlockStats {
                name: name.to_owned(),
                accumulator: *slot.accumulator(),
                lifetime,
            })
            .collect::<Vec<_>>();
        blocks.sort_by(|a, b| {
            b.total()
                .cmp(&a.total())
                .then_with(|| a.name.cmp(&b.name))
        });

        Self {
            thread,
            lifetime,
            events: events.into_boxed_slice(),
            averages: averages.into_boxed_slice(),
            blocks: blocks.into_boxed_slice(),
        }
    }

    /// The thread this ledger belongs to, `None` for a merged ledger.
    #[must_use]
    pub fn thread(&self) -> Option<&ThreadLabel> {
        self.thread.as_ref()
    }

    /// Event counters, highest count first.
    pub fn events(&self) -> impl Iterator<Item = &EventCount> {
        self.events.iter()
    }

    /// Averages, highest mean first.
    pub fn averages(&self) -> impl Iterator<Item = &AverageStats> {
        self.averages.iter()
    }

    /// Timed blocks, longest total first.
    pub fn blocks(&self) -> impl Iterator<Item = &BlockStats> {
        self.blocks.iter()
    }

    /// Looks up an event counter by name.
    #[must_use]
    pub fn event(&self, name: &str) -> Option<&EventCount> {
        self.events.iter().find(|event| event.name == name)
    }

    /// Looks up an average by name.
    #[must_use]
    pub fn average(&self, name: &str) -> Option<&AverageStats> {
        self.averages.iter().find(|average| average.name == name)
    }

    /// Looks up a timed block by name.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<&BlockStats> {
        self.blocks.iter().find(|block| block.name == name)
    }

    /// Profiler lifetime not covered by any timed block of this ledger.
    ///
    /// `None` if the block totals exceed the lifetime, which happens when blocks overlap
    /// or when blocks were measured while the profiler was stopped. Such a value would
    /// not be a meaningful statistic.
    #[must_use]
    pub fn unaccounted(&self) -> Option<Duration> {
        let accounted = self
            .blocks
            .iter()
            .fold(Duration::ZERO, |sum, block| sum.saturating_add(block.total()));

        self.lifetime.checked_sub(accounted)
    }

    /// Whether no events, averages or blocks are present in the ledger.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.averages.is_empty() && self.blocks.is_empty()
    }
}

impl fmt::Display for LedgerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(thread) = &self.thread {
            writeln!(f, "Thread {thread}:")?;
        }

        if !self.events.is_empty() {
            writeln!(f, "Events:")?;
            for event in &self.events {
                writeln!(f, "{event}")?;
            }
        }

        if !self.averages.is_empty() {
            writeln!(f, "Averages:")?;
            for average in &self.averages {
                writeln!(f, "{average}")?;
            }
        }

        if !self.blocks.is_empty() {
            writeln!(f, "Blocks of time:")?;
            for block in &self.blocks {
                writeln!(f, "{block}")?;
            }
        }

        if let Some(unaccounted) = self.unaccounted() {
            write!(f, "Unaccounted time: {}s", unaccounted.as_secs_f64())?;

            if let Some(percent) = percent_of(unaccounted, self.lifetime) {
                write!(f, " ({percent:.1}%)")?;
            }

            writeln!(f)?;
        }

        Ok(())
    }
}

/// How many times a named event was recorded.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventCount {
    name: String,
    count: u64,
}

impl EventCount {
    /// The name of the event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The sum of all increments recorded for the event.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl fmt::Display for EventCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.count)
    }
}

/// Statistics of a named average.
#[derive(Clone, Debug, PartialEq)]
pub struct AverageStats {
    name: String,
    accumulator: ValueAccumulator,
}

impl AverageStats {
    /// The name of the average.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mean of the recorded values.
    #[must_use]
    pub fn mean(&self) -> f64 {
        // A ledger only holds averages that have at least one value.
        self.accumulator.mean().unwrap_or_default()
    }

    /// Standard deviation of the recorded values, zero for a single value.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.accumulator.std_dev()
    }

    /// Number of recorded values.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.accumulator.sample_count()
    }

    /// The underlying accumulator.
    #[must_use]
    pub fn accumulator(&self) -> &ValueAccumulator {
        &self.accumulator
    }
}

impl fmt::Display for AverageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (stddev = {})",
            self.name,
            self.mean(),
            self.std_dev()
        )
    }
}

/// Statistics of a named timed block.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockStats {
    name: String,
    accumulator: TimeAccumulator,
    lifetime: Duration,
}

impl BlockStats {
    /// The name of the block.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of all measured durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.accumulator.total()
    }

    /// Number of completed measurements.
    ///
    /// May be zero if the block was begun but never ended.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.accumulator.sample_count()
    }

    /// Total duration as a percentage of the profiler lifetime.
    ///
    /// Zero if the profiler lifetime is zero.
    #[must_use]
    pub fn percent_of_lifetime(&self) -> f64 {
        percent_of(self.total(), self.lifetime).unwrap_or_default()
    }

    /// Mean duration of one measurement in seconds, `None` if nothing was measured.
    #[must_use]
    pub fn mean_seconds(&self) -> Option<f64> {
        if self.sample_count() == 0 {
            return None;
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "counts beyond 2^52 samples are not a realistic concern for statistics"
        )]
        let sample_count = self.sample_count() as f64;

        Some(self.total().as_secs_f64() / sample_count)
    }

    /// How many measurements would fit in one second, based on the mean duration.
    ///
    /// Only available when the mean is shorter than one second (but not zero).
    #[must_use]
    pub fn rate_per_second(&self) -> Option<f64> {
        self.mean_seconds()
            .filter(|mean| *mean > 0.0 && *mean < 1.0)
            .map(|mean| 1.0 / mean)
    }

    /// The underlying accumulator.
    #[must_use]
    pub fn accumulator(&self) -> &TimeAccumulator {
        &self.accumulator
    }
}

impl fmt::Display for BlockStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}s ({:.1}%), [{}s --> {}s], {} samples",
            self.name,
            self.total().as_secs_f64(),
            self.percent_of_lifetime(),
            self.accumulator.shortest().unwrap_or_default().as_secs_f64(),
            self.accumulator.longest().unwrap_or_default().as_secs_f64(),
            self.sample_count(),
        )?;

        if let Some(mean) = self.mean_seconds() {
            write!(f, ", {mean}s on average")?;

            if let Some(rate) = self.rate_per_second() {
                write!(f, " ({rate:.1} per second)")?;
            }
        }

        Ok(())
    }
}

/// `part` as a percentage of `whole`, `None` if `whole` is zero.
fn percent_of(part: Duration, whole: Duration) -> Option<f64> {
    if whole.is_zero() {
        return None;
    }

    Some(100.0 * part.as_secs_f64() / whole.as_secs_f64())
}
