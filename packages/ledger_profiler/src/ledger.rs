use std::time::Duration;

use foldhash::{HashMap, HashMapExt};

use crate::interval::TimedInterval;
use crate::{TimeAccumulator, ValueAccumulator};

/// Everything one thread has recorded: event counters, averages and timed blocks.
///
/// A ledger is only ever mutated on behalf of the thread it belongs to, while the
/// profiler lock is held. Reports work on clones, never on the live ledger.
#[derive(Clone, Debug, Default)]
pub(crate) struct ThreadLedger {
    events: HashMap<String, u64>,
    averages: HashMap<String, ValueAccumulator>,
    blocks: HashMap<String, BlockSlot>,
}

/// A timed block: the accumulated samples plus the interval currently open, if any.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BlockSlot {
    accumulator: TimeAccumulator,
    open: Option<TimedInterval>,
}

impl BlockSlot {
    pub(crate) fn accumulator(&self) -> &TimeAccumulator {
        &self.accumulator
    }
}

/// What happened when a block was asked to begin.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum BeginOutcome {
    /// No interval was open under this name.
    Opened,

    /// An interval was already open and its start time was discarded.
    Replaced,

    /// An interval was already open and was kept; the new begin was ignored.
    Rejected,
}

impl ThreadLedger {
    pub(crate) fn new() -> Self {
        Self {
            events: HashMap::new(),
            averages: HashMap::new(),
            blocks: HashMap::new(),
        }
    }

    pub(crate) fn record_event(&mut self, name: &str, increment: u64) {
        // Lookup by &str first so the common case does not allocate a key.
        if let Some(count) = self.events.get_mut(name) {
            *count = count.saturating_add(increment);
        } else {
            self.events.insert(name.to_owned(), increment);
        }
    }

    pub(crate) fn record_average(&mut self, name: &str, value: f64) {
        if let Some(accumulator) = self.averages.get_mut(name) {
            accumulator.record(value);
        } else {
            let mut accumulator = ValueAccumulator::new();
            accumulator.record(value);
            self.averages.insert(name.to_owned(), accumulator);
        }
    }

    /// Opens an interval for `name` at `now`.
    ///
    /// If one is already open, `keep_open` decides whether the existing interval
    /// survives (`true`) or is overwritten (`false`). Nesting is not supported either way.
    pub(crate) fn begin_block(
        &mut self,
        name: &str,
        now: Duration,
        keep_open: bool,
    ) -> BeginOutcome {
        let slot = if let Some(slot) = self.blocks.get_mut(name) {
            slot
        } else {
            self.blocks.entry(name.to_owned()).or_default()
        };

        match slot.open {
            None => {
                slot.open = Some(TimedInterval::open(now));
                BeginOutcome::Opened
            }
            Some(_) if keep_open => BeginOutcome::Rejected,
            Some(_) => {
                slot.open = Some(TimedInterval::open(now));
                BeginOutcome::Replaced
            }
        }
    }

    /// Closes the interval open under `name` and folds it into the block's accumulator.
    ///
    /// Returns the elapsed time, or `None` if no interval was open (nothing is recorded).
    pub(crate) fn end_block(&mut self, name: &str, now: Duration) -> Option<Duration> {
        let slot = self.blocks.get_mut(name)?;
        let interval = slot.open.take()?;

        let elapsed = interval.close(now);
        slot.accumulator.record(elapsed);

        Some(elapsed)
    }

    /// Adds everything recorded in `other` to this ledger.
    ///
    /// Open intervals of `other` are not carried over - only completed samples merge.
    pub(crate) fn merge_from(&mut self, other: &Self) {
        for (name, count) in &other.events {
            self.record_event(name, *count);
        }

        for (name, accumulator) in &other.averages {
            self.averages
                .entry(name.clone())
                .or_default()
                .merge_from(accumulator);
        }

        for (name, slot) in &other.blocks {
            self.blocks
                .entry(name.clone())
                .or_default()
                .accumulator
                .merge_from(&slot.accumulator);
        }
    }

    pub(crate) fn events(&self) -> impl Iterator<Item = (&str, u64)> {
        self.events
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    pub(crate) fn averages(&self) -> impl Iterator<Item = (&str, &ValueAccumulator)> {
        self.averages.iter().map(|(name, acc)| (name.as_str(), acc))
    }

    pub(crate) fn blocks(&self) -> impl Iterator<Item = (&str, &BlockSlot)> {
        self.blocks.iter().map(|(name, slot)| (name.as_str(), slot))
    }

    #[cfg(test)]
    pub(crate) fn event_count(&self, name: &str) -> Option<u64> {
        self.events.get(name).copied()
    }

    #[cfg(test)]
    pub(crate) fn block(&self, name: &str) -> Option<&TimeAccumulator> {
        self.blocks.get(name).map(BlockSlot::accumulator)
    }
}
