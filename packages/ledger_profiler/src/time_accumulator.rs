use std::time::Duration;

/// Running aggregate of measured durations: total, shortest, longest and sample count.
///
/// Individual samples are never retained. Accumulators only grow; the only way to
/// shrink one is to discard it (which is what [`Profiler::clear()`][1] does).
///
/// [1]: crate::Profiler::clear
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeAccumulator {
    total: Duration,

    // Only meaningful if `sample_count > 0`.
    shortest: Duration,
    longest: Duration,

    sample_count: u64,
}

impl TimeAccumulator {
    /// Creates an accumulator with no samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one measured duration into the aggregate.
    pub fn record(&mut self, elapsed: Duration) {
        if self.sample_count == 0 {
            self.shortest = elapsed;
            self.longest = elapsed;
        } else {
            self.shortest = self.shortest.min(elapsed);
            self.longest = self.longest.max(elapsed);
        }

        self.total = self.total.saturating_add(elapsed);
        self.sample_count = self.sample_count.saturating_add(1);
    }

    /// Combines the samples of `other` into this accumulator, as if every sample
    /// of both had been recorded here.
    pub fn merge_from(&mut self, other: &Self) {
        if other.sample_count == 0 {
            // Totals of sample-less accumulators are always zero, nothing to take over.
            return;
        }

        if self.sample_count == 0 {
            self.shortest = other.shortest;
            self.longest = other.longest;
        } else {
            self.shortest = self.shortest.min(other.shortest);
            self.longest = self.longest.max(other.longest);
        }

        self.total = self.total.saturating_add(other.total);
        self.sample_count = self.sample_count.saturating_add(other.sample_count);
    }

    /// Sum of all recorded durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.total
    }

    /// The shortest recorded duration, `None` if nothing has been recorded.
    #[must_use]
    pub fn shortest(&self) -> Option<Duration> {
        (self.sample_count > 0).then_some(self.shortest)
    }

    /// The longest recorded duration, `None` if nothing has been recorded.
    #[must_use]
    pub fn longest(&self) -> Option<Duration> {
        (self.sample_count > 0).then_some(self.longest)
    }

    /// Number of recorded durations.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Mean duration per sample, `None` if nothing has been recorded.
    #[must_use]
    pub fn mean(&self) -> Option<Duration> {
        let mean_nanos = self
            .total
            .as_nanos()
            .checked_div(u128::from(self.sample_count))?;

        // The mean is never greater than the total, which came from a `Duration`.
        Some(Duration::from_nanos(
            u64::try_from(mean_nanos).unwrap_or(u64::MAX),
        ))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_accumulator() {
        let accumulator = TimeAccumulator::new();

        assert_eq!(accumulator.total(), Duration::ZERO);
        assert_eq!(accumulator.sample_count(), 0);
        assert_eq!(accumulator.shortest(), None);
        assert_eq!(accumulator.longest(), None);
        assert_eq!(accumulator.mean(), None);
    }

    #[test]
    fn first_sample_is_both_shortest_and_longest() {
        let mut accumulator = TimeAccumulator::new();

        accumulator.record(Duration::from_millis(40));

        assert_eq!(accumulator.sample_count(), 1);
        assert_eq!(accumulator.shortest(), Some(Duration::from_millis(40)));
        assert_eq!(accumulator.longest(), Some(Duration::from_millis(40)));
        assert_eq!(accumulator.total(), Duration::from_millis(40));
    }

    #[test]
    fn tracks_extremes_and_mean() {
        let mut accumulator = TimeAccumulator::new();

        accumulator.record(Duration::from_millis(30));
        accumulator.record(Duration::from_millis(10));
        accumulator.record(Duration::from_millis(50));

        assert_eq!(accumulator.sample_count(), 3);
        assert_eq!(accumulator.total(), Duration::from_millis(90));
        assert_eq!(accumulator.shortest(), Some(Duration::from_millis(10)));
        assert_eq!(accumulator.longest(), Some(Duration::from_millis(50)));
        assert_eq!(accumulator.mean(), Some(Duration::from_millis(30)));
    }

    #[test]
    fn zero_length_sample_counts() {
        let mut accumulator = TimeAccumulator::new();

        accumulator.record(Duration::from_millis(5));
        accumulator.record(Duration::ZERO);

        assert_eq!(accumulator.sample_count(), 2);
        assert_eq!(accumulator.shortest(), Some(Duration::ZERO));
    }

    #[test]
    fn merge_takes_extremes_across_both() {
        let mut a = TimeAccumulator::new();
        a.record(Duration::from_millis(20));
        a.record(Duration::from_millis(30));

        let mut b = TimeAccumulator::new();
        b.record(Duration::from_millis(5));
        b.record(Duration::from_millis(100));
        b.record(Duration::from_millis(15));

        a.merge_from(&b);

        assert_eq!(a.sample_count(), 5);
        assert_eq!(a.total(), Duration::from_millis(170));
        assert_eq!(a.shortest(), Some(Duration::from_millis(5)));
        assert_eq!(a.longest(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn merge_into_empty_copies() {
        let mut source = TimeAccumulator::new();
        source.record(Duration::from_millis(7));

        let mut target = TimeAccumulator::new();
        target.merge_from(&source);

        assert_eq!(target, source);
    }

    #[test]
    fn merge_from_empty_changes_nothing() {
        let mut target = TimeAccumulator::new();
        target.record(Duration::from_millis(7));
        let before = target;

        target.merge_from(&TimeAccumulator::new());

        assert_eq!(target, before);
    }
}
