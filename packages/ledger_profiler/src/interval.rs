use std::time::Duration;

/// An open measurement interval, holding the timestamp at which it was opened.
///
/// Closing consumes the interval, so a closed interval cannot be folded into an
/// accumulator twice. Closing never yields a negative duration, even if the clock
/// reading at close is earlier than the one at open.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TimedInterval {
    start: Duration,
}

impl TimedInterval {
    pub(crate) fn open(start: Duration) -> Self {
        Self { start }
    }

    /// Closes the interval at `end` and returns the elapsed time.
    pub(crate) fn close(self, end: Duration) -> Duration {
        end.saturating_sub(self.start)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn close_yields_elapsed() {
        let interval = TimedInterval::open(Duration::from_millis(250));

        assert_eq!(
            interval.close(Duration::from_millis(750)),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn close_at_open_time_is_zero() {
        let interval = TimedInterval::open(Duration::from_secs(2));

        assert_eq!(interval.close(Duration::from_secs(2)), Duration::ZERO);
    }

    #[test]
    fn close_before_start_is_clamped_to_zero() {
        let interval = TimedInterval::open(Duration::from_secs(10));

        assert_eq!(interval.close(Duration::from_secs(4)), Duration::ZERO);
    }
}
