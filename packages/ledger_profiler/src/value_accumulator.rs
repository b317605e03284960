/// Running aggregate of scalar measurements: sum, sum of squares and sample count.
///
/// Mean and standard deviation are derived on demand from the sums. No outlier
/// rejection or clamping is applied to recorded values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueAccumulator {
    sum: f64,
    sum_of_squares: f64,
    sample_count: u64,
}

impl ValueAccumulator {
    /// Creates an accumulator with no samples.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one measurement.
    pub fn record(&mut self, value: f64) {
        self.sum += value;
        self.sum_of_squares += value * value;
        self.sample_count = self.sample_count.saturating_add(1);
    }

    /// Combines the samples of `other` into this accumulator field by field.
    pub fn merge_from(&mut self, other: &Self) {
        self.sum += other.sum;
        self.sum_of_squares += other.sum_of_squares;
        self.sample_count = self.sample_count.saturating_add(other.sample_count);
    }

    /// Sum of all recorded values.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Sum of the squares of all recorded values.
    #[must_use]
    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    /// Number of recorded values.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    /// Arithmetic mean of the recorded values, `None` if nothing has been recorded.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.sample_count == 0 {
            return None;
        }

        Some(self.sum / self.count_f64())
    }

    /// Sample standard deviation of the recorded values.
    ///
    /// Zero when fewer than two values have been recorded. Cancellation in the
    /// sum-of-squares formula can produce a tiny negative variance; its magnitude
    /// is used instead, so the result is never negative or NaN for finite inputs.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        let Some(mean) = self.mean() else {
            return 0.0;
        };

        if self.sample_count <= 1 {
            return 0.0;
        }

        let count = self.count_f64();
        let deviation_sum = (self.sum_of_squares - count * mean * mean).abs();

        (deviation_sum / (count - 1.0)).sqrt()
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "counts beyond 2^52 samples are not a realistic concern for statistics"
    )]
    fn count_f64(&self) -> f64 {
        self.sample_count as f64
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(
        clippy::float_cmp,
        reason = "exact values are representable in these tests"
    )]

    use super::*;

    #[test]
    fn empty_accumulator_has_no_mean() {
        let accumulator = ValueAccumulator::new();

        assert_eq!(accumulator.sample_count(), 0);
        assert_eq!(accumulator.mean(), None);
        assert_eq!(accumulator.std_dev(), 0.0);
    }

    #[test]
    fn mean_and_std_dev_of_three_values() {
        let mut accumulator = ValueAccumulator::new();

        accumulator.record(2.0);
        accumulator.record(4.0);
        accumulator.record(6.0);

        assert_eq!(accumulator.sample_count(), 3);
        assert_eq!(accumulator.sum(), 12.0);
        assert_eq!(accumulator.sum_of_squares(), 56.0);
        assert_eq!(accumulator.mean(), Some(4.0));
        assert_eq!(accumulator.std_dev(), 2.0);
    }

    #[test]
    fn single_sample_has_zero_std_dev() {
        let mut accumulator = ValueAccumulator::new();

        accumulator.record(42.5);

        assert_eq!(accumulator.mean(), Some(42.5));
        assert_eq!(accumulator.std_dev(), 0.0);
    }

    #[test]
    fn identical_values_never_yield_nan() {
        let mut accumulator = ValueAccumulator::new();

        // 0.1 is not exactly representable, so the variance formula suffers
        // from cancellation and may go slightly negative.
        for _ in 0..1000 {
            accumulator.record(0.1);
        }

        let std_dev = accumulator.std_dev();
        assert!(!std_dev.is_nan());
        assert!(std_dev >= 0.0);
        assert!(std_dev < 1e-6);
    }

    #[test]
    fn negative_values_are_accepted() {
        let mut accumulator = ValueAccumulator::new();

        accumulator.record(-3.0);
        accumulator.record(3.0);

        assert_eq!(accumulator.mean(), Some(0.0));
        assert_eq!(accumulator.sum_of_squares(), 18.0);
    }

    #[test]
    fn merge_is_field_wise() {
        let mut a = ValueAccumulator::new();
        a.record(2.0);

        let mut b = ValueAccumulator::new();
        b.record(4.0);
        b.record(6.0);

        a.merge_from(&b);

        assert_eq!(a.sample_count(), 3);
        assert_eq!(a.sum(), 12.0);
        assert_eq!(a.sum_of_squares(), 56.0);
        assert_eq!(a.mean(), Some(4.0));
    }
}
