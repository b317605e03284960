//! Platform abstraction trait definitions.

use std::fmt::Debug;
use std::time::Duration;

/// Provides a monotonic time source.
pub(crate) trait Clock: Debug + Send + Sync + 'static {
    /// Time elapsed since an arbitrary fixed origin.
    ///
    /// Only differences between two readings of the same clock are meaningful.
    fn now(&self) -> Duration;
}
