#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Count events, average values and time blocks of code from any number of threads,
//! then print a report of where the time went.
//!
//! Each thread records into its own ledger inside a [`Profiler`]. A report can merge all
//! ledgers into one or show each thread separately.
//!
//! # Collected data
//!
//! * **Events** - named counters (`u64`).
//! * **Averages** - named series of `f64` values, reported as mean and standard deviation.
//! * **Timed blocks** - named durations between a begin and an end, reported as total time,
//!   share of the profiler lifetime, shortest and longest duration, sample count and
//!   mean duration.
//!
//! Individual samples are never stored, only running sums, so memory use depends on the
//! number of distinct names and threads, not on the number of recordings.
//!
//! # Recording
//!
//! ```
//! use ledger_profiler::Profiler;
//!
//! let profiler = Profiler::new();
//! profiler.start();
//!
//! std::thread::scope(|s| {
//!     for _ in 0..4 {
//!         s.spawn(|| {
//!             let _block = profiler.scoped_block("worker_loop");
//!
//!             profiler.record_event("items_processed", 100);
//!             profiler.record_average("queue_depth", 7.0);
//!         });
//!     }
//! });
//!
//! let report = profiler.report(true);
//! let merged = report.ledgers().next().unwrap();
//! # if cfg!(feature = "measure") {
//! assert_eq!(merged.event("items_processed").unwrap().count(), 400);
//! # }
//! ```
//!
//! # Reporting
//!
//! [`Profiler::report()`] stops the lifetime timer and returns a [`Report`], which implements
//! `Display`:
//!
//! ```text
//! Profiling statistics. Total counted time: 2 seconds
//!
//! Events:
//! hit: 10
//! Averages:
//! latency: 4 (stddev = 2)
//! Blocks of time:
//! io: 0.5s (25.0%), [0.5s --> 0.5s], 1 samples, 0.5s on average (2.0 per second)
//! Unaccounted time: 1.5s (75.0%)
//! ```
//!
//! Use [`Profiler::write_report()`] to write to any `std::io::Write`, or
//! [`Profiler::console()`] to emit the merged report through `tracing`.
//!
//! # Process-wide profiler
//!
//! Create a [`Profiler`] where your program starts and pass it to the code that records
//! into it. Code that cannot be given one can use [`Profiler::global()`].
//!
//! # Compiling out
//!
//! Without the default `measure` feature, all recording methods are no-ops with the
//! same signatures, and reports are always empty.
//!
//! # Panic policy
//!
//! Recording and reporting never panic. Counters and durations saturate instead of
//! overflowing. Statistics that would divide by zero are reported as zero or omitted.

mod guards;
mod interval;
mod ledger;
mod pal;
mod profiler;
mod profiler_builder;
mod report;
mod time_accumulator;
mod value_accumulator;

pub use guards::*;
pub use profiler::*;
pub use profiler_builder::*;
pub use report::*;
pub use time_accumulator::*;
pub use value_accumulator::*;
