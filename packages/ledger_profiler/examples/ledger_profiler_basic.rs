//! Records events, averages and timed blocks from a few worker threads,
//! then prints a merged and a per-thread report.
//!
//! Run with: `cargo run --example ledger_profiler_basic`.
#![expect(
    clippy::arithmetic_side_effects,
    clippy::cast_precision_loss,
    reason = "this is example code that does not need production-level safety"
)]

use std::hint::black_box;
use std::thread;
use std::time::Duration;

use ledger_profiler::Profiler;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let profiler = Profiler::builder().auto_start(true).build();

    thread::scope(|s| {
        for worker in 0..3_u64 {
            let profiler = &profiler;

            thread::Builder::new()
                .name(format!("worker-{worker}"))
                .spawn_scoped(s, move || {
                    for item in 0..20_u64 {
                        let _block = profiler.scoped_block("process_item");

                        profiler.record_event_once("items_processed");
                        profiler.record_average("item_weight", (item * (worker + 1)) as f64);

                        thread::sleep(Duration::from_millis(2));
                        black_box(item);
                    }
                })
                .expect("failed to spawn worker thread");
        }
    });

    {
        let _block = profiler.scoped_block("summarize");
        thread::sleep(Duration::from_millis(10));
    }

    println!("=== Merged report ===");
    println!("{}", profiler.report(true));

    println!("=== Per-thread report ===");
    println!("{}", profiler.report(false));

    // The same merged report, delivered through `tracing`.
    profiler.console();
}
