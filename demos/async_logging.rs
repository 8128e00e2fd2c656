//! Async logging example
//!
//! Several threads log through one non-blocking logger; `close()` waits
//! until every accepted message has been attempted.
//!
//! Requires TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID. TELEGRAM_LOG_LEVEL,
//! TELEGRAM_APP_NAME and the other TELEGRAM_* variables are honored.
//!
//! Run with: cargo run --example async_logging

use rust_telegram_logger::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn main() -> Result<()> {
    println!("=== Rust Telegram Logger - Async Logging Example ===\n");

    let logger = Arc::new(Logger::from_env()?);
    println!("Async delivery: {}", logger.is_async());

    let started = Instant::now();
    let handles: Vec<_> = (0..3)
        .map(|worker| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for job in 0..3 {
                    logger.info("worker %d finished job %d", &[Arg::from(worker), Arg::from(job)]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
    println!(
        "Enqueued in {:?}, {} still pending",
        started.elapsed(),
        logger.pending()
    );

    logger.close();
    println!("Drained in {:?}", started.elapsed());

    let metrics = logger.metrics();
    println!(
        "Delivered: {}, failed: {}, queue full events: {}",
        metrics.delivered_count(),
        metrics.failed_count(),
        metrics.queue_full_events()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
