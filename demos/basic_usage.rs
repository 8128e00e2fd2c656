//! Basic logger usage example
//!
//! Demonstrates synchronous delivery, the different log levels and the
//! formatting macros.
//!
//! Requires TELEGRAM_BOT_TOKEN and TELEGRAM_CHAT_ID.
//!
//! Run with: cargo run --example basic_usage

use rust_telegram_logger::prelude::*;
use rust_telegram_logger::{error, info};

fn main() -> Result<()> {
    println!("=== Rust Telegram Logger - Basic Usage Example ===\n");

    let config = LoggerConfig::from_env(&rust_telegram_logger::ProcessEnv)?;
    let logger = Logger::builder()
        .bot_token(config.bot_token)
        .chat_id(config.chat_id)
        .app_name("basic-demo")
        .min_level(LogLevel::Debug)
        .async_delivery(false)
        .timestamp_format(TimestampFormat::pattern("HH:mm:ss"))
        .fatal_handler(|| println!("   (fatal handler replaced: not exiting)"))
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug("cache warmed with %d entries", &[Arg::from(1200)]);
    logger.info("server listening on %s:%d", &[Arg::from("0.0.0.0"), Arg::from(8080)]);
    logger.warning("disk usage at %.1f%%", &[Arg::from(91.5)]);
    logger.error("payment %s declined", &[Arg::from("pay_7f3a")]);
    logger.fatal("configuration corrupted", &[]);

    println!("\n2. Using the macros:");
    let user = "alice";
    info!(logger, "user {} signed in", user);
    error!(logger, "retry {}/{} failed", 3, 3);

    let metrics = logger.metrics();
    println!(
        "\nDelivered: {}, failed: {}",
        metrics.delivered_count(),
        metrics.failed_count()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
