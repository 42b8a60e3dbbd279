//! Basic logger usage example
//!
//! Demonstrates an async logger on a one-worker pool writing to the console
//! at different log levels.
//!
//! Run with: cargo run --example basic_usage

use async_log_engine::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Async Log Engine - Basic Usage Example ===\n");

    // One worker is plenty for a single console sink
    let pool = ThreadPool::new(ThreadPoolConfig::new(1))?;

    let logger = AsyncLogger::builder("basic")
        .sink(Arc::new(ConsoleSink::new()))
        .pool(&pool.handle())
        .min_level(LogLevel::Trace)
        .block_on_flush(true)
        .build()?;

    // Log messages at different levels
    println!("1. Logging at different levels:");
    logger.trace("This is a trace message")?;
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;
    logger.fatal("This is a fatal message")?;
    logger.flush()?;

    println!("\n2. Logging with different minimum levels:");

    // Change minimum level
    logger.set_level(LogLevel::Info);
    println!("   Minimum level set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)")?;
    logger.debug("Debug message (hidden)")?;
    logger.info("Info message (visible)")?;
    logger.warn("Warning message (visible)")?;
    logger.flush()?;

    pool.shutdown();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
