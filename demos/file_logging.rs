//! File logging example
//!
//! Demonstrates one logger writing text to the console and JSON lines to a
//! file, with automatic flushing on errors.
//!
//! Run with: cargo run --example file_logging

use async_log_engine::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Async Log Engine - File Logging Example ===\n");

    let pool = ThreadPool::new(ThreadPoolConfig::new(1).with_thread_name_prefix("file-log"))?;

    let text = AsyncLogger::builder("app")
        .sink(Arc::new(ConsoleSink::new()))
        .sink(Arc::new(FileSink::new("application.log")?))
        .pool(&pool.handle())
        .min_level(LogLevel::Debug)
        .flush_level(LogLevel::Error)
        .build()?;

    let json = AsyncLogger::builder("app.json")
        .sink(Arc::new(FileSink::truncated("application.json.log")?))
        .formatter(Arc::new(
            PatternFormatter::new()
                .with_output_format(OutputFormat::Json)
                .with_timestamp_format(TimestampFormat::UnixMillis),
        ))
        .pool(&pool.handle())
        .build()?;

    println!("1. Logging to both console and file:");

    text.info("Application started")?;
    text.debug("Loading configuration...")?;
    text.info("Configuration loaded successfully")?;
    text.warn("Using default settings for some options")?;
    text.error("Failed to load optional plugin")?;
    json.info("Application initialization complete")?;

    println!("\n2. Performing some operations:");

    // Simulate application work
    for i in 1..=5 {
        json.info(format!("Processing item {}/5", i))?;
        if i == 3 {
            text.warn("Item 3 took longer than expected")?;
        }
    }

    // Flush to ensure all logs are written
    for logger in [&text, &json] {
        logger.flush()?;
        logger.wait();
    }
    pool.shutdown();

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' and 'application.json.log' for the output");

    Ok(())
}
