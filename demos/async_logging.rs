//! Async logging example
//!
//! Demonstrates several producer threads sharing one pool, the overflow
//! policies, and waiting for queued records before exit.
//!
//! Run with: cargo run --example async_logging

use async_log_engine::prelude::*;
use async_log_engine::{create_async_logger, create_pool, info, shutdown_pool, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Async Log Engine - Async Logging Example ===\n");

    let pool = create_pool(1024, 2)?;
    let console: Arc<dyn Sink> = Arc::new(ConsoleSink::new());

    println!("1. High-performance async logging:");
    let logger = create_async_logger(
        "async",
        vec![Arc::clone(&console)],
        &pool.handle(),
        OverflowPolicy::Block,
    )?;

    for i in 0..100 {
        info!(logger, "Message #{}", i)?;
    }
    logger.wait();
    println!("   Logged 100 messages asynchronously");

    // Multi-threaded logging
    println!("\n2. Multi-threaded logging:");
    let handles: Vec<_> = (0..5)
        .map(|thread_id| {
            let logger = logger.clone_with_name(format!("worker-{}", thread_id));
            thread::spawn(move || {
                for i in 0..20 {
                    let _ = info!(logger, "Thread {} - Message {}", thread_id, i);
                    thread::sleep(Duration::from_millis(10));
                }
                logger.wait();
            })
        })
        .collect();

    for handle in handles {
        let _ = handle.join();
    }
    println!("   5 threads logged 20 messages each");

    // A tiny pool makes overflow easy to see
    println!("\n3. Overflow policies on a full queue:");
    let small = create_pool(4, 1)?;
    for policy in [OverflowPolicy::OverrunOldest, OverflowPolicy::DiscardNew] {
        let lossy = AsyncLogger::builder(format!("lossy-{}", policy))
            .sink(Arc::clone(&console))
            .pool(&small.handle())
            .overflow_policy(policy)
            .on_overflow(Arc::new(move |count| {
                println!("   [{}] {} job(s) lost so far", policy, count);
            }))
            .build()?;

        for i in 0..50 {
            warn!(lossy, "burst {}", i)?;
        }
        lossy.wait();
        println!(
            "   {}: logged {}, dropped {}",
            policy,
            lossy.metrics().total_logged(),
            lossy.metrics().dropped_count()
        );
    }
    shutdown_pool(small);

    shutdown_pool(pool);

    // Loggers outlive their pool but can no longer enqueue
    if let Err(e) = logger.info("after shutdown") {
        println!("\n4. Logging after shutdown fails cleanly: {}", e);
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
