//! Criterion benchmarks for async_log_engine

use async_log_engine::prelude::*;
use async_log_engine::BoundedQueue;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

/// Sink that accepts everything and does nothing
struct NullSink;

impl Sink for NullSink {
    fn log(&self, _level: LogLevel, formatted: &[u8]) -> Result<()> {
        black_box(formatted);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn level_threshold(&self) -> LogLevel {
        LogLevel::Trace
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn bench_pool(backend: QueueBackend) -> ThreadPool {
    ThreadPool::new(
        ThreadPoolConfig::new(1)
            .with_queue_capacity(8192)
            .with_backend(backend),
    )
    .expect("Failed to create pool")
}

// ============================================================================
// Queue Benchmarks
// ============================================================================

fn bench_queue_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_ops");
    group.throughput(Throughput::Elements(1));

    for backend in [QueueBackend::Ring, QueueBackend::Channel] {
        let queue = backend.build::<u64>(1024);

        group.bench_with_input(
            BenchmarkId::new("push_pop", format!("{:?}", backend)),
            &queue,
            |b, queue| {
                b.iter(|| {
                    let _ = queue.push_or_discard(black_box(42));
                    black_box(queue.try_pop())
                });
            },
        );

        // Always full: every push evicts
        let full = backend.build::<u64>(64);
        for i in 0..64 {
            full.push_overwrite(i);
        }
        group.bench_with_input(
            BenchmarkId::new("overwrite_full", format!("{:?}", backend)),
            &full,
            |b, queue| {
                b.iter(|| black_box(queue.push_overwrite(black_box(7))));
            },
        );
    }

    group.finish();
}

// ============================================================================
// Enqueue Throughput Benchmarks
// ============================================================================

fn bench_enqueue(c: &mut Criterion) {
    let mut group = c.benchmark_group("enqueue");
    group.throughput(Throughput::Elements(1));

    for backend in [QueueBackend::Ring, QueueBackend::Channel] {
        for policy in [
            OverflowPolicy::Block,
            OverflowPolicy::OverrunOldest,
            OverflowPolicy::DiscardNew,
        ] {
            let pool = bench_pool(backend);
            let logger = AsyncLogger::builder("bench")
                .sink(Arc::new(NullSink))
                .pool(&pool.handle())
                .overflow_policy(policy)
                .build()
                .expect("Failed to build logger");

            group.bench_function(format!("{:?}/{}", backend, policy), |b| {
                b.iter(|| {
                    let _ = logger.info(black_box("Info message"));
                });
            });

            logger.wait();
            pool.shutdown();
        }
    }

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let pool = bench_pool(QueueBackend::Ring);
    let logger = AsyncLogger::builder("filter")
        .sink(Arc::new(NullSink))
        .pool(&pool.handle())
        .min_level(LogLevel::Warn)
        .build()
        .expect("Failed to build logger");

    group.bench_function("filtered_out", |b| {
        b.iter(|| {
            let _ = logger.debug(black_box("Filtered message"));
        });
    });

    group.bench_function("filtered_out_macro", |b| {
        b.iter(|| {
            let _ = async_log_engine::debug!(logger, "Filtered {}", black_box(42));
        });
    });

    group.bench_function("should_log", |b| {
        b.iter(|| black_box(logger.should_log(black_box(LogLevel::Info))));
    });

    group.finish();
    logger.wait();
    pool.shutdown();
}

// ============================================================================
// Formatting Benchmarks
// ============================================================================

fn bench_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatting");
    group.throughput(Throughput::Elements(1));

    let record = Record::new(
        "bench".into(),
        LogLevel::Info,
        "user login succeeded".to_string(),
    );

    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Logfmt] {
        let formatter = PatternFormatter::new().with_output_format(format);
        group.bench_function(format!("{:?}", format), |b| {
            b.iter(|| black_box(formatter.format(black_box(&record))));
        });
    }

    group.finish();
}

// ============================================================================
// Flush Benchmarks
// ============================================================================

fn bench_flush_wait(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush_wait");
    group.throughput(Throughput::Elements(100));

    let pool = bench_pool(QueueBackend::Ring);
    let logger = AsyncLogger::builder("flush")
        .sink(Arc::new(NullSink))
        .pool(&pool.handle())
        .block_on_flush(true)
        .build()
        .expect("Failed to build logger");

    group.bench_function("100_then_flush", |b| {
        b.iter(|| {
            for i in 0..100 {
                let _ = logger.info(format!("message {}", i));
            }
            logger.flush()
        });
    });

    group.finish();
    pool.shutdown();
}

criterion_group!(
    benches,
    bench_queue_ops,
    bench_enqueue,
    bench_level_filtering,
    bench_formatting,
    bench_flush_wait,
);

criterion_main!(benches);
