//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Records from many threads are never interleaved within a line
//! - Derived loggers can be created and used concurrently
//! - Flushing while other threads log loses nothing silently

use field_logger::appenders::{FileAppender, MemoryAppender};
use field_logger::prelude::*;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 250;

fn json_logger(sink: Sink) -> Logger {
    Logger::builder()
        .min_level(LogLevel::Debug)
        .format(OutputFormat::Json)
        .sink(sink)
        .build()
        .expect("Failed to build logger")
}

#[test]
fn test_concurrent_records_stay_whole() {
    let out = MemoryAppender::new();
    let logger = json_logger(Sink::new(out.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with([Field::uint("thread", t)]);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info_with(
                        "tick",
                        &[
                            Field::uint("i", i),
                            Field::string("payload", "x".repeat(64)),
                        ],
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("logging thread panicked");
    }

    let lines = out.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut seen = HashSet::new();
    for line in &lines {
        let record: Value = serde_json::from_str(line).expect("torn record");
        let key = (
            record["thread"].as_u64().unwrap(),
            record["i"].as_u64().unwrap(),
        );
        assert!(seen.insert(key), "duplicate record {:?}", key);
    }
    assert_eq!(
        logger.metrics().total_written(),
        (THREADS * PER_THREAD) as u64
    );
}

#[test]
fn test_concurrent_derivation() {
    let out = MemoryAppender::new();
    let root = Arc::new(json_logger(Sink::new(out.clone())));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let root = Arc::clone(&root);
            thread::spawn(move || {
                let mut logger = root.with_name(&format!("w{}", t));
                for depth in 0..10 {
                    logger = logger.with([Field::uint("depth", depth)]);
                }
                logger.debug("deep");
                logger.context().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 10);
    }
    assert!(root.context().is_empty());

    let names: HashSet<String> = out
        .lines()
        .iter()
        .map(|line| {
            let record: Value = serde_json::from_str(line).unwrap();
            record["logger"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(names.len(), THREADS);
}

#[test]
fn test_flush_during_logging_accounts_for_every_record() {
    let out = MemoryAppender::new();
    let logger = json_logger(Sink::new(out.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.warn_with("busy", &[Field::uint("i", i)]);
                }
            })
        })
        .collect();

    logger.flush().expect("Failed to flush");
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = logger.metrics();
    let written = out.lines().len() as u64;
    assert_eq!(metrics.total_written(), written);
    assert_eq!(
        metrics.total_written() + metrics.writes_after_stop(),
        (THREADS * PER_THREAD) as u64
    );
}

#[test]
fn test_concurrent_file_logging() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("stress.log");
    let appender = FileAppender::new(path.clone()).expect("Failed to create appender");
    let logger = json_logger(Sink::new(appender));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.with_name(&format!("t{}", t));
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.error_with("disk", &[Field::uint("i", i)]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().expect("Failed to flush");

    let content = fs::read_to_string(&path).expect("Failed to read log file");
    assert_eq!(content.lines().count(), THREADS * PER_THREAD);
    for line in content.lines() {
        serde_json::from_str::<Value>(line).expect("torn record");
    }
}
