//! In-memory appender for capturing output

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects records in a buffer shared with every clone
///
/// Useful for asserting on output in tests and for embedding the logger
/// where records are forwarded elsewhere.
///
/// # Example
///
/// ```
/// use field_logger::appenders::MemoryAppender;
/// use field_logger::core::Appender;
///
/// let buffer = MemoryAppender::new();
/// let mut writer = buffer.clone();
/// writer.append(b"hello\n").unwrap();
/// assert_eq!(buffer.lines(), vec!["hello".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
    flushes: Arc<Mutex<usize>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Number of times `flush` was called
    pub fn flush_count(&self) -> usize {
        *self.flushes.lock()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        *self.flushes.lock() += 1;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
