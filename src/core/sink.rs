//! Shared, internally serialized output destinations
//!
//! A [`Sink`] wraps an [`Appender`] behind a mutex so that concurrent callers
//! each write whole records. Sinks are cheap to clone; clones share the same
//! appender and the same closed state.

use super::appender::Appender;
use super::error::{panic_message, LoggerError, Result};
use crate::appenders::{ConsoleAppender, FileAppender};
use parking_lot::Mutex;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct SinkInner {
    name: String,
    appender: Mutex<Box<dyn Appender>>,
    closed: AtomicBool,
}

#[derive(Clone)]
pub struct Sink {
    inner: Arc<SinkInner>,
}

impl Sink {
    pub fn new<A: Appender + 'static>(appender: A) -> Self {
        Self::from_boxed(Box::new(appender))
    }

    pub fn from_boxed(appender: Box<dyn Appender>) -> Self {
        Self {
            inner: Arc::new(SinkInner {
                name: appender.name().to_string(),
                appender: Mutex::new(appender),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Whether both handles refer to the same destination
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Write one record; fails with [`LoggerError::LoggerStopped`] once closed
    pub fn write(&self, record: &[u8]) -> Result<()> {
        if self.is_closed() {
            return Err(LoggerError::LoggerStopped);
        }
        let mut appender = self.inner.appender.lock();
        // close() may have won the race for the lock
        if self.is_closed() {
            return Err(LoggerError::LoggerStopped);
        }
        isolate(&self.inner.name, || appender.append(record))
    }

    /// Flush buffered output without closing
    pub fn sync(&self) -> Result<()> {
        if self.is_closed() {
            return Ok(());
        }
        let mut appender = self.inner.appender.lock();
        isolate(&self.inner.name, || appender.flush())
    }

    /// Flush and close; only the first call does any work
    pub fn close(&self) -> Result<()> {
        let mut appender = self.inner.appender.lock();
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        isolate(&self.inner.name, || appender.flush())
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.inner.name)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Run an appender call, turning a panic into an error
fn isolate(name: &str, f: impl FnOnce() -> Result<()>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic_info) => Err(LoggerError::other(format!(
            "appender {:?} panicked: {}",
            name,
            panic_message(&*panic_info)
        ))),
    }
}

/// Opens sinks by name
pub trait SinkProvider: Send + Sync {
    fn open(&self, name: &str) -> Result<Sink>;
}

/// `stdout` and `stderr` map to the process streams; any other name is a file path
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSinkProvider;

impl SinkProvider for StdSinkProvider {
    fn open(&self, name: &str) -> Result<Sink> {
        match name {
            "stdout" => Ok(Sink::new(ConsoleAppender::stdout())),
            "stderr" => Ok(Sink::new(ConsoleAppender::stderr())),
            path => Ok(Sink::new(FileAppender::new(path)?)),
        }
    }
}
