//! Appender trait for log output destinations

use super::error::Result;

/// A byte destination for fully encoded records
///
/// `append` receives exactly one record, newline included. Implementations
/// must write it contiguously.
pub trait Appender: Send {
    fn append(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
