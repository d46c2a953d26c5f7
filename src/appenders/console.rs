//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

/// Which standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdStream {
    Stdout,
    Stderr,
}

pub struct ConsoleAppender {
    stream: StdStream,
}

impl ConsoleAppender {
    pub fn new(stream: StdStream) -> Self {
        Self { stream }
    }

    pub fn stdout() -> Self {
        Self::new(StdStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(StdStream::Stderr)
    }

    pub fn stream(&self) -> StdStream {
        self.stream
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stdout()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        // Holding the stream lock keeps the record contiguous
        match self.stream {
            StdStream::Stdout => std::io::stdout().lock().write_all(record)?,
            StdStream::Stderr => std::io::stderr().lock().write_all(record)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            StdStream::Stdout => std::io::stdout().flush()?,
            StdStream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            StdStream::Stdout => "stdout",
            StdStream::Stderr => "stderr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_follow_stream() {
        assert_eq!(ConsoleAppender::stdout().name(), "stdout");
        assert_eq!(ConsoleAppender::stderr().name(), "stderr");
        assert_eq!(ConsoleAppender::default().stream(), StdStream::Stdout);
    }

    #[test]
    fn test_flush_succeeds() {
        let mut appender = ConsoleAppender::stderr();
        assert!(appender.flush().is_ok());
    }
}
