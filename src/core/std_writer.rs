//! `io::Write` adapter for code that only knows how to write lines

use super::caller::Caller;
use super::log_level::LogLevel;
use super::logger::Logger;
use std::io;

/// Logs every complete line written to it as one record
///
/// A trailing partial line is held until the next newline, `flush`, or drop.
/// Obtained from [`Logger::standard`].
///
/// # Example
///
/// ```
/// use std::io::Write;
/// use field_logger::Logger;
///
/// let logger = Logger::builder().build().unwrap();
/// let mut out = logger.standard();
/// writeln!(out, "legacy component started").unwrap();
/// ```
pub struct StdWriter {
    logger: Logger,
    level: LogLevel,
    caller: Caller,
    pending: Vec<u8>,
}

impl StdWriter {
    pub(crate) fn new(logger: Logger, level: LogLevel, caller: Caller) -> Self {
        Self {
            logger,
            level,
            caller,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit_line(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if !self.logger.enabled(self.level) {
            return;
        }
        let message = String::from_utf8_lossy(line);
        self.logger
            .emit(self.level, &message, &[], self.caller.clone());
    }
}

impl io::Write for StdWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit_line(&line[..pos]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        Ok(())
    }
}

impl Drop for StdWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}
