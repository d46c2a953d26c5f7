//! Core emission pipeline
//!
//! Owns the encoder and the two destination groups. Records at `Warn` and
//! below go to the low group (stdout by default); `Error` and above go to the
//! high group (stderr by default). The pipeline is shared by every logger
//! derived from the same root.

use super::caller::{capture_stack, frame_location, Caller};
use super::encoder::Encoder;
use super::error::{LoggerError, Result};
use super::field::Field;
use super::log_context::LoggerContext;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use super::terminator::Terminator;
use super::timestamp::Clock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Where a record comes from
#[derive(Debug, Clone)]
pub struct Origin<'a> {
    pub name: Option<&'a str>,
    /// Call site of the public logging method
    pub caller: Caller,
    /// Caller frames to skip above the call site, for both the reported
    /// caller and captured stack traces
    pub depth: usize,
}

pub struct Pipeline {
    pub(crate) min_level: LogLevel,
    pub(crate) stacktrace_level: LogLevel,
    pub(crate) encoder: Arc<dyn Encoder>,
    pub(crate) low: Sink,
    pub(crate) high: Sink,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) terminator: Arc<dyn Terminator>,
    pub(crate) metrics: Arc<LoggerMetrics>,
    pub(crate) flushed: AtomicBool,
}

impl Pipeline {
    #[inline]
    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed.load(Ordering::Acquire)
    }

    fn sink_for(&self, level: LogLevel) -> &Sink {
        if level.is_above_warn() {
            &self.high
        } else {
            &self.low
        }
    }

    /// Encode and write one record, then apply the fatal/panic policy
    pub fn emit(
        &self,
        level: LogLevel,
        message: &str,
        origin: Origin<'_>,
        context: &LoggerContext,
        fields: &[Field],
    ) {
        if !self.enabled(level) {
            return;
        }

        let with_stack = level >= self.stacktrace_level;
        let trace = (with_stack || origin.depth > 0).then(|| capture_stack(origin.depth));
        let caller = trace
            .as_deref()
            .filter(|_| origin.depth > 0)
            .and_then(frame_location)
            .unwrap_or(origin.caller);
        let entry = LogEntry::new(level, self.clock.now(), message)
            .with_name(origin.name.map(str::to_string))
            .with_caller(caller)
            .with_stack(trace.filter(|_| with_stack));

        let mut all_fields = context.iter().chain(fields.iter());
        let record = self.encoder.encode_entry(&entry, &mut all_fields);
        self.write(level, &record);

        if level >= LogLevel::Panic {
            if let Err(e) = self.sync() {
                eprintln!("[LOGGER ERROR] Failed to flush before {}: {}", level, e);
            }
            self.terminator.terminate(level, message);
        }
    }

    fn write(&self, level: LogLevel, record: &[u8]) {
        let sink = self.sink_for(level);
        match sink.write(record) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(LoggerError::LoggerStopped) => {
                self.metrics.record_write_after_stop();
            }
            Err(e) => {
                eprintln!("[LOGGER ERROR] Sink {:?} write failed: {}", sink.name(), e);
                self.metrics.record_write_failure();
            }
        }
    }

    /// Flush both groups without closing them
    pub fn sync(&self) -> Result<()> {
        let low = self.low.sync();
        let high = if self.high.same_as(&self.low) {
            Ok(())
        } else {
            self.high.sync()
        };
        low.and(high)
    }

    /// Flush and close both groups; later calls do nothing
    pub fn flush(&self) -> Result<()> {
        if self.flushed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        let low = self.low.close();
        let high = if self.high.same_as(&self.low) {
            Ok(())
        } else {
            self.high.close()
        };

        let lost = self.metrics.total_lost();
        if lost > 0 {
            eprintln!(
                "[LOGGER WARNING] Closing sinks with {} lost records (loss rate: {:.2}%)",
                lost,
                self.metrics.loss_rate()
            );
        }
        low.and(high)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("min_level", &self.min_level)
            .field("stacktrace_level", &self.stacktrace_level)
            .field("encoder", &self.encoder.name())
            .field("low", &self.low)
            .field("high", &self.high)
            .field("flushed", &self.is_flushed())
            .finish()
    }
}
