//! Structured log builder for fluent record construction

use super::caller::Caller;
use super::field::{Field, FieldContent};
use super::log_level::LogLevel;
use super::logger::Logger;

/// Builder for one structured record
///
/// # Example
///
/// ```
/// use field_logger::Logger;
///
/// let logger = Logger::builder().build().unwrap();
///
/// logger.info_builder()
///     .message("Request processed")
///     .field("user_id", 12345u64)
///     .field("latency_ms", 42.5)
///     .field("status", 200u16)
///     .log();
/// ```
pub struct StructuredLogBuilder<'a> {
    logger: &'a Logger,
    level: LogLevel,
    message: String,
    fields: Vec<Field>,
    caller: Caller,
}

impl<'a> StructuredLogBuilder<'a> {
    #[track_caller]
    pub fn new(logger: &'a Logger, level: LogLevel) -> Self {
        Self {
            logger,
            level,
            message: String::new(),
            fields: Vec::new(),
            caller: Caller::here(),
        }
    }

    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = msg.into();
        self
    }

    /// Add a typed field
    #[must_use]
    pub fn field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldContent>,
    {
        self.fields.push(Field::new(key, value));
        self
    }

    /// Add prepared fields, in order
    #[must_use]
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        self.fields.extend(fields);
        self
    }

    /// Override the recorded call site
    #[must_use]
    pub fn location(mut self, file: &'static str, line: u32) -> Self {
        self.caller = Caller::new(file, line);
        self
    }

    /// Emit the record; does nothing if the level is disabled
    pub fn log(self) {
        if !self.logger.enabled(self.level) {
            return;
        }
        self.logger
            .emit(self.level, &self.message, &self.fields, self.caller);
    }
}

macro_rules! builder_methods {
    ($($name:ident => $level:ident),* $(,)?) => {
        impl Logger {
            $(
                #[track_caller]
                pub fn $name(&self) -> StructuredLogBuilder<'_> {
                    StructuredLogBuilder::new(self, LogLevel::$level)
                }
            )*
        }
    };
}

builder_methods! {
    debug_builder => Debug,
    info_builder => Info,
    warn_builder => Warn,
    error_builder => Error,
    panic_builder => Panic,
    fatal_builder => Fatal,
}
