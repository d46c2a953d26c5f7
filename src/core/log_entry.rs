//! Log entry structure

use super::caller::Caller;
use super::log_level::LogLevel;
use chrono::{DateTime, FixedOffset};
use std::borrow::Cow;

/// The envelope of one record: everything except its fields
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub time: DateTime<FixedOffset>,
    pub logger_name: Option<String>,
    pub message: String,
    pub caller: Option<Caller>,
    pub stack: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, time: DateTime<FixedOffset>, message: impl Into<String>) -> Self {
        Self {
            level,
            time,
            logger_name: None,
            message: message.into(),
            caller: None,
            stack: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.logger_name = name.filter(|name| !name.is_empty());
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use]
    pub fn with_stack(mut self, stack: Option<String>) -> Self {
        self.stack = stack.filter(|stack| !stack.is_empty());
        self
    }

    /// Message with newlines, carriage returns and tabs escaped
    ///
    /// Line-oriented formats use this so one record always stays one line.
    pub fn sanitized_message(&self) -> Cow<'_, str> {
        escape_line(&self.message)
    }
}

/// Escape newlines, carriage returns and tabs so `text` cannot split a line or column
pub(crate) fn escape_line(text: &str) -> Cow<'_, str> {
    if !text.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}
