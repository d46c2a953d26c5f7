//! Logging macros for ergonomic log message formatting.
//!
//! The message is only formatted, and the fields only built, when the level
//! is enabled. Structured fields follow the format arguments after a `;`.
//!
//! # Examples
//!
//! ```
//! use field_logger::prelude::*;
//! use field_logger::{info, warn};
//!
//! let logger = Logger::builder().build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, "Slow request"; Field::string("route", "/upload"), Field::uint64("ms", 950));
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use field_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use field_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, "Retrying"; Field::int32("attempt", 2));
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($field:expr),+ $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log_fields(level, format_args!($fmt $(, $arg)*), &[$($field),+]);
        }
    }};
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        let level = $level;
        if logger.enabled(level) {
            logger.log(level, format_args!($fmt $(, $arg)*));
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use field_logger::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Debug).build().unwrap();
/// use field_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use field_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use field_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100; Field::string("batch", "nightly"));
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use field_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use field_logger::error;
/// let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
/// error!(logger, "Failed to load config"; Field::error("error", err));
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's terminator.
///
/// With the default terminator the process exits with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
