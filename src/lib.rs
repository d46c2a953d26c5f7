//! # Field Logger
//!
//! A structured logging facade: leveled records carrying typed key/value
//! fields, rendered as console text or one JSON object per line.
//!
//! ## Features
//!
//! - **Typed fields**: every integer and float width, complex numbers,
//!   durations, times, errors, binary blobs, arrays and arbitrary values
//! - **Two formats**: tab-separated console text (optionally colored) and JSON
//! - **Derived loggers**: bind fields, names and thresholds without touching
//!   the parent handle
//! - **Split routing**: `Warn` and below to stdout, `Error` and above to stderr
//!
//! ## Example
//!
//! ```
//! use field_logger::{Field, Logger, Options};
//!
//! let logger = Logger::new(Options::new().level("info").format("json")).unwrap();
//! logger
//!     .with([Field::string("service", "billing")])
//!     .info_with("invoice sent", &[Field::uint64("invoice", 1042)]);
//! logger.flush().unwrap();
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
    pub use crate::core::{
        Appender, BuildIdentity, Field, FieldContent, LogLevel, Logger, LoggerBuilder, LoggerError,
        Options, OutputFormat, Result, Sink, StructuredLogBuilder,
    };
}

pub use appenders::{ConsoleAppender, FileAppender, MemoryAppender, StdStream};
pub use core::{
    Appender, BuildIdentity, Caller, Clock, Complex, ConsoleEncoder, Encoder, Field, FieldContent,
    FixedClock, JsonEncoder, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerContext, LoggerError,
    LoggerMetrics, Options, OutputFormat, ProcessTerminator, Result, Sink, SinkProvider,
    StdSinkProvider, StdWriter, StructuredLogBuilder, SystemClock, Terminator, TimestampFormat,
};
