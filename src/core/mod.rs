//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod convert;
pub mod encoder;
pub mod error;
pub mod field;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod marshal;
pub mod metrics;
pub mod options;
pub mod output_format;
pub mod pipeline;
pub mod sink;
pub mod std_writer;
pub mod structured_builder;
pub mod terminator;
pub mod timestamp;

pub use appender::Appender;
pub use caller::{BuildIdentity, Caller};
pub use convert::{add_field, add_fields};
pub use encoder::{
    ArrayEncoder, ConsoleEncoder, Encoder, JsonEncoder, MarshalArray, ObjectEncoder,
};
pub use error::{LoggerError, Result};
pub use field::{Complex, ContentKind, Field, FieldContent, Reflect, Stringer};
pub use log_context::LoggerContext;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_HIGH_OUTPUT, DEFAULT_LOW_OUTPUT};
pub use marshal::ArrayMarshaler;
pub use metrics::LoggerMetrics;
pub use options::Options;
pub use output_format::OutputFormat;
pub use sink::{Sink, SinkProvider, StdSinkProvider};
pub use std_writer::StdWriter;
pub use structured_builder::StructuredLogBuilder;
pub use terminator::{ProcessTerminator, Terminator, FATAL_EXIT_CODE};
pub use timestamp::{Clock, FixedClock, SystemClock, TimestampFormat};
