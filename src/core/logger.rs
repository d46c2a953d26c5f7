//! Main logger implementation

use super::caller::{BuildIdentity, Caller};
use super::encoder::Encoder;
use super::error::{LoggerError, Result};
use super::field::Field;
use super::log_context::LoggerContext;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::options::Options;
use super::output_format::OutputFormat;
use super::pipeline::{Origin, Pipeline};
use super::sink::{Sink, SinkProvider, StdSinkProvider};
use super::std_writer::StdWriter;
use super::terminator::{ProcessTerminator, Terminator};
use super::timestamp::{Clock, SystemClock};
use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Sink name for records at `Warn` and below
pub const DEFAULT_LOW_OUTPUT: &str = "stdout";

/// Sink name for records above `Warn`
pub const DEFAULT_HIGH_OUTPUT: &str = "stderr";

/// A cheap, cloneable handle onto a shared emission pipeline
///
/// Deriving (`with`, `with_name`, `with_level`, `add_depth`) returns a new
/// handle and never changes the one it was derived from.
///
/// # Example
///
/// ```
/// use field_logger::{Field, Logger, Options};
///
/// let logger = Logger::new(Options::new().level("debug")).unwrap();
/// let requests = logger.with_name("http").with([Field::string("route", "/health")]);
///
/// requests.info_with("served", &[Field::uint16("status", 200)]);
/// requests.debugf(format_args!("took {}ms", 3));
/// logger.flush().unwrap();
/// ```
#[derive(Clone)]
pub struct Logger {
    core: Arc<Pipeline>,
    context: LoggerContext,
    name: Option<Arc<str>>,
    level: LogLevel,
    depth: usize,
}

macro_rules! leveled_methods {
    ($($level:ident => $plain:ident, $formatted:ident, $with_fields:ident;)*) => {$(
        #[track_caller]
        pub fn $plain(&self, message: impl fmt::Display) {
            self.log(LogLevel::$level, message);
        }

        #[track_caller]
        pub fn $formatted(&self, args: fmt::Arguments<'_>) {
            self.log(LogLevel::$level, args);
        }

        #[track_caller]
        pub fn $with_fields(&self, message: impl fmt::Display, fields: &[Field]) {
            self.log_fields(LogLevel::$level, message, fields);
        }
    )*};
}

impl Logger {
    /// Build a logger from user options, writing to stdout and stderr
    ///
    /// Caller paths are shortened with [`Options::build_identity`] when set.
    pub fn new(options: Options) -> Result<Self> {
        LoggerBuilder::from_options(&options)?.build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// This handle's threshold; records below it are discarded
    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields bound to this handle
    pub fn context(&self) -> &LoggerContext {
        &self.context
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.core.metrics()
    }

    /// Whether a record at `level` would be written
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level && self.core.enabled(level)
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, &message.to_string(), &[], Caller::here());
    }

    #[track_caller]
    pub fn log_fields(&self, level: LogLevel, message: impl fmt::Display, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        self.emit(level, &message.to_string(), fields, Caller::here());
    }

    leveled_methods! {
        Debug => debug, debugf, debug_with;
        Info => info, infof, info_with;
        Warn => warn, warnf, warn_with;
        Error => error, errorf, error_with;
        Panic => panic, panicf, panic_with;
        Fatal => fatal, fatalf, fatal_with;
        Info => print, printf, print_with;
    }

    pub(crate) fn emit(&self, level: LogLevel, message: &str, fields: &[Field], caller: Caller) {
        let origin = Origin {
            name: self.name.as_deref(),
            caller,
            depth: self.depth,
        };
        self.core
            .emit(level, message, origin, &self.context, fields);
    }

    /// A handle with a different threshold
    ///
    /// The pipeline's configured minimum still applies, so lowering the
    /// threshold below it has no effect.
    #[must_use]
    pub fn with_level(&self, level: LogLevel) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// A handle that adds `fields` to every record, after any already bound
    #[must_use]
    pub fn with<I>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = Field>,
    {
        Self {
            context: self.context.with_fields(fields),
            ..self.clone()
        }
    }

    /// A handle whose name is this one's joined with `name` by `.`
    #[must_use]
    pub fn with_name(&self, name: &str) -> Self {
        if name.is_empty() {
            return self.clone();
        }
        let joined: Arc<str> = match self.name.as_deref() {
            Some(parent) => format!("{}.{}", parent, name).into(),
            None => name.into(),
        };
        Self {
            name: Some(joined),
            ..self.clone()
        }
    }

    /// A handle that reports the caller `depth` frames further up the stack
    ///
    /// For wrappers that log on behalf of their own callers: the skipped
    /// frames are left out of both the `caller` and captured stack traces.
    /// Without debug info the call site of the logging method is kept.
    #[must_use]
    pub fn add_depth(&self, depth: usize) -> Self {
        Self {
            depth: self.depth + depth,
            ..self.clone()
        }
    }

    /// Flush and close the shared sinks
    ///
    /// Affects every handle derived from the same root. Only the first call
    /// does any work; records emitted afterwards are counted and dropped.
    pub fn flush(&self) -> Result<()> {
        self.core.flush()
    }

    /// An `io::Write` adapter that logs each written line at this handle's level
    #[track_caller]
    pub fn standard(&self) -> StdWriter {
        StdWriter::new(self.clone(), self.level, Caller::here())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field("depth", &self.depth)
            .field("fields", &self.context.len())
            .field("core", &self.core)
            .finish()
    }
}

/// Builder for Logger
///
/// # Example
/// ```
/// use field_logger::prelude::*;
/// use field_logger::appenders::MemoryAppender;
///
/// let out = MemoryAppender::new();
/// let logger = Logger::builder()
///     .min_level(LogLevel::Debug)
///     .format(OutputFormat::Json)
///     .sink(Sink::new(out.clone()))
///     .build()
///     .unwrap();
///
/// logger.debug("ready");
/// assert!(out.contents().contains("\"msg\":\"ready\""));
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    format: OutputFormat,
    color: bool,
    long_time: bool,
    identity: BuildIdentity,
    stacktrace_level: LogLevel,
    encoder: Option<Arc<dyn Encoder>>,
    clock: Arc<dyn Clock>,
    terminator: Arc<dyn Terminator>,
    provider: Arc<dyn SinkProvider>,
    low_output: String,
    high_output: String,
    low_sink: Option<Sink>,
    high_sink: Option<Sink>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            format: OutputFormat::Text,
            color: false,
            long_time: false,
            identity: BuildIdentity::unknown(),
            stacktrace_level: LogLevel::Panic,
            encoder: None,
            clock: Arc::new(SystemClock),
            terminator: Arc::new(ProcessTerminator),
            provider: Arc::new(StdSinkProvider),
            low_output: DEFAULT_LOW_OUTPUT.to_string(),
            high_output: DEFAULT_HIGH_OUTPUT.to_string(),
            low_sink: None,
            high_sink: None,
        }
    }

    /// Start from user options; fails on an unknown level name
    pub fn from_options(options: &Options) -> Result<Self> {
        let builder = Self::new()
            .min_level(options.min_level()?)
            .format(options.output_format())
            .color(options.with_color)
            .long_time(options.long_time);
        Ok(match &options.build_identity {
            Some(identity) => builder.build_identity(identity.clone()),
            None => builder,
        })
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// ANSI colors in text output
    #[must_use = "builder methods return a new value"]
    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    /// Microsecond timestamps in text output
    #[must_use = "builder methods return a new value"]
    pub fn long_time(mut self, enabled: bool) -> Self {
        self.long_time = enabled;
        self
    }

    /// Used to shorten caller paths in text output; see [`build_identity!`](crate::build_identity)
    #[must_use = "builder methods return a new value"]
    pub fn build_identity(mut self, identity: BuildIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Lowest level that carries a stack trace (default `Panic`)
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: LogLevel) -> Self {
        self.stacktrace_level = level;
        self
    }

    /// Replace the format encoder entirely
    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, encoder: Arc<dyn Encoder>) -> Self {
        self.encoder = Some(encoder);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// How output names are turned into sinks
    #[must_use = "builder methods return a new value"]
    pub fn sink_provider<P: SinkProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Arc::new(provider);
        self
    }

    /// Output name for records at `Warn` and below (default `stdout`)
    #[must_use = "builder methods return a new value"]
    pub fn low_output(mut self, name: impl Into<String>) -> Self {
        self.low_output = name.into();
        self
    }

    /// Output name for records above `Warn` (default `stderr`)
    #[must_use = "builder methods return a new value"]
    pub fn high_output(mut self, name: impl Into<String>) -> Self {
        self.high_output = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn low_sink(mut self, sink: Sink) -> Self {
        self.low_sink = Some(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn high_sink(mut self, sink: Sink) -> Self {
        self.high_sink = Some(sink);
        self
    }

    /// Send every record to one sink
    #[must_use = "builder methods return a new value"]
    pub fn sink(self, sink: Sink) -> Self {
        self.low_sink(sink.clone()).high_sink(sink)
    }

    /// Build the Logger, opening any outputs not given as sinks
    pub fn build(self) -> Result<Logger> {
        if self.low_sink.is_none() && self.low_output.trim().is_empty() {
            return Err(LoggerError::config("low output", "output name is empty"));
        }
        if self.high_sink.is_none() && self.high_output.trim().is_empty() {
            return Err(LoggerError::config("high output", "output name is empty"));
        }

        let low_from_output = self.low_sink.is_none();
        let low = match self.low_sink {
            Some(sink) => sink,
            None => self.provider.open(&self.low_output)?,
        };
        let high = match self.high_sink {
            Some(sink) => sink,
            // one destination, one sink
            None if low_from_output && self.high_output == self.low_output => low.clone(),
            None => self.provider.open(&self.high_output)?,
        };

        let encoder = self.encoder.unwrap_or_else(|| {
            self.format
                .encoder(self.identity, self.color, self.long_time)
        });

        let core = Pipeline {
            min_level: self.min_level,
            stacktrace_level: self.stacktrace_level,
            encoder,
            low,
            high,
            clock: self.clock,
            terminator: self.terminator,
            metrics: Arc::new(LoggerMetrics::new()),
            flushed: AtomicBool::new(false),
        };

        Ok(Logger {
            core: Arc::new(core),
            context: LoggerContext::new(),
            name: None,
            level: self.min_level,
            depth: 0,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::timestamp::FixedClock;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn json_logger(level: LogLevel) -> (Logger, MemoryAppender) {
        let out = MemoryAppender::new();
        let logger = Logger::builder()
            .min_level(level)
            .format(OutputFormat::Json)
            .clock(FixedClock::new(
                Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
                    .single()
                    .unwrap(),
            ))
            .sink(Sink::new(out.clone()))
            .build()
            .unwrap();
        (logger, out)
    }

    fn records(out: &MemoryAppender) -> Vec<serde_json::Value> {
        out.lines()
            .iter()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_builder_basic() {
        let (logger, _) = json_logger(LogLevel::Debug);
        assert_eq!(logger.level(), LogLevel::Debug);
        assert!(logger.name().is_none());
        assert_eq!(logger.metrics().total_written(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_level() {
        let err = Logger::new(Options::new().level("chatty")).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidLevel(_)));
    }

    #[test]
    fn test_builder_reports_unopenable_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let bad = dir.path().join("missing").join("x.log");
        let err = Logger::builder()
            .low_output(bad.to_str().unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, LoggerError::SinkOpen { .. }));
    }

    #[test]
    fn test_builder_rejects_empty_output_name() {
        let err = Logger::builder().low_output("").build().unwrap_err();
        assert!(matches!(
            err,
            LoggerError::InvalidConfiguration { ref component, .. } if component == "low output"
        ));

        let err = Logger::builder().high_output("  ").build().unwrap_err();
        assert!(err.to_string().contains("high output"));

        let out = MemoryAppender::new();
        assert!(Logger::builder()
            .low_output("")
            .high_output("")
            .sink(Sink::new(out))
            .build()
            .is_ok());
    }

    #[test]
    fn test_options_carry_build_identity() {
        let out = MemoryAppender::new();
        let options = Options::new().build_identity(BuildIdentity::new("src/core/"));
        let logger = LoggerBuilder::from_options(&options)
            .unwrap()
            .sink(Sink::new(out.clone()))
            .build()
            .unwrap();

        logger.info("trimmed");

        let line = out.contents();
        assert!(line.contains("\tlogger.rs:"), "{}", line);
        assert!(!line.contains("src/core/"));
    }

    #[test]
    fn test_leveled_methods() {
        let (logger, out) = json_logger(LogLevel::Debug);
        logger.debug("d");
        logger.infof(format_args!("i{}", 1));
        logger.warn_with("w", &[Field::bool("flag", true)]);
        logger.error(42);
        logger.print("p");

        let levels: Vec<_> = records(&out)
            .iter()
            .map(|r| r["level"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(levels, ["debug", "info", "warn", "error", "info"]);
        assert_eq!(records(&out)[1]["msg"], "i1");
        assert_eq!(records(&out)[2]["flag"], true);
        assert_eq!(records(&out)[3]["msg"], "42");
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, out) = json_logger(LogLevel::Info);
        logger.info("here");
        let caller = records(&out)[0]["caller"].as_str().unwrap().to_string();
        assert!(
            caller.starts_with("core/logger.rs:"),
            "caller was {}",
            caller
        );
    }

    #[test]
    fn test_with_level_only_raises_threshold() {
        let (logger, out) = json_logger(LogLevel::Info);

        let quiet = logger.with_level(LogLevel::Error);
        quiet.warn("dropped");
        quiet.error("kept");

        let loud = logger.with_level(LogLevel::Debug);
        loud.debug("still below the pipeline minimum");

        let msgs: Vec<_> = records(&out).iter().map(|r| r["msg"].clone()).collect();
        assert_eq!(msgs, ["kept"]);
        assert_eq!(logger.level(), LogLevel::Info);
    }

    #[test]
    fn test_with_name_joins_and_parent_unchanged() {
        let (logger, out) = json_logger(LogLevel::Info);
        let api = logger.with_name("api");
        let db = api.with_name("db");

        db.info("x");
        api.info("y");
        logger.info("z");

        let names: Vec<_> = records(&out).iter().map(|r| r["logger"].clone()).collect();
        assert_eq!(
            names,
            [
                serde_json::json!("api.db"),
                "api".into(),
                serde_json::Value::Null
            ]
        );
        assert_eq!(logger.with_name("").name(), None);
    }

    #[test]
    fn test_with_fields_are_persistent() {
        let (logger, out) = json_logger(LogLevel::Info);
        let child = logger.with([Field::string("svc", "api")]);
        let grandchild = child.with([Field::int("req", 9)]);

        grandchild.info_with("m", &[Field::bool("ok", true)]);
        logger.info("bare");

        let lines = out.lines();
        assert!(lines[0].contains(r#""svc":"api","req":9,"ok":true"#));
        assert!(!lines[1].contains("svc"));
    }

    #[test]
    fn test_disabled_level_converts_nothing() {
        struct Counting<'a>(&'a AtomicUsize);
        impl fmt::Display for Counting<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fetch_add(1, Ordering::SeqCst);
                f.write_str("counted")
            }
        }

        let calls = AtomicUsize::new(0);
        let (logger, out) = json_logger(LogLevel::Warn);
        logger.info(Counting(&calls));
        logger.debug_with(Counting(&calls), &[Field::nil("x")]);

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(out.is_empty());

        logger.warn(Counting(&calls));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_flush_shared_by_derived_handles() {
        let (logger, out) = json_logger(LogLevel::Info);
        let child = logger.with_name("child");

        child.flush().unwrap();
        logger.flush().unwrap();
        logger.info("late");

        assert!(out.is_empty());
        assert_eq!(out.flush_count(), 1);
        assert_eq!(logger.metrics().writes_after_stop(), 1);
    }

    #[test]
    fn test_same_output_name_shares_one_sink() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("all.log");
        let name = path.to_str().unwrap();

        let logger = Logger::builder()
            .low_output(name)
            .high_output(name)
            .format(OutputFormat::Json)
            .build()
            .unwrap();
        logger.info("one");
        logger.error("two");
        logger.flush().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
