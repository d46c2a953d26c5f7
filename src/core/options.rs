//! Logger configuration

use super::caller::BuildIdentity;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};

/// User-facing logger options
///
/// Deserializes from the usual config formats with camelCase keys:
///
/// ```
/// use field_logger::{LogLevel, Options, OutputFormat};
///
/// let opts: Options =
///     serde_json::from_str(r#"{"level":"warning","format":"json","withColor":true}"#).unwrap();
/// assert_eq!(opts.min_level().unwrap(), LogLevel::Warn);
/// assert_eq!(opts.output_format(), OutputFormat::Json);
/// assert!(!opts.long_time);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Minimum level name; empty means `info`
    pub level: String,
    /// `json` or `text`; anything unrecognized means `text`
    pub format: String,
    /// Sub-second console timestamps
    pub long_time: bool,
    /// ANSI colors in console output
    pub with_color: bool,
    /// Shortens caller paths in console output; never read from config
    #[serde(skip)]
    pub build_identity: Option<BuildIdentity>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    #[must_use]
    pub fn long_time(mut self, enabled: bool) -> Self {
        self.long_time = enabled;
        self
    }

    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        self.with_color = enabled;
        self
    }

    /// Usually `build_identity!()` from the application crate
    #[must_use]
    pub fn build_identity(mut self, identity: BuildIdentity) -> Self {
        self.build_identity = Some(identity);
        self
    }

    /// Parsed minimum level
    pub fn min_level(&self) -> Result<LogLevel> {
        if self.level.trim().is_empty() {
            return Ok(LogLevel::Info);
        }
        self.level
            .parse()
            .map_err(|_| LoggerError::invalid_level(self.level.as_str()))
    }

    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::from_option(&self.format)
    }
}
