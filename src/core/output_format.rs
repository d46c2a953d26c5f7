//! Output format selection
//!
//! - Text: human-readable console lines (default)
//! - Json: one JSON object per line

use super::caller::BuildIdentity;
use super::encoder::{ConsoleEncoder, Encoder, JsonEncoder};
use std::sync::Arc;

/// Output format for log records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `INFO	2025-01-08T10:30:45Z	src/main.rs:12	Request processed	{"status":200}`
    #[default]
    Text,

    /// Example: `{"level":"info","ts":"2025-01-08T10:30:45.000000000+00:00","msg":"Request processed","status":200}`
    Json,
}

impl OutputFormat {
    /// `"json"` selects JSON; anything else, including the empty string, selects text
    pub fn from_option(format: &str) -> Self {
        if format.trim().eq_ignore_ascii_case("json") {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    /// Build the encoder for this format
    ///
    /// `color` and `long_time` only affect text output.
    pub fn encoder(
        &self,
        identity: BuildIdentity,
        color: bool,
        long_time: bool,
    ) -> Arc<dyn Encoder> {
        match self {
            OutputFormat::Text => Arc::new(
                ConsoleEncoder::new(identity)
                    .with_color(color)
                    .with_long_time(long_time),
            ),
            OutputFormat::Json => Arc::new(JsonEncoder::new()),
        }
    }
}
