//! Human-readable console encoding
//!
//! One tab-separated line per record:
//!
//! ```text
//! LEVEL	TIME	[name]	caller	message	{"field":"json"}
//! ```
//!
//! Absent parts (name, caller, fields) are skipped together with their tab.
//! A stack trace, when present, follows on its own lines.

use super::json::{DurationStyle, JsonObjectEncoder};
use super::Encoder;
use crate::core::caller::{BuildIdentity, Caller};
use crate::core::convert::add_fields;
use crate::core::field::Field;
use crate::core::log_entry::{escape_line, LogEntry};
use crate::core::log_level::LogLevel;
use crate::core::timestamp::TimestampFormat;
use colored::Colorize;

#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    color: bool,
    long_time: bool,
    identity: BuildIdentity,
}

impl ConsoleEncoder {
    pub fn new(identity: BuildIdentity) -> Self {
        Self {
            color: false,
            long_time: false,
            identity,
        }
    }

    /// Enable ANSI colors; forces coloring on even when stdout is not a terminal
    #[must_use]
    pub fn with_color(mut self, enabled: bool) -> Self {
        if enabled {
            colored::control::set_override(true);
        }
        self.color = enabled;
        self
    }

    /// Microsecond timestamps instead of whole seconds
    #[must_use]
    pub fn with_long_time(mut self, enabled: bool) -> Self {
        self.long_time = enabled;
        self
    }

    fn time_format(&self) -> TimestampFormat {
        if self.long_time {
            TimestampFormat::ConsoleLong
        } else {
            TimestampFormat::ConsoleShort
        }
    }

    fn level(&self, level: LogLevel) -> String {
        match level.color_code() {
            Some(color) if self.color => level.to_str().color(color).to_string(),
            _ => level.to_str().to_string(),
        }
    }

    fn name(&self, name: &str) -> String {
        let name = escape_line(name);
        if self.color {
            format!("{}{}{}", "[".yellow(), name, "]".yellow())
        } else {
            format!("[{}]", name)
        }
    }

    fn caller(&self, caller: &Caller) -> String {
        let file = self.identity.trim_path(&caller.file);
        let text = format!("{}:{}", escape_line(&file), caller.line);
        if self.color {
            text.white().to_string()
        } else {
            text
        }
    }
}

impl Encoder for ConsoleEncoder {
    fn encode_entry(&self, entry: &LogEntry, fields: &mut dyn Iterator<Item = &Field>) -> Vec<u8> {
        let time = if self.color {
            self.time_format().format_colored(&entry.time)
        } else {
            self.time_format().format(&entry.time)
        };

        let mut parts = vec![self.level(entry.level), time];
        if let Some(name) = entry.logger_name.as_deref() {
            parts.push(self.name(name));
        }
        if let Some(caller) = &entry.caller {
            parts.push(self.caller(caller));
        }
        parts.push(entry.sanitized_message().into_owned());

        let mut line = parts.join("\t").into_bytes();

        let mut context = JsonObjectEncoder::new(DurationStyle::Human);
        add_fields(&mut context, fields);
        if !context.is_empty() {
            line.push(b'\t');
            line.extend_from_slice(&context.into_object_bytes());
        }

        if let Some(stack) = entry.stack.as_deref() {
            line.push(b'\n');
            line.extend_from_slice(stack.as_bytes());
        }
        line.push(b'\n');
        line
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldContent;
    use chrono::{FixedOffset, TimeZone, Utc};
    use std::time::Duration;

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        let t = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123_456);
        LogEntry::new(level, t.fixed_offset(), message)
    }

    fn encoder() -> ConsoleEncoder {
        ConsoleEncoder::new(BuildIdentity::new("/home/dev/app/").with_version_qualifier("-0.3.1"))
    }

    fn encode(enc: &ConsoleEncoder, entry: &LogEntry, fields: &[Field]) -> String {
        String::from_utf8(enc.encode_entry(entry, &mut fields.iter())).expect("utf-8 output")
    }

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_minimal_line() {
        let e =
            entry(LogLevel::Error, "boom").with_caller(Caller::new("/home/dev/app/src/main.rs", 7));
        assert_eq!(
            encode(&encoder(), &e, &[]),
            "ERROR\t2025-01-08T10:30:45Z\tsrc/main.rs:7\tboom\n"
        );
    }

    #[test]
    fn test_full_line() {
        let e = entry(LogLevel::Warn, "slow query")
            .with_name(Some("api.db".to_string()))
            .with_caller(Caller::new("/registry/app-0.3.1/src/db.rs", 40))
            .with_stack(Some("   0: app::db::query".to_string()));

        let line = encode(
            &encoder().with_long_time(true),
            &e,
            &[
                Field::duration("took", Duration::from_millis(1500)),
                Field::array("rows", vec![FieldContent::Int(1), FieldContent::Int(2)]),
            ],
        );

        assert_eq!(
            line,
            "WARN\t2025-01-08T10:30:45.123456Z\t[api.db]\t/registry/app/src/db.rs:40\tslow query\t\
             {\"took\":\"1.5s\",\"rows\":[1,2]}\n   0: app::db::query\n"
        );
    }

    #[test]
    fn test_message_stays_on_one_line() {
        let line = encode(&encoder(), &entry(LogLevel::Info, "a\nb\tc"), &[]);
        assert_eq!(line, "INFO\t2025-01-08T10:30:45Z\ta\\nb\\tc\n");
    }

    #[test]
    fn test_name_and_caller_stay_on_one_line() {
        let e = entry(LogLevel::Info, "m")
            .with_name(Some("a\nb\tc".to_string()))
            .with_caller(Caller::new("src/odd\tdir/x\n.rs", 9));
        let line = encode(&encoder(), &e, &[]);

        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(
            line,
            "INFO\t2025-01-08T10:30:45Z\t[a\\nb\\tc]\tsrc/odd\\tdir/x\\n.rs:9\tm\n"
        );
        assert_eq!(line.split('\t').count(), 5);
    }

    #[test]
    fn test_offset_zone() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let mut e = entry(LogLevel::Debug, "x");
        e.time = e.time.with_timezone(&tz);
        assert_eq!(
            encode(&encoder(), &e, &[]),
            "DEBUG\t2025-01-08T18:30:45+08\tx\n"
        );
    }

    #[test]
    fn test_colored_line_has_same_text() {
        let e = entry(LogLevel::Error, "boom")
            .with_name(Some("svc".to_string()))
            .with_caller(Caller::new("/home/dev/app/src/main.rs", 7));
        let fields = [Field::bool("ok", false)];

        let plain = encode(&encoder(), &e, &fields);
        let colored = encode(&encoder().with_color(true), &e, &fields);

        assert_ne!(plain, colored);
        assert!(colored.contains("\x1b["));
        assert_eq!(strip_ansi(&colored), plain);
    }

    #[test]
    fn test_debug_level_is_plain_even_with_color() {
        let line = encode(
            &ConsoleEncoder::new(BuildIdentity::unknown()).with_color(true),
            &entry(LogLevel::Debug, "x"),
            &[],
        );
        assert!(line.starts_with("DEBUG\t"));
    }
}
