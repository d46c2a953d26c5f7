//! Timestamp and duration formatting utilities
//!
//! Provides the timestamp layouts used by the two encoders and the clock
//! abstraction that supplies record times. Every layout is fixed-width in its
//! fractional part so identical instants always render to identical bytes.

use chrono::{DateTime, FixedOffset, Local, SecondsFormat, TimeZone};
use colored::Colorize;
use std::fmt::Write;
use std::time::Duration;

/// Source of record timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// Clock frozen at one instant, for reproducible output
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    pub fn new<Tz: TimeZone>(at: DateTime<Tz>) -> Self {
        Self(at.fixed_offset())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

/// Timestamp layouts
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use field_logger::core::TimestampFormat;
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap().fixed_offset();
/// assert_eq!(TimestampFormat::ConsoleShort.format(&t), "2025-01-08T10:30:45Z");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO 8601 with nanoseconds and numeric offset: `2025-01-08T10:30:45.123456789+00:00`
    #[default]
    Iso8601Nanos,

    /// Console, seconds precision: `2025-01-08T10:30:45Z` or `2025-01-08T18:30:45+08`
    ConsoleShort,

    /// Console, microseconds precision: `2025-01-08T10:30:45.123456Z` or `...+0800`
    ConsoleLong,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampFormat::Iso8601Nanos => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.9f%:z").to_string()
            }
            TimestampFormat::ConsoleShort => format!(
                "{}{}",
                datetime.format("%Y-%m-%dT%H:%M:%S"),
                zone_hours(datetime.offset())
            ),
            TimestampFormat::ConsoleLong => format!(
                "{}{}",
                datetime.format("%Y-%m-%dT%H:%M:%S%.6f"),
                zone_hours_minutes(datetime.offset())
            ),
        }
    }

    /// Format with ANSI colors per segment: date, separator, clock and sub-second
    #[must_use]
    pub fn format_colored(&self, datetime: &DateTime<FixedOffset>) -> String {
        let date = datetime.format("%Y-%m-%d").to_string();
        let clock = datetime.format("%H:%M:%S").to_string();
        match self {
            TimestampFormat::Iso8601Nanos => self.format(datetime),
            TimestampFormat::ConsoleShort => format!(
                "{}{}{}",
                date.cyan().bold(),
                "T".bright_black(),
                format!("{}{}", clock, zone_hours(datetime.offset()))
                    .bright_blue()
                    .bold()
            ),
            TimestampFormat::ConsoleLong => format!(
                "{}{}{}{}",
                date.cyan().bold(),
                "T".bright_black(),
                clock.bright_blue().bold(),
                format!(
                    "{}{}",
                    datetime.format("%.6f"),
                    zone_hours_minutes(datetime.offset())
                )
                .bright_black()
            ),
        }
    }
}

/// RFC 3339 with a fixed nine-digit fraction, `Z` for UTC
pub fn rfc3339_nano(datetime: &DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn split_offset(offset: &FixedOffset) -> (char, i32, i32) {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    (sign, minutes / 60, minutes % 60)
}

/// `Z` or `+HH`
fn zone_hours(offset: &FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        return "Z".to_string();
    }
    let (sign, hours, _) = split_offset(offset);
    format!("{}{:02}", sign, hours)
}

/// `Z` or `+HHMM`
fn zone_hours_minutes(offset: &FixedOffset) -> String {
    if offset.local_minus_utc() == 0 {
        return "Z".to_string();
    }
    let (sign, hours, minutes) = split_offset(offset);
    format!("{}{:02}{:02}", sign, hours, minutes)
}

/// Human duration: `0s`, `250ms`, `1.5µs`, `1.5s`, `1m30s`, `2h0m5s`
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000_000_000 {
        let (unit, suffix) = if nanos < 1_000 {
            (1, "ns")
        } else if nanos < 1_000_000 {
            (1_000, "µs")
        } else {
            (1_000_000, "ms")
        };
        return format!("{}{}", decimal(nanos, unit), suffix);
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h{}m", hours, minutes);
    } else if minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}s", decimal(seconds, 1_000_000_000));
    out
}

/// `value / unit` with trailing fractional zeros removed
fn decimal(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let remainder = value % unit;
    if remainder == 0 {
        return whole.to_string();
    }
    let width = unit.to_string().len() - 1;
    let fraction = format!("{:0width$}", remainder, width = width);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn fixed_datetime() -> DateTime<FixedOffset> {
        // 2025-01-08 10:30:45.123456789 UTC
        (Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::nanoseconds(123_456_789))
        .fixed_offset()
    }

    fn shanghai() -> DateTime<FixedOffset> {
        let tz = FixedOffset::east_opt(8 * 3600).expect("valid offset");
        fixed_datetime().with_timezone(&tz)
    }

    #[test]
    fn test_iso8601_nanos_format() {
        let result = TimestampFormat::Iso8601Nanos.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456789+00:00");
    }

    #[test]
    fn test_console_short_format() {
        assert_eq!(
            TimestampFormat::ConsoleShort.format(&fixed_datetime()),
            "2025-01-08T10:30:45Z"
        );
        assert_eq!(
            TimestampFormat::ConsoleShort.format(&shanghai()),
            "2025-01-08T18:30:45+08"
        );
    }

    #[test]
    fn test_console_long_format() {
        assert_eq!(
            TimestampFormat::ConsoleLong.format(&fixed_datetime()),
            "2025-01-08T10:30:45.123456Z"
        );
        assert_eq!(
            TimestampFormat::ConsoleLong.format(&shanghai()),
            "2025-01-08T18:30:45.123456+0800"
        );
    }

    #[test]
    fn test_negative_offset() {
        let tz = FixedOffset::west_opt(5 * 3600 + 30 * 60).expect("valid offset");
        let t = fixed_datetime().with_timezone(&tz);
        assert_eq!(
            TimestampFormat::ConsoleShort.format(&t),
            "2025-01-08T05:00:45-05"
        );
        assert_eq!(
            TimestampFormat::ConsoleLong.format(&t),
            "2025-01-08T05:00:45.123456-0530"
        );
    }

    #[test]
    fn test_colored_format_keeps_text() {
        colored::control::set_override(true);
        let result = TimestampFormat::ConsoleLong.format_colored(&fixed_datetime());
        assert!(result.contains("\x1b["));
        assert!(result.contains("2025-01-08"));
        assert!(result.contains("10:30:45"));
        assert!(result.contains(".123456Z"));
    }

    #[test]
    fn test_rfc3339_nano() {
        assert_eq!(
            rfc3339_nano(&fixed_datetime()),
            "2025-01-08T10:30:45.123456789Z"
        );
        assert_eq!(
            rfc3339_nano(&shanghai()),
            "2025-01-08T18:30:45.123456789+08:00"
        );
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_duration(Duration::from_nanos(1_500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(7_205)), "2h0m5s");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(fixed_datetime());
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), fixed_datetime());
    }
}
