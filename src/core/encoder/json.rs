//! JSON encoding
//!
//! [`JsonObjectEncoder`] writes members straight into a byte buffer in call
//! order, so repeated keys are all kept and nothing is reordered. Nested
//! arrays and reflected values are rendered into scratch space first and only
//! committed once they succeed, which keeps the output valid JSON when a field
//! is rejected halfway through.

use super::{ArrayEncoder, Encoder, MarshalArray, ObjectEncoder};
use crate::core::convert::add_fields;
use crate::core::error::Result;
use crate::core::field::{Complex, Field, Reflect};
use crate::core::log_entry::LogEntry;
use crate::core::timestamp::{format_duration, TimestampFormat};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Write;
use std::time::Duration;

/// How durations are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DurationStyle {
    /// Fractional seconds as a number: `1.5`
    #[default]
    Seconds,
    /// Human-readable string: `"1.5s"`
    Human,
}

// Writes into a Vec<u8> cannot fail, so io results below are discarded.

fn write_str(buf: &mut Vec<u8>, value: &str) {
    let _ = serde_json::to_writer(&mut *buf, value);
}

fn write_display(buf: &mut Vec<u8>, value: impl std::fmt::Display) {
    let _ = write!(buf, "{}", value);
}

fn write_f64(buf: &mut Vec<u8>, value: f64) {
    if value.is_nan() {
        write_str(buf, "NaN");
    } else if value.is_infinite() {
        write_str(buf, if value > 0.0 { "+Inf" } else { "-Inf" });
    } else {
        let _ = serde_json::to_writer(&mut *buf, &value);
    }
}

fn write_f32(buf: &mut Vec<u8>, value: f32) {
    if value.is_finite() {
        let _ = serde_json::to_writer(&mut *buf, &value);
    } else {
        write_f64(buf, f64::from(value));
    }
}

fn write_duration(buf: &mut Vec<u8>, style: DurationStyle, value: Duration) {
    match style {
        DurationStyle::Seconds => write_f64(buf, value.as_secs_f64()),
        DurationStyle::Human => write_str(buf, &format_duration(value)),
    }
}

fn render_array(style: DurationStyle, value: &dyn MarshalArray) -> Result<Vec<u8>> {
    let mut nested = JsonArrayEncoder::new(style);
    value.marshal_array(&mut nested)?;
    let mut out = Vec::with_capacity(nested.buf.len() + 2);
    out.push(b'[');
    out.extend_from_slice(&nested.buf);
    out.push(b']');
    Ok(out)
}

fn render_reflected(value: &dyn Reflect) -> Result<Vec<u8>> {
    let json = value.reflect()?;
    Ok(serde_json::to_vec(&json)?)
}

/// Array elements, comma separated, without the surrounding brackets
#[derive(Debug, Default)]
pub struct JsonArrayEncoder {
    buf: Vec<u8>,
    durations: DurationStyle,
}

impl JsonArrayEncoder {
    pub fn new(durations: DurationStyle) -> Self {
        Self {
            buf: Vec::new(),
            durations,
        }
    }

    fn element(&mut self) -> &mut Vec<u8> {
        if !self.buf.is_empty() {
            self.buf.push(b',');
        }
        &mut self.buf
    }
}

impl ArrayEncoder for JsonArrayEncoder {
    fn append_bool(&mut self, value: bool) {
        write_display(self.element(), value);
    }
    fn append_int(&mut self, value: isize) {
        write_display(self.element(), value);
    }
    fn append_i8(&mut self, value: i8) {
        write_display(self.element(), value);
    }
    fn append_i16(&mut self, value: i16) {
        write_display(self.element(), value);
    }
    fn append_i32(&mut self, value: i32) {
        write_display(self.element(), value);
    }
    fn append_i64(&mut self, value: i64) {
        write_display(self.element(), value);
    }
    fn append_uint(&mut self, value: usize) {
        write_display(self.element(), value);
    }
    fn append_u8(&mut self, value: u8) {
        write_display(self.element(), value);
    }
    fn append_u16(&mut self, value: u16) {
        write_display(self.element(), value);
    }
    fn append_u32(&mut self, value: u32) {
        write_display(self.element(), value);
    }
    fn append_u64(&mut self, value: u64) {
        write_display(self.element(), value);
    }
    fn append_uintptr(&mut self, value: usize) {
        write_display(self.element(), value);
    }
    fn append_f32(&mut self, value: f32) {
        write_f32(self.element(), value);
    }
    fn append_f64(&mut self, value: f64) {
        write_f64(self.element(), value);
    }
    fn append_complex64(&mut self, value: Complex<f32>) {
        write_str(self.element(), &value.to_string());
    }
    fn append_complex128(&mut self, value: Complex<f64>) {
        write_str(self.element(), &value.to_string());
    }
    fn append_str(&mut self, value: &str) {
        write_str(self.element(), value);
    }
    fn append_duration(&mut self, value: Duration) {
        let style = self.durations;
        write_duration(self.element(), style, value);
    }

    fn append_array(&mut self, value: &dyn MarshalArray) -> Result<()> {
        let rendered = render_array(self.durations, value)?;
        self.element().extend_from_slice(&rendered);
        Ok(())
    }

    fn append_reflected(&mut self, value: &dyn Reflect) -> Result<()> {
        let rendered = render_reflected(value)?;
        self.element().extend_from_slice(&rendered);
        Ok(())
    }
}

/// Object members in call order
///
/// # Examples
///
/// ```
/// use field_logger::core::encoder::json::{DurationStyle, JsonObjectEncoder};
/// use field_logger::core::encoder::ObjectEncoder;
///
/// let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
/// enc.add_i32("retries", 3);
/// enc.add_str("user", "alice");
/// assert_eq!(enc.into_object_string(), r#"{"retries":3,"user":"alice"}"#);
/// ```
#[derive(Debug, Default)]
pub struct JsonObjectEncoder {
    buf: Vec<u8>,
    durations: DurationStyle,
}

impl JsonObjectEncoder {
    pub fn new(durations: DurationStyle) -> Self {
        Self {
            buf: Vec::new(),
            durations,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn key(&mut self, key: &str) -> &mut Vec<u8> {
        if !self.buf.is_empty() {
            self.buf.push(b',');
        }
        write_str(&mut self.buf, key);
        self.buf.push(b':');
        &mut self.buf
    }

    /// The members wrapped in braces
    pub fn into_object_bytes(self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.buf.len() + 2);
        out.push(b'{');
        out.extend_from_slice(&self.buf);
        out.push(b'}');
        out
    }

    pub fn into_object_string(self) -> String {
        String::from_utf8_lossy(&self.into_object_bytes()).into_owned()
    }
}

impl ObjectEncoder for JsonObjectEncoder {
    fn add_bool(&mut self, key: &str, value: bool) {
        write_display(self.key(key), value);
    }
    fn add_int(&mut self, key: &str, value: isize) {
        write_display(self.key(key), value);
    }
    fn add_i8(&mut self, key: &str, value: i8) {
        write_display(self.key(key), value);
    }
    fn add_i16(&mut self, key: &str, value: i16) {
        write_display(self.key(key), value);
    }
    fn add_i32(&mut self, key: &str, value: i32) {
        write_display(self.key(key), value);
    }
    fn add_i64(&mut self, key: &str, value: i64) {
        write_display(self.key(key), value);
    }
    fn add_uint(&mut self, key: &str, value: usize) {
        write_display(self.key(key), value);
    }
    fn add_u8(&mut self, key: &str, value: u8) {
        write_display(self.key(key), value);
    }
    fn add_u16(&mut self, key: &str, value: u16) {
        write_display(self.key(key), value);
    }
    fn add_u32(&mut self, key: &str, value: u32) {
        write_display(self.key(key), value);
    }
    fn add_u64(&mut self, key: &str, value: u64) {
        write_display(self.key(key), value);
    }
    fn add_uintptr(&mut self, key: &str, value: usize) {
        write_display(self.key(key), value);
    }
    fn add_f32(&mut self, key: &str, value: f32) {
        write_f32(self.key(key), value);
    }
    fn add_f64(&mut self, key: &str, value: f64) {
        write_f64(self.key(key), value);
    }
    fn add_complex64(&mut self, key: &str, value: Complex<f32>) {
        write_str(self.key(key), &value.to_string());
    }
    fn add_complex128(&mut self, key: &str, value: Complex<f64>) {
        write_str(self.key(key), &value.to_string());
    }
    fn add_str(&mut self, key: &str, value: &str) {
        write_str(self.key(key), value);
    }
    fn add_binary(&mut self, key: &str, value: &[u8]) {
        write_str(self.key(key), &STANDARD.encode(value));
    }
    fn add_duration(&mut self, key: &str, value: Duration) {
        let style = self.durations;
        write_duration(self.key(key), style, value);
    }

    fn add_error(&mut self, key: &str, value: &(dyn std::error::Error + 'static)) {
        self.add_str(key, &value.to_string());

        let mut causes = Vec::new();
        let mut source = value.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }
        if !causes.is_empty() {
            let buf = self.key(&format!("{}Causes", key));
            buf.push(b'[');
            for (i, cause) in causes.iter().enumerate() {
                if i > 0 {
                    buf.push(b',');
                }
                write_str(buf, cause);
            }
            buf.push(b']');
        }
    }

    fn add_array(&mut self, key: &str, value: &dyn MarshalArray) -> Result<()> {
        let rendered = render_array(self.durations, value)?;
        self.key(key).extend_from_slice(&rendered);
        Ok(())
    }

    fn add_reflected(&mut self, key: &str, value: &dyn Reflect) -> Result<()> {
        let rendered = render_reflected(value)?;
        self.key(key).extend_from_slice(&rendered);
        Ok(())
    }
}

/// One JSON object per record
///
/// Envelope keys come first in a fixed order (`level`, `ts`, `logger`,
/// `caller`, `msg`), then the fields, then `stacktrace`. Keys whose value is
/// absent are omitted.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl JsonEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for JsonEncoder {
    fn encode_entry(&self, entry: &LogEntry, fields: &mut dyn Iterator<Item = &Field>) -> Vec<u8> {
        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_str("level", entry.level.as_lowercase());
        enc.add_str("ts", &TimestampFormat::Iso8601Nanos.format(&entry.time));
        if let Some(name) = entry.logger_name.as_deref() {
            enc.add_str("logger", name);
        }
        if let Some(caller) = &entry.caller {
            enc.add_str("caller", &caller.short());
        }
        enc.add_str("msg", &entry.message);

        add_fields(&mut enc, fields);

        if let Some(stack) = entry.stack.as_deref() {
            enc.add_str("stacktrace", stack);
        }

        let mut line = enc.into_object_bytes();
        line.push(b'\n');
        line
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::caller::Caller;
    use crate::core::field::FieldContent;
    use crate::core::log_level::LogLevel;
    use crate::core::marshal::ArrayMarshaler;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn entry(level: LogLevel, message: &str) -> LogEntry {
        let t = Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        LogEntry::new(level, t.fixed_offset(), message)
    }

    fn encode(entry: &LogEntry, fields: &[Field]) -> String {
        let bytes = JsonEncoder::new().encode_entry(entry, &mut fields.iter());
        String::from_utf8(bytes).expect("utf-8 output")
    }

    #[test]
    fn test_envelope_order_and_newline() {
        let e = entry(LogLevel::Warn, "disk almost full")
            .with_name(Some("api.storage".to_string()))
            .with_caller(Caller::new("/src/app/core/disk.rs", 12))
            .with_stack(Some("   0: app::main".to_string()));

        let line = encode(&e, &[Field::int("retries", 3)]);
        assert_eq!(
            line,
            "{\"level\":\"warn\",\"ts\":\"2025-01-08T10:30:45.000000000+00:00\",\
             \"logger\":\"api.storage\",\"caller\":\"core/disk.rs:12\",\
             \"msg\":\"disk almost full\",\"retries\":3,\
             \"stacktrace\":\"   0: app::main\"}\n"
        );
    }

    #[test]
    fn test_absent_envelope_keys_are_omitted() {
        let line = encode(&entry(LogLevel::Info, "hi"), &[]);
        let value: Value = serde_json::from_str(&line).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(!object.contains_key("logger"));
        assert!(!object.contains_key("caller"));
        assert!(!object.contains_key("stacktrace"));
    }

    #[test]
    fn test_message_is_escaped() {
        let line = encode(&entry(LogLevel::Info, "a \"quoted\"\nline"), &[]);
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["msg"], "a \"quoted\"\nline");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_non_finite_floats() {
        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_f64("nan", f64::NAN);
        enc.add_f64("pos", f64::INFINITY);
        enc.add_f32("neg", f32::NEG_INFINITY);
        enc.add_f64("ok", 2.5);
        assert_eq!(
            enc.into_object_string(),
            r#"{"nan":"NaN","pos":"+Inf","neg":"-Inf","ok":2.5}"#
        );
    }

    #[test]
    fn test_binary_is_base64_at_top_level_and_hex_in_arrays() {
        let line = encode(
            &entry(LogLevel::Info, "bytes"),
            &[
                Field::binary("raw", vec![0xde, 0xad, 0xbe, 0xef]),
                Field::array(
                    "list",
                    vec![FieldContent::Binary(vec![0xde, 0xad, 0xbe, 0xef])],
                ),
            ],
        );
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["raw"], "3q2+7w==");
        assert_eq!(value["list"], json!(["deadbeef"]));
    }

    #[test]
    fn test_nested_arrays() {
        let line = encode(
            &entry(LogLevel::Info, "arr"),
            &[Field::array(
                "a",
                vec![
                    FieldContent::Int(1),
                    FieldContent::from("x"),
                    FieldContent::Array(vec![FieldContent::Bool(true)]),
                ],
            )],
        );
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["a"], json!([1, "x", [true]]));
    }

    #[test]
    fn test_empty_array() {
        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_array("empty", &ArrayMarshaler(&[])).unwrap();
        assert_eq!(enc.into_object_string(), r#"{"empty":[]}"#);
    }

    #[test]
    fn test_failed_array_adds_nothing() {
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 1), 1);
        let items = vec![FieldContent::Int(1), FieldContent::reflect(bad)];

        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_i8("before", 1);
        assert!(enc.add_array("items", &ArrayMarshaler(&items)).is_err());
        enc.add_i8("after", 2);

        assert_eq!(enc.into_object_string(), r#"{"before":1,"after":2}"#);
    }

    #[test]
    fn test_duration_styles() {
        let mut seconds = JsonObjectEncoder::new(DurationStyle::Seconds);
        seconds.add_duration("d", Duration::from_millis(250));
        assert_eq!(seconds.into_object_string(), r#"{"d":0.25}"#);

        let mut human = JsonObjectEncoder::new(DurationStyle::Human);
        human.add_duration("d", Duration::from_millis(250));
        assert_eq!(human.into_object_string(), r#"{"d":"250ms"}"#);

        let mut arr = JsonArrayEncoder::new(DurationStyle::Human);
        arr.append_duration(Duration::from_secs(90));
        arr.append_duration(Duration::ZERO);
        assert_eq!(String::from_utf8(arr.buf).unwrap(), r#""1m30s","0s""#);
    }

    #[test]
    fn test_complex_and_error_without_cause() {
        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_complex128("z", Complex::new(1.0, 2.0));
        let err = std::io::Error::new(std::io::ErrorKind::Other, "plain");
        enc.add_error("error", &err);
        assert_eq!(enc.into_object_string(), r#"{"z":"1+2i","error":"plain"}"#);
    }

    #[test]
    fn test_integer_extremes() {
        let mut enc = JsonObjectEncoder::new(DurationStyle::Seconds);
        enc.add_i64("min", i64::MIN);
        enc.add_u64("max", u64::MAX);
        enc.add_u8("byte", 255);
        assert_eq!(
            enc.into_object_string(),
            r#"{"min":-9223372036854775808,"max":18446744073709551615,"byte":255}"#
        );
    }
}
