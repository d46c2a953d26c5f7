//! Encoder traits and the two record formats
//!
//! [`ObjectEncoder`] and [`ArrayEncoder`] are the primitive sinks the field
//! converter and array marshaler write into. Each has one method per value
//! width so a format that distinguishes widths can keep them. [`Encoder`] turns
//! a whole record (envelope plus fields) into one newline-terminated line.

pub mod console;
pub mod json;

pub use console::ConsoleEncoder;
pub use json::JsonEncoder;

use super::error::Result;
use super::field::{Complex, Field, Reflect};
use super::log_entry::LogEntry;
use std::time::Duration;

/// Something that can write itself as a sequence of array elements
pub trait MarshalArray {
    fn marshal_array(&self, enc: &mut dyn ArrayEncoder) -> Result<()>;
}

/// Append-only encoder for array elements
pub trait ArrayEncoder {
    fn append_bool(&mut self, value: bool);
    fn append_int(&mut self, value: isize);
    fn append_i8(&mut self, value: i8);
    fn append_i16(&mut self, value: i16);
    fn append_i32(&mut self, value: i32);
    fn append_i64(&mut self, value: i64);
    fn append_uint(&mut self, value: usize);
    fn append_u8(&mut self, value: u8);
    fn append_u16(&mut self, value: u16);
    fn append_u32(&mut self, value: u32);
    fn append_u64(&mut self, value: u64);
    fn append_uintptr(&mut self, value: usize);
    fn append_f32(&mut self, value: f32);
    fn append_f64(&mut self, value: f64);
    fn append_complex64(&mut self, value: Complex<f32>);
    fn append_complex128(&mut self, value: Complex<f64>);
    fn append_str(&mut self, value: &str);
    fn append_duration(&mut self, value: Duration);

    /// Append a nested array; nothing is appended if marshaling fails
    fn append_array(&mut self, value: &dyn MarshalArray) -> Result<()>;

    /// Append arbitrary structured data; nothing is appended if reflection fails
    fn append_reflected(&mut self, value: &dyn Reflect) -> Result<()>;
}

/// Keyed encoder for the fields of one record
pub trait ObjectEncoder {
    fn add_bool(&mut self, key: &str, value: bool);
    fn add_int(&mut self, key: &str, value: isize);
    fn add_i8(&mut self, key: &str, value: i8);
    fn add_i16(&mut self, key: &str, value: i16);
    fn add_i32(&mut self, key: &str, value: i32);
    fn add_i64(&mut self, key: &str, value: i64);
    fn add_uint(&mut self, key: &str, value: usize);
    fn add_u8(&mut self, key: &str, value: u8);
    fn add_u16(&mut self, key: &str, value: u16);
    fn add_u32(&mut self, key: &str, value: u32);
    fn add_u64(&mut self, key: &str, value: u64);
    fn add_uintptr(&mut self, key: &str, value: usize);
    fn add_f32(&mut self, key: &str, value: f32);
    fn add_f64(&mut self, key: &str, value: f64);
    fn add_complex64(&mut self, key: &str, value: Complex<f32>);
    fn add_complex128(&mut self, key: &str, value: Complex<f64>);
    fn add_str(&mut self, key: &str, value: &str);
    fn add_binary(&mut self, key: &str, value: &[u8]);
    fn add_duration(&mut self, key: &str, value: Duration);

    /// Add an error under `key`, keeping it distinguishable from plain strings
    fn add_error(&mut self, key: &str, value: &(dyn std::error::Error + 'static));

    /// Add an array; nothing is added if marshaling fails
    fn add_array(&mut self, key: &str, value: &dyn MarshalArray) -> Result<()>;

    /// Add arbitrary structured data; nothing is added if reflection fails
    fn add_reflected(&mut self, key: &str, value: &dyn Reflect) -> Result<()>;
}

/// A complete record format
pub trait Encoder: Send + Sync {
    /// Encode the envelope and fields as one newline-terminated record
    fn encode_entry(&self, entry: &LogEntry, fields: &mut dyn Iterator<Item = &Field>) -> Vec<u8>;

    fn name(&self) -> &str;
}
