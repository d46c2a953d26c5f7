//! Typed field contents for structured log records
//!
//! A [`Field`] pairs a key with an optional [`FieldContent`]. The content is a
//! closed set of variants; encoders dispatch on it with an exhaustive `match`,
//! so adding a variant forces every encoding path to decide how to render it.
//!
//! ```
//! use field_logger::{Field, FieldContent};
//!
//! let fields = vec![
//!     Field::int32("retries", 3),
//!     Field::string("user", "alice"),
//!     Field::array("tags", vec![FieldContent::from("a"), FieldContent::from(true)]),
//!     Field::nil("ignored"),
//! ];
//! assert_eq!(fields.len(), 4);
//! ```

use super::error::{LoggerError, Result};
use super::timestamp::{format_duration, rfc3339_nano};
use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A complex number with real and imaginary parts of type `T`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

macro_rules! impl_complex_display {
    ($($t:ty),*) => {$(
        impl fmt::Display for Complex<$t> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.im.is_sign_negative() && !self.im.is_nan() {
                    write!(f, "{}{}i", self.re, self.im)
                } else {
                    write!(f, "{}+{}i", self.re, self.im)
                }
            }
        }
    )*};
}

impl_complex_display!(f32, f64);

/// Values rendered through their `Display` implementation at encode time
pub trait Stringer: fmt::Display + Send + Sync {}

impl<T: fmt::Display + Send + Sync> Stringer for T {}

impl fmt::Debug for dyn Stringer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Arbitrary values that can be turned into structured data on demand
///
/// Implemented for every `Serialize + Debug` type. Reflection may fail (for
/// example a map with non-string keys); the `Debug` form is the fallback.
pub trait Reflect: fmt::Debug + Send + Sync {
    fn reflect(&self) -> Result<serde_json::Value>;
}

impl<T: Serialize + fmt::Debug + Send + Sync> Reflect for T {
    fn reflect(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(LoggerError::Reflect)
    }
}

/// Discriminant of [`FieldContent`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    Binary,
    Time,
    Duration,
    Error,
    Stringer,
    Array,
    Json,
    Reflected,
}

/// The typed value carried by a field
#[derive(Debug, Clone)]
pub enum FieldContent {
    Bool(bool),
    Int(isize),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint(usize),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Uintptr(usize),
    Float32(f32),
    Float64(f64),
    Complex64(Complex<f32>),
    Complex128(Complex<f64>),
    String(String),
    Binary(Vec<u8>),
    Time(DateTime<FixedOffset>),
    Duration(Duration),
    Error(Arc<dyn std::error::Error + Send + Sync>),
    Stringer(Arc<dyn Stringer>),
    Array(Vec<FieldContent>),
    Json(serde_json::Value),
    Reflected(Arc<dyn Reflect>),
}

impl FieldContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            FieldContent::Bool(_) => ContentKind::Bool,
            FieldContent::Int(_) => ContentKind::Int,
            FieldContent::Int8(_) => ContentKind::Int8,
            FieldContent::Int16(_) => ContentKind::Int16,
            FieldContent::Int32(_) => ContentKind::Int32,
            FieldContent::Int64(_) => ContentKind::Int64,
            FieldContent::Uint(_) => ContentKind::Uint,
            FieldContent::Uint8(_) => ContentKind::Uint8,
            FieldContent::Uint16(_) => ContentKind::Uint16,
            FieldContent::Uint32(_) => ContentKind::Uint32,
            FieldContent::Uint64(_) => ContentKind::Uint64,
            FieldContent::Uintptr(_) => ContentKind::Uintptr,
            FieldContent::Float32(_) => ContentKind::Float32,
            FieldContent::Float64(_) => ContentKind::Float64,
            FieldContent::Complex64(_) => ContentKind::Complex64,
            FieldContent::Complex128(_) => ContentKind::Complex128,
            FieldContent::String(_) => ContentKind::String,
            FieldContent::Binary(_) => ContentKind::Binary,
            FieldContent::Time(_) => ContentKind::Time,
            FieldContent::Duration(_) => ContentKind::Duration,
            FieldContent::Error(_) => ContentKind::Error,
            FieldContent::Stringer(_) => ContentKind::Stringer,
            FieldContent::Array(_) => ContentKind::Array,
            FieldContent::Json(_) => ContentKind::Json,
            FieldContent::Reflected(_) => ContentKind::Reflected,
        }
    }

    pub fn error<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FieldContent::Error(Arc::new(err))
    }

    pub fn stringer<S: fmt::Display + Send + Sync + 'static>(value: S) -> Self {
        FieldContent::Stringer(Arc::new(value))
    }

    pub fn reflect<R: Reflect + 'static>(value: R) -> Self {
        FieldContent::Reflected(Arc::new(value))
    }

    pub fn time<Tz: TimeZone>(value: DateTime<Tz>) -> Self {
        FieldContent::Time(value.fixed_offset())
    }
}

/// Lowercase hex, the text-safe form of binary content
pub(crate) fn hex_string(bytes: &[u8]) -> String {
    use fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

impl fmt::Display for FieldContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldContent::Bool(v) => write!(f, "{}", v),
            FieldContent::Int(v) => write!(f, "{}", v),
            FieldContent::Int8(v) => write!(f, "{}", v),
            FieldContent::Int16(v) => write!(f, "{}", v),
            FieldContent::Int32(v) => write!(f, "{}", v),
            FieldContent::Int64(v) => write!(f, "{}", v),
            FieldContent::Uint(v) | FieldContent::Uintptr(v) => write!(f, "{}", v),
            FieldContent::Uint8(v) => write!(f, "{}", v),
            FieldContent::Uint16(v) => write!(f, "{}", v),
            FieldContent::Uint32(v) => write!(f, "{}", v),
            FieldContent::Uint64(v) => write!(f, "{}", v),
            FieldContent::Float32(v) => write!(f, "{}", v),
            FieldContent::Float64(v) => write!(f, "{}", v),
            FieldContent::Complex64(v) => write!(f, "{}", v),
            FieldContent::Complex128(v) => write!(f, "{}", v),
            FieldContent::String(v) => f.write_str(v),
            FieldContent::Binary(v) => f.write_str(&hex_string(v)),
            FieldContent::Time(v) => f.write_str(&rfc3339_nano(v)),
            FieldContent::Duration(v) => f.write_str(&format_duration(*v)),
            FieldContent::Error(v) => write!(f, "{}", v),
            FieldContent::Stringer(v) => write!(f, "{}", v),
            FieldContent::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            FieldContent::Json(v) => write!(f, "{}", v),
            FieldContent::Reflected(v) => write!(f, "{:?}", v),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty => $variant:ident),* $(,)?) => {$(
        impl From<$t> for FieldContent {
            fn from(v: $t) -> Self {
                FieldContent::$variant(v)
            }
        }
    )*};
}

impl_from_primitive!(
    bool => Bool,
    isize => Int,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    usize => Uint,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Complex<f32> => Complex64,
    Complex<f64> => Complex128,
    String => String,
    Vec<u8> => Binary,
    Duration => Duration,
    Vec<FieldContent> => Array,
    serde_json::Value => Json,
);

impl From<&str> for FieldContent {
    fn from(v: &str) -> Self {
        FieldContent::String(v.to_string())
    }
}

impl From<&[u8]> for FieldContent {
    fn from(v: &[u8]) -> Self {
        FieldContent::Binary(v.to_vec())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FieldContent {
    fn from(v: DateTime<Tz>) -> Self {
        FieldContent::time(v)
    }
}

/// A named, typed value attached to a log record
///
/// `content == None` is legal; the field is dropped when the record is encoded.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub content: Option<FieldContent>,
}

macro_rules! field_ctor {
    ($($name:ident($t:ty) => $variant:ident),* $(,)?) => {$(
        pub fn $name(key: impl Into<String>, value: $t) -> Self {
            Self::new(key, FieldContent::$variant(value))
        }
    )*};
}

impl Field {
    pub fn new(key: impl Into<String>, content: impl Into<FieldContent>) -> Self {
        Self {
            key: key.into(),
            content: Some(content.into()),
        }
    }

    /// A field without content; skipped at encode time
    pub fn nil(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: None,
        }
    }

    field_ctor!(
        bool(bool) => Bool,
        int(isize) => Int,
        int8(i8) => Int8,
        int16(i16) => Int16,
        int32(i32) => Int32,
        int64(i64) => Int64,
        uint(usize) => Uint,
        uint8(u8) => Uint8,
        uint16(u16) => Uint16,
        uint32(u32) => Uint32,
        uint64(u64) => Uint64,
        uintptr(usize) => Uintptr,
        float32(f32) => Float32,
        float64(f64) => Float64,
        complex64(Complex<f32>) => Complex64,
        complex128(Complex<f64>) => Complex128,
        duration(Duration) => Duration,
        array(Vec<FieldContent>) => Array,
        json(serde_json::Value) => Json,
    );

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldContent::String(value.into()))
    }

    pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self::new(key, FieldContent::Binary(value.into()))
    }

    pub fn time<Tz: TimeZone>(key: impl Into<String>, value: DateTime<Tz>) -> Self {
        Self::new(key, FieldContent::time(value))
    }

    pub fn error<E>(key: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::new(key, FieldContent::error(err))
    }

    pub fn stringer<S: fmt::Display + Send + Sync + 'static>(
        key: impl Into<String>,
        value: S,
    ) -> Self {
        Self::new(key, FieldContent::stringer(value))
    }

    pub fn reflect<R: Reflect + 'static>(key: impl Into<String>, value: R) -> Self {
        Self::new(key, FieldContent::reflect(value))
    }
}

impl<K: Into<String>, V: Into<FieldContent>> From<(K, V)> for Field {
    fn from((key, value): (K, V)) -> Self {
        Field::new(key, value)
    }
}
