//! Field conversion onto an [`ObjectEncoder`]
//!
//! Every [`FieldContent`] variant maps to exactly one encoder call. Conversion
//! never fails a record: fields whose user code panics or whose arrays are
//! rejected degrade to a `<key>Error` string, and reflected values that cannot
//! be structured degrade to their `Debug` dump.

use super::encoder::ObjectEncoder;
use super::error::{panic_message, LoggerError, Result};
use super::field::{Field, FieldContent};
use super::marshal::ArrayMarshaler;
use super::timestamp::rfc3339_nano;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Convert fields in order; `None` contents are skipped
pub fn add_fields<'a, I>(enc: &mut dyn ObjectEncoder, fields: I)
where
    I: IntoIterator<Item = &'a Field>,
{
    for field in fields {
        add_field(enc, field);
    }
}

pub fn add_field(enc: &mut dyn ObjectEncoder, field: &Field) {
    let Some(content) = &field.content else {
        return;
    };
    let key = field.key.as_str();

    match content {
        FieldContent::Array(items) => {
            if let Err(err) = enc.add_array(key, &ArrayMarshaler(items)) {
                add_failure(enc, key, &err);
            }
        }
        FieldContent::Json(value) => {
            if enc.add_reflected(key, value).is_err() {
                enc.add_str(key, &value.to_string());
            }
        }
        FieldContent::Reflected(value) => {
            match guarded(|| enc.add_reflected(key, value.as_ref())) {
                Ok(Ok(())) => {}
                Ok(Err(_)) => enc.add_str(key, &format!("{:?}", value)),
                Err(err) => add_failure(enc, key, &err),
            }
        }
        FieldContent::Stringer(value) => match guarded(|| value.to_string()) {
            Ok(text) => enc.add_str(key, &text),
            Err(err) => add_failure(enc, key, &err),
        },
        FieldContent::Error(value) => enc.add_error(key, value.as_ref()),
        FieldContent::Binary(value) => enc.add_binary(key, value),
        FieldContent::Time(value) => enc.add_str(key, &rfc3339_nano(value)),
        FieldContent::Duration(value) => enc.add_duration(key, *value),
        FieldContent::String(value) => enc.add_str(key, value),
        FieldContent::Bool(value) => enc.add_bool(key, *value),
        FieldContent::Int(value) => enc.add_int(key, *value),
        FieldContent::Int8(value) => enc.add_i8(key, *value),
        FieldContent::Int16(value) => enc.add_i16(key, *value),
        FieldContent::Int32(value) => enc.add_i32(key, *value),
        FieldContent::Int64(value) => enc.add_i64(key, *value),
        FieldContent::Uint(value) => enc.add_uint(key, *value),
        FieldContent::Uint8(value) => enc.add_u8(key, *value),
        FieldContent::Uint16(value) => enc.add_u16(key, *value),
        FieldContent::Uint32(value) => enc.add_u32(key, *value),
        FieldContent::Uint64(value) => enc.add_u64(key, *value),
        FieldContent::Uintptr(value) => enc.add_uintptr(key, *value),
        FieldContent::Float32(value) => enc.add_f32(key, *value),
        FieldContent::Float64(value) => enc.add_f64(key, *value),
        FieldContent::Complex64(value) => enc.add_complex64(key, *value),
        FieldContent::Complex128(value) => enc.add_complex128(key, *value),
    }
}

fn add_failure(enc: &mut dyn ObjectEncoder, key: &str, err: &LoggerError) {
    enc.add_str(&format!("{}Error", key), &err.chain_message());
}

/// Run user code (`Display`, `Serialize`), turning a panic into an error
///
/// Only the unwind is caught. The process panic hook still runs first, so the
/// default hook prints its `thread ... panicked at` banner to stderr even
/// though the record is written. Builds with `panic = "abort"` cannot recover.
pub(crate) fn guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|panic_info| LoggerError::other(format!("PANIC={}", panic_message(&*panic_info))))
}
