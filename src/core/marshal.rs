//! Array marshaling for heterogeneous field contents

use super::convert::guarded;
use super::encoder::{ArrayEncoder, MarshalArray};
use super::error::{LoggerError, Result};
use super::field::FieldContent;
use super::timestamp::rfc3339_nano;

/// Encodes a slice of contents as one array, recursing into nested arrays
///
/// The first element the encoder rejects aborts the whole array with
/// [`LoggerError::ArrayItem`] carrying that element's index.
#[derive(Debug, Clone, Copy)]
pub struct ArrayMarshaler<'a>(pub &'a [FieldContent]);

impl MarshalArray for ArrayMarshaler<'_> {
    fn marshal_array(&self, enc: &mut dyn ArrayEncoder) -> Result<()> {
        for (index, content) in self.0.iter().enumerate() {
            append_item(enc, content).map_err(|err| LoggerError::array_item(index, err))?;
        }
        Ok(())
    }
}

fn append_item(enc: &mut dyn ArrayEncoder, content: &FieldContent) -> Result<()> {
    match content {
        FieldContent::Array(items) => enc.append_array(&ArrayMarshaler(items))?,
        FieldContent::Json(value) => enc.append_reflected(value)?,
        FieldContent::Reflected(value) => guarded(|| enc.append_reflected(value.as_ref()))??,
        // inline binary stays text-safe
        FieldContent::Binary(_) => enc.append_str(&content.to_string()),
        FieldContent::Time(value) => enc.append_str(&rfc3339_nano(value)),
        FieldContent::Stringer(value) => enc.append_str(&guarded(|| value.to_string())?),
        FieldContent::Error(value) => enc.append_str(&value.to_string()),
        FieldContent::String(value) => enc.append_str(value),
        FieldContent::Duration(value) => enc.append_duration(*value),
        FieldContent::Bool(value) => enc.append_bool(*value),
        FieldContent::Int(value) => enc.append_int(*value),
        FieldContent::Int8(value) => enc.append_i8(*value),
        FieldContent::Int16(value) => enc.append_i16(*value),
        FieldContent::Int32(value) => enc.append_i32(*value),
        FieldContent::Int64(value) => enc.append_i64(*value),
        FieldContent::Uint(value) => enc.append_uint(*value),
        FieldContent::Uint8(value) => enc.append_u8(*value),
        FieldContent::Uint16(value) => enc.append_u16(*value),
        FieldContent::Uint32(value) => enc.append_u32(*value),
        FieldContent::Uint64(value) => enc.append_u64(*value),
        FieldContent::Uintptr(value) => enc.append_uintptr(*value),
        FieldContent::Float32(value) => enc.append_f32(*value),
        FieldContent::Float64(value) => enc.append_f64(*value),
        FieldContent::Complex64(value) => enc.append_complex64(*value),
        FieldContent::Complex128(value) => enc.append_complex128(*value),
    }
    Ok(())
}
