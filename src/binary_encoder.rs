//! Little-endian payload encoding.
//!
//! Every value kind has a fixed byte layout:
//!
//! * scalars are written at their natural width (`boolean` is one byte)
//! * a plain string is its raw UTF-8 bytes; the record frame carries the length
//! * numeric and boolean arrays are the concatenation of their elements
//! * a string array is `u32 count`, then `u32 length + UTF-8 bytes` per element
//! * a struct is the concatenation of its `f64` fields in declaration order
//!
//! Encoding never fails. NaN and infinities are written bit-for-bit.

use crate::value::{LogValue, STRUCT_TYPE_PREFIX};

/// Control record kind announcing a new entry.
pub const CONTROL_START: u8 = 0;

/// Encodes a value into its payload bytes.
pub fn encode(value: &LogValue) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    encode_into(value, &mut out);
    out
}

/// Appends the payload bytes of `value` to `out`.
pub fn encode_into(value: &LogValue, out: &mut Vec<u8>) {
    match value {
        LogValue::Boolean(v) => out.push(*v as u8),
        LogValue::Int32(v) => out.extend_from_slice(&v.to_le_bytes()),
        LogValue::Int64(v) => out.extend_from_slice(&v.to_le_bytes()),
        LogValue::Float(v) => out.extend_from_slice(&v.to_le_bytes()),
        LogValue::Double(v) => out.extend_from_slice(&v.to_le_bytes()),
        LogValue::String(s) => out.extend_from_slice(s.as_bytes()),
        LogValue::BooleanArray(values) => out.extend(values.iter().map(|v| *v as u8)),
        LogValue::Int32Array(values) => {
            for v in values {
                out.extend_from_slice(&i64::from(*v).to_le_bytes());
            }
        }
        LogValue::Int64Array(values) => {
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        LogValue::FloatArray(values) => {
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        LogValue::DoubleArray(values) | LogValue::Struct { fields: values, .. } => {
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        LogValue::StringArray(values) => {
            put_u32(out, values.len() as u32);
            for s in values {
                put_str(out, s);
            }
        }
    }
}

/// Exact payload size of `value` in bytes.
pub fn encoded_len(value: &LogValue) -> usize {
    match value {
        LogValue::Boolean(_) => 1,
        LogValue::Int32(_) | LogValue::Float(_) => 4,
        LogValue::Int64(_) | LogValue::Double(_) => 8,
        LogValue::String(s) => s.len(),
        LogValue::BooleanArray(v) => v.len(),
        LogValue::Int32Array(v) => v.len() * 8,
        LogValue::Int64Array(v) => v.len() * 8,
        LogValue::FloatArray(v) => v.len() * 4,
        LogValue::DoubleArray(v) | LogValue::Struct { fields: v, .. } => v.len() * 8,
        LogValue::StringArray(v) => 4 + v.iter().map(|s| 4 + s.len()).sum::<usize>(),
    }
}

/// Builds the payload of a Start control record.
///
/// Layout: `u8 kind | u32 entry id | name | type | metadata`, where each
/// string is prefixed by its `u32` byte length.
pub fn encode_start(entry_id: u32, name: &str, type_tag: &str, metadata: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + 4 + 12 + name.len() + type_tag.len() + metadata.len());
    out.push(CONTROL_START);
    put_u32(&mut out, entry_id);
    put_str(&mut out, name);
    put_str(&mut out, type_tag);
    put_str(&mut out, metadata);
    out
}

#[inline]
pub(crate) fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

#[inline]
fn put_str(out: &mut Vec<u8>, s: &str) {
    put_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

/// Decodes a payload written for `type_tag`.
///
/// This is the inverse of [`encode`]. `int64[]` always decodes to
/// [`LogValue::Int64Array`] since 32-bit arrays are widened on the wire.
/// Returns `None` for unknown tags or payloads whose size does not fit the
/// tag's layout.
pub fn decode(type_tag: &str, payload: &[u8]) -> Option<LogValue> {
    match type_tag {
        "boolean" => match payload {
            [b] => Some(LogValue::Boolean(*b != 0)),
            _ => None,
        },
        "int32" => Some(LogValue::Int32(i32::from_le_bytes(payload.try_into().ok()?))),
        "int64" => Some(LogValue::Int64(i64::from_le_bytes(payload.try_into().ok()?))),
        "float" => Some(LogValue::Float(f32::from_le_bytes(payload.try_into().ok()?))),
        "double" => Some(LogValue::Double(f64::from_le_bytes(payload.try_into().ok()?))),
        "string" | "structschema" => std::str::from_utf8(payload)
            .ok()
            .map(|s| LogValue::String(s.to_string())),
        "boolean[]" => Some(LogValue::BooleanArray(
            payload.iter().map(|b| *b != 0).collect(),
        )),
        "int64[]" => fixed_chunks::<8>(payload)
            .map(|c| c.map(i64::from_le_bytes).collect::<Vec<_>>())
            .map(LogValue::Int64Array),
        "float[]" => fixed_chunks::<4>(payload)
            .map(|c| c.map(f32::from_le_bytes).collect::<Vec<_>>())
            .map(LogValue::FloatArray),
        "double[]" => fixed_chunks::<8>(payload)
            .map(|c| c.map(f64::from_le_bytes).collect::<Vec<_>>())
            .map(LogValue::DoubleArray),
        "string[]" => decode_string_array(payload).map(LogValue::StringArray),
        tag => {
            let schema = tag.strip_prefix(STRUCT_TYPE_PREFIX)?;
            let fields = fixed_chunks::<8>(payload)?.map(f64::from_le_bytes).collect();
            Some(LogValue::Struct {
                schema: schema.to_string(),
                fields,
            })
        }
    }
}

fn fixed_chunks<const N: usize>(payload: &[u8]) -> Option<impl Iterator<Item = [u8; N]> + '_> {
    if payload.len() % N != 0 {
        return None;
    }
    Some(payload.chunks_exact(N).map(|c| {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(c);
        bytes
    }))
}

fn decode_string_array(payload: &[u8]) -> Option<Vec<String>> {
    let mut pos = 0;
    let read_u32 = |pos: &mut usize| -> Option<usize> {
        let bytes = payload.get(*pos..*pos + 4)?;
        *pos += 4;
        Some(u32::from_le_bytes(bytes.try_into().ok()?) as usize)
    };
    let count = read_u32(&mut pos)?;
    let mut out = Vec::with_capacity(count.min(payload.len() / 4));
    for _ in 0..count {
        let len = read_u32(&mut pos)?;
        let bytes = payload.get(pos..pos + len)?;
        pos += len;
        out.push(std::str::from_utf8(bytes).ok()?.to_string());
    }
    (pos == payload.len()).then_some(out)
}
