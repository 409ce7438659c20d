//! # Options Values
//!
//! Entity "options" are an untyped bag the game attaches to some entities
//! (sign text, toy variants, light colours). The record codec treats them as
//! opaque and hands them to this module.
//!
//! ## Wire Format
//!
//! ```text
//! tag (u8) │ payload
//! ─────────┼──────────────────────────────────────────────
//!   0      │ null
//!   1 / 2  │ false / true
//!   3      │ f64 (LE)
//!   4      │ varint byte length, UTF-8
//!   5      │ varint count, values
//!   6      │ varint count, (key string, value) pairs
//! ```
//!
//! Decoding is bounded: at most [`MAX_VALUE_DEPTH`] levels of nesting, and
//! every count is checked against the bytes left.

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};
use crate::protocol::serialization::{WireReader, WireWriter};

/// Deepest array/map nesting accepted in either direction.
pub const MAX_VALUE_DEPTH: usize = 32;

const TAG_NULL: u8 = 0;
const TAG_FALSE: u8 = 1;
const TAG_TRUE: u8 = 2;
const TAG_NUMBER: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_ARRAY: u8 = 5;
const TAG_MAP: u8 = 6;

/// A structured options value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Null
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    String(String),
    /// Ordered list
    Array(Vec<Value>),
    /// Key/value pairs in insertion order
    Map(Vec<(String, Value)>),
}

impl Value {
    /// Returns the string if this is a [`Value::String`].
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a [`Value::Number`].
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Looks up `key` if this is a [`Value::Map`]; the first match wins.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

/// Writes a value.
///
/// # Errors
///
/// Returns [`EncodeError::ValueTooDeep`] if nesting exceeds
/// [`MAX_VALUE_DEPTH`], or [`EncodeError::TooManyElements`] for a list or
/// string longer than `u32::MAX`.
pub fn write_value(writer: &mut WireWriter, value: &Value) -> EncodeResult<()> {
    write_value_at(writer, value, 0)
}

fn write_value_at(writer: &mut WireWriter, value: &Value, depth: usize) -> EncodeResult<()> {
    if depth > MAX_VALUE_DEPTH {
        return Err(EncodeError::ValueTooDeep { max: MAX_VALUE_DEPTH });
    }

    match value {
        Value::Null => writer.write_u8(TAG_NULL),
        Value::Bool(false) => writer.write_u8(TAG_FALSE),
        Value::Bool(true) => writer.write_u8(TAG_TRUE),
        Value::Number(n) => {
            writer.write_u8(TAG_NUMBER);
            writer.write_f64(*n);
        }
        Value::String(s) => {
            writer.write_u8(TAG_STRING);
            write_string(writer, s)?;
        }
        Value::Array(items) => {
            writer.write_u8(TAG_ARRAY);
            writer.write_count("options array", items.len())?;
            for item in items {
                write_value_at(writer, item, depth + 1)?;
            }
        }
        Value::Map(entries) => {
            writer.write_u8(TAG_MAP);
            writer.write_count("options map", entries.len())?;
            for (key, item) in entries {
                write_string(writer, key)?;
                write_value_at(writer, item, depth + 1)?;
            }
        }
    }
    Ok(())
}

fn write_string(writer: &mut WireWriter, s: &str) -> EncodeResult<()> {
    writer.write_count("options string", s.len())?;
    writer.write_bytes(s.as_bytes());
    Ok(())
}

/// Reads a value.
///
/// # Errors
///
/// Returns [`DecodeError::InvalidValueTag`] for an unknown tag,
/// [`DecodeError::ValueTooDeep`] past [`MAX_VALUE_DEPTH`],
/// [`DecodeError::InvalidUtf8`] for a malformed string, or any buffer error.
pub fn read_value(reader: &mut WireReader<'_>) -> DecodeResult<Value> {
    read_value_at(reader, 0)
}

fn read_value_at(reader: &mut WireReader<'_>, depth: usize) -> DecodeResult<Value> {
    if depth > MAX_VALUE_DEPTH {
        return Err(DecodeError::ValueTooDeep { max: MAX_VALUE_DEPTH });
    }

    let value = match reader.read_u8()? {
        TAG_NULL => Value::Null,
        TAG_FALSE => Value::Bool(false),
        TAG_TRUE => Value::Bool(true),
        TAG_NUMBER => Value::Number(reader.read_f64()?),
        TAG_STRING => Value::String(read_string(reader)?),
        TAG_ARRAY => {
            // Every element is at least its tag byte.
            let count = reader.read_count("options array", 1)?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(read_value_at(reader, depth + 1)?);
            }
            Value::Array(items)
        }
        TAG_MAP => {
            // Key length varint plus value tag.
            let count = reader.read_count("options map", 2)?;
            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                let key = read_string(reader)?;
                entries.push((key, read_value_at(reader, depth + 1)?));
            }
            Value::Map(entries)
        }
        tag => return Err(DecodeError::InvalidValueTag(tag)),
    };
    Ok(value)
}

fn read_string(reader: &mut WireReader<'_>) -> DecodeResult<String> {
    let len = reader.read_count("options string", 1)?;
    let bytes = reader.read_bytes(len)?;
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8 { field: "options string" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(value: &Value) -> Value {
        let mut writer = WireWriter::new();
        write_value(&mut writer, value).unwrap();
        let mut reader = WireReader::new(writer.as_slice());
        let decoded = read_value(&mut reader).unwrap();
        assert!(reader.is_exhausted());
        decoded
    }

    #[test]
    fn test_scalars() {
        assert_eq!(round_trip(&Value::Null), Value::Null);
        assert_eq!(round_trip(&Value::Bool(true)), Value::Bool(true));
        assert_eq!(round_trip(&Value::Number(-2.5)), Value::Number(-2.5));
        assert_eq!(round_trip(&"sign text".into()), Value::from("sign text"));
    }

    #[test]
    fn test_nested_map_keeps_order() {
        let value = Value::Map(vec![
            ("tint".to_owned(), Value::Number(3.0)),
            ("label".to_owned(), Value::from("welcome")),
            ("parts".to_owned(), Value::Array(vec![Value::Bool(false), Value::Null])),
        ]);
        let decoded = round_trip(&value);
        assert_eq!(decoded, value);
        assert_eq!(decoded.get("label").and_then(Value::as_str), Some("welcome"));
        assert_eq!(decoded.get("tint").and_then(Value::as_f64), Some(3.0));
        assert!(decoded.get("missing").is_none());
    }

    #[test]
    fn test_wire_layout() {
        let mut writer = WireWriter::new();
        write_value(&mut writer, &Value::Array(vec![Value::Bool(true), "hi".into()])).unwrap();
        assert_eq!(writer.as_slice(), &[TAG_ARRAY, 2, TAG_TRUE, TAG_STRING, 2, b'h', b'i']);
    }

    #[test]
    fn test_unknown_tag() {
        let mut reader = WireReader::new(&[9]);
        assert_eq!(read_value(&mut reader), Err(DecodeError::InvalidValueTag(9)));
    }

    #[test]
    fn test_depth_limit_on_decode() {
        // 40 nested single-element arrays.
        let mut bytes = Vec::new();
        for _ in 0..40 {
            bytes.extend_from_slice(&[TAG_ARRAY, 1]);
        }
        bytes.push(TAG_NULL);
        let mut reader = WireReader::new(&bytes);
        assert_eq!(
            read_value(&mut reader),
            Err(DecodeError::ValueTooDeep { max: MAX_VALUE_DEPTH })
        );
    }

    #[test]
    fn test_depth_limit_on_encode() {
        let mut value = Value::Null;
        for _ in 0..=MAX_VALUE_DEPTH + 1 {
            value = Value::Array(vec![value]);
        }
        let mut writer = WireWriter::new();
        assert_eq!(
            write_value(&mut writer, &value),
            Err(EncodeError::ValueTooDeep { max: MAX_VALUE_DEPTH })
        );
    }

    #[test]
    fn test_invalid_utf8_in_options_is_error() {
        let mut reader = WireReader::new(&[TAG_STRING, 2, 0xC3, 0x28]);
        assert_eq!(
            read_value(&mut reader),
            Err(DecodeError::InvalidUtf8 { field: "options string" })
        );
    }

    #[test]
    fn test_huge_array_count_rejected_before_allocating() {
        let mut reader = WireReader::new(&[TAG_ARRAY, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert!(matches!(
            read_value(&mut reader),
            Err(DecodeError::LengthExceedsBuffer { .. })
        ));
    }
}
