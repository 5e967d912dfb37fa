//! Schema-driven field reads and writes.
//!
//! All routines take the byte slice the schema describes (a record's fixed
//! region, or a nested structure's window within it) and resolve fields by
//! name through [`Schema::field`]. Scalars that do not fit in the slice fail
//! with an out-of-bounds error. Arrays decode the complete elements that are
//! present and stop at the physical end of the slice.

use richtext_cd_buffers::{BufferError, Reader, Writer};

use crate::error::{RecordError, Result};
use crate::schema::{EnumMode, FieldDescriptor, FieldKind, IntWidth, Schema};
use crate::value::Value;

/// Reads the named field.
pub fn read_field(bytes: &[u8], schema: &Schema, name: &str) -> Result<Value> {
    let (offset, field) = schema.field(name)?;
    read_descriptor(bytes, offset, field)
}

/// Writes the named field.
pub fn write_field(bytes: &mut [u8], schema: &Schema, name: &str, value: &Value) -> Result<()> {
    let (offset, field) = schema.field(name)?;
    write_descriptor(bytes, offset, field, value)
}

/// Reads an integer or enum field as its zero-extended bit pattern.
pub fn read_raw(bytes: &[u8], schema: &Schema, name: &str) -> Result<u64> {
    let (offset, field) = schema.field(name)?;
    let width = raw_width(field)?;
    let slice = window(bytes, offset, width.bytes())?;
    Ok(Reader::new(slice).uint(width.bytes())?)
}

/// Writes an integer or enum field from a bit pattern, leaving typed
/// decoding out of the way so unknown bits survive.
pub fn write_raw(bytes: &mut [u8], schema: &Schema, name: &str, raw: u64) -> Result<()> {
    let (offset, field) = schema.field(name)?;
    let width = raw_width(field)?;
    if !width.holds(raw) {
        return Err(RecordError::ValueOutOfRange {
            field: name.to_string(),
            value: format!("{raw:#x}"),
        });
    }
    Writer::at(bytes, offset).uint(width.bytes(), raw)?;
    Ok(())
}

/// Decodes up to `count` elements of `kind` from `bytes`, stopping at the
/// last complete element.
pub fn decode_array(bytes: &[u8], kind: &FieldKind, count: usize) -> Result<Vec<Value>> {
    let width = kind.width();
    let available = if width == 0 {
        count
    } else {
        count.min(bytes.len() / width)
    };
    if available < count {
        tracing::warn!(
            declared = count,
            decoded = available,
            "array truncated at end of buffer"
        );
    }
    (0..available)
        .map(|index| read_kind(bytes, index * width, kind))
        .collect()
}

/// Encodes `values` as consecutive elements of `kind` starting at `offset`.
pub fn encode_array(bytes: &mut [u8], offset: usize, kind: &FieldKind, values: &[Value], field: &str) -> Result<()> {
    let width = kind.width();
    for (index, value) in values.iter().enumerate() {
        write_kind(bytes, offset + index * width, kind, value, field)?;
    }
    Ok(())
}

fn raw_width(field: &FieldDescriptor) -> Result<IntWidth> {
    match (&field.kind, field.repeat) {
        (FieldKind::Int { width, .. } | FieldKind::Enum { width, .. }, None) => Ok(*width),
        _ => Err(RecordError::KindMismatch {
            field: field.name.to_string(),
            got: "raw integer",
        }),
    }
}

fn out_of_bounds(bytes: &[u8], offset: usize, wanted: usize) -> RecordError {
    RecordError::Buffer(BufferError::EndOfBuffer {
        offset,
        wanted,
        available: bytes.len().saturating_sub(offset),
    })
}

fn window(bytes: &[u8], offset: usize, size: usize) -> Result<&[u8]> {
    bytes
        .get(offset..offset + size)
        .ok_or_else(|| out_of_bounds(bytes, offset, size))
}

fn window_mut(bytes: &mut [u8], offset: usize, size: usize) -> Result<&mut [u8]> {
    let len = bytes.len();
    bytes
        .get_mut(offset..offset + size)
        .ok_or(RecordError::Buffer(BufferError::Overflow {
            offset,
            wanted: size,
            available: len.saturating_sub(offset),
        }))
}

fn read_descriptor(bytes: &[u8], offset: usize, field: &FieldDescriptor) -> Result<Value> {
    match field.repeat {
        None => read_kind(bytes, offset, &field.kind),
        Some(count) => {
            let tail = bytes.get(offset..).unwrap_or(&[]);
            let end = (count * field.kind.width()).min(tail.len());
            decode_array(&tail[..end], &field.kind, count).map(Value::Array)
        }
    }
}

fn write_descriptor(bytes: &mut [u8], offset: usize, field: &FieldDescriptor, value: &Value) -> Result<()> {
    match (field.repeat, value) {
        (None, _) => write_kind(bytes, offset, &field.kind, value, field.name),
        (Some(count), Value::Array(items)) => {
            if items.len() != count {
                return Err(RecordError::ValueOutOfRange {
                    field: field.name.to_string(),
                    value: format!("{} elements, expected {count}", items.len()),
                });
            }
            window_mut(bytes, offset, field.width())?;
            encode_array(bytes, offset, &field.kind, items, field.name)
        }
        (Some(_), other) => Err(kind_mismatch(field.name, other)),
    }
}

/// Reads one element of `kind` at `offset`.
pub fn read_kind(bytes: &[u8], offset: usize, kind: &FieldKind) -> Result<Value> {
    let slice = window(bytes, offset, kind.width())?;
    let mut reader = Reader::new(slice);
    let value = match kind {
        FieldKind::Int { width, signed } => read_int(&mut reader, *width, *signed)?,
        FieldKind::Bytes(_) => Value::Bytes(slice.to_vec()),
        FieldKind::Chars(_) => Value::Chars(slice.to_vec()),
        FieldKind::Struct(schema) => {
            let mut members = Vec::with_capacity(schema.fields().len());
            for (member_offset, member) in schema.iter() {
                members.push((member.name, read_descriptor(slice, member_offset, member)?));
            }
            Value::Struct(members)
        }
        FieldKind::Enum { width, mode, spec } => {
            let raw = reader.uint(width.bytes())?;
            match mode {
                EnumMode::Single => Value::Enum {
                    name: spec.decode_single(raw).map(|c| c.name),
                    raw,
                },
                EnumMode::Flags => Value::Flags {
                    names: spec.decode_set(raw).into_iter().map(|c| c.name).collect(),
                    raw,
                },
            }
        }
    };
    Ok(value)
}

fn read_int(reader: &mut Reader<'_>, width: IntWidth, signed: bool) -> Result<Value> {
    let value = match (width, signed) {
        (IntWidth::W1, true) => Value::Int(i64::from(reader.i8()?)),
        (IntWidth::W1, false) => Value::Int(i64::from(reader.u8()?)),
        (IntWidth::W2, true) => Value::Int(i64::from(reader.i16()?)),
        (IntWidth::W2, false) => Value::Int(i64::from(reader.u16()?)),
        (IntWidth::W4, true) => Value::Int(i64::from(reader.i32()?)),
        (IntWidth::W4, false) => Value::Int(i64::from(reader.u32()?)),
        (IntWidth::W8, true) => Value::Int(reader.i64()?),
        (IntWidth::W8, false) => Value::UInt64(reader.u64()?),
    };
    Ok(value)
}

/// Bit pattern for an integer value, range-checked against the field.
fn int_bits(width: IntWidth, signed: bool, value: &Value, field: &str) -> Result<u64> {
    let out_of_range = || RecordError::ValueOutOfRange {
        field: field.to_string(),
        value: format!("{value:?}"),
    };
    if signed {
        let v = match value {
            Value::Int(v) => *v,
            Value::UInt64(v) => i64::try_from(*v).map_err(|_| out_of_range())?,
            other => return Err(kind_mismatch(field, other)),
        };
        if width == IntWidth::W8 {
            return Ok(v as u64);
        }
        let bits = 8 * width.bytes() as u32;
        let (min, max) = (-(1i64 << (bits - 1)), (1i64 << (bits - 1)) - 1);
        if v < min || v > max {
            return Err(out_of_range());
        }
        return Ok(v as u64 & ((1u64 << bits) - 1));
    }
    let bits = match value {
        Value::Int(v) => u64::try_from(*v).map_err(|_| out_of_range())?,
        Value::UInt64(v) => *v,
        other => return Err(kind_mismatch(field, other)),
    };
    if !width.holds(bits) {
        return Err(out_of_range());
    }
    Ok(bits)
}

fn kind_mismatch(field: &str, value: &Value) -> RecordError {
    RecordError::KindMismatch {
        field: field.to_string(),
        got: value.type_name(),
    }
}

/// Writes one element of `kind` at `offset`.
pub fn write_kind(bytes: &mut [u8], offset: usize, kind: &FieldKind, value: &Value, field: &str) -> Result<()> {
    let slice = window_mut(bytes, offset, kind.width())?;
    match (kind, value) {
        (FieldKind::Int { width, signed }, _) => {
            let bits = int_bits(*width, *signed, value, field)?;
            Writer::new(slice).uint(width.bytes(), bits)?;
        }
        (FieldKind::Bytes(len), Value::Bytes(data))
        | (FieldKind::Chars(len), Value::Chars(data) | Value::Bytes(data)) => {
            if data.len() > *len {
                return Err(RecordError::ValueOutOfRange {
                    field: field.to_string(),
                    value: format!("{} bytes, room for {len}", data.len()),
                });
            }
            let mut writer = Writer::new(slice);
            writer.buf(data)?;
            writer.fill(0, len - data.len())?;
        }
        (FieldKind::Struct(schema), Value::Struct(members)) => {
            for (name, member) in members {
                write_field(slice, schema, name, member)?;
            }
        }
        (FieldKind::Enum { width, spec, .. }, _) => {
            let raw = match value {
                Value::Enum { name: Some(name), .. } => spec.value_of(name)?,
                Value::Enum { name: None, raw } => *raw,
                Value::Flags { names, .. } => spec.encode_set(names.iter().copied())?,
                other => int_bits(*width, false, other, field)?,
            };
            if !width.holds(raw) {
                return Err(RecordError::ValueOutOfRange {
                    field: field.to_string(),
                    value: format!("{raw:#x}"),
                });
            }
            Writer::new(slice).uint(width.bytes(), raw)?;
        }
        (_, other) => return Err(kind_mismatch(field, other)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::signature::HeaderKind;

    crate::cd_enum! {
        enum Shade: u16 {
            Light = 1,
            Dark = 2,
        }
    }

    fn schema() -> Arc<Schema> {
        let pair = Schema::structure("PAIR").u8("lo").u8("hi").build().unwrap();
        Schema::record("T", HeaderKind::Word, 0xFF01)
            .u16("count")
            .i16("delta")
            .enumeration::<Shade>("shade", IntWidth::W2)
            .flags::<Shade>("shades", IntWidth::W1)
            .chars("label", 4)
            .nested("pair", pair.clone())
            .array("pairs", FieldKind::Struct(pair), 2)
            .build()
            .unwrap()
    }

    #[test]
    fn unsigned_widens_without_sign_extension() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        bytes[0] = 0xFF;
        bytes[1] = 0xFF;
        assert_eq!(read_field(&bytes, &schema, "count").unwrap(), Value::Int(65535));
        bytes[2] = 0xFF;
        bytes[3] = 0xFF;
        assert_eq!(read_field(&bytes, &schema, "delta").unwrap(), Value::Int(-1));
    }

    #[test]
    fn range_checks() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        assert!(write_field(&mut bytes, &schema, "count", &Value::Int(65536)).is_err());
        assert!(write_field(&mut bytes, &schema, "count", &Value::Int(-1)).is_err());
        assert!(write_field(&mut bytes, &schema, "delta", &Value::Int(-32769)).is_err());
        write_field(&mut bytes, &schema, "delta", &Value::Int(-32768)).unwrap();
        assert_eq!(&bytes[2..4], &[0x00, 0x80]);
        assert!(bytes.iter().enumerate().all(|(i, b)| (2..4).contains(&i) || *b == 0));
    }

    #[test]
    fn unknown_enum_value_reads_as_raw() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        write_raw(&mut bytes, &schema, "shade", 9).unwrap();
        assert_eq!(
            read_field(&bytes, &schema, "shade").unwrap(),
            Value::Enum { name: None, raw: 9 }
        );
        write_raw(&mut bytes, &schema, "shades", 0x13).unwrap();
        assert_eq!(
            read_field(&bytes, &schema, "shades").unwrap(),
            Value::Flags { names: vec!["Light", "Dark"], raw: 0x13 }
        );
    }

    #[test]
    fn typed_flag_write_clears_unknown_bits() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        write_raw(&mut bytes, &schema, "shades", 0x10).unwrap();
        let value = Value::Flags { names: vec!["Dark"], raw: 0 };
        write_field(&mut bytes, &schema, "shades", &value).unwrap();
        assert_eq!(read_raw(&bytes, &schema, "shades").unwrap(), 0x02);
    }

    #[test]
    fn chars_are_nul_padded() {
        let schema = schema();
        let mut bytes = vec![0xAAu8; schema.size()];
        write_field(&mut bytes, &schema, "label", &Value::Chars(b"ab".to_vec())).unwrap();
        assert_eq!(
            read_field(&bytes, &schema, "label").unwrap(),
            Value::Chars(vec![b'a', b'b', 0, 0])
        );
        assert!(write_field(&mut bytes, &schema, "label", &Value::Chars(b"abcde".to_vec())).is_err());
    }

    #[test]
    fn nested_struct_writes_through() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        let value = Value::Struct(vec![("hi", Value::Int(7))]);
        write_field(&mut bytes, &schema, "pair", &value).unwrap();
        let offset = schema.offset_of("pair").unwrap();
        assert_eq!(bytes[offset + 1], 7);
        let read = read_field(&bytes, &schema, "pair").unwrap();
        assert_eq!(read.member("lo"), Some(&Value::Int(0)));
        assert_eq!(read.member("hi"), Some(&Value::Int(7)));
    }

    #[test]
    fn short_buffer_fails_scalar_but_truncates_array() {
        let schema = schema();
        let offset = schema.offset_of("pairs").unwrap();
        let bytes = vec![1u8; offset + 3];
        let pairs = read_field(&bytes, &schema, "pairs").unwrap();
        assert!(matches!(pairs, Value::Array(ref items) if items.len() == 1));

        let short = vec![0u8; 1];
        assert!(matches!(
            read_field(&short, &schema, "count"),
            Err(RecordError::Buffer(BufferError::EndOfBuffer { .. }))
        ));
    }

    #[test]
    fn array_length_must_match() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        let one = Value::Array(vec![Value::Struct(vec![])]);
        assert!(matches!(
            write_field(&mut bytes, &schema, "pairs", &one),
            Err(RecordError::ValueOutOfRange { .. })
        ));
    }
}
