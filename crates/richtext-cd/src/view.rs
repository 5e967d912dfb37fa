//! Borrowed views of a schema-described byte region.
//!
//! A view pairs a slice with the schema that lays it out. Nested structures
//! are views over a narrower slice of the same storage, so writes through a
//! nested [`StructViewMut`] land in the parent buffer. Views borrow the
//! record, which keeps them from outliving a resize.

use std::collections::BTreeSet;

use crate::codec::ByteStringCodec;
use crate::enums::{decode_set, encode_set, CdEnum, EnumValue};
use crate::error::{RecordError, Result};
use crate::field::{read_field, read_raw, write_field, write_raw};
use crate::schema::{FieldKind, Schema};
use crate::value::Value;

/// Read-only view.
#[derive(Debug, Clone, Copy)]
pub struct StructView<'a> {
    bytes: &'a [u8],
    schema: &'a Schema,
}

impl<'a> StructView<'a> {
    pub fn new(bytes: &'a [u8], schema: &'a Schema) -> Self {
        Self { bytes, schema }
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        read_field(self.bytes, self.schema, name)
    }

    /// Integer or enum field as its stored bit pattern.
    pub fn get_raw(&self, name: &str) -> Result<u64> {
        read_raw(self.bytes, self.schema, name)
    }

    /// Fails with `ValueOutOfRange` when the stored value does not fit a `u8`.
    pub fn get_u8(&self, name: &str) -> Result<u8> {
        self.get_narrow(name)
    }

    pub fn get_u16(&self, name: &str) -> Result<u16> {
        self.get_narrow(name)
    }

    pub fn get_u32(&self, name: &str) -> Result<u32> {
        self.get_narrow(name)
    }

    fn get_narrow<T: TryFrom<u64>>(&self, name: &str) -> Result<T> {
        let raw = self.get_raw(name)?;
        T::try_from(raw).map_err(|_| RecordError::ValueOutOfRange {
            field: name.to_string(),
            value: format!("{raw:#x}"),
        })
    }

    /// Single-valued enum; `None` when the stored value has no constant.
    pub fn get_enum<E: CdEnum>(&self, name: &str) -> Result<Option<E>> {
        Ok(self.get_enum_value::<E>(name)?.known())
    }

    pub fn get_enum_value<E: CdEnum>(&self, name: &str) -> Result<EnumValue<E>> {
        self.get_raw(name).map(EnumValue::from_raw)
    }

    /// Bitfield constants whose bits are all set; unknown bits are dropped.
    pub fn get_flags<E: CdEnum>(&self, name: &str) -> Result<BTreeSet<E>> {
        self.get_raw(name).map(decode_set::<E>)
    }

    /// Char array decoded up to the first NUL.
    pub fn get_chars(&self, name: &str, codec: &dyn ByteStringCodec) -> Result<String> {
        match self.get(name)? {
            Value::Chars(bytes) => {
                let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
                Ok(codec.decode(&bytes[..end])?)
            }
            other => Err(RecordError::KindMismatch {
                field: name.to_string(),
                got: other.type_name(),
            }),
        }
    }

    /// View of a nested structure field.
    pub fn nested(&self, name: &str) -> Result<StructView<'a>> {
        let (offset, schema) = nested_window(self.schema, name)?;
        let size = schema.size();
        let bytes = self.bytes.get(offset..offset + size).ok_or_else(|| {
            richtext_cd_buffers::BufferError::EndOfBuffer {
                offset,
                wanted: size,
                available: self.bytes.len().saturating_sub(offset),
            }
        })?;
        Ok(StructView::new(bytes, schema))
    }
}

/// Mutable view.
#[derive(Debug)]
pub struct StructViewMut<'a> {
    bytes: &'a mut [u8],
    schema: &'a Schema,
}

impl<'a> StructViewMut<'a> {
    pub fn new(bytes: &'a mut [u8], schema: &'a Schema) -> Self {
        Self { bytes, schema }
    }

    pub fn as_view(&self) -> StructView<'_> {
        StructView::new(self.bytes, self.schema)
    }

    pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
        write_field(self.bytes, self.schema, name, value)
    }

    pub fn set_raw(&mut self, name: &str, raw: u64) -> Result<()> {
        write_raw(self.bytes, self.schema, name, raw)
    }

    pub fn set_enum<E: CdEnum>(&mut self, name: &str, value: E) -> Result<()> {
        self.set_raw(name, value.value())
    }

    /// Replaces the stored bits with the OR of `values`.
    pub fn set_flags<E: CdEnum>(&mut self, name: &str, values: impl IntoIterator<Item = E>) -> Result<()> {
        self.set_raw(name, encode_set(values))
    }

    pub fn set_chars(&mut self, name: &str, codec: &dyn ByteStringCodec, text: &str) -> Result<()> {
        self.set(name, &Value::Chars(codec.encode(text)))
    }

    /// Mutable view of a nested structure field, writing through to this view.
    pub fn nested_mut(&mut self, name: &str) -> Result<StructViewMut<'_>> {
        let (offset, schema) = nested_window(self.schema, name)?;
        let size = schema.size();
        let available = self.bytes.len().saturating_sub(offset);
        let bytes = self.bytes.get_mut(offset..offset + size).ok_or(
            richtext_cd_buffers::BufferError::Overflow {
                offset,
                wanted: size,
                available,
            },
        )?;
        Ok(StructViewMut::new(bytes, schema))
    }
}

fn nested_window<'s>(schema: &'s Schema, name: &str) -> Result<(usize, &'s Schema)> {
    let (offset, field) = schema.field(name)?;
    match (&field.kind, field.repeat) {
        (FieldKind::Struct(nested), None) => Ok((offset, nested.as_ref())),
        _ => Err(RecordError::KindMismatch {
            field: name.to_string(),
            got: "structure view",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntWidth;

    crate::cd_enum! {
        enum Corner: u8 {
            TopLeft = 0,
            BottomRight = 3,
        }
    }

    fn schema() -> std::sync::Arc<Schema> {
        let inner = Schema::structure("INNER")
            .enumeration::<Corner>("corner", IntWidth::W1)
            .u16("size")
            .build()
            .unwrap();
        Schema::structure("OUTER")
            .u8("tag")
            .nested("inner", inner)
            .chars("name", 6)
            .build()
            .unwrap()
    }

    #[test]
    fn nested_writes_land_in_parent() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        {
            let mut view = StructViewMut::new(&mut bytes, &schema);
            let mut inner = view.nested_mut("inner").unwrap();
            inner.set_enum("corner", Corner::BottomRight).unwrap();
            inner.set_raw("size", 0x0102).unwrap();
        }
        assert_eq!(&bytes[1..4], &[3, 0x02, 0x01]);
        let view = StructView::new(&bytes, &schema);
        let inner = view.nested("inner").unwrap();
        assert_eq!(inner.get_enum::<Corner>("corner").unwrap(), Some(Corner::BottomRight));
        assert_eq!(inner.get_u16("size").unwrap(), 0x0102);
    }

    #[test]
    fn narrow_getter_rejects_wider_value() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        bytes[2..4].copy_from_slice(&[0x02, 0x01]);
        let view = StructView::new(&bytes, &schema);
        let inner = view.nested("inner").unwrap();
        assert_eq!(
            inner.get_u8("size"),
            Err(RecordError::ValueOutOfRange {
                field: "size".to_string(),
                value: "0x102".to_string(),
            })
        );
        assert_eq!(inner.get_u32("size").unwrap(), 0x0102);

        bytes[2..4].copy_from_slice(&[5, 0]);
        let inner = StructView::new(&bytes, &schema);
        assert_eq!(inner.nested("inner").unwrap().get_u8("size").unwrap(), 5);
    }

    #[test]
    fn unknown_enum_is_absent_but_raw_survives() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        bytes[1] = 9;
        let view = StructView::new(&bytes, &schema);
        let inner = view.nested("inner").unwrap();
        assert_eq!(inner.get_enum::<Corner>("corner").unwrap(), None);
        assert_eq!(inner.get_enum_value::<Corner>("corner").unwrap(), EnumValue::Raw(9));
    }

    #[test]
    fn chars_stop_at_nul() {
        let schema = schema();
        let mut bytes = vec![0u8; schema.size()];
        let codec = crate::codec::Utf8Codec;
        StructViewMut::new(&mut bytes, &schema)
            .set_chars("name", &codec, "abc")
            .unwrap();
        let view = StructView::new(&bytes, &schema);
        assert_eq!(view.get_chars("name", &codec).unwrap(), "abc");
        assert!(view.get_chars("tag", &codec).is_err());
    }

    #[test]
    fn nested_requires_structure_field() {
        let schema = schema();
        let bytes = vec![0u8; schema.size()];
        let view = StructView::new(&bytes, &schema);
        assert!(matches!(view.nested("tag"), Err(RecordError::KindMismatch { .. })));
    }
}
