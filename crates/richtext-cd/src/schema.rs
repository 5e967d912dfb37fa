//! Declarative record layouts.
//!
//! A [`Schema`] is an ordered list of fields. A field's offset is the sum of
//! the widths of every field declared before it, so the declaration order
//! *is* the layout. Schemas describe the bytes after the record header; the
//! header shape and type live in [`RecordSignature`].

use std::collections::HashSet;
use std::sync::Arc;

use crate::enums::{CdEnum, EnumSpec};
use crate::error::{RecordError, Result};
use crate::signature::HeaderKind;

/// Width of an integer field in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntWidth {
    W1 = 1,
    W2 = 2,
    W4 = 4,
    W8 = 8,
}

impl IntWidth {
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Whether `raw` fits in this many bytes.
    pub fn holds(self, raw: u64) -> bool {
        self == IntWidth::W8 || raw >> (8 * self.bytes()) == 0
    }
}

/// How an enum-backed integer is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumMode {
    /// The stored value is one constant.
    Single,
    /// The stored value ORs several constants together.
    Flags,
}

/// Kind of a single element of a field.
#[derive(Debug, Clone)]
pub enum FieldKind {
    Int { width: IntWidth, signed: bool },
    /// Opaque bytes.
    Bytes(usize),
    /// Characters in the legacy charset, NUL padded.
    Chars(usize),
    /// A fixed-size sub-structure laid out by its own schema.
    Struct(Arc<Schema>),
    Enum {
        width: IntWidth,
        mode: EnumMode,
        spec: Arc<EnumSpec>,
    },
}

impl FieldKind {
    /// Width of one element in bytes.
    pub fn width(&self) -> usize {
        match self {
            FieldKind::Int { width, .. } | FieldKind::Enum { width, .. } => width.bytes(),
            FieldKind::Bytes(len) | FieldKind::Chars(len) => *len,
            FieldKind::Struct(schema) => schema.size(),
        }
    }

    /// Short human-readable name of the kind.
    pub fn describe(&self) -> &'static str {
        match self {
            FieldKind::Int { signed: true, .. } => "signed integer",
            FieldKind::Int { signed: false, .. } => "unsigned integer",
            FieldKind::Bytes(_) => "byte array",
            FieldKind::Chars(_) => "char array",
            FieldKind::Struct(_) => "structure",
            FieldKind::Enum {
                mode: EnumMode::Single,
                ..
            } => "enum",
            FieldKind::Enum {
                mode: EnumMode::Flags,
                ..
            } => "flags",
        }
    }
}

/// One entry of a schema.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    /// `Some(n)` for an array of `n` contiguous elements.
    pub repeat: Option<usize>,
}

impl FieldDescriptor {
    pub fn scalar(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            repeat: None,
        }
    }

    pub fn array(name: &'static str, kind: FieldKind, count: usize) -> Self {
        Self {
            name,
            kind,
            repeat: Some(count),
        }
    }

    /// Number of elements.
    pub fn count(&self) -> usize {
        self.repeat.unwrap_or(1)
    }

    /// Total bytes this field occupies.
    pub fn width(&self) -> usize {
        self.kind.width() * self.count()
    }
}

/// Header shape and type constant of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordSignature {
    pub kind: HeaderKind,
    /// Type as the signature decoder reports it (low byte only for byte headers).
    pub type_value: u16,
}

impl RecordSignature {
    pub fn new(kind: HeaderKind, constant: u16) -> Self {
        let type_value = match kind {
            HeaderKind::Byte => constant & 0x00FF,
            HeaderKind::Word | HeaderKind::Long => constant,
        };
        Self { kind, type_value }
    }
}

/// Immutable layout of a record body or of a nested structure.
#[derive(Debug)]
pub struct Schema {
    name: &'static str,
    signature: Option<RecordSignature>,
    fields: Vec<FieldDescriptor>,
    offsets: Vec<usize>,
    size: usize,
}

impl Schema {
    /// Starts a record schema with the given header shape and type constant.
    pub fn record(name: &'static str, kind: HeaderKind, constant: u16) -> SchemaBuilder {
        SchemaBuilder::new(name, Some(RecordSignature::new(kind, constant)))
    }

    /// Starts a headerless structure schema, for nesting in other schemas.
    pub fn structure(name: &'static str) -> SchemaBuilder {
        SchemaBuilder::new(name, None)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn signature(&self) -> Option<RecordSignature> {
        self.signature
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Size of the fixed region in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fields paired with their byte offsets.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &FieldDescriptor)> {
        self.offsets.iter().copied().zip(self.fields.iter())
    }

    /// Looks up a field and its offset.
    pub fn field(&self, name: &str) -> Result<(usize, &FieldDescriptor)> {
        self.iter()
            .find(|(_, field)| field.name == name)
            .ok_or_else(|| RecordError::UnknownField {
                schema: self.name,
                field: name.to_string(),
            })
    }

    pub fn offset_of(&self, name: &str) -> Result<usize> {
        self.field(name).map(|(offset, _)| offset)
    }
}

/// Builder for [`Schema`]; fields are laid out in call order.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: &'static str,
    signature: Option<RecordSignature>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    fn new(name: &'static str, signature: Option<RecordSignature>) -> Self {
        Self {
            name,
            signature,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn int(self, name: &'static str, width: IntWidth, signed: bool) -> Self {
        self.field(FieldDescriptor::scalar(name, FieldKind::Int { width, signed }))
    }

    pub fn u8(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W1, false)
    }

    pub fn i8(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W1, true)
    }

    pub fn u16(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W2, false)
    }

    pub fn i16(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W2, true)
    }

    pub fn u32(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W4, false)
    }

    pub fn i32(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W4, true)
    }

    pub fn u64(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W8, false)
    }

    pub fn i64(self, name: &'static str) -> Self {
        self.int(name, IntWidth::W8, true)
    }

    pub fn bytes(self, name: &'static str, len: usize) -> Self {
        self.field(FieldDescriptor::scalar(name, FieldKind::Bytes(len)))
    }

    pub fn chars(self, name: &'static str, len: usize) -> Self {
        self.field(FieldDescriptor::scalar(name, FieldKind::Chars(len)))
    }

    pub fn nested(self, name: &'static str, schema: Arc<Schema>) -> Self {
        self.field(FieldDescriptor::scalar(name, FieldKind::Struct(schema)))
    }

    pub fn array(self, name: &'static str, kind: FieldKind, count: usize) -> Self {
        self.field(FieldDescriptor::array(name, kind, count))
    }

    /// Single-valued enum stored in `width` bytes.
    pub fn enumeration<E: CdEnum>(self, name: &'static str, width: IntWidth) -> Self {
        self.field(FieldDescriptor::scalar(
            name,
            FieldKind::Enum {
                width,
                mode: EnumMode::Single,
                spec: Arc::new(EnumSpec::of::<E>()),
            },
        ))
    }

    /// Bitfield of `E` constants stored in `width` bytes.
    pub fn flags<E: CdEnum>(self, name: &'static str, width: IntWidth) -> Self {
        self.field(FieldDescriptor::scalar(
            name,
            FieldKind::Enum {
                width,
                mode: EnumMode::Flags,
                spec: Arc::new(EnumSpec::of::<E>()),
            },
        ))
    }

    /// Computes offsets and freezes the layout.
    pub fn build(self) -> Result<Arc<Schema>> {
        let mut seen = HashSet::new();
        let mut offsets = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for field in &self.fields {
            if !seen.insert(field.name) {
                return Err(RecordError::DuplicateField {
                    schema: self.name,
                    field: field.name,
                });
            }
            offsets.push(offset);
            offset += field.width();
        }
        Ok(Arc::new(Schema {
            name: self.name,
            signature: self.signature,
            fields: self.fields,
            offsets,
            size: offset,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accumulate_in_declaration_order() {
        let point = Schema::structure("POINT").i16("x").i16("y").build().unwrap();
        let schema = Schema::record("TEST", HeaderKind::Word, 0xFF10)
            .u8("a")
            .u32("b")
            .array("c", FieldKind::Int { width: IntWidth::W2, signed: false }, 3)
            .nested("origin", point)
            .bytes("pad", 5)
            .u64("d")
            .build()
            .unwrap();
        assert_eq!(schema.offset_of("a").unwrap(), 0);
        assert_eq!(schema.offset_of("b").unwrap(), 1);
        assert_eq!(schema.offset_of("c").unwrap(), 5);
        assert_eq!(schema.offset_of("origin").unwrap(), 11);
        assert_eq!(schema.offset_of("pad").unwrap(), 15);
        assert_eq!(schema.offset_of("d").unwrap(), 20);
        assert_eq!(schema.size(), 28);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Schema::structure("DUP").u8("a").u16("a").build().unwrap_err();
        assert_eq!(
            err,
            RecordError::DuplicateField {
                schema: "DUP",
                field: "a"
            }
        );
    }

    #[test]
    fn unknown_field_lookup() {
        let schema = Schema::structure("S").u8("a").build().unwrap();
        assert!(matches!(
            schema.field("b"),
            Err(RecordError::UnknownField { .. })
        ));
    }

    #[test]
    fn byte_signature_keeps_low_byte() {
        let sig = RecordSignature::new(HeaderKind::Byte, 0x006F);
        assert_eq!(sig.type_value, 0x6F);
        let sig = RecordSignature::new(HeaderKind::Word, 0xFF70);
        assert_eq!(sig.type_value, 0xFF70);
    }

    #[test]
    fn width_holds() {
        assert!(IntWidth::W1.holds(0xFF));
        assert!(!IntWidth::W1.holds(0x100));
        assert!(IntWidth::W4.holds(u32::MAX as u64));
        assert!(IntWidth::W8.holds(u64::MAX));
    }
}
