//! Structure access for rich-text CD records.
//!
//! CD records are little-endian binary records: a 2, 4 or 6 byte header
//! (see [`signature`]), a fixed region laid out by a [`Schema`], and an
//! optional variable region holding strings, formulas or blobs whose
//! lengths live in fixed fields.
//!
//! - [`Record`] - owns a record buffer and resizes its variable region
//! - [`Schema`] - declarative field layout with precomputed offsets
//! - [`StructView`] / [`StructViewMut`] - field access over a byte region
//! - [`variable`] - string, blob and formula sections of the variable region
//! - [`RecordTypeRegistry`] - record type constants and their identifiers
//! - [`CdStream`] - splitting a composite item into records
//!
//! # Example
//!
//! ```
//! use richtext_cd::records::{CdRecord, CdText};
//! use richtext_cd::LmbcsCodec;
//!
//! let mut text = CdText::allocate().unwrap();
//! text.set_text(&LmbcsCodec, "Hello").unwrap();
//! assert_eq!(text.record().len(), 4 + 4 + 5);
//! text.set_text(&LmbcsCodec, "Hi").unwrap();
//! assert_eq!(text.record().signature().unwrap().total_len, 10);
//! ```

pub mod codec;
pub mod config;
pub mod enums;
pub mod error;
pub mod field;
pub mod record;
pub mod records;
pub mod registry;
pub mod schema;
pub mod signature;
pub mod stream;
pub mod value;
pub mod variable;
pub mod view;

pub use codec::{ByteStringCodec, Codecs, FormulaCodec, LmbcsCodec, Utf8Codec};
pub use config::RecordConfig;
pub use enums::{decode_set, decode_single, encode_set, CdEnum, EnumConstant, EnumSpec, EnumValue};
pub use error::{CodecError, RecordError, Result};
pub use field::{read_field, write_field};
pub use record::Record;
pub use registry::{types_for_constant, Area, RecordTypeId, RecordTypeRegistry};
pub use schema::{EnumMode, FieldDescriptor, FieldKind, IntWidth, Schema, SchemaBuilder};
pub use signature::{HeaderKind, Signature};
pub use stream::{CdStream, CdStreamWriter};
pub use value::Value;
pub use view::{StructView, StructViewMut};
