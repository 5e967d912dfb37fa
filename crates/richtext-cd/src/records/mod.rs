//! Typed wrappers for a handful of record types.
//!
//! Each wrapper owns a [`Record`] built from a lazily constructed schema and
//! adds accessors for its variable-region layout.

use std::sync::Arc;

use crate::error::Result;
use crate::record::Record;
use crate::schema::Schema;

mod action;
mod color_table;
mod font;
mod pab;
mod text;

pub use action::{ActionFormulaFlags, CdActionFormula, CdActionModifyField, ModifyOperation};
pub use color_table::{CdColorTable, ColorEntry};
pub use font::{FontFace, FontId, FontStyle};
pub use pab::CdPabReference;
pub use text::CdText;

/// A record type with a fixed schema.
pub trait CdRecord: Sized {
    fn schema() -> Result<Arc<Schema>>;

    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn into_record(self) -> Record;

    /// Zero-filled record with an empty variable region.
    fn allocate() -> Result<Self> {
        Record::allocate(Self::schema()?).map(Self::from_record)
    }

    /// Wraps a buffer, checking its header against the schema.
    fn wrap(buf: Vec<u8>) -> Result<Self> {
        Record::wrap(buf, Self::schema()?).map(Self::from_record)
    }
}

macro_rules! cd_record {
    ($name:ident, $schema:expr) => {
        impl $crate::records::CdRecord for $name {
            fn schema() -> $crate::error::Result<::std::sync::Arc<$crate::schema::Schema>> {
                static SCHEMA: ::std::sync::OnceLock<
                    $crate::error::Result<::std::sync::Arc<$crate::schema::Schema>>,
                > = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| $schema).clone()
            }

            fn from_record(record: $crate::record::Record) -> Self {
                Self { record }
            }

            fn record(&self) -> &$crate::record::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::record::Record {
                &mut self.record
            }

            fn into_record(self) -> $crate::record::Record {
                self.record
            }
        }
    };
}

pub(crate) use cd_record;
