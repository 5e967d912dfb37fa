//! Error types for record access.

use richtext_cd_buffers::BufferError;
use thiserror::Error;

use crate::signature::HeaderKind;

/// Failure reported by an external byte-string or formula codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid encoded text at byte {position}")]
    InvalidText { position: usize },
    #[error("formula codec error: {0}")]
    Formula(String),
}

/// Error type for every record, field and variable-region operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("buffer of {len} bytes is too short for a {kind:?} header")]
    TruncatedHeader { kind: HeaderKind, len: usize },
    #[error("header declares {declared} bytes but the buffer holds {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("record signature {found:#06x} ({found_kind:?}) does not match schema {schema} ({expected:#06x}, {expected_kind:?})")]
    SignatureMismatch {
        schema: &'static str,
        expected: u16,
        expected_kind: HeaderKind,
        found: u16,
        found_kind: HeaderKind,
    },
    #[error("schema {0} has no record signature")]
    NotARecordSchema(&'static str),
    #[error("unknown field {field} in {schema}")]
    UnknownField { schema: &'static str, field: String },
    #[error("duplicate field {field} in {schema}")]
    DuplicateField { schema: &'static str, field: &'static str },
    #[error("field {field} cannot hold {got}")]
    KindMismatch { field: String, got: &'static str },
    #[error("value {value} does not fit field {field}")]
    ValueOutOfRange { field: String, value: String },
    #[error("{enumeration} has no constant named {name}")]
    UnknownConstant {
        enumeration: &'static str,
        name: String,
    },
    #[error("variable data cannot shrink by {shrink} bytes, only {available} present")]
    NegativeLength { shrink: usize, available: usize },
    #[error("variable section {start}..{end} lies outside {len} bytes of variable data")]
    SectionOutOfBounds { start: usize, end: usize, len: usize },
    #[error("total length {total} does not fit a {kind:?} header (max {max})")]
    HeaderOverflow {
        kind: HeaderKind,
        total: u64,
        max: u64,
    },
    #[error("no formula codec configured")]
    NoFormulaCodec,
}

pub type Result<T> = std::result::Result<T, RecordError>;
