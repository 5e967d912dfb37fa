//! Record header signatures.
//!
//! Every CD record starts with a 16-bit signature word. Its high byte picks
//! one of three header shapes:
//!
//! | high byte | shape | header | type          | length field          |
//! |-----------|-------|--------|---------------|-----------------------|
//! | `0x00`    | LSIG  | 6      | whole word    | `u32` at offset 2     |
//! | `0xFF`    | WSIG  | 4      | whole word    | `u16` at offset 2     |
//! | other     | BSIG  | 2      | low byte only | the high byte itself  |
//!
//! The declared length always counts the header too.

use richtext_cd_buffers::{Reader, Writer};
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};

/// High byte of a long (6-byte header) signature.
pub const LONG_RECORD_LENGTH: u16 = 0x0000;
/// High byte of a word (4-byte header) signature.
pub const WORD_RECORD_LENGTH: u16 = 0xFF00;
/// Byte signatures carry their length in the high byte; constants use zero.
pub const BYTE_RECORD_LENGTH: u16 = 0x0000;

/// Header shape of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeaderKind {
    /// BSIG: 1 byte type, 1 byte length.
    Byte,
    /// WSIG: 2 byte type, 2 byte length.
    Word,
    /// LSIG: 2 byte type, 4 byte length.
    Long,
}

impl HeaderKind {
    /// Classifies a signature word, returning the shape and the type value.
    ///
    /// For byte headers the high byte is a length, so only the low byte is
    /// kept as the type.
    pub fn classify(raw: u16) -> (HeaderKind, u16) {
        match raw & 0xFF00 {
            LONG_RECORD_LENGTH => (HeaderKind::Long, raw),
            WORD_RECORD_LENGTH => (HeaderKind::Word, raw),
            _ => (HeaderKind::Byte, raw & 0x00FF),
        }
    }

    /// Size of the header in bytes.
    pub const fn header_len(self) -> usize {
        match self {
            HeaderKind::Byte => 2,
            HeaderKind::Word => 4,
            HeaderKind::Long => 6,
        }
    }

    /// Largest total length this header can declare.
    ///
    /// A byte header stops at 254: a length byte of `0x00` or `0xFF` would
    /// make the signature word classify as a long or word header.
    pub const fn max_total_len(self) -> u64 {
        match self {
            HeaderKind::Byte => 0xFE,
            HeaderKind::Word => 0xFFFF,
            HeaderKind::Long => u32::MAX as u64,
        }
    }
}

/// Decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Signature {
    pub kind: HeaderKind,
    /// Record type; for byte headers this is the low byte of the signature word.
    pub type_value: u16,
    /// Declared total record length, header included.
    pub total_len: u32,
}

impl Signature {
    /// Reads the header at the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Signature> {
        let mut reader = Reader::new(bytes);
        let raw = reader.u16()?;
        let (kind, type_value) = HeaderKind::classify(raw);
        if bytes.len() < kind.header_len() {
            return Err(RecordError::TruncatedHeader {
                kind,
                len: bytes.len(),
            });
        }
        let total_len = match kind {
            HeaderKind::Byte => u32::from(raw >> 8),
            HeaderKind::Word => u32::from(reader.u16()?),
            HeaderKind::Long => reader.u32()?,
        };
        Ok(Signature {
            kind,
            type_value,
            total_len,
        })
    }

    /// Header length in bytes.
    pub fn header_len(&self) -> usize {
        self.kind.header_len()
    }

    /// Declared length minus the header.
    pub fn payload_len(&self) -> usize {
        (self.total_len as usize).saturating_sub(self.header_len())
    }

    /// Writes a complete header.
    pub fn write(bytes: &mut [u8], kind: HeaderKind, type_value: u16, total_len: u64) -> Result<()> {
        if bytes.len() < kind.header_len() {
            return Err(RecordError::TruncatedHeader {
                kind,
                len: bytes.len(),
            });
        }
        match kind {
            HeaderKind::Byte => Writer::new(bytes).u8((type_value & 0x00FF) as u8)?,
            HeaderKind::Word | HeaderKind::Long => Writer::new(bytes).u16(type_value)?,
        }
        Signature::write_length(bytes, kind, total_len)
    }

    /// Patches only the length subfield of an existing header.
    pub fn write_length(bytes: &mut [u8], kind: HeaderKind, total_len: u64) -> Result<()> {
        let max = kind.max_total_len();
        if total_len > max || total_len < kind.header_len() as u64 {
            return Err(RecordError::HeaderOverflow {
                kind,
                total: total_len,
                max,
            });
        }
        let mut writer = Writer::at(bytes, if kind == HeaderKind::Byte { 1 } else { 2 });
        match kind {
            HeaderKind::Byte => writer.u8(total_len as u8)?,
            HeaderKind::Word => writer.u16(total_len as u16)?,
            HeaderKind::Long => writer.u32(total_len as u32)?,
        }
        Ok(())
    }
}
