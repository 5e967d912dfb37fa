//! External codecs for variable-region payloads.
//!
//! Text in CD records is stored in LMBCS, and formulas are stored compiled.
//! Neither conversion belongs to the structure engine, so both are reached
//! through the traits below and handed in by the caller.

use crate::error::{CodecError, RecordError, Result};

/// Converts between text and its stored byte form.
pub trait ByteStringCodec {
    fn encode(&self, text: &str) -> Vec<u8>;
    fn decode(&self, bytes: &[u8]) -> std::result::Result<String, CodecError>;
}

/// Compiles formula source to its stored byte form and back.
pub trait FormulaCodec {
    fn compile(&self, formula: &str) -> std::result::Result<Vec<u8>, CodecError>;
    fn decompile(&self, bytes: &[u8]) -> std::result::Result<String, CodecError>;
}

/// Strict UTF-8 passthrough.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl ByteStringCodec for Utf8Codec {
    fn encode(&self, text: &str) -> Vec<u8> {
        text.as_bytes().to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<String, CodecError> {
        String::from_utf8(bytes.to_vec()).map_err(|e| CodecError::InvalidText {
            position: e.utf8_error().valid_up_to(),
        })
    }
}

/// Group byte introducing a big-endian UTF-16 code unit.
const LMBCS_GROUP_UNICODE: u8 = 0x14;

/// Minimal LMBCS codec.
///
/// Printable ASCII plus TAB, LF, CR and NUL are stored as single bytes
/// (group 1). Every other code unit goes through the Unicode group: `0x14`
/// followed by the UTF-16 unit, high byte first. Decoding rejects the
/// code-page groups, which need the full charset tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LmbcsCodec;

impl LmbcsCodec {
    fn is_single_byte(c: char) -> bool {
        matches!(c, '\0' | '\t' | '\n' | '\r' | ' '..='\x7f')
    }
}

impl ByteStringCodec for LmbcsCodec {
    fn encode(&self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len());
        for c in text.chars() {
            if LmbcsCodec::is_single_byte(c) {
                out.push(c as u8);
                continue;
            }
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push(LMBCS_GROUP_UNICODE);
                out.extend_from_slice(&unit.to_be_bytes());
            }
        }
        out
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<String, CodecError> {
        let mut units = Vec::with_capacity(bytes.len());
        let mut positions = Vec::with_capacity(bytes.len());
        let mut x = 0;
        while x < bytes.len() {
            let byte = bytes[x];
            positions.push(x);
            if byte == LMBCS_GROUP_UNICODE {
                let pair = bytes
                    .get(x + 1..x + 3)
                    .ok_or(CodecError::InvalidText { position: x })?;
                units.push(u16::from_be_bytes([pair[0], pair[1]]));
                x += 3;
            } else if LmbcsCodec::is_single_byte(byte as char) {
                units.push(u16::from(byte));
                x += 1;
            } else {
                return Err(CodecError::InvalidText { position: x });
            }
        }
        let mut text = String::with_capacity(units.len());
        let mut index = 0;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    index += c.len_utf16();
                    text.push(c);
                }
                Err(_) => {
                    return Err(CodecError::InvalidText {
                        position: positions.get(index).copied().unwrap_or(bytes.len()),
                    })
                }
            }
        }
        Ok(text)
    }
}

/// Codecs used by record accessors.
pub struct Codecs {
    pub strings: Box<dyn ByteStringCodec>,
    pub formulas: Option<Box<dyn FormulaCodec>>,
}

impl Default for Codecs {
    fn default() -> Self {
        Self::new(Box::new(LmbcsCodec))
    }
}

impl Codecs {
    pub fn new(strings: Box<dyn ByteStringCodec>) -> Self {
        Self {
            strings,
            formulas: None,
        }
    }

    pub fn with_formulas(mut self, formulas: Box<dyn FormulaCodec>) -> Self {
        self.formulas = Some(formulas);
        self
    }

    pub fn formulas(&self) -> Result<&dyn FormulaCodec> {
        self.formulas.as_deref().ok_or(RecordError::NoFormulaCodec)
    }
}
