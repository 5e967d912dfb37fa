//! Strings, blobs and formulas in the variable region.
//!
//! Sub-sections are addressed by `(offset, len)` relative to the start of
//! the variable region. Records compute those pairs from their own length
//! fields, so a write takes a setter that stores the new length back. When a
//! record holds several sections, write them in ascending offset order or
//! re-derive the offsets after each write.

use crate::codec::{ByteStringCodec, Codecs};
use crate::error::{RecordError, Result};
use crate::record::Record;

/// Bytes of the section at `offset..offset + len`.
pub fn extract_blob(record: &Record, offset: usize, len: usize) -> Result<&[u8]> {
    let data = record.variable_data();
    let out_of_bounds = |end| RecordError::SectionOutOfBounds {
        start: offset,
        end,
        len: data.len(),
    };
    let end = offset.checked_add(len).ok_or_else(|| out_of_bounds(usize::MAX))?;
    data.get(offset..end).ok_or_else(|| out_of_bounds(end))
}

/// Replaces the `old_len`-byte section at `offset` with `bytes`, then calls
/// `set_len` with the new length. If `set_len` fails the record is put back
/// as it was.
pub fn write_blob<F>(record: &mut Record, offset: usize, old_len: usize, bytes: &[u8], set_len: F) -> Result<()>
where
    F: FnOnce(&mut Record, usize) -> Result<()>,
{
    let snapshot = record.snapshot();
    record.splice_variable_data(offset, old_len, bytes.len())?;
    record.variable_data_mut()[offset..offset + bytes.len()].copy_from_slice(bytes);
    if let Err(err) = set_len(record, bytes.len()) {
        record.restore(snapshot);
        return Err(err);
    }
    Ok(())
}

pub fn extract_string(record: &Record, offset: usize, len: usize, codec: &dyn ByteStringCodec) -> Result<String> {
    Ok(codec.decode(extract_blob(record, offset, len)?)?)
}

/// Encodes `text` and stores it as in [`write_blob`].
pub fn write_string<F>(
    record: &mut Record,
    offset: usize,
    old_len: usize,
    text: &str,
    codec: &dyn ByteStringCodec,
    set_len: F,
) -> Result<()>
where
    F: FnOnce(&mut Record, usize) -> Result<()>,
{
    let bytes = codec.encode(text);
    write_blob(record, offset, old_len, &bytes, set_len)
}

pub fn extract_formula(record: &Record, offset: usize, len: usize, codecs: &Codecs) -> Result<String> {
    let formulas = codecs.formulas()?;
    Ok(formulas.decompile(extract_blob(record, offset, len)?)?)
}

/// Compiles `formula` and stores the result as in [`write_blob`].
pub fn write_formula<F>(
    record: &mut Record,
    offset: usize,
    old_len: usize,
    formula: &str,
    codecs: &Codecs,
    set_len: F,
) -> Result<()>
where
    F: FnOnce(&mut Record, usize) -> Result<()>,
{
    let bytes = codecs.formulas()?.compile(formula)?;
    write_blob(record, offset, old_len, &bytes, set_len)
}
