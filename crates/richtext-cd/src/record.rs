//! Owned record buffers.
//!
//! A [`Record`] owns `header + fixed + variable` bytes and the schema of the
//! fixed region. Every change to the variable region rewrites the header's
//! length subfield, so the declared total always equals the buffer length.
//! Reallocations bump the record's generation; [`ByteWindow`]s taken before
//! then fail to resolve.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use richtext_cd_buffers::{print_octets_default, BufferError, ByteWindow};
use serde_json::{json, Map};

use crate::config::RecordConfig;
use crate::enums::{CdEnum, EnumValue};
use crate::error::{RecordError, Result};
use crate::schema::Schema;
use crate::signature::{HeaderKind, Signature};
use crate::value::Value;
use crate::view::{StructView, StructViewMut};

pub struct Record {
    buf: Vec<u8>,
    kind: HeaderKind,
    type_value: u16,
    schema: Arc<Schema>,
    generation: u64,
    max_len: u32,
}

impl Record {
    /// Wraps an existing buffer using the default checks.
    pub fn wrap(buf: Vec<u8>, schema: Arc<Schema>) -> Result<Record> {
        Record::wrap_with(buf, schema, &RecordConfig::default())
    }

    /// Wraps an existing buffer.
    ///
    /// The header shape always comes from the buffer. A buffer shorter than
    /// the fixed region is accepted; the fields it cannot hold fail when
    /// accessed.
    pub fn wrap_with(buf: Vec<u8>, schema: Arc<Schema>, config: &RecordConfig) -> Result<Record> {
        let expected = schema
            .signature()
            .ok_or(RecordError::NotARecordSchema(schema.name()))?;
        let sig = Signature::read(&buf)?;
        if config.check_signature && (sig.kind != expected.kind || sig.type_value != expected.type_value) {
            return Err(RecordError::SignatureMismatch {
                schema: schema.name(),
                expected: expected.type_value,
                expected_kind: expected.kind,
                found: sig.type_value,
                found_kind: sig.kind,
            });
        }
        if config.validate_header_length && sig.total_len as usize != buf.len() {
            return Err(RecordError::LengthMismatch {
                declared: sig.total_len as usize,
                actual: buf.len(),
            });
        }
        Ok(Record {
            buf,
            kind: sig.kind,
            type_value: sig.type_value,
            schema,
            generation: 0,
            max_len: config.max_record_length,
        })
    }

    /// Allocates a zero-filled record with an empty variable region.
    pub fn allocate(schema: Arc<Schema>) -> Result<Record> {
        Record::allocate_with(schema, &RecordConfig::default())
    }

    pub fn allocate_with(schema: Arc<Schema>, config: &RecordConfig) -> Result<Record> {
        let sig = schema
            .signature()
            .ok_or(RecordError::NotARecordSchema(schema.name()))?;
        let total = sig.kind.header_len() + schema.size();
        check_total(sig.kind, total as u64, config.max_record_length)?;
        let mut buf = vec![0u8; total];
        Signature::write(&mut buf, sig.kind, sig.type_value, total as u64)?;
        tracing::debug!(schema = schema.name(), total, "allocated record");
        Ok(Record {
            buf,
            kind: sig.kind,
            type_value: sig.type_value,
            schema,
            generation: 0,
            max_len: config.max_record_length,
        })
    }

    /// Header as currently stored in the buffer.
    pub fn signature(&self) -> Result<Signature> {
        Signature::read(&self.buf)
    }

    pub fn kind(&self) -> HeaderKind {
        self.kind
    }

    pub fn type_value(&self) -> u16 {
        self.type_value
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn header_len(&self) -> usize {
        self.kind.header_len()
    }

    /// Total length in bytes, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Hands the buffer back to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Incremented whenever the buffer is reallocated.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn fixed_size(&self) -> usize {
        self.schema.size()
    }

    /// Fixed region, cut short if the buffer is.
    pub fn fixed_data(&self) -> &[u8] {
        let start = self.header_len().min(self.buf.len());
        let end = self.variable_offset().min(self.buf.len());
        &self.buf[start..end]
    }

    pub fn fixed_data_mut(&mut self) -> &mut [u8] {
        let start = self.header_len().min(self.buf.len());
        let end = self.variable_offset().min(self.buf.len());
        &mut self.buf[start..end]
    }

    /// Offset of the variable region from the start of the buffer.
    pub fn variable_offset(&self) -> usize {
        self.header_len() + self.fixed_size()
    }

    pub fn variable_len(&self) -> usize {
        self.buf.len().saturating_sub(self.variable_offset())
    }

    pub fn variable_data(&self) -> &[u8] {
        let start = self.variable_offset().min(self.buf.len());
        &self.buf[start..]
    }

    pub fn variable_data_mut(&mut self) -> &mut [u8] {
        let start = self.variable_offset().min(self.buf.len());
        &mut self.buf[start..]
    }

    /// Window over `size` bytes at `start`, tagged with the current generation.
    pub fn window(&self, start: usize, size: usize) -> Result<ByteWindow> {
        ByteWindow::new(0, self.buf.len(), self.generation)
            .sub(start, size)
            .map_err(RecordError::from)
    }

    /// Window over the whole variable region.
    pub fn variable_window(&self) -> ByteWindow {
        ByteWindow::new(self.variable_offset().min(self.buf.len()), self.variable_len(), self.generation)
    }

    pub fn resolve(&self, window: &ByteWindow) -> Result<&[u8]> {
        Ok(window.as_slice(&self.buf, self.generation)?)
    }

    pub fn resolve_mut(&mut self, window: &ByteWindow) -> Result<&mut [u8]> {
        Ok(window.as_mut_slice(&mut self.buf, self.generation)?)
    }

    /// Sets the variable region to `new_len` bytes.
    ///
    /// Existing bytes up to the shorter of the two lengths are kept, new bytes
    /// are zero. The header length is rewritten even when nothing moved.
    pub fn resize_variable_data(&mut self, new_len: usize) -> Result<()> {
        let old_len = self.variable_len();
        let total = self.variable_offset() + new_len;
        check_total(self.kind, total as u64, self.max_len)?;
        if total != self.buf.len() {
            self.buf.resize(total, 0);
            self.generation += 1;
        }
        Signature::write_length(&mut self.buf, self.kind, total as u64)?;
        tracing::debug!(
            old_len,
            new_len,
            total,
            generation = self.generation,
            "resized variable data"
        );
        Ok(())
    }

    /// Grows or shrinks the variable region by `delta` bytes.
    pub fn adjust_variable_data(&mut self, delta: isize) -> Result<()> {
        let current = self.variable_len();
        let new_len = if delta < 0 {
            current
                .checked_sub(delta.unsigned_abs())
                .ok_or(RecordError::NegativeLength {
                    shrink: delta.unsigned_abs(),
                    available: current,
                })?
        } else {
            current + delta as usize
        };
        self.resize_variable_data(new_len)
    }

    /// Replaces the `old_len` bytes at `start` (relative to the variable
    /// region) with a section of `new_len` bytes.
    ///
    /// Bytes before `start` stay put, bytes after the old section move to
    /// follow the new one. The first `min(old_len, new_len)` bytes of the
    /// section are kept and any added bytes are zero.
    pub fn splice_variable_data(&mut self, start: usize, old_len: usize, new_len: usize) -> Result<()> {
        let base = self.variable_offset();
        if self.buf.len() < base {
            return Err(BufferError::EndOfBuffer {
                offset: self.buf.len(),
                wanted: base - self.buf.len(),
                available: 0,
            }
            .into());
        }
        let var_len = self.variable_len();
        let end = start.checked_add(old_len).ok_or(RecordError::SectionOutOfBounds {
            start,
            end: usize::MAX,
            len: var_len,
        })?;
        if end > var_len {
            return Err(RecordError::SectionOutOfBounds { start, end, len: var_len });
        }
        let total = base + var_len - old_len + new_len;
        check_total(self.kind, total as u64, self.max_len)?;
        if new_len > old_len {
            let at = base + end;
            self.buf.splice(at..at, std::iter::repeat(0u8).take(new_len - old_len));
        } else if new_len < old_len {
            self.buf.drain(base + start + new_len..base + end);
        }
        if new_len != old_len {
            self.generation += 1;
        }
        Signature::write_length(&mut self.buf, self.kind, total as u64)?;
        tracing::debug!(
            start,
            old_len,
            new_len,
            total,
            generation = self.generation,
            "spliced variable data"
        );
        Ok(())
    }

    /// Copy of the bytes and generation, for [`Record::restore`].
    pub(crate) fn snapshot(&self) -> (Vec<u8>, u64) {
        (self.buf.clone(), self.generation)
    }

    pub(crate) fn restore(&mut self, (buf, generation): (Vec<u8>, u64)) {
        self.buf = buf;
        self.generation = generation;
    }

    pub fn view(&self) -> StructView<'_> {
        StructView::new(self.fixed_data(), &self.schema)
    }

    pub fn view_mut(&mut self) -> StructViewMut<'_> {
        let start = self.header_len().min(self.buf.len());
        let end = self.variable_offset().min(self.buf.len());
        StructViewMut::new(&mut self.buf[start..end], &self.schema)
    }

    pub fn get(&self, name: &str) -> Result<Value> {
        self.view().get(name)
    }

    pub fn set(&mut self, name: &str, value: &Value) -> Result<()> {
        self.view_mut().set(name, value)
    }

    pub fn get_raw(&self, name: &str) -> Result<u64> {
        self.view().get_raw(name)
    }

    pub fn set_raw(&mut self, name: &str, raw: u64) -> Result<()> {
        self.view_mut().set_raw(name, raw)
    }

    /// Reads a length-style field as `usize`.
    pub fn get_len(&self, name: &str) -> Result<usize> {
        let raw = self.get_raw(name)?;
        usize::try_from(raw).map_err(|_| RecordError::ValueOutOfRange {
            field: name.to_string(),
            value: raw.to_string(),
        })
    }

    pub fn get_enum<E: CdEnum>(&self, name: &str) -> Result<Option<E>> {
        self.view().get_enum(name)
    }

    pub fn get_enum_value<E: CdEnum>(&self, name: &str) -> Result<EnumValue<E>> {
        self.view().get_enum_value(name)
    }

    pub fn get_flags<E: CdEnum>(&self, name: &str) -> Result<BTreeSet<E>> {
        self.view().get_flags(name)
    }

    pub fn set_enum<E: CdEnum>(&mut self, name: &str, value: E) -> Result<()> {
        self.view_mut().set_enum(name, value)
    }

    pub fn set_flags<E: CdEnum>(&mut self, name: &str, values: impl IntoIterator<Item = E>) -> Result<()> {
        self.view_mut().set_flags(name, values)
    }

    pub fn nested(&self, name: &str) -> Result<StructView<'_>> {
        self.view().nested(name)
    }

    /// Header and every fixed field as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let sig = self.signature()?;
        let mut fields = Map::new();
        for field in self.schema.fields() {
            fields.insert(field.name.to_string(), self.get(field.name)?.to_json());
        }
        Ok(json!({
            "schema": self.schema.name(),
            "signature": sig,
            "fields": fields,
            "variable_len": self.variable_len(),
        }))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("schema", &self.schema.name())
            .field("kind", &self.kind)
            .field("type_value", &format_args!("{:#06x}", self.type_value))
            .field("len", &self.buf.len())
            .field("generation", &self.generation)
            .field("bytes", &print_octets_default(&self.buf))
            .finish()
    }
}

fn check_total(kind: HeaderKind, total: u64, max_len: u32) -> Result<()> {
    let max = kind.max_total_len().min(u64::from(max_len));
    if total > max {
        return Err(RecordError::HeaderOverflow { kind, total, max });
    }
    Ok(())
}

impl From<Record> for Vec<u8> {
    fn from(record: Record) -> Self {
        record.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IntWidth;

    fn schema(kind: HeaderKind, constant: u16) -> Arc<Schema> {
        Schema::record("TEST", kind, constant)
            .u16("flags")
            .int("count", IntWidth::W2, false)
            .build()
            .unwrap()
    }

    #[test]
    fn allocate_writes_header() {
        let record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        assert_eq!(record.as_bytes(), &[0x40, 0xFF, 8, 0, 0, 0, 0, 0]);
        assert_eq!(record.variable_len(), 0);
        let sig = record.signature().unwrap();
        assert_eq!(sig.total_len, 8);
        assert_eq!(sig.type_value, 0xFF40);
    }

    #[test]
    fn allocate_requires_signature() {
        let plain = Schema::structure("PLAIN").u8("a").build().unwrap();
        assert_eq!(
            Record::allocate(plain).unwrap_err(),
            RecordError::NotARecordSchema("PLAIN")
        );
    }

    #[test]
    fn wrap_checks_length_and_signature() {
        let schema = schema(HeaderKind::Byte, 0x6D);
        let good = vec![0x6D, 6, 1, 0, 2, 0];
        assert!(Record::wrap(good.clone(), schema.clone()).is_ok());

        let mut long = good.clone();
        long.push(0);
        assert!(matches!(
            Record::wrap(long.clone(), schema.clone()),
            Err(RecordError::LengthMismatch { declared: 6, actual: 7 })
        ));
        assert!(Record::wrap_with(long, schema.clone(), &RecordConfig::lenient()).is_ok());

        let other = vec![0x6E, 6, 1, 0, 2, 0];
        assert!(matches!(
            Record::wrap(other, schema),
            Err(RecordError::SignatureMismatch { found: 0x6E, .. })
        ));
    }

    #[test]
    fn resize_keeps_fixed_region_and_patches_header() {
        for (kind, constant) in [
            (HeaderKind::Byte, 0x6D),
            (HeaderKind::Word, 0xFF40),
            (HeaderKind::Long, 0x0063),
        ] {
            let mut record = Record::allocate(schema(kind, constant)).unwrap();
            record.set_raw("flags", 0xBEEF).unwrap();
            record.set_raw("count", 7).unwrap();
            let fixed = record.fixed_data().to_vec();

            record.resize_variable_data(10).unwrap();
            assert_eq!(record.fixed_data(), &fixed[..]);
            assert_eq!(record.variable_data(), &[0; 10]);
            assert_eq!(record.signature().unwrap().total_len as usize, record.len());
            assert_eq!(record.len(), kind.header_len() + 4 + 10);

            record.variable_data_mut()[0] = 0xAA;
            record.resize_variable_data(3).unwrap();
            assert_eq!(record.variable_data(), &[0xAA, 0, 0]);
            assert_eq!(record.fixed_data(), &fixed[..]);
            assert_eq!(record.signature().unwrap().total_len, (kind.header_len() + 7) as u32);
        }
    }

    #[test]
    fn resize_to_same_length_keeps_generation() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.resize_variable_data(4).unwrap();
        let generation = record.generation();
        let bytes = record.as_bytes().to_vec();
        record.resize_variable_data(4).unwrap();
        assert_eq!(record.generation(), generation);
        assert_eq!(record.as_bytes(), &bytes[..]);
    }

    #[test]
    fn negative_adjust_is_rejected_before_mutation() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.resize_variable_data(2).unwrap();
        let before = record.as_bytes().to_vec();
        assert_eq!(
            record.adjust_variable_data(-3),
            Err(RecordError::NegativeLength { shrink: 3, available: 2 })
        );
        assert_eq!(record.as_bytes(), &before[..]);
        record.adjust_variable_data(-2).unwrap();
        assert_eq!(record.variable_len(), 0);
    }

    #[test]
    fn byte_header_cannot_grow_past_254() {
        let mut record = Record::allocate(schema(HeaderKind::Byte, 0x6D)).unwrap();
        record.resize_variable_data(248).unwrap();
        assert_eq!(record.len(), 254);
        let before = record.as_bytes().to_vec();
        assert!(matches!(
            record.resize_variable_data(249),
            Err(RecordError::HeaderOverflow { total: 255, max: 254, .. })
        ));
        assert_eq!(record.as_bytes(), &before[..]);
    }

    #[test]
    fn max_record_length_caps_resize() {
        let config = RecordConfig {
            max_record_length: 16,
            ..RecordConfig::default()
        };
        let mut record = Record::allocate_with(schema(HeaderKind::Word, 0xFF40), &config).unwrap();
        record.resize_variable_data(8).unwrap();
        assert!(record.resize_variable_data(9).is_err());
    }

    #[test]
    fn splice_shifts_tail() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.resize_variable_data(5).unwrap();
        record.variable_data_mut().copy_from_slice(b"abXYZ");

        record.splice_variable_data(2, 0, 2).unwrap();
        assert_eq!(record.variable_data(), b"ab\0\0XYZ");
        record.splice_variable_data(0, 2, 1).unwrap();
        assert_eq!(record.variable_data(), b"a\0\0XYZ");
        assert_eq!(record.signature().unwrap().total_len as usize, record.len());

        assert_eq!(
            record.splice_variable_data(5, 2, 0),
            Err(RecordError::SectionOutOfBounds { start: 5, end: 7, len: 6 })
        );
    }

    #[test]
    fn stale_window_fails_fast() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.resize_variable_data(4).unwrap();
        let window = record.variable_window();
        assert_eq!(record.resolve(&window).unwrap(), &[0; 4]);
        record.resize_variable_data(6).unwrap();
        assert!(matches!(
            record.resolve(&window),
            Err(RecordError::Buffer(BufferError::StaleWindow { .. }))
        ));
        let fresh = record.variable_window();
        record.resolve_mut(&fresh).unwrap()[5] = 9;
        assert_eq!(record.variable_data()[5], 9);
    }

    #[test]
    fn short_buffer_fails_per_field() {
        let schema = schema(HeaderKind::Byte, 0x6D);
        let record = Record::wrap(vec![0x6D, 4, 1, 0], schema).unwrap();
        assert_eq!(record.get_raw("flags").unwrap(), 1);
        assert!(matches!(record.get_raw("count"), Err(RecordError::Buffer(_))));
        assert_eq!(record.variable_len(), 0);
    }

    #[test]
    fn splice_on_short_buffer_fails_untouched() {
        let schema = schema(HeaderKind::Byte, 0x6D);
        let mut record = Record::wrap(vec![0x6D, 4, 1, 0], schema).unwrap();
        assert!(matches!(
            record.splice_variable_data(0, 0, 1),
            Err(RecordError::Buffer(BufferError::EndOfBuffer { offset: 4, wanted: 2, .. }))
        ));
        assert_eq!(record.as_bytes(), &[0x6D, 4, 1, 0]);
        assert_eq!(record.generation(), 0);
    }

    #[test]
    fn splice_section_end_overflow() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.resize_variable_data(2).unwrap();
        let before = record.as_bytes().to_vec();
        assert!(matches!(
            record.splice_variable_data(usize::MAX, 2, 0),
            Err(RecordError::SectionOutOfBounds { end: usize::MAX, len: 2, .. })
        ));
        assert_eq!(record.as_bytes(), before.as_slice());
    }

    #[test]
    fn json_and_debug() {
        let mut record = Record::allocate(schema(HeaderKind::Word, 0xFF40)).unwrap();
        record.set_raw("count", 3).unwrap();
        let json = record.to_json().unwrap();
        assert_eq!(json["fields"]["count"], 3);
        assert_eq!(json["signature"]["kind"], "Word");
        let debug = format!("{record:?}");
        assert!(debug.contains("40 ff 08 00"));
    }
}
