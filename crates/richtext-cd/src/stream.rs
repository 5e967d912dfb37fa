//! Splitting and building composite record streams.
//!
//! A stream is a run of records, each followed by one pad byte when its
//! length is odd so the next record starts on an even offset.

use crate::error::{RecordError, Result};
use crate::record::Record;
use crate::signature::Signature;

/// Iterator over the records of a stream.
///
/// A corrupt length yields one error and ends the iteration.
#[derive(Debug, Clone)]
pub struct CdStream<'a> {
    uint8: &'a [u8],
    x: usize,
    failed: bool,
}

impl<'a> CdStream<'a> {
    pub fn new(uint8: &'a [u8]) -> Self {
        Self {
            uint8,
            x: 0,
            failed: false,
        }
    }

    /// Offset of the next record.
    pub fn position(&self) -> usize {
        self.x
    }

    fn next_record(&mut self) -> Result<(Signature, &'a [u8])> {
        let rest = &self.uint8[self.x..];
        let sig = Signature::read(rest)?;
        let total = sig.total_len as usize;
        if total < sig.header_len() {
            return Err(RecordError::TruncatedHeader {
                kind: sig.kind,
                len: total,
            });
        }
        if total > rest.len() {
            tracing::warn!(
                offset = self.x,
                declared = total,
                available = rest.len(),
                "record runs past end of stream"
            );
            return Err(RecordError::LengthMismatch {
                declared: total,
                actual: rest.len(),
            });
        }
        let record = &rest[..total];
        self.x += total + (total & 1);
        self.x = self.x.min(self.uint8.len());
        Ok((sig, record))
    }
}

impl<'a> Iterator for CdStream<'a> {
    type Item = Result<(Signature, &'a [u8])>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.x >= self.uint8.len() {
            return None;
        }
        let item = self.next_record();
        self.failed = item.is_err();
        Some(item)
    }
}

/// Builds a stream from records.
#[derive(Debug, Clone, Default)]
pub struct CdStreamWriter {
    uint8: Vec<u8>,
}

impl CdStreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record's bytes after checking its header.
    pub fn push_bytes(&mut self, record: &[u8]) -> Result<()> {
        let sig = Signature::read(record)?;
        if sig.total_len as usize != record.len() {
            return Err(RecordError::LengthMismatch {
                declared: sig.total_len as usize,
                actual: record.len(),
            });
        }
        self.uint8.extend_from_slice(record);
        if record.len() % 2 == 1 {
            self.uint8.push(0);
        }
        Ok(())
    }

    pub fn push(&mut self, record: &Record) -> Result<()> {
        self.push_bytes(record.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.uint8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::HeaderKind;

    #[test]
    fn splits_with_padding() {
        let mut writer = CdStreamWriter::new();
        writer.push_bytes(&[0x6D, 3, 9]).unwrap();
        writer.push_bytes(&[0x70, 0xFF, 5, 0, b'x']).unwrap();
        writer.push_bytes(&[0x6F, 2]).unwrap();
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 4 + 6 + 2);

        let records: Vec<_> = CdStream::new(&bytes).collect::<Result<_>>().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].0.kind, HeaderKind::Byte);
        assert_eq!(records[0].1, &[0x6D, 3, 9]);
        assert_eq!(records[1].0.type_value, 0xFF70);
        assert_eq!(records[1].1, &[0x70, 0xFF, 5, 0, b'x']);
        assert_eq!(records[2].1, &[0x6F, 2]);
    }

    #[test]
    fn overrun_errors_once() {
        let bytes = [0x6D, 2, 0x70, 0xFF, 9, 0];
        let mut stream = CdStream::new(&bytes);
        assert!(stream.next().unwrap().is_ok());
        assert!(matches!(
            stream.next(),
            Some(Err(RecordError::LengthMismatch { declared: 9, actual: 4 }))
        ));
        assert!(stream.next().is_none());
    }

    #[test]
    fn declared_length_below_header() {
        let bytes = [0x70, 0xFF, 2, 0];
        let mut stream = CdStream::new(&bytes);
        assert!(matches!(stream.next(), Some(Err(RecordError::TruncatedHeader { .. }))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn writer_rejects_bad_length() {
        let mut writer = CdStreamWriter::new();
        assert!(writer.push_bytes(&[0x6D, 4, 0]).is_err());
        assert!(writer.is_empty());
    }
}
