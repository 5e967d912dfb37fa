//! Little-endian buffer reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader that reads little-endian data from a byte slice.
///
/// The reader maintains a cursor position and an exclusive end position.
/// Reads past `end` fail with [`BufferError::EndOfBuffer`] and leave the
/// cursor where it was.
///
/// # Example
///
/// ```
/// use richtext_cd_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8().unwrap(), 0x01);
/// assert_eq!(reader.u16().unwrap(), 0x0302);
/// assert!(reader.u16().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
    /// End position (exclusive).
    pub end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        let end = uint8.len();
        Self { uint8, x: 0, end }
    }

    /// Creates a reader with custom start and end positions.
    ///
    /// `end` is clamped to the slice length so a corrupt length can never
    /// push reads past the physical buffer.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        let end = end.min(uint8.len());
        Self {
            uint8,
            x: x.min(end),
            end,
        }
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    fn check(&self, wanted: usize) -> Result<(), BufferError> {
        if wanted > self.size() {
            return Err(BufferError::EndOfBuffer {
                offset: self.x,
                wanted,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let bin = &self.uint8[self.x..self.x + size];
        self.x += size;
        Ok(bin)
    }

    /// Creates a new reader over the next `size` bytes and advances past them.
    pub fn cut(&mut self, size: usize) -> Result<Reader<'a>, BufferError> {
        self.check(size)?;
        let slice = Reader::from_slice(self.uint8, self.x, self.x + size);
        self.x += size;
        Ok(slice)
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N], BufferError> {
        self.check(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.uint8[self.x..self.x + N]);
        self.x += N;
        Ok(out)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        Ok(self.array::<1>()?[0])
    }

    /// Reads a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self) -> Result<i8, BufferError> {
        Ok(self.array::<1>()?[0] as i8)
    }

    /// Reads an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self) -> Result<u16, BufferError> {
        self.array().map(u16::from_le_bytes)
    }

    /// Reads a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self) -> Result<i16, BufferError> {
        self.array().map(i16::from_le_bytes)
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.array().map(u32::from_le_bytes)
    }

    /// Reads a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.array().map(i32::from_le_bytes)
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.array().map(u64::from_le_bytes)
    }

    /// Reads a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.array().map(i64::from_le_bytes)
    }

    /// Reads an unsigned integer of `width` bytes (1, 2, 4 or 8) zero-extended to `u64`.
    pub fn uint(&mut self, width: usize) -> Result<u64, BufferError> {
        match width {
            1 => self.u8().map(u64::from),
            2 => self.u16().map(u64::from),
            4 => self.u32().map(u64::from),
            _ => self.u64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u8(), Ok(0x01));
        assert_eq!(reader.u8(), Ok(0x02));
        assert_eq!(reader.u8(), Ok(0x03));
        assert!(reader.u8().is_err());
    }

    #[test]
    fn test_u16_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u16(), Ok(0x0201));
        assert_eq!(reader.u16(), Ok(0x0403));
    }

    #[test]
    fn test_u32_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.u32(), Ok(0x04030201));
    }

    #[test]
    fn test_short_read_keeps_cursor() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = Reader::new(&data);
        reader.skip(2).unwrap();
        assert_eq!(
            reader.u16(),
            Err(BufferError::EndOfBuffer {
                offset: 2,
                wanted: 2,
                available: 1
            })
        );
        assert_eq!(reader.x, 2);
        assert_eq!(reader.u8(), Ok(0x03));
    }

    #[test]
    fn test_from_slice_clamps_end() {
        let data = [0x01, 0x02, 0x03];
        let reader = Reader::from_slice(&data, 1, 100);
        assert_eq!(reader.size(), 2);
    }

    #[test]
    fn test_cut() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut reader = Reader::new(&data);
        reader.skip(1).unwrap();
        let mut cut = reader.cut(2).unwrap();
        assert_eq!(cut.u16(), Ok(0x0302));
        assert!(cut.u8().is_err());
        assert_eq!(reader.u8(), Ok(0x04));
    }

    #[test]
    fn test_uint_widths() {
        let data = [0xff; 8];
        assert_eq!(Reader::new(&data).uint(1), Ok(0xff));
        assert_eq!(Reader::new(&data).uint(2), Ok(0xffff));
        assert_eq!(Reader::new(&data).uint(4), Ok(0xffff_ffff));
        assert_eq!(Reader::new(&data).uint(8), Ok(u64::MAX));
    }
}
