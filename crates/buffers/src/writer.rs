//! Little-endian writer over a fixed byte slice.

use crate::BufferError;

/// Writes little-endian values into an existing byte slice.
///
/// Unlike a growable encoder, this writer never reallocates: records are
/// patched in place, and growing a record is the job of the record's buffer
/// manager. Writes that do not fit fail with [`BufferError::Overflow`] and
/// leave the slice untouched.
///
/// # Example
///
/// ```
/// use richtext_cd_buffers::Writer;
///
/// let mut data = [0u8; 4];
/// let mut writer = Writer::at(&mut data, 2);
/// writer.u16(0xBEEF).unwrap();
/// assert_eq!(data, [0x00, 0x00, 0xEF, 0xBE]);
/// ```
#[derive(Debug)]
pub struct Writer<'a> {
    /// The underlying byte slice.
    pub uint8: &'a mut [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Writer<'a> {
    /// Creates a writer positioned at the start of the slice.
    pub fn new(uint8: &'a mut [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Creates a writer positioned at `x`.
    pub fn at(uint8: &'a mut [u8], x: usize) -> Self {
        Self { uint8, x }
    }

    /// Returns the number of bytes left between the cursor and the end of the slice.
    pub fn size(&self) -> usize {
        self.uint8.len().saturating_sub(self.x)
    }

    fn check(&self, wanted: usize) -> Result<(), BufferError> {
        if wanted > self.size() {
            return Err(BufferError::Overflow {
                offset: self.x,
                wanted,
                available: self.size(),
            });
        }
        Ok(())
    }

    /// Copies `data` at the cursor and advances past it.
    pub fn buf(&mut self, data: &[u8]) -> Result<(), BufferError> {
        self.check(data.len())?;
        self.uint8[self.x..self.x + data.len()].copy_from_slice(data);
        self.x += data.len();
        Ok(())
    }

    /// Writes `length` copies of `byte`.
    pub fn fill(&mut self, byte: u8, length: usize) -> Result<(), BufferError> {
        self.check(length)?;
        self.uint8[self.x..self.x + length].fill(byte);
        self.x += length;
        Ok(())
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, value: u8) -> Result<(), BufferError> {
        self.buf(&[value])
    }

    /// Writes a signed 8-bit integer.
    #[inline]
    pub fn i8(&mut self, value: i8) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes an unsigned 16-bit integer (little-endian).
    #[inline]
    pub fn u16(&mut self, value: u16) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes a signed 16-bit integer (little-endian).
    #[inline]
    pub fn i16(&mut self, value: i16) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, value: u32) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, value: i32) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self, value: u64) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, value: i64) -> Result<(), BufferError> {
        self.buf(&value.to_le_bytes())
    }

    /// Writes the low `width` bytes (1, 2, 4 or 8) of `value`.
    pub fn uint(&mut self, width: usize, value: u64) -> Result<(), BufferError> {
        let bytes = value.to_le_bytes();
        self.buf(&bytes[..width.min(8)])
    }
}
