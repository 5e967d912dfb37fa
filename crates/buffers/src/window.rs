//! Generation-tagged windows into a resizable buffer.

use crate::BufferError;

/// A `(start, size)` view into a buffer, stamped with the buffer's generation.
///
/// The owner of a resizable buffer bumps its generation on every
/// reallocation. A window taken before that point no longer describes the
/// same bytes, so resolving it against a newer generation fails with
/// [`BufferError::StaleWindow`] instead of silently reading shifted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteWindow {
    /// Start position of the window.
    pub start: usize,
    /// Size of the window in bytes.
    pub size: usize,
    /// Buffer generation the window was taken at.
    pub generation: u64,
}

impl ByteWindow {
    /// Creates a new window.
    pub fn new(start: usize, size: usize, generation: u64) -> Self {
        Self {
            start,
            size,
            generation,
        }
    }

    /// Exclusive end position of the window.
    pub fn end(&self) -> usize {
        self.start + self.size
    }

    /// Narrows the window to `size` bytes starting `offset` bytes into it.
    pub fn sub(&self, offset: usize, size: usize) -> Result<ByteWindow, BufferError> {
        if offset + size > self.size {
            return Err(BufferError::EndOfBuffer {
                offset: self.start + offset,
                wanted: size,
                available: self.size.saturating_sub(offset),
            });
        }
        Ok(ByteWindow::new(self.start + offset, size, self.generation))
    }

    fn validate(&self, len: usize, generation: u64) -> Result<(), BufferError> {
        if self.generation != generation {
            return Err(BufferError::StaleWindow {
                window: self.generation,
                buffer: generation,
            });
        }
        if self.end() > len {
            return Err(BufferError::EndOfBuffer {
                offset: self.start,
                wanted: self.size,
                available: len.saturating_sub(self.start),
            });
        }
        Ok(())
    }

    /// Resolves the window against `uint8`, which must be at `generation`.
    pub fn as_slice<'a>(&self, uint8: &'a [u8], generation: u64) -> Result<&'a [u8], BufferError> {
        self.validate(uint8.len(), generation)?;
        Ok(&uint8[self.start..self.end()])
    }

    /// Mutable variant of [`ByteWindow::as_slice`].
    pub fn as_mut_slice<'a>(
        &self,
        uint8: &'a mut [u8],
        generation: u64,
    ) -> Result<&'a mut [u8], BufferError> {
        self.validate(uint8.len(), generation)?;
        Ok(&mut uint8[self.start..self.end()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_resolves() {
        let data = vec![1, 2, 3, 4, 5];
        let window = ByteWindow::new(1, 3, 0);
        assert_eq!(window.as_slice(&data, 0).unwrap(), &[2, 3, 4]);
    }

    #[test]
    fn test_stale_window() {
        let data = vec![1, 2, 3, 4, 5];
        let window = ByteWindow::new(1, 3, 0);
        assert_eq!(
            window.as_slice(&data, 1),
            Err(BufferError::StaleWindow {
                window: 0,
                buffer: 1
            })
        );
    }

    #[test]
    fn test_sub_window() {
        let data = vec![1, 2, 3, 4, 5];
        let window = ByteWindow::new(1, 4, 7);
        let sub = window.sub(2, 2).unwrap();
        assert_eq!(sub.as_slice(&data, 7).unwrap(), &[4, 5]);
        assert!(window.sub(3, 2).is_err());
    }

    #[test]
    fn test_window_past_end() {
        let mut data = vec![0u8; 4];
        let window = ByteWindow::new(2, 4, 0);
        assert!(window.as_mut_slice(&mut data, 0).is_err());
    }
}
