//! Little-endian buffer utilities for rich-text CD records.
//!
//! # Overview
//!
//! - [`Reader`] - Reads little-endian data from a byte slice with cursor tracking
//! - [`Writer`] - Writes little-endian data into a fixed byte slice
//! - [`ByteWindow`] - A generation-tagged `(start, size)` view into a buffer
//!
//! Every read and write is bounds-checked and reports [`BufferError`]
//! instead of panicking: record buffers come from documents in the wild and
//! a short buffer must surface as an error for the one field being accessed.
//!
//! # Example
//!
//! ```
//! use richtext_cd_buffers::{Reader, Writer};
//!
//! let mut data = [0u8; 7];
//! let mut writer = Writer::new(&mut data);
//! writer.u8(0x01).unwrap();
//! writer.u16(0x0203).unwrap();
//! writer.u32(0x0405_0607).unwrap();
//! assert_eq!(data, [0x01, 0x03, 0x02, 0x07, 0x06, 0x05, 0x04]);
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8().unwrap(), 0x01);
//! assert_eq!(reader.u16().unwrap(), 0x0203);
//! assert_eq!(reader.u32().unwrap(), 0x0405_0607);
//! ```

mod print_octets;
mod reader;
mod window;
mod writer;

pub use print_octets::{print_octets, print_octets_default};
pub use reader::Reader;
pub use window::ByteWindow;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer {
        /// Position the access started at.
        offset: usize,
        /// Number of bytes requested.
        wanted: usize,
        /// Number of bytes actually available from `offset`.
        available: usize,
    },
    /// Attempted to write past the end of the buffer.
    Overflow {
        offset: usize,
        wanted: usize,
        available: usize,
    },
    /// A window was used after the buffer it points into was reallocated.
    StaleWindow {
        /// Generation recorded when the window was taken.
        window: u64,
        /// Current generation of the buffer.
        buffer: u64,
    },
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer {
                offset,
                wanted,
                available,
            } => write!(
                f,
                "end of buffer: wanted {wanted} bytes at offset {offset}, {available} available"
            ),
            BufferError::Overflow {
                offset,
                wanted,
                available,
            } => write!(
                f,
                "buffer overflow: writing {wanted} bytes at offset {offset}, {available} available"
            ),
            BufferError::StaleWindow { window, buffer } => write!(
                f,
                "stale window: taken at generation {window}, buffer is at generation {buffer}"
            ),
        }
    }
}

impl std::error::Error for BufferError {}
