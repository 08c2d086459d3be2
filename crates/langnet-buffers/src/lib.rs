//! Binary buffer utilities for the LangNet wire format.
//!
//! # Overview
//!
//! - [`Reader`] - Reads wire primitives from a byte slice with cursor tracking
//! - [`Writer`] - Writes wire primitives to an auto-growing buffer
//!
//! Fixed-width values are little-endian. Variable-length integers use the
//! base-128 encoding: seven payload bits per byte, high bit set on every byte
//! except the last.
//!
//! # Example
//!
//! ```
//! use langnet_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.varint(300);
//! writer.u32(0x0102_0304);
//! writer.utf8("hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.varint().unwrap(), 300);
//! assert_eq!(reader.u32().unwrap(), 0x0102_0304);
//! assert_eq!(reader.utf8(5).unwrap(), "hello");
//! ```

mod reader;
mod varint;
mod writer;

pub use reader::Reader;
pub use varint::{varint_size, zigzag_decode32, zigzag_decode64, zigzag_encode32, zigzag_encode64};
pub use writer::Writer;

/// Maximum number of bytes a 64-bit varint can occupy.
pub const MAX_VARINT_LEN: usize = 10;

/// Error type for buffer operations.
///
/// Every variant carries the cursor position at which the read started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    #[error("end of buffer at byte {0}")]
    EndOfBuffer(usize),
    /// A varint ran longer than ten bytes or overflowed 64 bits.
    #[error("malformed varint at byte {0}")]
    MalformedVarint(usize),
    /// Invalid UTF-8 sequence.
    #[error("invalid UTF-8 sequence at byte {0}")]
    InvalidUtf8(usize),
}

impl BufferError {
    /// Byte offset at which the failing read started.
    pub fn offset(&self) -> usize {
        match *self {
            BufferError::EndOfBuffer(x)
            | BufferError::MalformedVarint(x)
            | BufferError::InvalidUtf8(x) => x,
        }
    }
}
