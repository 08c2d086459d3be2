//! Binary buffer reader with cursor tracking.

use std::str;

use crate::{BufferError, MAX_VARINT_LEN};

/// A binary buffer reader that reads wire primitives from a byte slice.
///
/// The reader maintains a cursor position and a logical end, so a nested
/// length-delimited region can be read through [`Reader::cut`] without
/// copying. Every read is bounds-checked and reports the cursor position
/// on failure.
///
/// # Example
///
/// ```
/// use langnet_buffers::Reader;
///
/// let data = [0x96, 0x01, 0x2a];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.varint().unwrap(), 150);
/// assert_eq!(reader.u8().unwrap(), 0x2a);
/// assert!(reader.u8().is_err());
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

    /// Creates a reader over `uint8[x..end]` that reports absolute offsets.
    pub fn from_slice(uint8: &'a [u8], x: usize, end: usize) -> Self {
        Self { uint8, x, end }
    }

    /// Resets the reader with a new byte slice.
    pub fn reset(&mut self, uint8: &'a [u8]) {
        self.x = 0;
        self.end = uint8.len();
        self.uint8 = uint8;
    }

    /// Returns the number of remaining bytes.
    pub fn size(&self) -> usize {
        self.end - self.x
    }

    pub fn is_empty(&self) -> bool {
        self.x >= self.end
    }

    fn assert_size(&self, n: usize) -> Result<(), BufferError> {
        if n > self.size() {
            return Err(BufferError::EndOfBuffer(self.x));
        }
        Ok(())
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.assert_size(1)?;
        Ok(self.uint8[self.x])
    }

    /// Advances the cursor by the given number of bytes.
    pub fn skip(&mut self, length: usize) -> Result<(), BufferError> {
        self.assert_size(length)?;
        self.x += length;
        Ok(())
    }

    /// Returns a subarray of the given size and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.assert_size(size)?;
        let x = self.x;
        let end = x + size;
        self.x = end;
        Ok(&self.uint8[x..end])
    }

    /// Creates a new Reader over the next `size` bytes and advances the cursor
    /// past them. The child keeps reporting offsets relative to the whole input.
    pub fn cut(&mut self, size: usize) -> Result<Reader<'a>, BufferError> {
        self.assert_size(size)?;
        let child = Reader::from_slice(self.uint8, self.x, self.x + size);
        self.x += size;
        Ok(child)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.assert_size(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        let bytes = self.buf(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        let bytes = self.buf(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    /// Reads a 32-bit floating point number (little-endian).
    #[inline]
    pub fn f32(&mut self) -> Result<f32, BufferError> {
        self.u32().map(f32::from_bits)
    }

    /// Reads a 64-bit floating point number (little-endian).
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        self.u64().map(f64::from_bits)
    }

    /// Reads a base-128 varint of at most ten bytes.
    ///
    /// The tenth byte may only contribute the single remaining bit of a
    /// 64-bit value; anything more is reported as malformed.
    pub fn varint(&mut self) -> Result<u64, BufferError> {
        let start = self.x;
        let mut result: u64 = 0;
        let mut shift = 0u32;
        for i in 0..MAX_VARINT_LEN {
            let byte = match self.u8() {
                Ok(b) => b,
                Err(_) => {
                    self.x = start;
                    return Err(BufferError::EndOfBuffer(start));
                }
            };
            if i == MAX_VARINT_LEN - 1 && byte > 0x01 {
                self.x = start;
                return Err(BufferError::MalformedVarint(start));
            }
            result |= ((byte & 0x7f) as u64) << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
        self.x = start;
        Err(BufferError::MalformedVarint(start))
    }

    /// Reads a varint length prefix followed by that many bytes.
    pub fn length_delimited(&mut self) -> Result<&'a [u8], BufferError> {
        let start = self.x;
        let len = self.varint()?;
        let len = usize::try_from(len).map_err(|_| BufferError::EndOfBuffer(start))?;
        self.buf(len)
    }

    /// Reads a UTF-8 string of the given size.
    pub fn utf8(&mut self, size: usize) -> Result<&'a str, BufferError> {
        let start = self.x;
        let bytes = self.buf(size)?;
        str::from_utf8(bytes).map_err(|_| BufferError::InvalidUtf8(start))
    }
}
