//! Auto-growing binary buffer writer.

/// A binary buffer writer that appends wire primitives to a growable buffer.
///
/// # Example
///
/// ```
/// use langnet_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.varint(150);
/// assert_eq!(writer.flush(), vec![0x96, 0x01]);
/// assert!(writer.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    /// Bytes written so far.
    pub uint8: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            uint8: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written since the last flush or reset.
    pub fn len(&self) -> usize {
        self.uint8.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uint8.is_empty()
    }

    /// Ensures at least `capacity` more bytes can be written without reallocating.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        self.uint8.reserve(capacity);
    }

    /// Discards everything written so far.
    pub fn reset(&mut self) {
        self.uint8.clear();
    }

    /// Returns the written bytes and leaves the writer empty.
    pub fn flush(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.uint8)
    }

    /// Returns a view of the written bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.uint8
    }

    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes an unsigned 32-bit integer (little-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_le_bytes());
    }

    #[inline]
    pub fn f32(&mut self, val: f32) {
        self.u32(val.to_bits());
    }

    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.u64(val.to_bits());
    }

    /// Writes a base-128 varint.
    #[inline]
    pub fn varint(&mut self, mut val: u64) {
        while val >= 0x80 {
            self.uint8.push((val as u8) | 0x80);
            val >>= 7;
        }
        self.uint8.push(val as u8);
    }

    /// Writes raw bytes.
    pub fn buf(&mut self, buf: &[u8]) {
        self.uint8.extend_from_slice(buf);
    }

    /// Writes the UTF-8 bytes of `s` without a length prefix.
    pub fn utf8(&mut self, s: &str) {
        self.uint8.extend_from_slice(s.as_bytes());
    }

    /// Writes a varint length prefix followed by the bytes.
    pub fn length_delimited(&mut self, buf: &[u8]) {
        self.varint(buf.len() as u64);
        self.buf(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint() {
        let mut w = Writer::new();
        w.varint(0);
        w.varint(1);
        w.varint(300);
        assert_eq!(w.flush(), vec![0x00, 0x01, 0xac, 0x02]);

        w.varint(u64::MAX);
        assert_eq!(
            w.flush(),
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01]
        );
    }

    #[test]
    fn test_fixed_little_endian() {
        let mut w = Writer::new();
        w.u32(0x01020304);
        w.u64(1);
        assert_eq!(w.flush(), vec![4, 3, 2, 1, 1, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_length_delimited() {
        let mut w = Writer::new();
        w.length_delimited(b"abc");
        assert_eq!(w.as_slice(), &[3, b'a', b'b', b'c']);
        w.reset();
        assert!(w.is_empty());
    }
}
