//! Compact binary encoding.
//!
//! Every field is written as a varint header `(tag << 3) | wire_kind`
//! followed by its payload:
//!
//! | wire kind | id | payload                                    |
//! |-----------|----|--------------------------------------------|
//! | varint    | 0  | base-128 varint                            |
//! | fixed64   | 1  | 8 bytes little-endian                      |
//! | length    | 2  | varint length, then that many bytes        |
//! | fixed32   | 5  | 4 bytes little-endian                      |
//!
//! Fields are written in ascending tag order, followed by any unknown fields
//! exactly as they were received. Repeated numeric, bool and enum fields are
//! packed into one length-delimited payload unless packing is switched off;
//! the decoder accepts both layouts. A map is a repeated entry message with
//! the key at tag 1 and the value at tag 2.

mod decoder;
mod encoder;

pub use decoder::BinaryDecoder;
pub use encoder::BinaryEncoder;

pub(crate) fn header(number: u32, wire: u8) -> u64 {
    ((number as u64) << 3) | wire as u64
}
