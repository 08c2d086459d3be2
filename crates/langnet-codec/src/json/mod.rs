//! JSON mapping.
//!
//! A message is an object keyed by field name. Values map as follows:
//!
//! | field type                         | JSON                                   |
//! |------------------------------------|----------------------------------------|
//! | bool                               | `true` / `false`                       |
//! | 32-bit integers                    | number                                 |
//! | 64-bit integers                    | decimal string, e.g. `"-42"`           |
//! | float, double                      | number, or `"NaN"`, `"Infinity"`, `"-Infinity"` |
//! | string                             | string                                 |
//! | bytes                              | standard base64 string                 |
//! | enum                               | symbolic name, or number when unknown  |
//! | message                            | object                                 |
//! | repeated                           | array                                  |
//! | map                                | object with stringified keys           |
//!
//! Keys are written in ascending tag order. The decoder accepts either the
//! declared or the camelCase name, numbers or strings for any integer,
//! names or numbers for enums, and `null` as "absent". Unknown fields kept
//! from binary input have no JSON form and are not written.

mod decoder;
mod encoder;

pub use decoder::JsonDecoder;
pub use encoder::JsonEncoder;

pub(crate) const NAN: &str = "NaN";
pub(crate) const INFINITY: &str = "Infinity";
pub(crate) const NEG_INFINITY: &str = "-Infinity";
