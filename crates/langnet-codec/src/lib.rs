//! Schema-driven binary and JSON codecs for LangNet records.
//!
//! Messages are built with [`Message`] against a
//! [`Registry`](langnet_schema::Registry) and written either in a compact
//! binary encoding ([`binary`]) or as JSON ([`json`]). Both decoders return
//! an instance equal to the one that was encoded.
//!
//! ```
//! use langnet_codec::{decode_binary, decode_json, encode_binary, encode_json, Message};
//! use langnet_schema::langnet;
//!
//! let registry = langnet::registry().unwrap();
//! let mut result = Message::new(&registry, langnet::SEARCH_RESULT).unwrap();
//! result.set("id", "result-1").unwrap();
//! result.insert("metadata", "lang", "en").unwrap();
//!
//! let bytes = encode_binary(&result);
//! assert_eq!(decode_binary(&registry, langnet::SEARCH_RESULT, &bytes).unwrap(), result);
//!
//! let text = encode_json(&result);
//! assert_eq!(text, r#"{"id":"result-1","metadata":{"lang":"en"}}"#);
//! assert_eq!(decode_json(&registry, langnet::SEARCH_RESULT, &text).unwrap(), result);
//! ```

mod constants;
mod error;
mod options;
mod value;

pub mod binary;
pub mod codecs;
pub mod json;

use langnet_schema::Registry;

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use constants::EncodingFormat;
pub use error::DecodeError;
pub use json::{JsonDecoder, JsonEncoder};
pub use options::{BinaryOptions, FieldNaming, JsonOptions, DEFAULT_RECURSION_LIMIT};
pub use value::{
    FieldKey, FieldValue, MapKey, MapValue, Message, UnknownField, UnknownFields, Value,
    ValueError,
};

/// Encodes `message` in the binary encoding with default options.
pub fn encode_binary(message: &Message) -> Vec<u8> {
    BinaryEncoder::new().encode(message)
}

/// Decodes binary `data` as an instance of `type_name` with default options.
pub fn decode_binary(
    registry: &Registry,
    type_name: &str,
    data: &[u8],
) -> Result<Message, DecodeError> {
    BinaryDecoder::new().decode(registry, type_name, data)
}

/// Encodes `message` as compact camelCase JSON.
pub fn encode_json(message: &Message) -> String {
    JsonEncoder::new().encode(message)
}

/// Decodes JSON `text` as an instance of `type_name` with default options.
pub fn decode_json(
    registry: &Registry,
    type_name: &str,
    text: &str,
) -> Result<Message, DecodeError> {
    JsonDecoder::new().decode(registry, type_name, text)
}
