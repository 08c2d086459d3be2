//! Format-agnostic codec handles.
//!
//! A [`MessageCodec`] pairs an encoder and a decoder for one format with the
//! registry it resolves type names against, so callers can pick a format at
//! runtime:
//!
//! ```
//! use langnet_codec::codecs::{Codecs, MessageCodec};
//! use langnet_codec::{EncodingFormat, Message};
//! use langnet_schema::langnet;
//!
//! let registry = langnet::registry().unwrap();
//! let mut codecs = Codecs::new(registry.clone());
//!
//! let mut request = Message::new(&registry, langnet::SEARCH_REQUEST).unwrap();
//! request.set("query", "rust").unwrap();
//!
//! let codec = codecs.get(EncodingFormat::Json);
//! let text = codec.encode(&request).unwrap();
//! assert_eq!(text, br#"{"query":"rust"}"#);
//! assert_eq!(codec.decode(&text, langnet::SEARCH_REQUEST).unwrap(), request);
//! ```

mod binary;
mod json;
mod registry;
mod types;

pub use binary::BinaryMessageCodec;
pub use json::JsonMessageCodec;
pub use registry::Codecs;
pub use types::{CodecError, MessageCodec};
