//! Common codec trait and error.

use langnet_schema::SchemaError;

use crate::{DecodeError, EncodingFormat, Message};

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
    #[error("message type `{actual}` is not registered with this codec's registry")]
    ForeignMessage { actual: String },
}

/// A codec that encodes and decodes [`Message`]s in one format.
pub trait MessageCodec {
    fn id(&self) -> &'static str;
    fn format(&self) -> EncodingFormat;
    fn encode(&mut self, message: &Message) -> Result<Vec<u8>, CodecError>;
    fn decode(&mut self, bytes: &[u8], type_name: &str) -> Result<Message, CodecError>;
}
