//! Binary codec wrapper.

use langnet_schema::Registry;

use crate::{BinaryDecoder, BinaryEncoder, BinaryOptions, EncodingFormat, Message};

use super::types::{CodecError, MessageCodec};

pub struct BinaryMessageCodec {
    pub encoder: BinaryEncoder,
    pub decoder: BinaryDecoder,
    registry: Registry,
}

impl BinaryMessageCodec {
    pub fn new(registry: Registry) -> Self {
        Self::with_options(registry, BinaryOptions::default())
    }

    pub fn with_options(registry: Registry, options: BinaryOptions) -> Self {
        Self {
            encoder: BinaryEncoder::with_options(options.clone()),
            decoder: BinaryDecoder::with_options(options),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn id(&self) -> &'static str {
        "binary"
    }

    pub fn format(&self) -> EncodingFormat {
        EncodingFormat::Binary
    }

    pub fn encode(&mut self, message: &Message) -> Result<Vec<u8>, CodecError> {
        check_registered(&self.registry, message)?;
        Ok(self.encoder.encode(message))
    }

    pub fn decode(&mut self, bytes: &[u8], type_name: &str) -> Result<Message, CodecError> {
        Ok(self.decoder.decode(&self.registry, type_name, bytes)?)
    }
}

/// Rejects messages built against a registry that does not know their type.
pub(super) fn check_registered(registry: &Registry, message: &Message) -> Result<(), CodecError> {
    if message.registry().ptr_eq(registry) || registry.contains(message.type_name()) {
        Ok(())
    } else {
        Err(CodecError::ForeignMessage {
            actual: message.type_name().to_owned(),
        })
    }
}

impl MessageCodec for BinaryMessageCodec {
    fn id(&self) -> &'static str {
        self.id()
    }

    fn format(&self) -> EncodingFormat {
        self.format()
    }

    fn encode(&mut self, message: &Message) -> Result<Vec<u8>, CodecError> {
        self.encode(message)
    }

    fn decode(&mut self, bytes: &[u8], type_name: &str) -> Result<Message, CodecError> {
        self.decode(bytes, type_name)
    }
}
