//! JSON codec wrapper.

use langnet_schema::Registry;

use crate::{EncodingFormat, JsonDecoder, JsonEncoder, JsonOptions, Message};

use super::binary::check_registered;
use super::types::{CodecError, MessageCodec};

pub struct JsonMessageCodec {
    pub encoder: JsonEncoder,
    pub decoder: JsonDecoder,
    registry: Registry,
}

impl JsonMessageCodec {
    pub fn new(registry: Registry) -> Self {
        Self::with_options(registry, JsonOptions::default())
    }

    pub fn with_options(registry: Registry, options: JsonOptions) -> Self {
        Self {
            encoder: JsonEncoder::with_options(options.clone()),
            decoder: JsonDecoder::with_options(options),
            registry,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn id(&self) -> &'static str {
        "json"
    }

    pub fn format(&self) -> EncodingFormat {
        EncodingFormat::Json
    }

    pub fn encode(&mut self, message: &Message) -> Result<Vec<u8>, CodecError> {
        check_registered(&self.registry, message)?;
        Ok(self.encoder.encode(message).into_bytes())
    }

    pub fn decode(&mut self, bytes: &[u8], type_name: &str) -> Result<Message, CodecError> {
        Ok(self.decoder.decode(&self.registry, type_name, bytes)?)
    }
}

impl MessageCodec for JsonMessageCodec {
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
