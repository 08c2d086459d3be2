//! Aggregate codec holder.

use langnet_schema::Registry;

use super::{BinaryMessageCodec, JsonMessageCodec, MessageCodec};
use crate::EncodingFormat;

pub struct Codecs {
    pub binary: BinaryMessageCodec,
    pub json: JsonMessageCodec,
}

impl Codecs {
    pub fn new(registry: Registry) -> Self {
        Self {
            binary: BinaryMessageCodec::new(registry.clone()),
            json: JsonMessageCodec::new(registry),
        }
    }

    /// The codec for `format`.
    pub fn get(&mut self, format: EncodingFormat) -> &mut dyn MessageCodec {
        match format {
            EncodingFormat::Binary => &mut self.binary,
            EncodingFormat::Json => &mut self.json,
        }
    }
}
