//! Typed views over schema-driven messages.

use langnet_codec::{BinaryDecoder, BinaryEncoder, JsonDecoder, JsonEncoder, Message};
use langnet_schema::Registry;

use crate::RecordError;

/// A plain Rust struct mirroring one message type of the registry.
///
/// Conversion goes through [`Message`], so typed records encode and decode
/// with exactly the bytes and JSON the dynamic value model produces. Unknown
/// fields are not carried by typed records; decode into a [`Message`] to
/// keep them.
pub trait Record: Sized {
    /// Fully qualified message type name.
    const TYPE_NAME: &'static str;

    fn write_fields(&self, message: &mut Message) -> Result<(), RecordError>;

    fn read_fields(message: &Message) -> Result<Self, RecordError>;

    fn to_message(&self, registry: &Registry) -> Result<Message, RecordError> {
        let mut message = Message::new(registry, Self::TYPE_NAME)?;
        self.write_fields(&mut message)?;
        Ok(message)
    }

    fn from_message(message: &Message) -> Result<Self, RecordError> {
        if message.type_name() != Self::TYPE_NAME {
            return Err(RecordError::WrongType {
                expected: Self::TYPE_NAME,
                actual: message.type_name().to_owned(),
            });
        }
        Self::read_fields(message)
    }

    fn encode_binary(&self, registry: &Registry) -> Result<Vec<u8>, RecordError> {
        Ok(BinaryEncoder::new().encode(&self.to_message(registry)?))
    }

    /// Compact camelCase JSON.
    fn encode_json(&self, registry: &Registry) -> Result<String, RecordError> {
        Ok(JsonEncoder::new().encode(&self.to_message(registry)?))
    }

    fn decode_binary(registry: &Registry, data: &[u8]) -> Result<Self, RecordError> {
        let message = BinaryDecoder::new().decode(registry, Self::TYPE_NAME, data)?;
        Self::read_fields(&message)
    }

    fn decode_json(registry: &Registry, text: &str) -> Result<Self, RecordError> {
        let message = JsonDecoder::new().decode(registry, Self::TYPE_NAME, text)?;
        Self::read_fields(&message)
    }
}

/// Declares a record struct with public fields and its [`Record`] impl.
///
/// Every field type must implement [`crate::Field`].
macro_rules! record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident = $type_name:path {
            $(
                $(#[$field_meta:meta])*
                $tag:literal => pub $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::Record for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn write_fields(
                &self,
                message: &mut ::langnet_codec::Message,
            ) -> Result<(), $crate::RecordError> {
                $( $crate::Field::write(&self.$field, message, $tag)?; )*
                Ok(())
            }

            fn read_fields(
                message: &::langnet_codec::Message,
            ) -> Result<Self, $crate::RecordError> {
                Ok(Self {
                    $( $field: $crate::Field::read(message, $tag)?, )*
                })
            }
        }
    };
}

pub(crate) use record;
