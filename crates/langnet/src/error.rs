use langnet_codec::{DecodeError, ValueError};
use langnet_schema::SchemaError;
use thiserror::Error;

/// Error raised when converting between typed records and messages.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected a `{expected}` message, got `{actual}`")]
    WrongType {
        expected: &'static str,
        actual: String,
    },
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
