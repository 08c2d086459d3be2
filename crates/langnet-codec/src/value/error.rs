//! Value model mutation errors.

use langnet_schema::SchemaError;
use thiserror::Error;

/// Error raised by [`super::Message`] accessors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("`{message}` has no field `{field}`")]
    NoSuchField { message: String, field: String },
    #[error("`{message}` has no oneof `{oneof}`")]
    NoSuchOneof { message: String, oneof: String },
    #[error("field `{field}` holds {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: &'static str,
    },
    #[error("field `{field}` is not {expected}")]
    WrongLabel {
        field: String,
        expected: &'static str,
    },
    #[error("map field `{field}` is keyed by {expected}, got {actual}")]
    InvalidMapKey {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}
