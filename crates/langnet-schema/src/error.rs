//! Schema registration and lookup errors.

use thiserror::Error;

/// Error raised while building a [`crate::Registry`] or resolving a type.
///
/// Build-time variants are fatal: a registry that fails to build cannot be
/// used, and the caller is expected to fix the schema definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown message type `{0}`")]
    UnknownType(String),
    #[error("unknown enum type `{0}`")]
    UnknownEnum(String),
    #[error("type `{0}` is registered more than once")]
    DuplicateType(String),
    #[error("tag {tag} is used by both `{first}` and `{second}` in `{message}`")]
    DuplicateTag {
        message: String,
        tag: u32,
        first: String,
        second: String,
    },
    #[error("field name `{field}` is declared more than once in `{message}`")]
    DuplicateField { message: String, field: String },
    #[error("field `{field}` in `{message}` has invalid tag {tag}")]
    InvalidTag {
        message: String,
        field: String,
        tag: u32,
    },
    #[error("field `{field}` in `{message}` refers to unregistered type `{target}`")]
    UnresolvedReference {
        message: String,
        field: String,
        target: String,
    },
    #[error("map field `{field}` in `{message}` cannot use `{key}` keys")]
    InvalidMapKey {
        message: String,
        field: String,
        key: &'static str,
    },
    #[error("field `{field}` in `{message}` cannot be packed")]
    InvalidPacked { message: String, field: String },
    #[error("default for field `{field}` in `{message}` does not match its type")]
    InvalidDefault { message: String, field: String },
    #[error("oneof member `{field}` in `{message}` must be a singular field")]
    InvalidOneof { message: String, field: String },
    #[error("enum `{0}` declares no values")]
    EmptyEnum(String),
    #[error("enum `{enum_name}` declares `{value}` more than once")]
    DuplicateEnumValue { enum_name: String, value: String },
}
