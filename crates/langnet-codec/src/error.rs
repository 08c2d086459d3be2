//! Decode error type shared by the binary and JSON decoders.

use langnet_buffers::BufferError;
use langnet_schema::SchemaError;
use thiserror::Error;

/// Error raised when bytes or text cannot be decoded into a message.
///
/// Binary variants carry the byte offset of the offending header or payload.
/// JSON variants carry either the line/column of a syntax error or the path
/// of the offending value, e.g. `$.results[1].metadata`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input at byte {offset}")]
    Truncated { offset: usize },
    #[error("malformed varint at byte {offset}")]
    MalformedVarint { offset: usize },
    #[error("invalid field tag {tag} at byte {offset}")]
    InvalidTag { offset: usize, tag: u64 },
    #[error("unsupported wire kind {wire} at byte {offset}")]
    UnknownWireKind { offset: usize, wire: u8 },
    #[error("field `{field}` expects a {expected} payload, found {actual} at byte {offset}")]
    WireKindMismatch {
        offset: usize,
        field: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("length prefix {len} at byte {offset} exceeds the {remaining} remaining bytes")]
    LengthOverflow {
        offset: usize,
        len: u64,
        remaining: usize,
    },
    #[error("invalid UTF-8 in field `{field}` at byte {offset}")]
    InvalidUtf8 { offset: usize, field: String },
    #[error("message nesting exceeds {limit} levels at byte {offset}")]
    RecursionLimit { offset: usize, limit: usize },
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    JsonSyntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("expected {expected} at `{path}`")]
    JsonType { path: String, expected: &'static str },
    #[error("value at `{path}` is out of range for {kind}")]
    JsonRange { path: String, kind: &'static str },
    #[error("`{name}` is not a value of `{enum_name}` at `{path}`")]
    UnknownEnumName {
        path: String,
        enum_name: String,
        name: String,
    },
    #[error("unknown field `{key}` at `{path}`")]
    UnknownJsonField { path: String, key: String },
    #[error("invalid base64 at `{path}`")]
    InvalidBase64 { path: String },
    #[error("more than one member of oneof `{oneof}` is set at `{path}`")]
    DuplicateOneof { path: String, oneof: String },
    #[error("message nesting exceeds {limit} levels at `{path}`")]
    JsonRecursionLimit { path: String, limit: usize },
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl DecodeError {
    /// Byte offset of the failure for binary input.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Truncated { offset }
            | Self::MalformedVarint { offset }
            | Self::InvalidTag { offset, .. }
            | Self::UnknownWireKind { offset, .. }
            | Self::WireKindMismatch { offset, .. }
            | Self::LengthOverflow { offset, .. }
            | Self::InvalidUtf8 { offset, .. }
            | Self::RecursionLimit { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// JSON path of the failure for JSON input.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::JsonType { path, .. }
            | Self::JsonRange { path, .. }
            | Self::UnknownEnumName { path, .. }
            | Self::UnknownJsonField { path, .. }
            | Self::InvalidBase64 { path }
            | Self::DuplicateOneof { path, .. }
            | Self::JsonRecursionLimit { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<BufferError> for DecodeError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer(offset) => Self::Truncated { offset },
            BufferError::MalformedVarint(offset) => Self::MalformedVarint { offset },
            BufferError::InvalidUtf8(offset) => Self::InvalidUtf8 {
                offset,
                field: String::new(),
            },
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonSyntax {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
