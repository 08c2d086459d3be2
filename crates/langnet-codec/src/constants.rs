//! Top-level constants.

/// Encoding format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodingFormat {
    Binary = 0,
    Json = 1,
}

impl EncodingFormat {
    /// Conventional file extension for payloads in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Binary => "bin",
            Self::Json => "json",
        }
    }
}
