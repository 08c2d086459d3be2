//! Field kinds, labels and wire kinds.

/// Scalar field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Float,
    Int32,
    Int64,
    UInt32,
    UInt64,
    SInt32,
    SInt64,
    Fixed32,
    Fixed64,
    SFixed32,
    SFixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Float => "float",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::UInt32 => "uint32",
            Self::UInt64 => "uint64",
            Self::SInt32 => "sint32",
            Self::SInt64 => "sint64",
            Self::Fixed32 => "fixed32",
            Self::Fixed64 => "fixed64",
            Self::SFixed32 => "sfixed32",
            Self::SFixed64 => "sfixed64",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Bytes => "bytes",
        }
    }

    /// Wire kind used for a single value of this kind.
    pub fn wire_kind(self) -> WireKind {
        match self {
            Self::Int32
            | Self::Int64
            | Self::UInt32
            | Self::UInt64
            | Self::SInt32
            | Self::SInt64
            | Self::Bool => WireKind::Varint,
            Self::Fixed64 | Self::SFixed64 | Self::Double => WireKind::Fixed64,
            Self::Fixed32 | Self::SFixed32 | Self::Float => WireKind::Fixed32,
            Self::String | Self::Bytes => WireKind::LengthDelimited,
        }
    }

    /// Numeric and bool kinds can be packed into one length-delimited block.
    pub fn is_packable(self) -> bool {
        !matches!(self, Self::String | Self::Bytes)
    }

    pub fn is_valid_map_key(self) -> bool {
        !matches!(self, Self::Double | Self::Float | Self::Bytes)
    }

    /// 64-bit integer kinds, rendered as strings in JSON.
    pub fn is_64_bit_integer(self) -> bool {
        matches!(
            self,
            Self::Int64 | Self::UInt64 | Self::SInt64 | Self::Fixed64 | Self::SFixed64
        )
    }

    pub fn is_signed_integer(self) -> bool {
        matches!(
            self,
            Self::Int32
                | Self::Int64
                | Self::SInt32
                | Self::SInt64
                | Self::SFixed32
                | Self::SFixed64
        )
    }

    pub fn is_unsigned_integer(self) -> bool {
        matches!(
            self,
            Self::UInt32 | Self::UInt64 | Self::Fixed32 | Self::Fixed64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, Self::Float | Self::Double)
    }
}

/// Binary encoding category of a field payload.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireKind {
    /// Maps the low three bits of a field header to a wire kind.
    ///
    /// The deprecated group kinds (3 and 4) and the unassigned 6 and 7 are
    /// not supported and map to `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Varint),
            1 => Some(Self::Fixed64),
            2 => Some(Self::LengthDelimited),
            5 => Some(Self::Fixed32),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Varint => "varint",
            Self::Fixed64 => "fixed64",
            Self::LengthDelimited => "length-delimited",
            Self::Fixed32 => "fixed32",
        }
    }
}

/// Element type of a field.
///
/// Enum and message types are referenced by fully-qualified name and resolved
/// through the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(ScalarKind),
    Enum(String),
    Message(String),
}

impl FieldType {
    pub fn enumeration(type_name: impl Into<String>) -> Self {
        Self::Enum(type_name.into())
    }

    pub fn message(type_name: impl Into<String>) -> Self {
        Self::Message(type_name.into())
    }

    pub fn wire_kind(&self) -> WireKind {
        match self {
            Self::Scalar(kind) => kind.wire_kind(),
            Self::Enum(_) => WireKind::Varint,
            Self::Message(_) => WireKind::LengthDelimited,
        }
    }

    pub fn is_packable(&self) -> bool {
        match self {
            Self::Scalar(kind) => kind.is_packable(),
            Self::Enum(_) => true,
            Self::Message(_) => false,
        }
    }

    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Human-readable type name, used in error messages.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(kind) => kind.as_str(),
            Self::Enum(name) | Self::Message(name) => name,
        }
    }
}

impl From<ScalarKind> for FieldType {
    fn from(kind: ScalarKind) -> Self {
        Self::Scalar(kind)
    }
}

/// Cardinality of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Implicit presence: the default value is not serialized.
    Singular,
    /// Explicit presence: a set field is serialized even when it holds the default.
    Optional,
    Repeated,
    /// Map from keys of the given kind to values of the field type.
    Map(ScalarKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_kind_from_u8() {
        assert_eq!(WireKind::from_u8(0), Some(WireKind::Varint));
        assert_eq!(WireKind::from_u8(1), Some(WireKind::Fixed64));
        assert_eq!(WireKind::from_u8(2), Some(WireKind::LengthDelimited));
        assert_eq!(WireKind::from_u8(5), Some(WireKind::Fixed32));
        for v in [3, 4, 6, 7] {
            assert_eq!(WireKind::from_u8(v), None);
        }
    }

    #[test]
    fn scalar_wire_kinds() {
        assert_eq!(ScalarKind::SInt64.wire_kind(), WireKind::Varint);
        assert_eq!(ScalarKind::Double.wire_kind(), WireKind::Fixed64);
        assert_eq!(ScalarKind::Float.wire_kind(), WireKind::Fixed32);
        assert_eq!(ScalarKind::Bytes.wire_kind(), WireKind::LengthDelimited);
        assert_eq!(
            FieldType::enumeration("a.E").wire_kind(),
            WireKind::Varint
        );
        assert!(!FieldType::message("a.M").is_packable());
    }
}
