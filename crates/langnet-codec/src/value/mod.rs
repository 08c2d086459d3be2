//! In-memory value model.
//!
//! A [`Message`] maps field tags to [`FieldValue`]s that always agree with the
//! field's descriptor. Every mutating call checks the value kind against the
//! schema and fails with [`ValueError::TypeMismatch`] instead of storing it.

mod error;
mod field_key;
mod message;
mod unknown;

use std::collections::BTreeMap;

use langnet_schema::{FieldType, ScalarKind};

pub use error::ValueError;
pub use field_key::FieldKey;
pub use message::Message;
pub use unknown::{UnknownField, UnknownFields};

/// A single typed value.
///
/// Floats compare by bit pattern, except that every `NaN` equals every other
/// `NaN`. `-0.0` and `0.0` differ.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    /// `int32`, `sint32` and `sfixed32`.
    I32(i32),
    /// `int64`, `sint64` and `sfixed64`.
    I64(i64),
    /// `uint32` and `fixed32`.
    U32(u32),
    /// `uint64` and `fixed64`.
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Enum number, known to the schema or not.
    Enum(i32),
    Message(Box<Message>),
}

impl Value {
    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::F32(_) => "f32",
            Self::F64(_) => "f64",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Enum(_) => "enum",
            Self::Message(_) => "message",
        }
    }

    /// Whether this value may be stored in a field of type `ty`.
    pub fn matches(&self, ty: &FieldType) -> bool {
        match (ty, self) {
            (FieldType::Scalar(kind), value) => value.matches_scalar(*kind),
            (FieldType::Enum(_), Self::Enum(_)) => true,
            (FieldType::Message(name), Self::Message(m)) => {
                m.type_name() == name.strip_prefix('.').unwrap_or(name)
            }
            _ => false,
        }
    }

    fn matches_scalar(&self, kind: ScalarKind) -> bool {
        use ScalarKind::*;
        matches!(
            (kind, self),
            (Bool, Self::Bool(_))
                | (Int32 | SInt32 | SFixed32, Self::I32(_))
                | (Int64 | SInt64 | SFixed64, Self::I64(_))
                | (UInt32 | Fixed32, Self::U32(_))
                | (UInt64 | Fixed64, Self::U64(_))
                | (Float, Self::F32(_))
                | (Double, Self::F64(_))
                | (String, Self::String(_))
                | (Bytes, Self::Bytes(_))
        )
    }

    /// Zero value of a scalar kind.
    pub fn zero(kind: ScalarKind) -> Value {
        use ScalarKind::*;
        match kind {
            Bool => Self::Bool(false),
            Int32 | SInt32 | SFixed32 => Self::I32(0),
            Int64 | SInt64 | SFixed64 => Self::I64(0),
            UInt32 | Fixed32 => Self::U32(0),
            UInt64 | Fixed64 => Self::U64(0),
            Float => Self::F32(0.0),
            Double => Self::F64(0.0),
            String => Self::String(std::string::String::new()),
            Bytes => Self::Bytes(Vec::new()),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) | Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<i32> {
        match self {
            Self::Enum(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Self::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => {
                (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
            }
            (Self::F64(a), Self::F64(b)) => {
                (a.is_nan() && b.is_nan()) || a.to_bits() == b.to_bits()
            }
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Message(a), Self::Message(b)) => a == b,
            _ => false,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    &str => String,
    Vec<u8> => Bytes,
    &[u8] => Bytes,
}

impl From<Message> for Value {
    fn from(m: Message) -> Self {
        Self::Message(Box::new(m))
    }
}

/// A map field key.
///
/// Keys order by kind first, then by value, so map iteration is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    String(String),
}

impl MapKey {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::I32(_) => "i32",
            Self::I64(_) => "i64",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::String(_) => "string",
        }
    }

    /// Whether this key may be used in a map keyed by `kind`.
    pub fn matches(&self, kind: ScalarKind) -> bool {
        self.to_value().matches_scalar(kind)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::I32(v) => Value::I32(*v),
            Self::I64(v) => Value::I64(*v),
            Self::U32(v) => Value::U32(*v),
            Self::U64(v) => Value::U64(*v),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    pub fn from_value(value: Value) -> Option<MapKey> {
        match value {
            Value::Bool(b) => Some(Self::Bool(b)),
            Value::I32(v) => Some(Self::I32(v)),
            Value::I64(v) => Some(Self::I64(v)),
            Value::U32(v) => Some(Self::U32(v)),
            Value::U64(v) => Some(Self::U64(v)),
            Value::String(s) => Some(Self::String(s)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for MapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

macro_rules! impl_from_map_key {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MapKey {
                fn from(v: $ty) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_from_map_key! {
    bool => Bool,
    i32 => I32,
    i64 => I64,
    u32 => U32,
    u64 => U64,
    String => String,
    &str => String,
}

/// Map field contents.
pub type MapValue = BTreeMap<MapKey, Value>;

/// Contents of one present field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Single(Value),
    List(Vec<Value>),
    Map(MapValue),
}
