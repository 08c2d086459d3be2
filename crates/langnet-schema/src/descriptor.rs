//! Field, message and enum descriptors.

use std::collections::HashMap;

use crate::kind::{FieldType, Label, ScalarKind};
use crate::naming::to_json_name;

/// Declared default of a singular scalar or enum field.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    /// Enum default, by value name.
    Enum(String),
}

/// Describes one field of a message.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared (snake_case) name.
    pub name: String,
    /// camelCase name used by the JSON mapping.
    pub json_name: String,
    /// Tag, unique within the message.
    pub number: u32,
    pub ty: FieldType,
    pub label: Label,
    pub default: Option<DefaultValue>,
    /// Explicit packing override. `None` means packed when packable.
    pub packed: Option<bool>,
    /// Index into [`MessageSchema::oneofs`].
    pub oneof: Option<usize>,
}

impl FieldDescriptor {
    /// A singular field with implicit presence.
    pub fn new(name: impl Into<String>, number: u32, ty: impl Into<FieldType>) -> Self {
        let name = name.into();
        let json_name = to_json_name(&name);
        Self {
            name,
            json_name,
            number,
            ty: ty.into(),
            label: Label::Singular,
            default: None,
            packed: None,
            oneof: None,
        }
    }

    pub fn optional(mut self) -> Self {
        self.label = Label::Optional;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.label = Label::Repeated;
        self
    }

    /// Turns the field into a map keyed by `key`; the field type becomes the value type.
    pub fn map(mut self, key: ScalarKind) -> Self {
        self.label = Label::Map(key);
        self
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    pub fn packed(mut self, packed: bool) -> Self {
        self.packed = Some(packed);
        self
    }

    pub fn with_json_name(mut self, json_name: impl Into<String>) -> Self {
        self.json_name = json_name.into();
        self
    }

    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    pub fn is_map(&self) -> bool {
        matches!(self.label, Label::Map(_))
    }

    pub fn map_key(&self) -> Option<ScalarKind> {
        match self.label {
            Label::Map(key) => Some(key),
            _ => None,
        }
    }

    /// Singular or optional, i.e. neither repeated nor a map.
    pub fn is_singular(&self) -> bool {
        matches!(self.label, Label::Singular | Label::Optional)
    }

    /// Whether "set to the default" is distinguishable from "absent".
    pub fn has_explicit_presence(&self) -> bool {
        match self.label {
            Label::Optional => true,
            Label::Singular => self.oneof.is_some() || matches!(self.ty, FieldType::Message(_)),
            Label::Repeated | Label::Map(_) => false,
        }
    }

    /// Whether a repeated field is written in packed form when `pack_by_default` is set.
    pub fn is_packed(&self, pack_by_default: bool) -> bool {
        self.is_repeated() && self.ty.is_packable() && self.packed.unwrap_or(pack_by_default)
    }
}

/// Schema of one message type.
#[derive(Debug, Clone)]
pub struct MessageSchema {
    full_name: String,
    fields: Vec<FieldDescriptor>,
    oneofs: Vec<String>,
    by_tag: HashMap<u32, usize>,
    by_name: HashMap<String, usize>,
    /// Field indexes in ascending tag order.
    tag_order: Vec<usize>,
}

impl MessageSchema {
    /// Indexes already-validated fields.
    pub(crate) fn new(full_name: String, fields: Vec<FieldDescriptor>, oneofs: Vec<String>) -> Self {
        let mut by_tag = HashMap::with_capacity(fields.len());
        let mut by_name = HashMap::with_capacity(fields.len() * 2);
        for (i, field) in fields.iter().enumerate() {
            by_tag.insert(field.number, i);
            by_name.insert(field.name.clone(), i);
            by_name.entry(field.json_name.clone()).or_insert(i);
        }
        let mut tag_order: Vec<usize> = (0..fields.len()).collect();
        tag_order.sort_by_key(|&i| fields[i].number);
        Self {
            full_name,
            fields,
            oneofs,
            by_tag,
            by_name,
            tag_order,
        }
    }

    /// Fully-qualified name, e.g. `langnet.SearchRequest`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Unqualified name, e.g. `SearchRequest`.
    pub fn name(&self) -> &str {
        self.full_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.full_name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields in ascending tag order, the order used on the wire.
    pub fn fields_by_tag(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.tag_order.iter().map(move |&i| &self.fields[i])
    }

    pub fn field_by_tag(&self, tag: u32) -> Option<&FieldDescriptor> {
        self.by_tag.get(&tag).map(|&i| &self.fields[i])
    }

    /// Looks a field up by declared name or by JSON name.
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn oneofs(&self) -> &[String] {
        &self.oneofs
    }

    pub fn oneof_index(&self, name: &str) -> Option<usize> {
        self.oneofs.iter().position(|o| o == name)
    }

    /// Members of the oneof at `index`.
    pub fn oneof_fields(&self, index: usize) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.oneof == Some(index))
    }
}

/// A named enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// Schema of a closed enum type.
#[derive(Debug, Clone)]
pub struct EnumSchema {
    full_name: String,
    values: Vec<EnumValue>,
    by_number: HashMap<i32, usize>,
    by_name: HashMap<String, usize>,
}

impl EnumSchema {
    pub(crate) fn new(full_name: String, values: Vec<EnumValue>) -> Self {
        let by_number = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.number, i))
            .collect();
        let by_name = values
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), i))
            .collect();
        Self {
            full_name,
            values,
            by_number,
            by_name,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Symbolic name of `number`, `None` for values this schema does not know.
    pub fn name_of(&self, number: i32) -> Option<&str> {
        self.by_number
            .get(&number)
            .map(|&i| self.values[i].name.as_str())
    }

    pub fn number_of(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).map(|&i| self.values[i].number)
    }

    /// The first declared value is the default.
    pub fn default_number(&self) -> i32 {
        self.values.first().map(|v| v.number).unwrap_or(0)
    }
}
