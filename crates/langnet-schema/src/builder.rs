//! Fluent builders for message and enum definitions.
//!
//! Builders only collect declarations. All checks run when the definitions
//! are handed to [`crate::RegistryBuilder::build`], where cross-type
//! references can be resolved.

use crate::descriptor::{EnumValue, FieldDescriptor};

/// Collects the fields of one message type.
///
/// # Example
///
/// ```
/// use langnet_schema::{FieldDescriptor, FieldType, MessageBuilder, ScalarKind};
///
/// let msg = MessageBuilder::new("langnet.SearchRequest")
///     .field(FieldDescriptor::new("query", 1, ScalarKind::String))
///     .field(FieldDescriptor::new("page_number", 2, ScalarKind::Int32))
///     .field(FieldDescriptor::new("tags", 3, ScalarKind::String).repeated())
///     .oneof(
///         "filter",
///         vec![FieldDescriptor::new("site", 4, ScalarKind::String)],
///     );
/// assert_eq!(msg.full_name(), "langnet.SearchRequest");
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    pub(crate) full_name: String,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) oneofs: Vec<String>,
}

impl MessageBuilder {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            fields: Vec::new(),
            oneofs: Vec::new(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Declares a oneof group; every member gets explicit presence.
    pub fn oneof(mut self, name: impl Into<String>, members: Vec<FieldDescriptor>) -> Self {
        let index = self.oneofs.len();
        self.oneofs.push(name.into());
        for mut member in members {
            member.oneof = Some(index);
            self.fields.push(member);
        }
        self
    }
}

/// Collects the values of one enum type.
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    pub(crate) full_name: String,
    pub(crate) values: Vec<EnumValue>,
}

impl EnumBuilder {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            values: Vec::new(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn value(mut self, name: impl Into<String>, number: i32) -> Self {
        self.values.push(EnumValue {
            name: name.into(),
            number,
        });
        self
    }
}
