//! Schema registry.
//!
//! A [`Registry`] is built once through [`RegistryBuilder::build`] and is
//! immutable afterwards. It is an `Arc`-backed handle: clones share the same
//! schemas and lookups need no locking.

mod validate;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::builder::{EnumBuilder, MessageBuilder};
use crate::descriptor::{EnumSchema, FieldDescriptor, MessageSchema};
use crate::error::SchemaError;

#[derive(Debug, Default)]
struct RegistryInner {
    messages: HashMap<String, Arc<MessageSchema>>,
    enums: HashMap<String, Arc<EnumSchema>>,
}

/// Read-only set of resolved message and enum schemas.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolves a message type by fully-qualified name. A leading `.` is accepted.
    pub fn resolve(&self, type_name: &str) -> Result<Arc<MessageSchema>, SchemaError> {
        let name = type_name.strip_prefix('.').unwrap_or(type_name);
        self.inner
            .messages
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(name.to_owned()))
    }

    /// Resolves an enum type by fully-qualified name. A leading `.` is accepted.
    pub fn resolve_enum(&self, type_name: &str) -> Result<Arc<EnumSchema>, SchemaError> {
        let name = type_name.strip_prefix('.').unwrap_or(type_name);
        self.inner
            .enums
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownEnum(name.to_owned()))
    }

    /// Looks up the descriptor for `tag` in `schema`.
    pub fn field_by_tag<'s>(
        &self,
        schema: &'s MessageSchema,
        tag: u32,
    ) -> Option<&'s FieldDescriptor> {
        schema.field_by_tag(tag)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        let name = type_name.strip_prefix('.').unwrap_or(type_name);
        self.inner.messages.contains_key(name) || self.inner.enums.contains_key(name)
    }

    /// Registered message type names, sorted.
    pub fn message_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.messages.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered enum type names, sorted.
    pub fn enum_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.inner.enums.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Whether both handles refer to the same built registry.
    pub fn ptr_eq(&self, other: &Registry) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Collects message and enum definitions for a [`Registry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    messages: Vec<MessageBuilder>,
    enums: Vec<EnumBuilder>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: MessageBuilder) -> Self {
        self.messages.push(message);
        self
    }

    pub fn enumeration(mut self, enumeration: EnumBuilder) -> Self {
        self.enums.push(enumeration);
        self
    }

    /// Adds every definition of `other`, e.g. to layer a newer schema version.
    pub fn extend(mut self, other: RegistryBuilder) -> Self {
        self.messages.extend(other.messages);
        self.enums.extend(other.enums);
        self
    }

    /// Validates all definitions and produces the registry.
    pub fn build(self) -> Result<Registry, SchemaError> {
        validate::validate(&self.messages, &self.enums)?;

        let enums: HashMap<String, Arc<EnumSchema>> = self
            .enums
            .into_iter()
            .map(|e| {
                let schema = EnumSchema::new(e.full_name.clone(), e.values);
                (e.full_name, Arc::new(schema))
            })
            .collect();
        let messages: HashMap<String, Arc<MessageSchema>> = self
            .messages
            .into_iter()
            .map(|m| {
                let schema = MessageSchema::new(m.full_name.clone(), m.fields, m.oneofs);
                (m.full_name, Arc::new(schema))
            })
            .collect();

        debug!(
            messages = messages.len(),
            enums = enums.len(),
            "schema registry built"
        );
        Ok(Registry {
            inner: Arc::new(RegistryInner { messages, enums }),
        })
    }
}
