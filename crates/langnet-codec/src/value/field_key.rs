//! Field selection by name or tag.

use langnet_schema::{FieldDescriptor, MessageSchema};

/// Something that names a field of a message: its declared name, its JSON
/// name, its tag, or its descriptor.
pub trait FieldKey {
    fn lookup<'s>(&self, schema: &'s MessageSchema) -> Option<&'s FieldDescriptor>;

    /// Rendering used in error messages.
    fn describe(&self) -> String;
}

impl FieldKey for &str {
    fn lookup<'s>(&self, schema: &'s MessageSchema) -> Option<&'s FieldDescriptor> {
        schema.field_by_name(self)
    }

    fn describe(&self) -> String {
        (*self).to_owned()
    }
}

impl FieldKey for &String {
    fn lookup<'s>(&self, schema: &'s MessageSchema) -> Option<&'s FieldDescriptor> {
        schema.field_by_name(self)
    }

    fn describe(&self) -> String {
        (*self).clone()
    }
}

impl FieldKey for u32 {
    fn lookup<'s>(&self, schema: &'s MessageSchema) -> Option<&'s FieldDescriptor> {
        schema.field_by_tag(*self)
    }

    fn describe(&self) -> String {
        format!("#{self}")
    }
}

impl FieldKey for &FieldDescriptor {
    fn lookup<'s>(&self, schema: &'s MessageSchema) -> Option<&'s FieldDescriptor> {
        schema
            .field_by_tag(self.number)
            .filter(|f| f.name == self.name)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
