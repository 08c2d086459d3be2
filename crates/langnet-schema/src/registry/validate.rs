//! Registration-time schema checks.

use std::collections::{HashMap, HashSet};

use crate::builder::{EnumBuilder, MessageBuilder};
use crate::constants::{MAX_TAG, RESERVED_TAGS};
use crate::descriptor::{DefaultValue, FieldDescriptor};
use crate::error::SchemaError;
use crate::kind::{FieldType, Label, ScalarKind};

pub(super) fn validate(
    messages: &[MessageBuilder],
    enums: &[EnumBuilder],
) -> Result<(), SchemaError> {
    let mut type_names: HashSet<&str> = HashSet::new();
    for name in messages
        .iter()
        .map(|m| m.full_name.as_str())
        .chain(enums.iter().map(|e| e.full_name.as_str()))
    {
        if !type_names.insert(name) {
            return Err(SchemaError::DuplicateType(name.to_owned()));
        }
    }

    let enum_map: HashMap<&str, &EnumBuilder> =
        enums.iter().map(|e| (e.full_name.as_str(), e)).collect();
    let message_names: HashSet<&str> = messages.iter().map(|m| m.full_name.as_str()).collect();

    for e in enums {
        validate_enum(e)?;
    }
    for m in messages {
        validate_message(m, &message_names, &enum_map)?;
    }
    Ok(())
}

fn validate_enum(e: &EnumBuilder) -> Result<(), SchemaError> {
    if e.values.is_empty() {
        return Err(SchemaError::EmptyEnum(e.full_name.clone()));
    }
    let mut names = HashSet::new();
    let mut numbers = HashSet::new();
    for v in &e.values {
        if !names.insert(v.name.as_str()) || !numbers.insert(v.number) {
            return Err(SchemaError::DuplicateEnumValue {
                enum_name: e.full_name.clone(),
                value: v.name.clone(),
            });
        }
    }
    Ok(())
}

fn validate_message(
    m: &MessageBuilder,
    message_names: &HashSet<&str>,
    enums: &HashMap<&str, &EnumBuilder>,
) -> Result<(), SchemaError> {
    let mut tags: HashMap<u32, &str> = HashMap::new();
    let mut names: HashSet<&str> = HashSet::new();
    let mut json_names: HashMap<&str, &str> = HashMap::new();

    for field in &m.fields {
        if field.number == 0 || field.number > MAX_TAG || RESERVED_TAGS.contains(&field.number) {
            return Err(SchemaError::InvalidTag {
                message: m.full_name.clone(),
                field: field.name.clone(),
                tag: field.number,
            });
        }
        if let Some(first) = tags.insert(field.number, field.name.as_str()) {
            return Err(SchemaError::DuplicateTag {
                message: m.full_name.clone(),
                tag: field.number,
                first: first.to_owned(),
                second: field.name.clone(),
            });
        }
        if !names.insert(field.name.as_str()) {
            return Err(duplicate_field(m, field));
        }
        // A JSON name may not shadow another field's declared or JSON name.
        if let Some(owner) = json_names.insert(field.json_name.as_str(), field.name.as_str()) {
            if owner != field.name {
                return Err(duplicate_field(m, field));
            }
        }

        validate_reference(m, field, message_names, enums)?;
        validate_label(m, field)?;
        if let Some(default) = &field.default {
            validate_default(m, field, default, enums)?;
        }
    }

    for field in &m.fields {
        if let Some(owner) = json_names.get(field.name.as_str()) {
            if *owner != field.name {
                return Err(duplicate_field(m, field));
            }
        }
    }
    Ok(())
}

fn duplicate_field(m: &MessageBuilder, field: &FieldDescriptor) -> SchemaError {
    SchemaError::DuplicateField {
        message: m.full_name.clone(),
        field: field.name.clone(),
    }
}

fn validate_reference(
    m: &MessageBuilder,
    field: &FieldDescriptor,
    message_names: &HashSet<&str>,
    enums: &HashMap<&str, &EnumBuilder>,
) -> Result<(), SchemaError> {
    let resolved = match &field.ty {
        FieldType::Scalar(_) => true,
        FieldType::Message(target) => message_names.contains(strip_dot(target)),
        FieldType::Enum(target) => enums.contains_key(strip_dot(target)),
    };
    if resolved {
        Ok(())
    } else {
        Err(SchemaError::UnresolvedReference {
            message: m.full_name.clone(),
            field: field.name.clone(),
            target: field.ty.type_name().to_owned(),
        })
    }
}

fn validate_label(m: &MessageBuilder, field: &FieldDescriptor) -> Result<(), SchemaError> {
    if let Label::Map(key) = field.label {
        if !key.is_valid_map_key() {
            return Err(SchemaError::InvalidMapKey {
                message: m.full_name.clone(),
                field: field.name.clone(),
                key: key.as_str(),
            });
        }
    }
    if field.packed == Some(true) && !(field.is_repeated() && field.ty.is_packable()) {
        return Err(SchemaError::InvalidPacked {
            message: m.full_name.clone(),
            field: field.name.clone(),
        });
    }
    if field.oneof.is_some() && field.label != Label::Singular {
        return Err(SchemaError::InvalidOneof {
            message: m.full_name.clone(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

fn validate_default(
    m: &MessageBuilder,
    field: &FieldDescriptor,
    default: &DefaultValue,
    enums: &HashMap<&str, &EnumBuilder>,
) -> Result<(), SchemaError> {
    let ok = field.is_singular()
        && match (&field.ty, default) {
            (FieldType::Scalar(kind), default) => scalar_default_fits(*kind, default),
            (FieldType::Enum(target), DefaultValue::Enum(name)) => enums
                .get(strip_dot(target))
                .is_some_and(|e| e.values.iter().any(|v| &v.name == name)),
            _ => false,
        };
    if ok {
        Ok(())
    } else {
        Err(SchemaError::InvalidDefault {
            message: m.full_name.clone(),
            field: field.name.clone(),
        })
    }
}

fn scalar_default_fits(kind: ScalarKind, default: &DefaultValue) -> bool {
    use ScalarKind::*;
    match (kind, default) {
        (Bool, DefaultValue::Bool(_)) => true,
        (Int32 | SInt32 | SFixed32, DefaultValue::Int(v)) => i32::try_from(*v).is_ok(),
        (Int64 | SInt64 | SFixed64, DefaultValue::Int(_)) => true,
        (UInt32 | Fixed32, DefaultValue::UInt(v)) => u32::try_from(*v).is_ok(),
        (UInt64 | Fixed64, DefaultValue::UInt(_)) => true,
        (Float | Double, DefaultValue::Float(_)) => true,
        (String, DefaultValue::Str(_)) => true,
        (Bytes, DefaultValue::Bytes(_)) => true,
        _ => false,
    }
}

fn strip_dot(name: &str) -> &str {
    name.strip_prefix('.').unwrap_or(name)
}
