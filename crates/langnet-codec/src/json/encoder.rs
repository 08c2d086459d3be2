//! `JsonEncoder`: message to JSON text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use langnet_schema::{FieldDescriptor, FieldType};
use serde_json::{Map, Number, Value as Json};

use super::{INFINITY, NAN, NEG_INFINITY};
use crate::{FieldNaming, FieldValue, JsonOptions, Message, Value};

/// Writes messages as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonEncoder {
    options: JsonOptions,
}

impl JsonEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    /// Encodes a message as JSON text, indented when `pretty` is set.
    pub fn encode(&self, message: &Message) -> String {
        let json = self.to_json(message);
        if self.options.pretty {
            format!("{json:#}")
        } else {
            json.to_string()
        }
    }

    /// Builds the JSON object for a message.
    pub fn to_json(&self, message: &Message) -> Json {
        let mut object = Map::new();
        for field in message.schema().fields_by_tag() {
            let key = match self.options.field_names {
                FieldNaming::Proto => &field.name,
                FieldNaming::CamelCase => &field.json_name,
            };
            let json = match message.value_of(field.number) {
                Some(value) => Some(self.field_to_json(message, field, value)),
                None if self.options.emit_defaults => self.default_to_json(message, field),
                None => None,
            };
            if let Some(json) = json {
                object.insert(key.clone(), json);
            }
        }
        Json::Object(object)
    }

    fn field_to_json(&self, message: &Message, field: &FieldDescriptor, value: &FieldValue) -> Json {
        match value {
            FieldValue::Single(v) => self.value_to_json(message, &field.ty, v),
            FieldValue::List(items) => Json::Array(
                items
                    .iter()
                    .map(|v| self.value_to_json(message, &field.ty, v))
                    .collect(),
            ),
            FieldValue::Map(map) => Json::Object(
                map.iter()
                    .map(|(k, v)| (k.to_string(), self.value_to_json(message, &field.ty, v)))
                    .collect(),
            ),
        }
    }

    /// Default rendering of an absent field. Fields with explicit presence
    /// stay absent.
    fn default_to_json(&self, message: &Message, field: &FieldDescriptor) -> Option<Json> {
        if field.is_map() {
            return Some(Json::Object(Map::new()));
        }
        if field.is_repeated() {
            return Some(Json::Array(Vec::new()));
        }
        if field.has_explicit_presence() {
            return None;
        }
        let value = message.default_value(field).ok()?;
        Some(self.value_to_json(message, &field.ty, &value))
    }

    fn value_to_json(&self, message: &Message, ty: &FieldType, value: &Value) -> Json {
        match value {
            Value::Bool(b) => Json::Bool(*b),
            Value::I32(v) => Json::from(*v),
            Value::U32(v) => Json::from(*v),
            Value::I64(v) => Json::String(v.to_string()),
            Value::U64(v) => Json::String(v.to_string()),
            // Shortest decimal that reads back as the same f32.
            Value::F32(v) => float_to_json(v.to_string().parse().unwrap_or(*v as f64)),
            Value::F64(v) => float_to_json(*v),
            Value::String(s) => Json::String(s.clone()),
            Value::Bytes(b) => Json::String(STANDARD.encode(b)),
            Value::Enum(n) => self.enum_to_json(message, ty, *n),
            Value::Message(m) => self.to_json(m),
        }
    }

    fn enum_to_json(&self, message: &Message, ty: &FieldType, number: i32) -> Json {
        if self.options.enums_as_ints {
            return Json::from(number);
        }
        let FieldType::Enum(name) = ty else {
            return Json::from(number);
        };
        message
            .registry()
            .resolve_enum(name)
            .ok()
            .and_then(|schema| schema.name_of(number).map(|n| Json::String(n.to_owned())))
            .unwrap_or_else(|| Json::from(number))
    }
}

fn float_to_json(v: f64) -> Json {
    if v.is_nan() {
        Json::String(NAN.to_owned())
    } else if v == f64::INFINITY {
        Json::String(INFINITY.to_owned())
    } else if v == f64::NEG_INFINITY {
        Json::String(NEG_INFINITY.to_owned())
    } else {
        Number::from_f64(v).map(Json::Number).unwrap_or(Json::Null)
    }
}
