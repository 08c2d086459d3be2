//! `JsonDecoder`: JSON text to message.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use langnet_schema::{FieldDescriptor, FieldType, Registry, ScalarKind};
use serde_json::Value as Json;
use tracing::{debug, trace};

use super::{INFINITY, NAN, NEG_INFINITY};
use crate::{DecodeError, JsonOptions, MapKey, Message, Value};

/// Reads messages from JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    options: JsonOptions,
}

impl JsonDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: JsonOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JsonOptions {
        &self.options
    }

    /// Decodes JSON text as a fresh instance of `type_name`.
    pub fn decode(
        &self,
        registry: &Registry,
        type_name: &str,
        text: impl AsRef<[u8]>,
    ) -> Result<Message, DecodeError> {
        let json: Json = serde_json::from_slice(text.as_ref())?;
        self.from_json(registry, type_name, &json)
    }

    /// Decodes an already parsed JSON value.
    pub fn from_json(
        &self,
        registry: &Registry,
        type_name: &str,
        json: &Json,
    ) -> Result<Message, DecodeError> {
        let mut message = Message::new(registry, type_name)?;
        self.merge(&mut message, json)?;
        Ok(message)
    }

    /// Merges JSON text into `target`, leaving it untouched on error.
    pub fn decode_into(
        &self,
        target: &mut Message,
        text: impl AsRef<[u8]>,
    ) -> Result<(), DecodeError> {
        let json: Json = serde_json::from_slice(text.as_ref())?;
        let mut scratch = target.clone();
        self.merge(&mut scratch, &json)?;
        *target = scratch;
        Ok(())
    }

    fn merge(&self, message: &mut Message, json: &Json) -> Result<(), DecodeError> {
        self.read_object(message, json, "$", 0).map_err(|err| {
            debug!(message = message.type_name(), error = %err, "json decode failed");
            err
        })
    }

    fn read_object(
        &self,
        message: &mut Message,
        json: &Json,
        path: &str,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let object = json.as_object().ok_or_else(|| type_error(path, "object"))?;
        let schema = message.schema_handle();
        let mut oneofs_seen: Vec<usize> = Vec::new();

        for (key, value) in object {
            let Some(field) = schema.field_by_name(key) else {
                if self.options.ignore_unknown_fields {
                    trace!(message = schema.full_name(), key = %key, "skipping unknown JSON key");
                    continue;
                }
                return Err(DecodeError::UnknownJsonField {
                    path: path.to_owned(),
                    key: key.clone(),
                });
            };
            if value.is_null() {
                continue;
            }
            if let Some(index) = field.oneof {
                if oneofs_seen.contains(&index) {
                    return Err(DecodeError::DuplicateOneof {
                        path: path.to_owned(),
                        oneof: schema.oneofs()[index].clone(),
                    });
                }
                oneofs_seen.push(index);
            }

            let field_path = format!("{path}.{key}");
            if let Some(key_kind) = field.map_key() {
                self.read_map(message, field, key_kind, value, &field_path, depth)?;
            } else if field.is_repeated() {
                let items = value
                    .as_array()
                    .ok_or_else(|| type_error(&field_path, "array"))?;
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{field_path}[{i}]");
                    let item = self.read_value(message.registry(), field, item, &item_path, depth)?;
                    message.push_unchecked(field.number, item);
                }
            } else if let FieldType::Message(_) = field.ty {
                self.check_depth(depth, &field_path)?;
                let mut nested = match message.take_message(field.number) {
                    Some(existing) => existing,
                    None => message.new_nested(field)?,
                };
                self.read_object(&mut nested, value, &field_path, depth + 1)?;
                message.put_single(field, Value::Message(Box::new(nested)))?;
            } else {
                let value = self.read_value(message.registry(), field, value, &field_path, depth)?;
                message.put_single(field, value)?;
            }
        }
        Ok(())
    }

    fn read_map(
        &self,
        message: &mut Message,
        field: &FieldDescriptor,
        key_kind: ScalarKind,
        json: &Json,
        path: &str,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let entries = json.as_object().ok_or_else(|| type_error(path, "object"))?;
        for (key, value) in entries {
            let entry_path = format!("{path}.{key}");
            let key = parse_map_key(key_kind, key, &entry_path)?;
            let value = self.read_value(message.registry(), field, value, &entry_path, depth)?;
            message.insert_unchecked(field.number, key, value);
        }
        Ok(())
    }

    /// Reads one element of `field`'s type.
    fn read_value(
        &self,
        registry: &Registry,
        field: &FieldDescriptor,
        json: &Json,
        path: &str,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match &field.ty {
            FieldType::Scalar(kind) => read_scalar(*kind, json, path),
            FieldType::Enum(name) => read_enum(registry, name, json, path),
            FieldType::Message(name) => {
                self.check_depth(depth, path)?;
                let mut nested = Message::new(registry, name)?;
                self.read_object(&mut nested, json, path, depth + 1)?;
                Ok(Value::Message(Box::new(nested)))
            }
        }
    }

    fn check_depth(&self, depth: usize, path: &str) -> Result<(), DecodeError> {
        let limit = self.options.recursion_limit;
        if depth + 1 > limit {
            return Err(DecodeError::JsonRecursionLimit {
                path: path.to_owned(),
                limit,
            });
        }
        Ok(())
    }
}

fn type_error(path: &str, expected: &'static str) -> DecodeError {
    DecodeError::JsonType {
        path: path.to_owned(),
        expected,
    }
}

fn range_error(path: &str, kind: ScalarKind) -> DecodeError {
    DecodeError::JsonRange {
        path: path.to_owned(),
        kind: kind.as_str(),
    }
}

fn read_scalar(kind: ScalarKind, json: &Json, path: &str) -> Result<Value, DecodeError> {
    use ScalarKind::*;
    match kind {
        Bool => json
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| type_error(path, "boolean")),
        String => json
            .as_str()
            .map(|s| Value::String(s.to_owned()))
            .ok_or_else(|| type_error(path, "string")),
        Bytes => {
            let text = json.as_str().ok_or_else(|| type_error(path, "base64 string"))?;
            decode_base64(text)
                .map(Value::Bytes)
                .ok_or_else(|| DecodeError::InvalidBase64 {
                    path: path.to_owned(),
                })
        }
        Float => {
            let v = read_float(json, path)?;
            // Shortest f32 decimals may sit just past `f32::MAX` as f64.
            let narrowed = v as f32;
            if v.is_finite() && narrowed.is_infinite() {
                return Err(range_error(path, kind));
            }
            Ok(Value::F32(narrowed))
        }
        Double => read_float(json, path).map(Value::F64),
        Int32 | SInt32 | SFixed32 => {
            let v = read_integer(json, path)?;
            i32::try_from(v)
                .map(Value::I32)
                .map_err(|_| range_error(path, kind))
        }
        Int64 | SInt64 | SFixed64 => {
            let v = read_integer(json, path)?;
            i64::try_from(v)
                .map(Value::I64)
                .map_err(|_| range_error(path, kind))
        }
        UInt32 | Fixed32 => {
            let v = read_integer(json, path)?;
            u32::try_from(v)
                .map(Value::U32)
                .map_err(|_| range_error(path, kind))
        }
        UInt64 | Fixed64 => {
            let v = read_integer(json, path)?;
            u64::try_from(v)
                .map(Value::U64)
                .map_err(|_| range_error(path, kind))
        }
    }
}

/// Accepts a number or a decimal string. Integral floats such as `1.0` and
/// `1e3` are allowed.
fn read_integer(json: &Json, path: &str) -> Result<i128, DecodeError> {
    let from_float = |f: f64| {
        if f.is_finite() && f.fract() == 0.0 && f.abs() < 2f64.powi(64) {
            Some(f as i128)
        } else {
            None
        }
    };
    let parsed = match json {
        Json::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().and_then(from_float)),
        Json::String(s) => s
            .trim()
            .parse::<i128>()
            .ok()
            .or_else(|| s.trim().parse::<f64>().ok().and_then(from_float)),
        _ => None,
    };
    parsed.ok_or_else(|| type_error(path, "integer"))
}

fn read_float(json: &Json, path: &str) -> Result<f64, DecodeError> {
    match json {
        Json::Number(n) => n.as_f64().ok_or_else(|| type_error(path, "number")),
        Json::String(s) => match s.as_str() {
            NAN => Ok(f64::NAN),
            INFINITY => Ok(f64::INFINITY),
            NEG_INFINITY => Ok(f64::NEG_INFINITY),
            other => other
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| type_error(path, "number")),
        },
        _ => Err(type_error(path, "number")),
    }
}

fn read_enum(registry: &Registry, name: &str, json: &Json, path: &str) -> Result<Value, DecodeError> {
    match json {
        Json::String(symbol) => {
            let schema = registry.resolve_enum(name)?;
            schema
                .number_of(symbol)
                .map(Value::Enum)
                .ok_or_else(|| DecodeError::UnknownEnumName {
                    path: path.to_owned(),
                    enum_name: name.to_owned(),
                    name: symbol.clone(),
                })
        }
        Json::Number(_) => {
            let v = read_integer(json, path)?;
            i32::try_from(v)
                .map(Value::Enum)
                .map_err(|_| DecodeError::JsonRange {
                    path: path.to_owned(),
                    kind: "enum",
                })
        }
        _ => Err(type_error(path, "enum name or number")),
    }
}

fn parse_map_key(kind: ScalarKind, key: &str, path: &str) -> Result<MapKey, DecodeError> {
    if kind == ScalarKind::String {
        return Ok(MapKey::String(key.to_owned()));
    }
    if kind == ScalarKind::Bool {
        return match key {
            "true" => Ok(MapKey::Bool(true)),
            "false" => Ok(MapKey::Bool(false)),
            _ => Err(type_error(path, "boolean key")),
        };
    }
    let value = read_scalar(kind, &Json::String(key.to_owned()), path)?;
    MapKey::from_value(value).ok_or_else(|| type_error(path, "map key"))
}

fn decode_base64(text: &str) -> Option<Vec<u8>> {
    STANDARD
        .decode(text)
        .or_else(|_| STANDARD_NO_PAD.decode(text))
        .or_else(|_| URL_SAFE.decode(text))
        .or_else(|_| URL_SAFE_NO_PAD.decode(text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use langnet_schema::{EnumBuilder, MessageBuilder};

    fn registry() -> Registry {
        Registry::builder()
            .enumeration(EnumBuilder::new("t.Level").value("LOW", 0).value("HIGH", 1))
            .message(
                MessageBuilder::new("t.Row")
                    .field(FieldDescriptor::new("row_id", 1, ScalarKind::Int64))
                    .field(FieldDescriptor::new("ratio", 2, ScalarKind::Float))
                    .field(FieldDescriptor::new("blob", 3, ScalarKind::Bytes))
                    .field(FieldDescriptor::new("level", 4, FieldType::enumeration("t.Level")))
                    .field(FieldDescriptor::new("labels", 5, ScalarKind::String).repeated())
                    .field(FieldDescriptor::new("counts", 6, ScalarKind::UInt32).map(ScalarKind::Int32))
                    .field(FieldDescriptor::new("small", 7, ScalarKind::Int32))
                    .field(FieldDescriptor::new("child", 8, FieldType::message("t.Row")))
                    .oneof(
                        "pick",
                        vec![
                            FieldDescriptor::new("a", 9, ScalarKind::String),
                            FieldDescriptor::new("b", 10, ScalarKind::String),
                        ],
                    ),
            )
            .build()
            .unwrap()
    }

    fn decode(text: &str) -> Result<Message, DecodeError> {
        JsonDecoder::new().decode(&registry(), "t.Row", text)
    }

    #[test]
    fn accepts_both_spellings() {
        let a = decode(r#"{"row_id": "7", "level": "HIGH", "small": "3"}"#).unwrap();
        let b = decode(r#"{"rowId": 7, "level": 1, "small": 3.0}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("row_id").unwrap().as_i64(), Some(7));
    }

    #[test]
    fn special_floats_and_bytes() {
        let msg = decode(r#"{"ratio": "-Infinity", "blob": "3q2-7w"}"#).unwrap();
        assert_eq!(msg.get("ratio").unwrap().as_f32(), Some(f32::NEG_INFINITY));
        assert_eq!(msg.get("blob").unwrap().as_bytes(), Some(&[0xde, 0xad, 0xbe, 0xef][..]));
        let msg = decode(r#"{"ratio": "NaN"}"#).unwrap();
        assert!(msg.get("ratio").unwrap().as_f32().unwrap().is_nan());
    }

    #[test]
    fn float_extremes_read_back() {
        let registry = registry();
        for v in [f32::MAX, f32::MIN, f32::MIN_POSITIVE, -f32::MIN_POSITIVE, 1e-45, -0.0] {
            let mut msg = Message::new(&registry, "t.Row").unwrap();
            msg.set("ratio", v).unwrap();
            let text = crate::JsonEncoder::new().encode(&msg);
            let back = JsonDecoder::new().decode(&registry, "t.Row", &text).unwrap();
            assert_eq!(back, msg, "{text}");
        }
        assert_eq!(
            decode(r#"{"ratio": 1e39}"#).unwrap_err(),
            range_error("$.ratio", ScalarKind::Float)
        );
        let msg = decode(r#"{"ratio": 3.4028235e38}"#).unwrap();
        assert_eq!(msg.get("ratio").unwrap().as_f32(), Some(f32::MAX));
    }

    #[test]
    fn null_means_absent() {
        let msg = decode(r#"{"row_id": null, "child": null, "labels": null}"#).unwrap();
        assert!(msg.is_empty());
    }

    #[test]
    fn unknown_keys() {
        assert!(decode(r#"{"nope": [1, 2]}"#).unwrap().is_empty());
        let strict = JsonDecoder::with_options(JsonOptions {
            ignore_unknown_fields: false,
            ..Default::default()
        });
        let err = strict.decode(&registry(), "t.Row", r#"{"child": {"nope": 1}}"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnknownJsonField {
                path: "$.child".into(),
                key: "nope".into()
            }
        );
    }

    #[test]
    fn error_paths() {
        let cases: Vec<(&str, DecodeError)> = vec![
            (r#"{"child": "x"}"#, type_error("$.child", "object")),
            (r#"{"labels": [1]}"#, type_error("$.labels[0]", "string")),
            (r#"{"small": 3000000000}"#, range_error("$.small", ScalarKind::Int32)),
            (r#"{"small": 1.5}"#, type_error("$.small", "integer")),
            (r#"{"counts": {"x": 1}}"#, type_error("$.counts.x", "integer")),
            (r#"{"counts": {"1": -1}}"#, range_error("$.counts.1", ScalarKind::UInt32)),
            (r#"{"blob": "*"}"#, DecodeError::InvalidBase64 { path: "$.blob".into() }),
            (
                r#"{"child": {"level": "MID"}}"#,
                DecodeError::UnknownEnumName {
                    path: "$.child.level".into(),
                    enum_name: "t.Level".into(),
                    name: "MID".into(),
                },
            ),
            (
                r#"{"a": "x", "b": "y"}"#,
                DecodeError::DuplicateOneof { path: "$".into(), oneof: "pick".into() },
            ),
            ("[]", type_error("$", "object")),
        ];
        for (text, expected) in cases {
            assert_eq!(decode(text).unwrap_err(), expected, "{text}");
        }
    }

    #[test]
    fn syntax_errors_report_position() {
        let err = decode("{\n  \"rowId\": }").unwrap_err();
        assert!(matches!(err, DecodeError::JsonSyntax { line: 2, .. }), "{err:?}");
    }

    #[test]
    fn recursion_limit() {
        let decoder = JsonDecoder::with_options(JsonOptions {
            recursion_limit: 1,
            ..Default::default()
        });
        let err = decoder
            .decode(&registry(), "t.Row", r#"{"child": {"child": {}}}"#)
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::JsonRecursionLimit { path: "$.child.child".into(), limit: 1 }
        );
    }
}
