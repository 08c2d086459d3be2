//! `BinaryEncoder`: message to bytes.

use langnet_buffers::{zigzag_encode32, zigzag_encode64, Writer};
use langnet_schema::{FieldDescriptor, FieldType, ScalarKind, WireKind};

use super::header;
use crate::{BinaryOptions, FieldValue, MapKey, Message, Value};

/// Writes messages in the binary encoding.
///
/// Encoding cannot fail: a [`Message`] only ever holds values that agree
/// with its schema.
pub struct BinaryEncoder {
    pub writer: Writer,
    options: BinaryOptions,
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self::with_options(BinaryOptions::default())
    }

    pub fn with_options(options: BinaryOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
        }
    }

    pub fn options(&self) -> &BinaryOptions {
        &self.options
    }

    /// Encodes a message and returns the bytes.
    pub fn encode(&mut self, message: &Message) -> Vec<u8> {
        self.writer.reset();
        self.write_message(message);
        self.writer.flush()
    }

    /// Appends the fields of `message` to the writer, without a length prefix.
    pub fn write_message(&mut self, message: &Message) {
        for (field, value) in message.iter() {
            match value {
                FieldValue::Single(v) => self.write_field(field.number, &field.ty, v),
                FieldValue::List(items) => self.write_list(field, items),
                FieldValue::Map(map) => {
                    let Some(key_kind) = field.map_key() else {
                        continue;
                    };
                    for (key, value) in map {
                        self.write_map_entry(field, key_kind, key, value);
                    }
                }
            }
        }
        for unknown in message.unknown_fields() {
            self.write_header(unknown.number, unknown.wire_kind);
            self.writer.buf(&unknown.data);
        }
    }

    fn write_header(&mut self, number: u32, wire: WireKind) {
        self.writer.varint(header(number, wire.as_u8()));
    }

    fn write_field(&mut self, number: u32, ty: &FieldType, value: &Value) {
        self.write_header(number, ty.wire_kind());
        self.write_payload(ty, value);
    }

    fn write_list(&mut self, field: &FieldDescriptor, items: &[Value]) {
        if items.is_empty() {
            return;
        }
        if field.is_packed(self.options.pack_repeated) {
            self.write_header(field.number, WireKind::LengthDelimited);
            self.write_nested(|enc| {
                for item in items {
                    enc.write_payload(&field.ty, item);
                }
            });
        } else {
            for item in items {
                self.write_field(field.number, &field.ty, item);
            }
        }
    }

    fn write_map_entry(
        &mut self,
        field: &FieldDescriptor,
        key_kind: ScalarKind,
        key: &MapKey,
        value: &Value,
    ) {
        self.write_header(field.number, WireKind::LengthDelimited);
        self.write_nested(|enc| {
            let key_ty = FieldType::Scalar(key_kind);
            enc.write_field(1, &key_ty, &key.to_value());
            enc.write_field(2, &field.ty, value);
        });
    }

    /// Runs `body` against an empty buffer and writes the result with a
    /// length prefix.
    fn write_nested(&mut self, body: impl FnOnce(&mut Self)) {
        let outer = std::mem::take(&mut self.writer.uint8);
        body(self);
        let inner = std::mem::replace(&mut self.writer.uint8, outer);
        self.writer.length_delimited(&inner);
    }

    fn write_payload(&mut self, ty: &FieldType, value: &Value) {
        match (ty, value) {
            (FieldType::Scalar(kind), value) => self.write_scalar(*kind, value),
            // Negative enum numbers are sign-extended to ten bytes.
            (FieldType::Enum(_), Value::Enum(n)) => self.writer.varint(*n as i64 as u64),
            (FieldType::Message(_), Value::Message(m)) => {
                self.write_nested(|enc| enc.write_message(m));
            }
            // Values are checked against the schema on insertion.
            _ => {}
        }
    }

    fn write_scalar(&mut self, kind: ScalarKind, value: &Value) {
        use ScalarKind::*;
        let w = &mut self.writer;
        match (kind, value) {
            (Int32, Value::I32(v)) => w.varint(*v as i64 as u64),
            (Int64, Value::I64(v)) => w.varint(*v as u64),
            (UInt32, Value::U32(v)) => w.varint(*v as u64),
            (UInt64, Value::U64(v)) => w.varint(*v),
            (SInt32, Value::I32(v)) => w.varint(zigzag_encode32(*v) as u64),
            (SInt64, Value::I64(v)) => w.varint(zigzag_encode64(*v)),
            (Bool, Value::Bool(b)) => w.varint(*b as u64),
            (Fixed32, Value::U32(v)) => w.u32(*v),
            (SFixed32, Value::I32(v)) => w.u32(*v as u32),
            (Float, Value::F32(v)) => w.f32(*v),
            (Fixed64, Value::U64(v)) => w.u64(*v),
            (SFixed64, Value::I64(v)) => w.u64(*v as u64),
            (Double, Value::F64(v)) => w.f64(*v),
            (String, Value::String(s)) => w.length_delimited(s.as_bytes()),
            (Bytes, Value::Bytes(b)) => w.length_delimited(b),
            _ => {}
        }
    }
}
