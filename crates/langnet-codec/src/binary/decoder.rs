//! `BinaryDecoder`: bytes to message.

use langnet_buffers::{zigzag_decode32, zigzag_decode64, Reader};
use langnet_schema::{FieldDescriptor, FieldType, Registry, ScalarKind, SchemaError, WireKind, MAX_TAG};
use tracing::{debug, trace};

use crate::{BinaryOptions, DecodeError, MapKey, Message, UnknownField, Value};

/// Reads messages from the binary encoding.
///
/// Decoding never panics on malformed input; every failure is reported as a
/// [`DecodeError`] carrying the byte offset where it was detected.
#[derive(Debug, Clone, Default)]
pub struct BinaryDecoder {
    options: BinaryOptions,
}

impl BinaryDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BinaryOptions) -> Self {
        Self { options }
    }

    /// Decodes `data` as a fresh instance of `type_name`.
    pub fn decode(
        &self,
        registry: &Registry,
        type_name: &str,
        data: &[u8],
    ) -> Result<Message, DecodeError> {
        let mut message = Message::new(registry, type_name)?;
        self.merge(&mut message, data)?;
        Ok(message)
    }

    /// Merges `data` into `target`.
    ///
    /// Either every field in `data` is applied or, on error, `target` is
    /// left exactly as it was.
    pub fn decode_into(&self, target: &mut Message, data: &[u8]) -> Result<(), DecodeError> {
        let mut scratch = target.clone();
        self.merge(&mut scratch, data)?;
        *target = scratch;
        Ok(())
    }

    fn merge(&self, message: &mut Message, data: &[u8]) -> Result<(), DecodeError> {
        let mut reader = Reader::new(data);
        self.read_message(message, &mut reader, 0).map_err(|err| {
            debug!(message = message.type_name(), error = %err, "binary decode failed");
            err
        })
    }

    fn read_message(
        &self,
        message: &mut Message,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let schema = message.schema_handle();
        while !reader.is_empty() {
            let offset = reader.x;
            let key = reader.varint()?;
            let tag = key >> 3;
            let wire = (key & 0x07) as u8;
            if tag == 0 || tag > MAX_TAG as u64 {
                return Err(DecodeError::InvalidTag { offset, tag });
            }
            let wire = WireKind::from_u8(wire).ok_or(DecodeError::UnknownWireKind { offset, wire })?;
            let number = tag as u32;
            match schema.field_by_tag(number) {
                Some(field) => self.read_field(message, field, wire, offset, reader, depth)?,
                None => {
                    let data = skip_payload(reader, wire)?;
                    trace!(
                        message = schema.full_name(),
                        tag = number,
                        wire = wire.as_str(),
                        "preserving unknown field"
                    );
                    message.unknown_fields_mut().push(UnknownField {
                        number,
                        wire_kind: wire,
                        data: data.to_vec(),
                    });
                }
            }
        }
        Ok(())
    }

    fn read_field(
        &self,
        message: &mut Message,
        field: &FieldDescriptor,
        wire: WireKind,
        offset: usize,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<(), DecodeError> {
        let expected = field.ty.wire_kind();

        if let Some(key_kind) = field.map_key() {
            check_wire(field, WireKind::LengthDelimited, wire, offset)?;
            let mut entry = read_length(reader)?;
            let (key, value) = self.read_map_entry(message, field, key_kind, &mut entry, depth)?;
            message.insert_unchecked(field.number, key, value);
            return Ok(());
        }

        if field.is_repeated() {
            if wire == WireKind::LengthDelimited && field.ty.is_packable() {
                let mut packed = read_length(reader)?;
                while !packed.is_empty() {
                    let value = self.read_value(message.registry(), field, &mut packed, depth)?;
                    message.push_unchecked(field.number, value);
                }
            } else {
                check_wire(field, expected, wire, offset)?;
                let value = self.read_value(message.registry(), field, reader, depth)?;
                message.push_unchecked(field.number, value);
            }
            return Ok(());
        }

        check_wire(field, expected, wire, offset)?;
        if let FieldType::Message(_) = field.ty {
            // A repeated occurrence of a singular message merges into it.
            let mut body = read_length(reader)?;
            self.check_depth(depth, offset)?;
            let mut nested = match message.take_message(field.number) {
                Some(existing) => existing,
                None => message.new_nested(field)?,
            };
            self.read_message(&mut nested, &mut body, depth + 1)?;
            message.put_single(field, Value::Message(Box::new(nested)))?;
        } else {
            let value = self.read_value(message.registry(), field, reader, depth)?;
            message.put_single(field, value)?;
        }
        Ok(())
    }

    fn read_map_entry(
        &self,
        message: &Message,
        field: &FieldDescriptor,
        key_kind: ScalarKind,
        entry: &mut Reader<'_>,
        depth: usize,
    ) -> Result<(MapKey, Value), DecodeError> {
        let mut key = Value::zero(key_kind);
        let mut value = message.default_value(field)?;
        while !entry.is_empty() {
            let offset = entry.x;
            let header = entry.varint()?;
            let wire = (header & 0x07) as u8;
            let wire = WireKind::from_u8(wire).ok_or(DecodeError::UnknownWireKind { offset, wire })?;
            match header >> 3 {
                1 => {
                    check_wire(field, key_kind.wire_kind(), wire, offset)?;
                    key = read_scalar(key_kind, field, entry)?;
                }
                2 => {
                    check_wire(field, field.ty.wire_kind(), wire, offset)?;
                    value = self.read_value(message.registry(), field, entry, depth)?;
                }
                0 => return Err(DecodeError::InvalidTag { offset, tag: 0 }),
                _ => {
                    skip_payload(entry, wire)?;
                }
            }
        }
        let key = MapKey::from_value(key).ok_or_else(|| SchemaError::InvalidMapKey {
            message: message.type_name().to_owned(),
            field: field.name.clone(),
            key: key_kind.as_str(),
        })?;
        Ok((key, value))
    }

    /// Reads one element payload of `field`'s type.
    fn read_value(
        &self,
        registry: &Registry,
        field: &FieldDescriptor,
        reader: &mut Reader<'_>,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match &field.ty {
            FieldType::Scalar(kind) => read_scalar(*kind, field, reader),
            // Enum numbers travel as int32; wider values are truncated.
            FieldType::Enum(_) => Ok(Value::Enum(reader.varint()? as i32)),
            FieldType::Message(name) => {
                let offset = reader.x;
                let mut body = read_length(reader)?;
                self.check_depth(depth, offset)?;
                let mut nested = Message::new(registry, name)?;
                self.read_message(&mut nested, &mut body, depth + 1)?;
                Ok(Value::Message(Box::new(nested)))
            }
        }
    }

    fn check_depth(&self, depth: usize, offset: usize) -> Result<(), DecodeError> {
        let limit = self.options.recursion_limit;
        if depth + 1 > limit {
            return Err(DecodeError::RecursionLimit { offset, limit });
        }
        Ok(())
    }
}

fn check_wire(
    field: &FieldDescriptor,
    expected: WireKind,
    actual: WireKind,
    offset: usize,
) -> Result<(), DecodeError> {
    if expected == actual {
        return Ok(());
    }
    Err(DecodeError::WireKindMismatch {
        offset,
        field: field.name.clone(),
        expected: expected.as_str(),
        actual: actual.as_str(),
    })
}

/// Reads a length prefix and returns a reader over the payload.
fn read_length<'a>(reader: &mut Reader<'a>) -> Result<Reader<'a>, DecodeError> {
    let offset = reader.x;
    let len = reader.varint()?;
    let remaining = reader.size();
    if len > remaining as u64 {
        return Err(DecodeError::LengthOverflow {
            offset,
            len,
            remaining,
        });
    }
    Ok(reader.cut(len as usize)?)
}

/// Skips one payload and returns its raw bytes, length prefix included.
fn skip_payload<'a>(reader: &mut Reader<'a>, wire: WireKind) -> Result<&'a [u8], DecodeError> {
    let start = reader.x;
    match wire {
        WireKind::Varint => {
            reader.varint()?;
        }
        WireKind::Fixed64 => reader.skip(8)?,
        WireKind::Fixed32 => reader.skip(4)?,
        WireKind::LengthDelimited => {
            read_length(reader)?;
        }
    }
    Ok(&reader.uint8[start..reader.x])
}

fn read_scalar(
    kind: ScalarKind,
    field: &FieldDescriptor,
    reader: &mut Reader<'_>,
) -> Result<Value, DecodeError> {
    use ScalarKind::*;
    Ok(match kind {
        Int32 => Value::I32(reader.varint()? as i32),
        Int64 => Value::I64(reader.varint()? as i64),
        UInt32 => Value::U32(reader.varint()? as u32),
        UInt64 => Value::U64(reader.varint()?),
        SInt32 => Value::I32(zigzag_decode32(reader.varint()? as u32)),
        SInt64 => Value::I64(zigzag_decode64(reader.varint()?)),
        Bool => Value::Bool(reader.varint()? != 0),
        Fixed32 => Value::U32(reader.u32()?),
        SFixed32 => Value::I32(reader.u32()? as i32),
        Float => Value::F32(reader.f32()?),
        Fixed64 => Value::U64(reader.u64()?),
        SFixed64 => Value::I64(reader.u64()? as i64),
        Double => Value::F64(reader.f64()?),
        String => {
            let offset = reader.x;
            let mut body = read_length(reader)?;
            let text = body
                .utf8(body.size())
                .map_err(|_| DecodeError::InvalidUtf8 {
                    offset,
                    field: field.name.clone(),
                })?;
            Value::String(text.to_owned())
        }
        Bytes => {
            let mut body = read_length(reader)?;
            Value::Bytes(body.buf(body.size())?.to_vec())
        }
    })
}
