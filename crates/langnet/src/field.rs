//! Conversion of one record field to and from a message field.

use std::collections::BTreeMap;

use langnet_codec::{Message, Value, ValueError};

use crate::{Record, RecordError};

/// A Rust type that can stand for one message field, addressed by tag.
pub trait Field: Sized {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError>;
    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError>;
}

fn mismatch(message: &Message, tag: u32, expected: &str, actual: &Value) -> RecordError {
    let field = message
        .field(tag)
        .map(|f| f.name.clone())
        .unwrap_or_else(|_| format!("#{tag}"));
    RecordError::Value(ValueError::TypeMismatch {
        field,
        expected: expected.to_owned(),
        actual: actual.kind_name(),
    })
}

impl Field for String {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        let value = message.get(tag)?;
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| mismatch(message, tag, "string", &value))
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set(tag, self.as_str())?)
    }
}

impl Field for i32 {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        match &*message.get(tag)? {
            Value::I32(v) => Ok(*v),
            other => Err(mismatch(message, tag, "int32", other)),
        }
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set(tag, *self)?)
    }
}

impl Field for i64 {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        match &*message.get(tag)? {
            Value::I64(v) => Ok(*v),
            other => Err(mismatch(message, tag, "int64", other)),
        }
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set(tag, *self)?)
    }
}

impl Field for Vec<String> {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        message
            .get_list(tag)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| mismatch(message, tag, "string", v))
            })
            .collect()
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set_list(tag, self.iter().map(String::as_str))?)
    }
}

impl Field for BTreeMap<String, String> {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        let mut out = BTreeMap::new();
        for (key, value) in message.get_map(tag)? {
            let key = key.as_str().ok_or_else(|| mismatch(message, tag, "string key", &key.to_value()))?;
            let value = value.as_str().ok_or_else(|| mismatch(message, tag, "string", value))?;
            out.insert(key.to_owned(), value.to_owned());
        }
        Ok(out)
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        Ok(message.set_map(tag, self.iter().map(|(k, v)| (k.as_str(), v.as_str())))?)
    }
}

impl<T: Record> Field for Option<T> {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        if !message.has(tag)? {
            return Ok(None);
        }
        let value = message.get(tag)?;
        let nested = value
            .as_message()
            .ok_or_else(|| mismatch(message, tag, T::TYPE_NAME, &value))?;
        T::from_message(nested).map(Some)
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        match self {
            Some(record) => {
                let nested = record.to_message(message.registry())?;
                Ok(message.set(tag, nested)?)
            }
            None => Ok(message.clear(tag)?),
        }
    }
}

impl<T: Record> Field for Vec<T> {
    fn read(message: &Message, tag: u32) -> Result<Self, RecordError> {
        message
            .get_list(tag)?
            .iter()
            .map(|v| match v.as_message() {
                Some(nested) => T::from_message(nested),
                None => Err(mismatch(message, tag, T::TYPE_NAME, v)),
            })
            .collect()
    }

    fn write(&self, message: &mut Message, tag: u32) -> Result<(), RecordError> {
        let registry = message.registry().clone();
        let nested = self
            .iter()
            .map(|record| record.to_message(&registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(message.set_list(tag, nested)?)
    }
}
