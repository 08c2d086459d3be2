//! Fields read from the wire that the schema does not declare.

use langnet_buffers::Reader;
use langnet_schema::WireKind;

/// One unrecognized field, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField {
    pub number: u32,
    pub wire_kind: WireKind,
    /// Payload bytes exactly as they followed the field header, including
    /// the length prefix of length-delimited payloads.
    pub data: Vec<u8>,
}

impl UnknownField {
    /// Decodes the payload as a varint, if it is one.
    pub fn varint(&self) -> Option<u64> {
        if self.wire_kind != WireKind::Varint {
            return None;
        }
        Reader::new(&self.data).varint().ok()
    }

    /// Contents of a length-delimited payload, without its prefix.
    pub fn length_delimited(&self) -> Option<&[u8]> {
        if self.wire_kind != WireKind::LengthDelimited {
            return None;
        }
        Reader::new(&self.data).length_delimited().ok()
    }
}

/// Unrecognized fields in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnknownFields {
    fields: Vec<UnknownField>,
}

impl UnknownFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: UnknownField) {
        self.fields.push(field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UnknownField> {
        self.fields.iter()
    }

    /// All entries recorded for `number`.
    pub fn get(&self, number: u32) -> impl Iterator<Item = &UnknownField> + '_ {
        self.fields.iter().filter(move |f| f.number == number)
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

impl<'a> IntoIterator for &'a UnknownFields {
    type Item = &'a UnknownField;
    type IntoIter = std::slice::Iter<'a, UnknownField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
