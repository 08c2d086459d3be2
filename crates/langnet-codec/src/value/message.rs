//! Message instances.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use langnet_schema::{
    DefaultValue, FieldDescriptor, FieldType, MessageSchema, Registry, ScalarKind,
    SchemaError,
};

use super::{FieldKey, FieldValue, MapKey, MapValue, UnknownFields, Value, ValueError};

static EMPTY_MAP: MapValue = BTreeMap::new();

/// A message instance bound to its schema.
///
/// The instance owns its nested messages and containers; `clone` is a deep
/// copy. Absent fields read back as their declared default. Equality is
/// structural: repeated fields compare in order, maps compare as sets of
/// entries, and unknown fields take part.
///
/// # Example
///
/// ```
/// use langnet_codec::{Message, Value};
/// use langnet_schema::langnet;
///
/// let registry = langnet::registry().unwrap();
/// let mut request = Message::new(&registry, langnet::SEARCH_REQUEST).unwrap();
/// request.set("query", "protocol buffers").unwrap();
/// request.set("page_number", 1).unwrap();
///
/// assert_eq!(request.get("query").unwrap().as_str(), Some("protocol buffers"));
/// assert_eq!(request.get("results_per_page").unwrap().as_i32(), Some(0));
/// assert!(request.set("page_number", "one").is_err());
/// ```
#[derive(Clone)]
pub struct Message {
    registry: Registry,
    schema: Arc<MessageSchema>,
    fields: BTreeMap<u32, FieldValue>,
    unknown: UnknownFields,
}

impl Message {
    /// Creates an empty instance of `type_name`.
    pub fn new(registry: &Registry, type_name: &str) -> Result<Self, SchemaError> {
        let schema = registry.resolve(type_name)?;
        Ok(Self::with_schema(registry.clone(), schema))
    }

    pub fn with_schema(registry: Registry, schema: Arc<MessageSchema>) -> Self {
        Self {
            registry,
            schema,
            fields: BTreeMap::new(),
            unknown: UnknownFields::new(),
        }
    }

    pub fn schema(&self) -> &MessageSchema {
        &self.schema
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub(crate) fn schema_handle(&self) -> Arc<MessageSchema> {
        Arc::clone(&self.schema)
    }

    /// Fully-qualified type name.
    pub fn type_name(&self) -> &str {
        self.schema.full_name()
    }

    /// Empty instance of the message type a field refers to.
    pub fn new_nested(&self, field: &FieldDescriptor) -> Result<Message, SchemaError> {
        match &field.ty {
            FieldType::Message(name) => Message::new(&self.registry, name),
            _ => Err(SchemaError::UnknownType(field.ty.type_name().to_owned())),
        }
    }

    /// Descriptor of a field of this message.
    pub fn field<K: FieldKey>(&self, key: K) -> Result<&FieldDescriptor, ValueError> {
        lookup(&self.schema, &key)
    }

    // ------------------------------------------------------------------ reads

    /// Value of a singular field, or its default when absent.
    pub fn get<K: FieldKey>(&self, key: K) -> Result<Cow<'_, Value>, ValueError> {
        let field = self.field(key)?;
        if !field.is_singular() {
            return Err(wrong_label(field, "singular"));
        }
        match self.fields.get(&field.number) {
            Some(FieldValue::Single(v)) => Ok(Cow::Borrowed(v)),
            _ => Ok(Cow::Owned(self.default_value(field)?)),
        }
    }

    /// Elements of a repeated field; empty when absent.
    pub fn get_list<K: FieldKey>(&self, key: K) -> Result<&[Value], ValueError> {
        let field = self.field(key)?;
        if !field.is_repeated() {
            return Err(wrong_label(field, "repeated"));
        }
        match self.fields.get(&field.number) {
            Some(FieldValue::List(items)) => Ok(items),
            _ => Ok(&[]),
        }
    }

    /// Entries of a map field; empty when absent.
    pub fn get_map<K: FieldKey>(&self, key: K) -> Result<&MapValue, ValueError> {
        let field = self.field(key)?;
        if !field.is_map() {
            return Err(wrong_label(field, "a map"));
        }
        match self.fields.get(&field.number) {
            Some(FieldValue::Map(map)) => Ok(map),
            _ => Ok(&EMPTY_MAP),
        }
    }

    /// Whether a field is present. Containers are present when non-empty.
    pub fn has<K: FieldKey>(&self, key: K) -> Result<bool, ValueError> {
        let field = self.field(key)?;
        Ok(self.fields.contains_key(&field.number))
    }

    /// The set member of a oneof group, if any.
    pub fn which_oneof(&self, oneof: &str) -> Result<Option<&FieldDescriptor>, ValueError> {
        let index = self
            .schema
            .oneof_index(oneof)
            .ok_or_else(|| ValueError::NoSuchOneof {
                message: self.schema.full_name().to_owned(),
                oneof: oneof.to_owned(),
            })?;
        Ok(self
            .schema
            .oneof_fields(index)
            .find(|f| self.fields.contains_key(&f.number)))
    }

    /// Default value of a singular field.
    pub fn default_value(&self, field: &FieldDescriptor) -> Result<Value, SchemaError> {
        Ok(match (&field.ty, &field.default) {
            (FieldType::Scalar(kind), None) => Value::zero(*kind),
            (FieldType::Scalar(kind), Some(default)) => scalar_default(*kind, default),
            (FieldType::Enum(name), default) => {
                let schema = self.registry.resolve_enum(name)?;
                let number = match default {
                    Some(DefaultValue::Enum(value)) => schema.number_of(value),
                    _ => None,
                };
                Value::Enum(number.unwrap_or_else(|| schema.default_number()))
            }
            (FieldType::Message(_), _) => Value::Message(Box::new(self.new_nested(field)?)),
        })
    }

    /// Raw contents of a present field.
    pub fn value_of(&self, number: u32) -> Option<&FieldValue> {
        self.fields.get(&number)
    }

    /// Present fields in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &FieldValue)> + '_ {
        self.schema.fields_by_tag().filter_map(move |field| {
            self.fields.get(&field.number).map(|value| (field, value))
        })
    }

    /// No known field is present and no unknown field was kept.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.unknown.is_empty()
    }

    pub fn unknown_fields(&self) -> &UnknownFields {
        &self.unknown
    }

    pub fn unknown_fields_mut(&mut self) -> &mut UnknownFields {
        &mut self.unknown
    }

    // ----------------------------------------------------------------- writes

    /// Sets a singular field.
    ///
    /// Setting a oneof member clears the other members. On a field with
    /// implicit presence, setting the default value clears the field.
    pub fn set<K: FieldKey>(&mut self, key: K, value: impl Into<Value>) -> Result<(), ValueError> {
        let value = value.into();
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        if !field.is_singular() {
            return Err(wrong_label(field, "singular"));
        }
        check_type(field, &value)?;
        self.put_single(field, value)?;
        Ok(())
    }

    /// Removes a field of any label.
    pub fn clear<K: FieldKey>(&mut self, key: K) -> Result<(), ValueError> {
        let number = lookup(&self.schema, &key)?.number;
        self.fields.remove(&number);
        Ok(())
    }

    /// Removes every field, known and unknown.
    pub fn clear_all(&mut self) {
        self.fields.clear();
        self.unknown.clear();
    }

    /// Appends to a repeated field.
    pub fn push<K: FieldKey>(&mut self, key: K, value: impl Into<Value>) -> Result<(), ValueError> {
        let value = value.into();
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        if !field.is_repeated() {
            return Err(wrong_label(field, "repeated"));
        }
        check_type(field, &value)?;
        self.push_unchecked(number, value);
        Ok(())
    }

    /// Replaces the contents of a repeated field.
    pub fn set_list<K: FieldKey, V: Into<Value>>(
        &mut self,
        key: K,
        values: impl IntoIterator<Item = V>,
    ) -> Result<(), ValueError> {
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        if !field.is_repeated() {
            return Err(wrong_label(field, "repeated"));
        }
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        for value in &values {
            check_type(field, value)?;
        }
        if values.is_empty() {
            self.fields.remove(&number);
        } else {
            self.fields.insert(number, FieldValue::List(values));
        }
        Ok(())
    }

    /// Inserts or replaces a map entry.
    pub fn insert<K: FieldKey>(
        &mut self,
        key: K,
        map_key: impl Into<MapKey>,
        value: impl Into<Value>,
    ) -> Result<(), ValueError> {
        let map_key = map_key.into();
        let value = value.into();
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        let Some(key_kind) = field.map_key() else {
            return Err(wrong_label(field, "a map"));
        };
        if !map_key.matches(key_kind) {
            return Err(ValueError::InvalidMapKey {
                field: field.name.clone(),
                expected: key_kind.as_str(),
                actual: map_key.kind_name(),
            });
        }
        check_type(field, &value)?;
        self.insert_unchecked(number, map_key, value);
        Ok(())
    }

    /// Replaces the contents of a map field.
    pub fn set_map<K: FieldKey, MK: Into<MapKey>, V: Into<Value>>(
        &mut self,
        key: K,
        entries: impl IntoIterator<Item = (MK, V)>,
    ) -> Result<(), ValueError> {
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        if !field.is_map() {
            return Err(wrong_label(field, "a map"));
        }
        let previous = self.fields.remove(&number);
        for (k, v) in entries {
            if let Err(err) = self.insert(number, k, v) {
                match previous {
                    Some(previous) => self.fields.insert(number, previous),
                    None => self.fields.remove(&number),
                };
                return Err(err);
            }
        }
        Ok(())
    }

    /// Mutable access to a singular message field, created empty when absent.
    pub fn message_mut<K: FieldKey>(&mut self, key: K) -> Result<&mut Message, ValueError> {
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        if !field.is_singular() || !matches!(field.ty, FieldType::Message(_)) {
            return Err(wrong_label(field, "a singular message"));
        }
        if !self.fields.contains_key(&number) {
            let nested = self.new_nested(field)?;
            self.clear_oneof_siblings(field);
            self.fields
                .insert(number, FieldValue::Single(Value::Message(Box::new(nested))));
        }
        match self.fields.get_mut(&number) {
            Some(FieldValue::Single(Value::Message(m))) => Ok(m),
            _ => Err(wrong_label(field, "a singular message")),
        }
    }

    /// Appends an empty element to a repeated message field and returns it.
    pub fn push_message<K: FieldKey>(&mut self, key: K) -> Result<&mut Message, ValueError> {
        let schema = Arc::clone(&self.schema);
        let field = lookup(&schema, &key)?;
        let number = field.number;
        if !field.is_repeated() || !matches!(field.ty, FieldType::Message(_)) {
            return Err(wrong_label(field, "a repeated message"));
        }
        let nested = self.new_nested(field)?;
        let entry = self
            .fields
            .entry(number)
            .or_insert_with(|| FieldValue::List(Vec::new()));
        match entry {
            FieldValue::List(items) => {
                items.push(Value::Message(Box::new(nested)));
                match items.last_mut() {
                    Some(Value::Message(m)) => Ok(m),
                    _ => Err(wrong_label(field, "a repeated message")),
                }
            }
            _ => Err(wrong_label(field, "a repeated message")),
        }
    }

    // ------------------------------------------------------- decoder helpers

    /// Stores a type-checked singular value, applying oneof and presence rules.
    pub(crate) fn put_single(
        &mut self,
        field: &FieldDescriptor,
        value: Value,
    ) -> Result<(), SchemaError> {
        self.clear_oneof_siblings(field);
        if !field.has_explicit_presence() && value == self.default_value(field)? {
            self.fields.remove(&field.number);
        } else {
            self.fields.insert(field.number, FieldValue::Single(value));
        }
        Ok(())
    }

    /// Takes the current nested message of a singular message field, for merging.
    pub(crate) fn take_message(&mut self, number: u32) -> Option<Message> {
        match self.fields.remove(&number) {
            Some(FieldValue::Single(Value::Message(m))) => Some(*m),
            Some(other) => {
                self.fields.insert(number, other);
                None
            }
            None => None,
        }
    }

    pub(crate) fn push_unchecked(&mut self, number: u32, value: Value) {
        match self
            .fields
            .entry(number)
            .or_insert_with(|| FieldValue::List(Vec::new()))
        {
            FieldValue::List(items) => items.push(value),
            slot => *slot = FieldValue::List(vec![value]),
        }
    }

    pub(crate) fn insert_unchecked(&mut self, number: u32, key: MapKey, value: Value) {
        match self
            .fields
            .entry(number)
            .or_insert_with(|| FieldValue::Map(MapValue::new()))
        {
            FieldValue::Map(map) => {
                map.insert(key, value);
            }
            slot => {
                let mut map = MapValue::new();
                map.insert(key, value);
                *slot = FieldValue::Map(map);
            }
        }
    }

    fn clear_oneof_siblings(&mut self, field: &FieldDescriptor) {
        if let Some(index) = field.oneof {
            let siblings: Vec<u32> = self
                .schema
                .oneof_fields(index)
                .map(|f| f.number)
                .filter(|&n| n != field.number)
                .collect();
            for number in siblings {
                self.fields.remove(&number);
            }
        }
    }
}

fn lookup<'s, K: FieldKey>(
    schema: &'s MessageSchema,
    key: &K,
) -> Result<&'s FieldDescriptor, ValueError> {
    key.lookup(schema).ok_or_else(|| ValueError::NoSuchField {
        message: schema.full_name().to_owned(),
        field: key.describe(),
    })
}

fn wrong_label(field: &FieldDescriptor, expected: &'static str) -> ValueError {
    ValueError::WrongLabel {
        field: field.name.clone(),
        expected,
    }
}

fn check_type(field: &FieldDescriptor, value: &Value) -> Result<(), ValueError> {
    if value.matches(&field.ty) {
        Ok(())
    } else {
        Err(ValueError::TypeMismatch {
            field: field.name.clone(),
            expected: field.ty.type_name().to_owned(),
            actual: value.kind_name(),
        })
    }
}

fn scalar_default(kind: ScalarKind, default: &DefaultValue) -> Value {
    use ScalarKind::*;
    match (kind, default) {
        (Bool, DefaultValue::Bool(b)) => Value::Bool(*b),
        (Int32 | SInt32 | SFixed32, DefaultValue::Int(v)) => Value::I32(*v as i32),
        (Int64 | SInt64 | SFixed64, DefaultValue::Int(v)) => Value::I64(*v),
        (UInt32 | Fixed32, DefaultValue::UInt(v)) => Value::U32(*v as u32),
        (UInt64 | Fixed64, DefaultValue::UInt(v)) => Value::U64(*v),
        (Float, DefaultValue::Float(v)) => Value::F32(*v as f32),
        (Double, DefaultValue::Float(v)) => Value::F64(*v),
        (String, DefaultValue::Str(s)) => Value::String(s.clone()),
        (Bytes, DefaultValue::Bytes(b)) => Value::Bytes(b.clone()),
        // Registration rejects mismatched defaults.
        (kind, _) => Value::zero(kind),
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.schema.full_name() == other.schema.full_name()
            && self.fields == other.fields
            && self.unknown == other.unknown
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(self.schema.name());
        for (field, value) in self.iter() {
            match value {
                FieldValue::Single(v) => s.field(&field.name, v),
                FieldValue::List(items) => s.field(&field.name, items),
                FieldValue::Map(map) => s.field(&field.name, map),
            };
        }
        if !self.unknown.is_empty() {
            s.field("unknown", &self.unknown);
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langnet_schema::{EnumBuilder, FieldDescriptor, MessageBuilder};

    fn registry() -> Registry {
        Registry::builder()
            .enumeration(EnumBuilder::new("t.Mood").value("CALM", 0).value("HAPPY", 1))
            .message(
                MessageBuilder::new("t.Inner").field(FieldDescriptor::new("n", 1, ScalarKind::Int32)),
            )
            .message(
                MessageBuilder::new("t.Outer")
                    .field(FieldDescriptor::new("name", 1, ScalarKind::String))
                    .field(
                        FieldDescriptor::new("limit", 2, ScalarKind::UInt32)
                            .with_default(DefaultValue::UInt(10)),
                    )
                    .field(FieldDescriptor::new("maybe", 3, ScalarKind::Int32).optional())
                    .field(FieldDescriptor::new("tags", 4, ScalarKind::String).repeated())
                    .field(FieldDescriptor::new("attrs", 5, ScalarKind::Int64).map(ScalarKind::String))
                    .field(FieldDescriptor::new("inner", 6, FieldType::message("t.Inner")))
                    .field(FieldDescriptor::new("mood", 7, FieldType::enumeration("t.Mood")))
                    .oneof(
                        "choice",
                        vec![
                            FieldDescriptor::new("left", 8, ScalarKind::String),
                            FieldDescriptor::new("right", 9, ScalarKind::Int32),
                        ],
                    ),
            )
            .build()
            .unwrap()
    }

    fn outer() -> Message {
        Message::new(&registry(), "t.Outer").unwrap()
    }

    #[test]
    fn defaults_for_absent_fields() {
        let msg = outer();
        assert_eq!(*msg.get("name").unwrap(), Value::String(String::new()));
        assert_eq!(*msg.get("limit").unwrap(), Value::U32(10));
        assert_eq!(*msg.get("mood").unwrap(), Value::Enum(0));
        assert!(msg.get("inner").unwrap().as_message().unwrap().is_empty());
        assert!(msg.get_list("tags").unwrap().is_empty());
        assert!(msg.get_map("attrs").unwrap().is_empty());
        assert!(msg.is_empty());
    }

    #[test]
    fn set_checks_kind() {
        let mut msg = outer();
        let err = msg.set("name", 5).unwrap_err();
        assert_eq!(
            err,
            ValueError::TypeMismatch {
                field: "name".into(),
                expected: "string".into(),
                actual: "i32",
            }
        );
        assert!(matches!(msg.set("limit", 5i32), Err(ValueError::TypeMismatch { .. })));
        assert!(matches!(msg.set("mood", 1), Err(ValueError::TypeMismatch { .. })));
        msg.set("mood", Value::Enum(1)).unwrap();

        let wrong_nested = Message::new(msg.registry(), "t.Outer").unwrap();
        assert!(matches!(
            msg.set("inner", wrong_nested),
            Err(ValueError::TypeMismatch { .. })
        ));
        assert!(matches!(
            msg.set("nope", 1),
            Err(ValueError::NoSuchField { .. })
        ));
        assert!(matches!(msg.set("tags", "x"), Err(ValueError::WrongLabel { .. })));
        assert!(matches!(msg.push("name", "x"), Err(ValueError::WrongLabel { .. })));
    }

    #[test]
    fn implicit_presence_drops_defaults() {
        let mut msg = outer();
        msg.set("name", "x").unwrap();
        assert!(msg.has("name").unwrap());
        msg.set("name", "").unwrap();
        assert!(!msg.has("name").unwrap());

        msg.set("limit", 10u32).unwrap();
        assert!(!msg.has("limit").unwrap());
        msg.set("limit", 0u32).unwrap();
        assert!(msg.has("limit").unwrap());

        msg.set("maybe", 0).unwrap();
        assert!(msg.has("maybe").unwrap());
    }

    #[test]
    fn oneof_members_replace_each_other() {
        let mut msg = outer();
        assert!(msg.which_oneof("choice").unwrap().is_none());
        msg.set("left", "l").unwrap();
        assert_eq!(msg.which_oneof("choice").unwrap().unwrap().name, "left");
        msg.set("right", 0).unwrap();
        assert_eq!(msg.which_oneof("choice").unwrap().unwrap().name, "right");
        assert!(!msg.has("left").unwrap());
        assert!(msg.which_oneof("nothing").is_err());
    }

    #[test]
    fn containers_and_nested_access() {
        let mut msg = outer();
        msg.push("tags", "a").unwrap();
        msg.push("tags", "b").unwrap();
        msg.insert("attrs", "k", 7i64).unwrap();
        assert!(matches!(
            msg.insert("attrs", 1, 7i64),
            Err(ValueError::InvalidMapKey { .. })
        ));
        msg.message_mut("inner").unwrap().set("n", 3).unwrap();

        assert_eq!(msg.get_list("tags").unwrap().len(), 2);
        assert_eq!(
            msg.get_map("attrs").unwrap().get(&MapKey::from("k")),
            Some(&Value::I64(7))
        );
        let inner = msg.get("inner").unwrap();
        assert_eq!(inner.as_message().unwrap().get("n").unwrap().as_i32(), Some(3));

        msg.set_list("tags", Vec::<String>::new()).unwrap();
        assert!(!msg.has("tags").unwrap());
    }

    #[test]
    fn set_map_is_all_or_nothing() {
        let mut msg = outer();
        msg.insert("attrs", "keep", 1i64).unwrap();
        let err = msg.set_map("attrs", vec![("a", Value::I64(1)), ("b", Value::from("x"))]);
        assert!(err.is_err());
        assert_eq!(msg.get_map("attrs").unwrap().len(), 1);
    }

    #[test]
    fn clone_is_deep_and_equality_is_structural() {
        let mut a = outer();
        a.push("tags", "x").unwrap();
        a.message_mut("inner").unwrap().set("n", 1).unwrap();
        let mut b = a.clone();
        assert_eq!(a, b);
        b.message_mut("inner").unwrap().set("n", 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(
            a.get("inner").unwrap().as_message().unwrap().get("n").unwrap().as_i32(),
            Some(1)
        );

        let mut m1 = outer();
        let mut m2 = outer();
        m1.insert("attrs", "x", 1i64).unwrap();
        m1.insert("attrs", "y", 2i64).unwrap();
        m2.insert("attrs", "y", 2i64).unwrap();
        m2.insert("attrs", "x", 1i64).unwrap();
        assert_eq!(m1, m2);

        let mut l1 = outer();
        let mut l2 = outer();
        l1.set_list("tags", ["a", "b"]).unwrap();
        l2.set_list("tags", ["b", "a"]).unwrap();
        assert_ne!(l1, l2);
    }

    #[test]
    fn fields_select_by_tag_and_json_name() {
        let mut msg = outer();
        msg.set(1u32, "by tag").unwrap();
        assert_eq!(msg.get("name").unwrap().as_str(), Some("by tag"));
        assert!(matches!(msg.get(99u32), Err(ValueError::NoSuchField { .. })));
    }

    #[test]
    fn empty_schema_rejects_every_mutation() {
        let registry = Registry::builder()
            .message(MessageBuilder::new("t.Empty"))
            .build()
            .unwrap();
        let mut msg = Message::new(&registry, "t.Empty").unwrap();
        let no_such = |r: Result<(), ValueError>| matches!(r, Err(ValueError::NoSuchField { .. }));
        assert!(no_such(msg.set("x", 1)));
        assert!(no_such(msg.set(1u32, 1)));
        assert!(no_such(msg.clear("x")));
        assert!(no_such(msg.push("x", 1)));
        assert!(no_such(msg.set_list("x", [1])));
        assert!(no_such(msg.insert("x", "k", 1)));
        assert!(no_such(msg.set_map("x", [("k", 1)])));
        assert!(msg.message_mut("x").is_err());
        assert!(msg.push_message(1u32).is_err());
        assert!(msg.is_empty());
    }
}
