//! Property tests: every message survives both encodings unchanged.

use langnet_codec::{
    decode_binary, decode_json, encode_binary, encode_json, BinaryDecoder, BinaryEncoder,
    BinaryOptions, MapKey, Message, Value,
};
use langnet_schema::{
    langnet, EnumBuilder, FieldDescriptor, FieldType, MessageBuilder, Registry, ScalarKind,
};
use proptest::prelude::*;

const ALL_KINDS: &str = "prop.AllKinds";

fn all_kinds_registry() -> Registry {
    use ScalarKind::*;
    let kinds = [
        ("f_double", Double),
        ("f_float", Float),
        ("f_int32", Int32),
        ("f_int64", Int64),
        ("f_uint32", UInt32),
        ("f_uint64", UInt64),
        ("f_sint32", SInt32),
        ("f_sint64", SInt64),
        ("f_fixed32", Fixed32),
        ("f_fixed64", Fixed64),
        ("f_sfixed32", SFixed32),
        ("f_sfixed64", SFixed64),
        ("f_bool", Bool),
        ("f_string", String),
        ("f_bytes", Bytes),
    ];
    let mut builder = MessageBuilder::new(ALL_KINDS);
    for (i, (name, kind)) in kinds.iter().enumerate() {
        let number = i as u32 + 1;
        builder = builder
            .field(FieldDescriptor::new(*name, number, *kind))
            .field(FieldDescriptor::new(format!("r{name}"), number + 100, *kind).repeated());
    }
    builder = builder
        .field(FieldDescriptor::new("color", 200, FieldType::enumeration("prop.Color")))
        .field(FieldDescriptor::new("colors", 201, FieldType::enumeration("prop.Color")).repeated())
        .field(FieldDescriptor::new("by_id", 202, ScalarKind::SInt64).map(ScalarKind::UInt32))
        .field(FieldDescriptor::new("flags", 203, ScalarKind::Bool).map(ScalarKind::Bool))
        .field(FieldDescriptor::new("child", 204, FieldType::message(ALL_KINDS)))
        .field(FieldDescriptor::new("maybe", 205, ScalarKind::Int32).optional());
    Registry::builder()
        .enumeration(EnumBuilder::new("prop.Color").value("NONE", 0).value("RED", 1).value("BLUE", 2))
        .message(builder)
        .build()
        .unwrap()
}

fn scalar_value(kind: ScalarKind) -> BoxedStrategy<Value> {
    use ScalarKind::*;
    match kind {
        Double => prop_oneof![
            any::<f64>(),
            Just(f64::MAX),
            Just(f64::MIN),
            Just(f64::MIN_POSITIVE),
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
            Just(-0.0),
        ]
        .prop_map(Value::F64)
        .boxed(),
        Float => prop_oneof![
            any::<f32>(),
            Just(f32::MAX),
            Just(f32::MIN),
            Just(f32::MIN_POSITIVE),
            Just(f32::NAN),
            Just(f32::INFINITY),
            Just(f32::NEG_INFINITY),
            Just(-0.0),
        ]
        .prop_map(Value::F32)
        .boxed(),
        Int32 | SInt32 | SFixed32 => any::<i32>().prop_map(Value::I32).boxed(),
        Int64 | SInt64 | SFixed64 => any::<i64>().prop_map(Value::I64).boxed(),
        UInt32 | Fixed32 => any::<u32>().prop_map(Value::U32).boxed(),
        UInt64 | Fixed64 => any::<u64>().prop_map(Value::U64).boxed(),
        Bool => any::<bool>().prop_map(Value::Bool).boxed(),
        String => ".{0,12}".prop_map(Value::String).boxed(),
        Bytes => prop::collection::vec(any::<u8>(), 0..12)
            .prop_map(Value::Bytes)
            .boxed(),
    }
}

/// Assignments applied to a fresh message: `(field name, value)` for
/// singular fields and `(field name, values)` for repeated ones.
#[derive(Debug, Clone)]
struct Plan {
    singles: Vec<(&'static str, Value)>,
    lists: Vec<(std::string::String, Vec<Value>)>,
    color: i32,
    by_id: Vec<(u32, i64)>,
    flags: Vec<(bool, bool)>,
    maybe: Option<i32>,
}

fn plan() -> impl Strategy<Value = Plan> {
    use ScalarKind::*;
    let singles = [
        ("f_double", Double),
        ("f_float", Float),
        ("f_int32", Int32),
        ("f_int64", Int64),
        ("f_uint64", UInt64),
        ("f_sint32", SInt32),
        ("f_sint64", SInt64),
        ("f_fixed64", Fixed64),
        ("f_sfixed32", SFixed32),
        ("f_bool", Bool),
        ("f_string", String),
        ("f_bytes", Bytes),
    ];
    let single_strategies: Vec<_> = singles
        .iter()
        .map(|(name, kind)| {
            let name: &'static str = name;
            prop::option::of(scalar_value(*kind)).prop_map(move |v| v.map(|v| (name, v)))
        })
        .collect();
    let list_strategies: Vec<_> = [
        ("rf_sint64", SInt64),
        ("rf_string", String),
        ("rf_float", Float),
        ("rf_double", Double),
        ("rf_fixed32", Fixed32),
    ]
        .into_iter()
        .map(|(name, kind)| {
            prop::collection::vec(scalar_value(kind), 0..5)
                .prop_map(move |values| (name.to_owned(), values))
        })
        .collect();
    (
        single_strategies,
        list_strategies,
        -3i32..5,
        prop::collection::vec((any::<u32>(), any::<i64>()), 0..4),
        prop::collection::vec((any::<bool>(), any::<bool>()), 0..3),
        prop::option::of(any::<i32>()),
    )
        .prop_map(|(singles, lists, color, by_id, flags, maybe)| Plan {
            singles: singles.into_iter().flatten().collect(),
            lists,
            color,
            by_id,
            flags,
            maybe,
        })
}

fn build(registry: &Registry, plan: &Plan, with_child: bool) -> Message {
    let mut msg = Message::new(registry, ALL_KINDS).unwrap();
    for (name, value) in &plan.singles {
        msg.set(*name, value.clone()).unwrap();
    }
    for (name, values) in &plan.lists {
        msg.set_list(name, values.clone()).unwrap();
    }
    msg.set("color", Value::Enum(plan.color)).unwrap();
    msg.set_list("colors", [Value::Enum(plan.color), Value::Enum(1)])
        .unwrap();
    for (k, v) in &plan.by_id {
        msg.insert("by_id", *k, *v).unwrap();
    }
    for (k, v) in &plan.flags {
        msg.insert("flags", *k, *v).unwrap();
    }
    if let Some(v) = plan.maybe {
        msg.set("maybe", v).unwrap();
    }
    if with_child {
        let child = build(registry, plan, false);
        msg.set("child", child).unwrap();
    }
    msg
}

#[test]
fn special_floats_round_trip() {
    let registry = all_kinds_registry();
    let specials = [
        (f64::NAN, f32::NAN),
        (f64::INFINITY, f32::NEG_INFINITY),
        (-0.0, -0.0),
        (f64::MAX, f32::MAX),
        (f64::MIN_POSITIVE, f32::MIN),
        (5e-324, 1e-45),
    ];
    for (d, f) in specials {
        let mut msg = Message::new(&registry, ALL_KINDS).unwrap();
        msg.set("f_double", d).unwrap();
        msg.set("f_float", f).unwrap();
        msg.set_list("rf_double", [d, 1.5]).unwrap();
        msg.set_list("rf_float", [f, f]).unwrap();
        assert_eq!(msg.clone(), msg);
        assert!(msg.has("f_double").unwrap());

        let bytes = encode_binary(&msg);
        assert_eq!(decode_binary(&registry, ALL_KINDS, &bytes).unwrap(), msg);
        let options = BinaryOptions { pack_repeated: false, ..Default::default() };
        let bytes = BinaryEncoder::with_options(options.clone()).encode(&msg);
        let back = BinaryDecoder::with_options(options).decode(&registry, ALL_KINDS, &bytes).unwrap();
        assert_eq!(back, msg);
        let text = encode_json(&msg);
        assert_eq!(decode_json(&registry, ALL_KINDS, &text).unwrap(), msg, "{text}");
    }
}

proptest! {
    #[test]
    fn binary_round_trip(plan in plan()) {
        let registry = all_kinds_registry();
        let msg = build(&registry, &plan, true);
        let bytes = encode_binary(&msg);
        prop_assert_eq!(decode_binary(&registry, ALL_KINDS, &bytes).unwrap(), msg);
    }

    #[test]
    fn unpacked_round_trip(plan in plan()) {
        let registry = all_kinds_registry();
        let msg = build(&registry, &plan, true);
        let options = BinaryOptions { pack_repeated: false, ..Default::default() };
        let bytes = BinaryEncoder::with_options(options.clone()).encode(&msg);
        let back = BinaryDecoder::with_options(options).decode(&registry, ALL_KINDS, &bytes).unwrap();
        prop_assert_eq!(back, msg);
    }

    #[test]
    fn json_round_trip(plan in plan()) {
        let registry = all_kinds_registry();
        let msg = build(&registry, &plan, true);
        let text = encode_json(&msg);
        prop_assert_eq!(decode_json(&registry, ALL_KINDS, &text).unwrap(), msg);
    }

    #[test]
    fn truncated_input_never_panics(plan in plan(), cut in 0usize..64) {
        let registry = all_kinds_registry();
        let bytes = encode_binary(&build(&registry, &plan, true));
        let cut = cut.min(bytes.len());
        let _ = decode_binary(&registry, ALL_KINDS, &bytes[..cut]);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let registry = langnet::registry().unwrap();
        for name in registry.message_names() {
            let _ = decode_binary(&registry, name, &bytes);
        }
    }

    #[test]
    fn search_result_metadata_round_trip(
        id in "[a-z0-9-]{0,10}",
        metadata in prop::collection::btree_map("[a-z]{1,6}", ".{0,8}", 0..5),
    ) {
        let registry = langnet::registry().unwrap();
        let mut result = Message::new(&registry, langnet::SEARCH_RESULT).unwrap();
        result.set("id", id).unwrap();
        for (k, v) in &metadata {
            result.insert("metadata", k.as_str(), v.as_str()).unwrap();
        }
        let map = result.get_map("metadata").unwrap();
        prop_assert_eq!(map.len(), metadata.len());
        prop_assert!(map.keys().all(|k| matches!(k, MapKey::String(_))));

        let bytes = encode_binary(&result);
        prop_assert_eq!(&decode_binary(&registry, langnet::SEARCH_RESULT, &bytes).unwrap(), &result);
        let text = encode_json(&result);
        prop_assert_eq!(&decode_json(&registry, langnet::SEARCH_RESULT, &text).unwrap(), &result);
    }
}
