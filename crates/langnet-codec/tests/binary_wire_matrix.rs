use langnet_codec::{
    decode_binary, encode_binary, encode_json, BinaryDecoder, DecodeError, MapKey, Message, Value,
};
use langnet_schema::{langnet, FieldDescriptor, MessageBuilder, Registry, ScalarKind, WireKind};

fn registry() -> Registry {
    langnet::registry().unwrap()
}

fn search_request(reg: &Registry, query: &str, page: i32, per_page: i32) -> Message {
    let mut msg = Message::new(reg, langnet::SEARCH_REQUEST).unwrap();
    msg.set("query", query).unwrap();
    msg.set("page_number", page).unwrap();
    msg.set("results_per_page", per_page).unwrap();
    msg
}

#[test]
fn search_request_bytes() {
    let reg = registry();
    let msg = search_request(&reg, "a", 1, 10);
    assert_eq!(
        encode_binary(&msg),
        vec![0x0a, 0x01, b'a', 0x10, 0x01, 0x18, 0x0a]
    );
}

#[test]
fn default_fields_are_omitted() {
    let reg = registry();
    let msg = search_request(&reg, "", 0, 0);
    assert!(encode_binary(&msg).is_empty());

    let msg = search_request(&reg, "", 0, 5);
    assert_eq!(encode_binary(&msg), vec![0x18, 0x05]);
}

#[test]
fn negative_int32_uses_ten_bytes() {
    let reg = registry();
    let msg = search_request(&reg, "", -1, 0);
    let bytes = encode_binary(&msg);
    assert_eq!(bytes.len(), 11);
    assert_eq!(bytes[0], 0x10);
    let back = decode_binary(&reg, langnet::SEARCH_REQUEST, &bytes).unwrap();
    assert_eq!(back.get("page_number").unwrap().as_i32(), Some(-1));
}

#[test]
fn nested_repeated_and_map_layout() {
    let reg = registry();
    let mut response = Message::new(&reg, langnet::SEARCH_RESPONSE).unwrap();
    let result = response.push_message("results").unwrap();
    result.set("id", "r1").unwrap();
    result.insert("metadata", "k", "v").unwrap();
    response.set("total_results", 1).unwrap();

    let bytes = encode_binary(&response);
    assert_eq!(
        bytes,
        vec![
            0x0a, 0x0c, // results, 12 bytes
            0x0a, 0x02, b'r', b'1', // id
            0x2a, 0x06, 0x0a, 0x01, b'k', 0x12, 0x01, b'v', // metadata entry
            0x10, 0x01, // total_results
        ]
    );
    assert_eq!(
        decode_binary(&reg, langnet::SEARCH_RESPONSE, &bytes).unwrap(),
        response
    );
}

#[test]
fn user_with_roles_round_trips() {
    let reg = registry();
    let mut user = Message::new(&reg, langnet::USER).unwrap();
    user.set("id", "u1").unwrap();
    user.set_list("roles", ["a", "b", "c"]).unwrap();
    user.message_mut("created_at")
        .unwrap()
        .set("seconds", 1_700_000_000i64)
        .unwrap();

    let bytes = encode_binary(&user);
    let back = decode_binary(&reg, langnet::USER, &bytes).unwrap();
    assert_eq!(back, user);
    assert_eq!(
        back.get_list("roles").unwrap(),
        &[Value::from("a"), Value::from("b"), Value::from("c")]
    );
    let created = back.get("created_at").unwrap();
    assert_eq!(
        created.as_message().unwrap().get("seconds").unwrap().as_i64(),
        Some(1_700_000_000)
    );
}

#[test]
fn map_entry_with_missing_value_reads_default() {
    let reg = registry();
    let msg = decode_binary(&reg, langnet::SEARCH_RESULT, &[0x2a, 0x03, 0x0a, 0x01, b'k']).unwrap();
    let metadata = msg.get_map("metadata").unwrap();
    assert_eq!(metadata.get(&MapKey::from("k")), Some(&Value::from("")));
}

#[test]
fn unknown_enum_numbers_survive() {
    let reg = registry();
    let msg = decode_binary(&reg, langnet::EVENT, &[0x08, 0x09]).unwrap();
    assert_eq!(*msg.get("type").unwrap(), Value::Enum(9));
    assert_eq!(encode_binary(&msg), vec![0x08, 0x09]);
    assert_eq!(encode_json(&msg), r#"{"type":9}"#);
}

#[test]
fn oneof_last_member_on_wire_wins() {
    let reg = registry();
    let mut request = Message::new(&reg, langnet::API_REQUEST).unwrap();
    request.message_mut("search").unwrap().set("query", "q").unwrap();
    request.message_mut("user").unwrap().set("id", "u").unwrap();
    assert_eq!(
        request.which_oneof("payload").unwrap().map(|f| f.name.as_str()),
        Some("user")
    );
    assert_eq!(encode_binary(&request), vec![0x22, 0x03, 0x0a, 0x01, b'u']);

    let both = [0x1a, 0x03, 0x0a, 0x01, b'q', 0x22, 0x03, 0x0a, 0x01, b'u'];
    let back = decode_binary(&reg, langnet::API_REQUEST, &both).unwrap();
    assert_eq!(back, request);
}

fn search_request_v2() -> Registry {
    langnet::definitions()
        .extend(
            Registry::builder().message(
                MessageBuilder::new("langnet.v2.SearchRequest")
                    .field(FieldDescriptor::new("query", 1, ScalarKind::String))
                    .field(FieldDescriptor::new("page_number", 2, ScalarKind::Int32))
                    .field(FieldDescriptor::new("results_per_page", 3, ScalarKind::Int32))
                    .field(FieldDescriptor::new("locale", 4, ScalarKind::String))
                    .field(FieldDescriptor::new("boost", 5, ScalarKind::Fixed32))
                    .field(FieldDescriptor::new("shards", 6, ScalarKind::UInt32).repeated()),
            ),
        )
        .build()
        .unwrap()
}

#[test]
fn newer_fields_are_preserved_verbatim() {
    let v2 = search_request_v2();
    let mut newer = Message::new(&v2, "langnet.v2.SearchRequest").unwrap();
    newer.set("query", "rust").unwrap();
    newer.set("locale", "en-GB").unwrap();
    newer.set("boost", 7u32).unwrap();
    newer.set_list("shards", [1u32, 2]).unwrap();
    let bytes = encode_binary(&newer);

    let v1 = registry();
    let older = decode_binary(&v1, langnet::SEARCH_REQUEST, &bytes).unwrap();
    assert_eq!(older.get("query").unwrap().as_str(), Some("rust"));

    let unknown = older.unknown_fields();
    assert_eq!(unknown.len(), 3);
    let locale = unknown.get(4).next().unwrap();
    assert_eq!(locale.wire_kind, WireKind::LengthDelimited);
    assert_eq!(locale.length_delimited(), Some(&b"en-GB"[..]));
    assert_eq!(unknown.get(5).next().unwrap().wire_kind, WireKind::Fixed32);

    let reencoded = encode_binary(&older);
    assert_eq!(reencoded, bytes);
    let again = decode_binary(&v2, "langnet.v2.SearchRequest", &reencoded).unwrap();
    assert_eq!(again, newer);
}

#[test]
fn unknown_fields_inside_nested_messages_survive() {
    let reg = registry();
    // SearchResponse.results[0] = { id: "x", 15: 1 }
    let bytes = [0x0a, 0x05, 0x0a, 0x01, b'x', 0x78, 0x01];
    let msg = decode_binary(&reg, langnet::SEARCH_RESPONSE, &bytes).unwrap();
    let results = msg.get_list("results").unwrap();
    let first = results[0].as_message().unwrap();
    assert_eq!(first.unknown_fields().get(15).next().unwrap().varint(), Some(1));
    assert_eq!(encode_binary(&msg), bytes);
}

#[test]
fn malformed_input_matrix() {
    let reg = registry();
    let cases: Vec<(Vec<u8>, Option<usize>)> = vec![
        (vec![0x0a], Some(1)),
        (vec![0x0a, 0x02, b'a'], Some(1)),
        (vec![0x10, 0x80], Some(1)),
        (vec![0x13], Some(0)),
        (vec![0x0a, 0x01, b'a', 0x10], Some(4)),
        (vec![0x12, 0x01, 0x00], Some(0)),
    ];
    for (data, offset) in cases {
        let err = decode_binary(&reg, langnet::SEARCH_REQUEST, &data).unwrap_err();
        assert_eq!(err.offset(), offset, "{data:02x?}: {err}");
    }
}

#[test]
fn nested_failure_reports_absolute_offset() {
    let reg = registry();
    // results[0].title is a varint instead of a string.
    let err = decode_binary(&reg, langnet::SEARCH_RESPONSE, &[0x0a, 0x04, 0x0a, 0x00, 0x10, 0x01])
        .unwrap_err();
    assert_eq!(
        err,
        DecodeError::WireKindMismatch {
            offset: 4,
            field: "title".into(),
            expected: "length-delimited",
            actual: "varint",
        }
    );
}

#[test]
fn failed_merge_leaves_target_untouched() {
    let reg = registry();
    let mut msg = search_request(&reg, "kept", 3, 0);
    let before = msg.clone();
    let err = BinaryDecoder::new().decode_into(&mut msg, &[0x18, 0x05, 0x0a, 0x10]);
    assert!(err.is_err());
    assert_eq!(msg, before);
}

#[test]
fn unknown_type_is_a_schema_error() {
    let reg = registry();
    let err = decode_binary(&reg, "langnet.Nope", &[]).unwrap_err();
    assert!(matches!(err, DecodeError::Schema(_)));
}
