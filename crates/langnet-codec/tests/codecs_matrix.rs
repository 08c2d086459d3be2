use langnet_codec::codecs::{BinaryMessageCodec, CodecError, Codecs, JsonMessageCodec, MessageCodec};
use langnet_codec::{EncodingFormat, JsonOptions, Message};
use langnet_schema::{langnet, FieldDescriptor, MessageBuilder, Registry, ScalarKind};

fn request(registry: &Registry) -> Message {
    let mut msg = Message::new(registry, langnet::SEARCH_REQUEST).unwrap();
    msg.set("query", "rust codecs").unwrap();
    msg.set("results_per_page", 25).unwrap();
    msg
}

#[test]
fn codec_identity_matrix() {
    let registry = langnet::registry().unwrap();
    let mut codecs = Codecs::new(registry);
    let cases = [
        (EncodingFormat::Binary, "binary", "bin"),
        (EncodingFormat::Json, "json", "json"),
    ];
    for (format, id, extension) in cases {
        let codec = codecs.get(format);
        assert_eq!(codec.id(), id);
        assert_eq!(codec.format(), format);
        assert_eq!(format.extension(), extension);
    }
}

#[test]
fn every_codec_round_trips() {
    let registry = langnet::registry().unwrap();
    let original = request(&registry);
    let mut codecs = Codecs::new(registry);
    for format in [EncodingFormat::Binary, EncodingFormat::Json] {
        let codec = codecs.get(format);
        let bytes = codec.encode(&original).unwrap();
        let back = codec.decode(&bytes, langnet::SEARCH_REQUEST).unwrap();
        assert_eq!(back, original, "{format:?}");
    }
}

#[test]
fn codec_options_apply() {
    let registry = langnet::registry().unwrap();
    let mut codec = JsonMessageCodec::with_options(
        registry.clone(),
        JsonOptions::preserving_field_names(),
    );
    let bytes = codec.encode(&request(&registry)).unwrap();
    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        r#"{"query":"rust codecs","results_per_page":25}"#
    );
}

#[test]
fn decode_errors_surface_through_codecs() {
    let registry = langnet::registry().unwrap();
    let mut binary = BinaryMessageCodec::new(registry.clone());
    let err = binary.decode(&[0x0a, 0x09], langnet::SEARCH_REQUEST).unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));

    let mut json = JsonMessageCodec::new(registry);
    let err = json.decode(b"{\"query\": 5}", langnet::SEARCH_REQUEST).unwrap_err();
    assert!(matches!(err, CodecError::Decode(_)));
}

#[test]
fn messages_from_unrelated_registries_are_rejected() {
    let other = Registry::builder()
        .message(
            MessageBuilder::new("other.Thing")
                .field(FieldDescriptor::new("name", 1, ScalarKind::String)),
        )
        .build()
        .unwrap();
    let thing = Message::new(&other, "other.Thing").unwrap();

    let mut codec = BinaryMessageCodec::new(langnet::registry().unwrap());
    let err = codec.encode(&thing).unwrap_err();
    assert!(matches!(err, CodecError::ForeignMessage { .. }));

    // Same type names in an equivalent registry are accepted.
    let same = langnet::registry().unwrap();
    let msg = request(&same);
    assert!(codec.encode(&msg).is_ok());
}

#[test]
fn codecs_are_usable_as_trait_objects() {
    let registry = langnet::registry().unwrap();
    let mut boxed: Vec<Box<dyn MessageCodec>> = vec![
        Box::new(BinaryMessageCodec::new(registry.clone())),
        Box::new(JsonMessageCodec::new(registry.clone())),
    ];
    let original = request(&registry);
    for codec in boxed.iter_mut() {
        let bytes = codec.encode(&original).unwrap();
        assert_eq!(codec.decode(&bytes, langnet::SEARCH_REQUEST).unwrap(), original);
    }
}
