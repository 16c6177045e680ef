//! TypeCodec integration tests
//!
//! Covers implicit and explicit round-trips of the built-in extension types,
//! user-registered types, AutoMap tagging modes and the codec error paths.

use automap::{AutoMap, CodecError, MapTagging, TypeCodec, TypedValue, Value};
use serde_json::{Value as Json, json};

use crate::helpers::*;

fn extension_samples() -> Vec<Value> {
    vec![
        sample_timestamp(),
        sample_date(),
        sample_time(),
        sample_uuid(),
    ]
}

#[test]
fn test_scalar_extensions_round_trip_implicitly() {
    let codec = TypeCodec::default();
    for value in extension_samples() {
        let wire = codec.encode(&value).unwrap();
        assert!(wire.is_string(), "{} should encode as a bare string", value.type_name());
        assert_eq!(codec.decode(wire).unwrap(), value);
    }
}

#[test]
fn test_scalar_extensions_round_trip_explicitly() {
    let codec = TypeCodec::explicit();
    for value in extension_samples() {
        let wire = codec.encode(&value).unwrap();
        assert_eq!(wire["__type__"], value.type_name());
        assert!(wire["value"].is_string());
        assert_eq!(codec.decode(wire).unwrap(), value);
    }
}

#[test]
fn test_canonical_encodings() {
    let codec = TypeCodec::default();
    assert_eq!(
        codec.encode(&sample_timestamp()).unwrap(),
        "2000-09-01T21:55:02+02:00"
    );
    assert_eq!(codec.encode(&sample_date()).unwrap(), "2000-09-01");
    assert_eq!(codec.encode(&sample_time()).unwrap(), "21:55:02.250000");
    assert_eq!(
        codec.encode(&sample_uuid()).unwrap(),
        "5d1e22eb-d9b2-48cd-b081-d1056d267f28"
    );
}

#[test]
fn test_tree_round_trip() {
    let mut codec = TypeCodec::default();
    codec.register_typed("point");
    let tree = sample_tree_with_typed();

    let wire = codec.encode_map(&tree).unwrap();
    assert_eq!(codec.decode_document(wire).unwrap(), tree);

    let mut explicit = TypeCodec::explicit();
    explicit.register_typed("point");
    let wire = explicit.encode_map(&tree).unwrap();
    assert_eq!(explicit.decode_document(wire).unwrap(), tree);
}

#[test]
fn test_recognition_order_prefers_datetime() {
    let codec = TypeCodec::default();
    let value = codec.decode(json!("2000-09-01T21:55:02")).unwrap();
    assert!(matches!(value, Value::DateTime(_)));

    let value = codec.decode(json!("21:55:02-05:00")).unwrap();
    assert!(matches!(value, Value::Time(ref t) if t.offset().is_some()));

    let value = codec.decode(json!("2000-09-01 21:55:02")).unwrap();
    assert_eq!(value, "2000-09-01 21:55:02");
}

#[test]
fn test_explicit_codec_keeps_lookalike_strings() {
    let codec = TypeCodec::explicit();
    let value = codec.decode(json!("2000-09-01")).unwrap();
    assert_eq!(value, Value::from("2000-09-01"));
}

#[test]
fn test_explicit_payloads_decode_with_implicit_codec() {
    let written = TypeCodec::explicit().encode(&sample_uuid()).unwrap();
    assert_eq!(TypeCodec::default().decode(written).unwrap(), sample_uuid());
}

#[test]
fn test_unsupported_type() {
    let codec = TypeCodec::default();
    let typed = Value::from(TypedValue::new("point", vec![1, 2]));

    let err = codec.encode(&typed).unwrap_err();
    assert_eq!(
        err,
        CodecError::UnsupportedType {
            type_name: "point".to_string()
        }
    );

    let bare = TypeCodec::new();
    assert!(bare.encode(&sample_date()).unwrap_err().is_unsupported_type());
    assert_eq!(bare.encode(&Value::from(1)).unwrap(), json!(1));
}

#[test]
fn test_unknown_marker() {
    let codec = TypeCodec::default();
    let err = codec
        .decode(json!({"__type__": "complex", "value": [1, 2]}))
        .unwrap_err();
    assert!(err.is_unknown_marker());

    let crate_err: automap::Error = err.into();
    assert!(crate_err.is_unknown_marker());
    assert_eq!(crate_err.module(), "codec");
}

#[test]
fn test_invalid_payload() {
    let codec = TypeCodec::default();
    let err = codec
        .decode(json!({"__type__": "date", "value": "2000-02-30"}))
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidPayload { ref marker, .. } if marker == "date"));
}

#[test]
fn test_register_custom_explicit_type() {
    let mut codec = TypeCodec::default();
    codec.register_explicit(
        "complex",
        "complex",
        |value: &Value, _codec: &TypeCodec| match value {
            Value::Typed(typed) => {
                let (re, im) = (&typed.payload()["re"], &typed.payload()["im"]);
                Ok(json!([re, im]))
            }
            other => Err(CodecError::UnsupportedType {
                type_name: other.type_name().to_string(),
            }),
        },
        |payload: Json, codec: &TypeCodec| {
            let [re, im]: [Json; 2] = serde_json::from_value(payload)
                .map_err(|err| CodecError::invalid_payload("complex", err.to_string()))?;
            let mut parts = AutoMap::new();
            parts.insert("re", codec.decode(re)?);
            parts.insert("im", codec.decode(im)?);
            Ok(Value::from(TypedValue::new("complex", parts)))
        },
    );
    assert!(codec.encodes("complex"));
    assert!(codec.decodes("complex"));

    let mut parts = AutoMap::new();
    parts.insert("re", 1.5);
    parts.insert("im", -2);
    let value = Value::from(TypedValue::new("complex", parts));

    let wire = codec.encode(&value).unwrap();
    assert_eq!(wire, json!({"__type__": "complex", "value": [1.5, -2]}));
    assert_eq!(codec.decode(wire).unwrap(), value);
}

#[test]
fn test_register_custom_implicit_type() {
    let mut codec = TypeCodec::new();
    codec.register_implicit(
        "point",
        |value| {
            let items = value.as_typed()?.payload().as_list()?;
            Some(format!("({}, {})", items[0], items[1]))
        },
        |text| {
            let inner = text.strip_prefix('(')?.strip_suffix(')')?;
            let (x, y) = inner.split_once(", ")?;
            let point = vec![x.parse::<i64>().ok()?, y.parse::<i64>().ok()?];
            Some(Value::from(TypedValue::new("point", point)))
        },
    );

    let value = Value::from(TypedValue::new("point", vec![3, -4]));
    let wire = codec.encode(&value).unwrap();
    assert_eq!(wire, "(3, -4)");
    assert_eq!(codec.decode(wire).unwrap(), value);
    assert_eq!(codec.decode(json!("(3,-4)")).unwrap(), "(3,-4)");
}

#[test]
fn test_untagged_mode_decodes_objects_as_automaps() {
    let codec = TypeCodec::default();
    let mut tree = AutoMap::new();
    tree["a"]["b"] = Value::from(1);

    let wire = codec.encode_map(&tree).unwrap();
    assert_eq!(wire, json!({"a": {"b": 1}}));

    let back = codec.decode_document(wire).unwrap();
    assert!(back["a"].as_map().is_some());
}

#[test]
fn test_tagged_mode_distinguishes_plain_objects() {
    let codec = TypeCodec::default().with_map_tagging(MapTagging::Tagged);
    assert_eq!(codec.map_tagging(), MapTagging::Tagged);

    let mut plain = indexmap::IndexMap::new();
    plain.insert("x".to_string(), Value::from(1));

    let mut tree = AutoMap::new();
    tree["auto"]["y"] = Value::from(2);
    tree.insert("plain", plain);

    let wire = codec.encode_map(&tree).unwrap();
    assert_eq!(
        wire,
        json!({
            "__type__": "AutoMap",
            "auto": {"__type__": "AutoMap", "y": 2},
            "plain": {"x": 1}
        })
    );

    let back = codec.decode_document(wire).unwrap();
    assert!(matches!(back["auto"], Value::Map(_)));
    assert!(matches!(back["plain"], Value::Object(_)));
    assert!(!back["auto"].as_map().unwrap().contains("__type__"));
}

#[test]
fn test_tagged_top_level_without_marker_still_loads() {
    let codec = TypeCodec::default().with_map_tagging(MapTagging::Tagged);
    let back = codec.decode_document(json!({"k": "v"})).unwrap();
    assert_eq!(back["k"], "v");
}

#[test]
fn test_decode_document_rejects_non_objects() {
    let codec = TypeCodec::default();
    for wire in [json!([1]), json!("2000-09-01"), json!(null)] {
        let err = codec.decode_document(wire).unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.module(), "driver");
    }
}
