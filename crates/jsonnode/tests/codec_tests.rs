//! Encode/decode boundary tests: compact and pretty output, empty nodes,
//! numeric fidelity and malformed input.

use chrono::{FixedOffset, TimeZone, Utc};
use jsonnode::{codec, JsonError, Kind, Node, Value};

// ============================================================================
// 1. Encoding
// ============================================================================

#[test]
fn encode_is_compact() {
    let root: Node = r#"{ "a" : [ 1 , 2 ] , "b" : { } }"#.parse().unwrap();
    assert_eq!(root.encode().unwrap(), r#"{"a":[1,2],"b":{}}"#);
}

#[test]
fn encode_pretty_uses_two_spaces() {
    let root: Node = r#"{"a":[1],"b":"x"}"#.parse().unwrap();
    let expected = "{\n  \"a\": [\n    1\n  ],\n  \"b\": \"x\"\n}";
    assert_eq!(root.encode_pretty().unwrap(), expected);
}

#[test]
fn encode_preserves_insertion_order() {
    let root = Node::new();
    root.set("zeta").assign(1);
    root.set("alpha").assign(2);
    root.set("mid").assign(3);
    assert_eq!(root.encode().unwrap(), r#"{"zeta":1,"alpha":2,"mid":3}"#);
}

#[test]
fn encode_empty_node_is_empty_string() {
    assert_eq!(Node::new().encode().unwrap(), "");
    assert_eq!(Node::new().encode_pretty().unwrap(), "");

    let root: Node = "{}".parse().unwrap();
    assert_eq!(root.get("missing").encode().unwrap(), "");
}

#[test]
fn encode_sub_tree() {
    let root: Node = r#"{"outer":{"inner":[true,null]}}"#.parse().unwrap();
    assert_eq!(root.get("outer").encode().unwrap(), r#"{"inner":[true,null]}"#);
    assert_eq!(
        root.get("outer").get("inner").get_index(1).encode().unwrap(),
        "null"
    );
}

#[test]
fn encode_explicit_null() {
    let root = Node::new();
    root.set("n").assign(Value::Null);
    assert_eq!(root.encode().unwrap(), r#"{"n":null}"#);
}

// ============================================================================
// 2. Decoding
// ============================================================================

#[test]
fn decode_scalars_at_root() {
    assert_eq!(codec::decode("true").unwrap(), Value::Bool(true));
    assert_eq!(codec::decode("\"s\"").unwrap(), Value::from("s"));
    assert_eq!(codec::decode("-5").unwrap(), Value::Int(-5));
    assert_eq!(codec::decode("1.25").unwrap(), Value::Float(1.25));
    assert_eq!(codec::decode("null").unwrap(), Value::Null);
}

#[test]
fn decode_large_integers_exactly() {
    let text = r#"[9223372036854775807,9223372036854775808,18446744073709551615]"#;
    let value = codec::decode(text).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items[0], Value::Int(i64::MAX));
    assert_eq!(items[1], Value::Uint(9_223_372_036_854_775_808));
    assert_eq!(items[2], Value::Uint(u64::MAX));
    assert_eq!(codec::encode(&value).unwrap(), text);
}

#[test]
fn decode_keeps_wide_numbers_verbatim() {
    let text = r#"{"n":123456789012345678901234567890,"d":0.10000000000000000555}"#;
    let root: Node = text.parse().unwrap();

    assert_eq!(root.get("n").kind(), Kind::Number);
    assert_eq!(root.get("d").kind(), Kind::Number);
    assert_eq!(root.get("n").as_string(), "123456789012345678901234567890");
    assert_eq!(root.get("d").as_string(), "0.10000000000000000555");
    assert_eq!(root.get("d").as_f64(), 0.1);
    assert_eq!(root.encode().unwrap(), text);
    assert!(root.encode_pretty().unwrap().contains("123456789012345678901234567890"));
}

#[test]
fn decode_keeps_float_when_text_round_trips() {
    let root: Node = r#"[0.5,1.0,1e3,-2.75]"#.parse().unwrap();
    assert_eq!(root.get_index(0).kind(), Kind::Float);
    assert_eq!(root.get_index(1).kind(), Kind::Float);
    assert_eq!(root.get_index(2).kind(), Kind::Number, "1e3 encodes as 1000.0");
    assert_eq!(root.get_index(3).kind(), Kind::Float);
    assert_eq!(root.encode().unwrap(), "[0.5,1.0,1e3,-2.75]");
}

#[test]
fn decode_out_of_range_number() {
    let root: Node = r#"{"big":1e400}"#.parse().unwrap();
    assert_eq!(root.get("big").kind(), Kind::Number);
    assert_eq!(root.get("big").as_f64(), 0.0);
    assert_eq!(root.encode().unwrap(), r#"{"big":1e400}"#);
}

#[test]
fn decode_malformed_is_decode_error() {
    for bad in ["", "{", "[1,]", "{'a':1}", "tru", "{\"a\" 1}"] {
        assert!(
            matches!(codec::decode(bad), Err(JsonError::Decode(_))),
            "{bad:?} should fail"
        );
    }
}

#[test]
fn decode_error_message_mentions_position() {
    let err = codec::decode("{\"a\":}").unwrap_err();
    assert!(err.to_string().starts_with("JSON decode error"));
    assert!(err.to_string().contains("column"));
}

#[test]
fn decode_unicode_and_escapes() {
    let root: Node = r#"{"s":"café \"q\" \n"}"#.parse().unwrap();
    assert_eq!(root.get("s").as_string(), "café \"q\" \n");
    assert_eq!(root.encode().unwrap(), r#"{"s":"café \"q\" \n"}"#);
}

// ============================================================================
// 3. Equality used by round trips
// ============================================================================

#[test]
fn integer_equality_crosses_signedness() {
    assert_eq!(Value::Int(5), Value::Uint(5));
    assert_eq!(Value::Uint(5), Value::Int(5));
    assert_ne!(Value::Int(-1), Value::Uint(u64::MAX));
    assert_ne!(Value::Int(1), Value::Float(1.0));
}

#[test]
fn number_equals_float_it_parses_to() {
    let decoded = codec::decode("1e3").unwrap();
    assert_eq!(decoded, Value::Float(1000.0));
    assert_ne!(decoded, Value::Float(1000.5));
    assert_ne!(decoded, Value::Int(1000));
}

#[test]
fn timestamp_round_trips_as_equal_string() {
    let root = Node::new();
    root.set("at").assign(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
    root.set("tz").assign(
        FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 18, 0, 0)
            .unwrap(),
    );

    let back = codec::decode(&root.encode().unwrap()).unwrap();
    assert_eq!(back.as_object().unwrap()["at"], Value::from("2024-01-05T10:00:00Z"));
    assert_eq!(back.as_object().unwrap()["tz"], Value::from("2024-01-05T18:00:00+08:00"));
    assert_eq!(Some(back), root.value());
}

#[test]
fn timestamp_differs_from_other_spellings() {
    let ts = Value::from(Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
    assert_ne!(ts, Value::from("2024-01-05T10:00:00+00:00"));
    assert_ne!(ts, Value::from("2024-01-05 10:00:00"));
}

#[test]
fn object_equality_ignores_order() {
    let a = codec::decode(r#"{"x":1,"y":2}"#).unwrap();
    let b = codec::decode(r#"{"y":2,"x":1}"#).unwrap();
    assert_eq!(a, b);
}

#[test]
fn unsigned_assignment_round_trips() {
    let root = Node::new();
    root.set("u").assign(5u32);
    let back = codec::decode(&root.encode().unwrap()).unwrap();
    assert_eq!(Some(back), root.value());
}
