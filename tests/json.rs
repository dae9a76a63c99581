use shapecodec::{
    fields_auto, number, parse_json, string, to_json, value, Array, ErrorVariant, Exact, Fields,
    Function, RegExp, Symbol, Value,
};

#[test]
fn parse_keeps_key_order_and_kinds() {
    let parsed = parse_json(r#"{"z": 1, "a": [true, null, "s", 1.5]}"#).unwrap();
    assert_eq!(parsed.as_object().unwrap().keys(), ["z", "a"]);
    assert_eq!(parsed, value!({ z: 1, a: [true, null, "s", 1.5] }));
}

#[test]
fn parse_duplicate_keys_last_wins() {
    let parsed = parse_json(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
    assert_eq!(parsed.as_object().unwrap().get("a"), Some(value!(3)));
    assert_eq!(parsed.as_object().unwrap().len(), 2);
}

#[test]
fn syntax_errors_are_custom_decoder_errors() {
    let err = parse_json("{\"a\": ").unwrap_err();
    match err.variant() {
        ErrorVariant::Custom { message, got } => {
            assert!(message.contains("EOF"), "{message}");
            assert_eq!(got.as_ref(), Some(&Value::text("{\"a\": ")));
        }
        other => panic!("unexpected variant {other:?}"),
    }
}

#[test]
fn parse_then_decode() {
    let codec = fields_auto(
        Fields::new().field("name", string()).field("age", number()),
        Exact::Deny,
    );
    let input = parse_json(r#"{"name": "Ada", "age": 36}"#).unwrap();
    let decoded = codec.decode(&input).unwrap();
    assert_eq!(to_json(&codec.encode(&decoded)).unwrap(), r#"{"name":"Ada","age":36}"#);
}

#[test]
fn stringify_rules() {
    let input = value!({
        n: 1,
        f: 1.5,
        inf: (f64::INFINITY),
        missing: undefined,
        re: (RegExp::new("a", "g")),
        list: [undefined, (Symbol::new("s")), (Function::new("f", |_| Value::Null))]
    });
    assert_eq!(
        to_json(&input).unwrap(),
        r#"{"n":1,"f":1.5,"inf":null,"re":{},"list":[null,null,null]}"#
    );
    assert_eq!(to_json(&value!((-0.0))).unwrap(), "0");
}

#[test]
fn stringify_rejects_cycles() {
    let array = Array::new();
    array.push(Value::Array(array.clone()));
    let err = to_json(&Value::Array(array)).unwrap_err();
    assert!(err.to_string().contains("circular"));
}

#[test]
fn from_serde_json_value() {
    let json = serde_json::json!({ "a": [1, "b", null, false] });
    assert_eq!(Value::from(json), value!({ a: [1, "b", null, false] }));
}

#[test]
fn value_deserializes_from_any_serde_format() {
    let value: Value = serde_json::from_str("[1, {\"k\": \"v\"}]").unwrap();
    assert_eq!(value, value!([1, { k: "v" }]));
}
