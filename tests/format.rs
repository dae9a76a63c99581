use shapecodec::{
    array, field, fields_auto, fields_union, format, multi, nullable, number, string,
    string_union, tag, tuple, undefined_or, value, DecoderError, Exact, Fields, Kind,
    ReprOptions, Value,
};

fn render(err: &DecoderError) -> String {
    format(err, &ReprOptions::default())
}

#[test]
fn primitive_mismatch() {
    let err = number().decode(&value!("5")).unwrap_err();
    assert_eq!(render(&err), "At root:\nExpected a number\nGot: \"5\"");
    assert_eq!(err.to_string(), render(&err));

    let err = array(number()).decode(&value!(1)).unwrap_err();
    assert_eq!(render(&err), "At root:\nExpected an array\nGot: 1");
}

#[test]
fn path_in_bracket_notation() {
    let codec = fields_auto(
        Fields::new().field("a", array(number())),
        Exact::Allow,
    );
    let err = codec.decode(&value!({ a: [1, "x"] })).unwrap_err();
    assert_eq!(
        render(&err),
        "At root[\"a\"][1]:\nExpected a number\nGot: \"x\""
    );
}

#[test]
fn missing_field() {
    let codec = fields_auto(
        Fields::new().field("name", field(string()).rename_from("full_name")),
        Exact::Allow,
    );
    let err = codec.decode(&value!({})).unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected an object with a field called: \"full_name\"\nGot: {}"
    );
}

#[test]
fn exact_fields() {
    let codec = fields_auto(
        Fields::new().field("a", number()).field("b", number()),
        Exact::Deny,
    );
    let err = codec.decode(&value!({ a: 1, b: 2, c: 3 })).unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected only these fields: \"a\", \"b\"\nFound extra fields: [\n  \"c\"\n]"
    );

    let err = fields_auto(Fields::new(), Exact::Deny)
        .decode(&value!({ x: 1 }))
        .unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected only these fields: (none)\nFound extra fields: [\n  \"x\"\n]"
    );
}

#[test]
fn tuple_size() {
    let err = tuple([number().dynamic(), string().dynamic()])
        .decode(&value!([1]))
        .unwrap_err();
    assert_eq!(render(&err), "At root:\nExpected 2 items\nGot: 1");
}

#[test]
fn wrong_tag() {
    let codec = fields_auto(Fields::new().field("type", tag("circle")), Exact::Allow);
    let err = codec.decode(&value!({ type: "square" })).unwrap_err();
    assert_eq!(
        render(&err),
        "At root[\"type\"]:\nExpected this string: \"circle\"\nGot: \"square\""
    );
}

#[test]
fn unknown_union_tag() {
    let codec = fields_union(
        "tag",
        [
            Fields::new().field("tag", tag("Circle")),
            Fields::new().field("tag", tag("Rectangle")),
        ],
        Exact::Allow,
    )
    .unwrap();
    let err = codec.decode(&value!({ tag: "Square" })).unwrap_err();
    assert_eq!(
        render(&err),
        "At root[\"tag\"]:\nExpected one of these tags: \"Circle\", \"Rectangle\"\nGot: \"Square\""
    );
}

#[test]
fn unknown_multi_type() {
    let err = multi([Kind::String, Kind::Number])
        .unwrap()
        .decode(&value!(true))
        .unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected one of these types: string, number\nGot: true"
    );
}

#[test]
fn unknown_string_union_variant() {
    let err = string_union(["red", "green"])
        .unwrap()
        .decode(&value!("blue"))
        .unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected one of these variants: \"red\", \"green\"\nGot: \"blue\""
    );
}

#[test]
fn custom_messages() {
    let err = DecoderError::custom("Expected a non-empty string", value!(""));
    assert_eq!(render(&err), "At root:\nExpected a non-empty string\nGot: \"\"");

    let err = DecoderError::message("boom").at(2).at("items");
    assert_eq!(render(&err), "At root[\"items\"][2]:\nboom");
}

#[test]
fn or_expected_note() {
    let err = nullable(number()).decode(&value!("x")).unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected a number\nGot: \"x\"\nOr expected: null"
    );

    let err = undefined_or(nullable(number()))
        .decode(&value!("x"))
        .unwrap_err();
    assert!(render(&err).ends_with("\nOr expected: null or undefined"));
}

#[test]
fn sensitive_mode_hides_values() {
    let options = ReprOptions::default().sensitive(true);
    let err = number().decode(&value!("secret")).unwrap_err();
    assert_eq!(
        format(&err, &options),
        "At root:\nExpected a number\nGot: string\n(Actual values are hidden in sensitive mode.)"
    );
}

#[test]
fn offending_values_are_bounded() {
    let err = string()
        .decode(&Value::array((0..1000).map(Value::from)))
        .unwrap_err();
    assert_eq!(
        render(&err),
        "At root:\nExpected a string\nGot: [\n  0,\n  1,\n  2,\n  3,\n  4,\n  (995 more)\n]"
    );
}
