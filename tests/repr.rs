use core::fmt;

use shapecodec::{
    repr, value, Array, Function, Host, HostValue, Object, RegExp, ReprOptions, Symbol, Value,
};

fn show(value: &Value) -> String {
    repr(value, &ReprOptions::default())
}

#[test]
fn primitives() {
    assert_eq!(show(&Value::Undefined), "undefined");
    assert_eq!(show(&Value::Null), "null");
    assert_eq!(show(&Value::Bool(true)), "true");
    assert_eq!(show(&value!(5)), "5");
    assert_eq!(show(&value!(1.5)), "1.5");
    assert_eq!(show(&value!((-0.0))), "0");
    assert_eq!(show(&Value::Number(f64::NAN)), "NaN");
    assert_eq!(show(&Value::Number(f64::NEG_INFINITY)), "-Infinity");
    assert_eq!(show(&value!("a\"b")), r#""a\"b""#);
    assert_eq!(show(&Value::from(Symbol::new("id"))), "Symbol(id)");
    assert_eq!(show(&Value::from(RegExp::new("a+", "gi"))), "/a+/gi");
    assert_eq!(
        show(&Value::from(Function::new("handler", |_| Value::Undefined))),
        r#"function "handler""#
    );
}

#[test]
fn long_literals_are_cut_in_the_middle() {
    let options = ReprOptions::default().max_length(6);
    assert_eq!(repr(&value!("aaaaaaaaaa"), &options), "\"aa…aa\"");
    assert_eq!(repr(&value!("abc"), &options), "\"abc\"");
}

#[test]
fn arrays() {
    assert_eq!(show(&value!([])), "[]");
    assert_eq!(show(&value!([1, "a"])), "[\n  1,\n  \"a\"\n]");
    assert_eq!(
        show(&value!([1, 2, 3, 4, 5, 6, 7])),
        "[\n  1,\n  2,\n  3,\n  4,\n  5,\n  (2 more)\n]"
    );
}

#[test]
fn depth_collapses_nested_containers() {
    assert_eq!(
        show(&value!([[1], { a: 1 }, [], {}])),
        "[\n  Array(1),\n  Object(1),\n  [],\n  {}\n]"
    );

    let options = ReprOptions::default().depth(1);
    assert_eq!(
        repr(&value!([[1, [2]]]), &options),
        "[\n  [\n    1,\n    Array(1)\n  ]\n]"
    );
}

#[test]
fn objects() {
    assert_eq!(show(&value!({})), "{}");
    assert_eq!(show(&value!({ a: 1, b: "x" })), "{\n  \"a\": 1,\n  \"b\": \"x\"\n}");

    let options = ReprOptions::default().max_object_children(1);
    assert_eq!(
        repr(&value!({ a: 1, b: 2, c: 3 }), &options),
        "{\n  \"a\": 1,\n  (2 more)\n}"
    );
}

#[test]
fn class_names_prefix_objects() {
    let point = Object::with_class("Point");
    assert_eq!(show(&Value::Object(point.clone())), "Point {}");
    point.insert("x", value!(1));
    assert_eq!(show(&Value::Object(point.clone())), "Point {\n  \"x\": 1\n}");
    assert_eq!(show(&value!([(point)])), "[\n  Point(1)\n]");
}

#[test]
fn long_entries_wrap_onto_the_next_line() {
    let options = ReprOptions::default().max_length(20);
    let input = value!({ key: "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbb" });
    assert_eq!(
        repr(&input, &options),
        "{\n  \"key\":\n    \"bbbbbbbbb…bbbbbbbbb\"\n}"
    );
}

#[test]
fn custom_indent() {
    let options = ReprOptions::default().indent("\t");
    assert_eq!(repr(&value!([1]), &options), "[\n\t1\n]");
}

#[test]
fn self_reference_is_reported_as_circular() {
    let array = Array::new();
    array.push(value!(1));
    array.push(Value::Array(array.clone()));
    let options = ReprOptions::default().depth(10);
    assert_eq!(
        repr(&Value::Array(array.clone()), &options),
        "[\n  1,\n  circular Array(2)\n]"
    );

    let object = Object::new();
    object.insert("me", Value::Object(object.clone()));
    assert_eq!(
        repr(&Value::Object(object.clone()), &options),
        "{\n  \"me\": circular Object(1)\n}"
    );

    // Debug goes through the same guard.
    assert!(format!("{array:?}").contains("circular Array(2)"));
}

#[test]
fn shared_but_acyclic_values_are_not_circular() {
    let shared = value!([1]);
    let input = Value::array([shared.clone(), shared]);
    let options = ReprOptions::default().depth(3);
    assert_eq!(
        repr(&input, &options),
        "[\n  [\n    1\n  ],\n  [\n    1\n  ]\n]"
    );
}

#[test]
fn sensitive_mode_hides_literals() {
    let options = ReprOptions::default().sensitive(true);
    assert_eq!(repr(&value!("secret"), &options), "string");
    assert_eq!(repr(&value!(42), &options), "number");
    assert_eq!(repr(&Value::Bool(false), &options), "boolean");
    assert_eq!(repr(&Value::Null, &options), "null");
    assert_eq!(repr(&Value::from(RegExp::new("x", "")), &options), "regexp");
    assert_eq!(
        repr(&value!({ password: "hunter2" }), &options),
        "{\n  \"password\": string\n}"
    );
}

struct Date(&'static str);

impl HostValue for Date {
    fn kind(&self) -> &str {
        "Date"
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

struct Poisoned;

impl HostValue for Poisoned {
    fn kind(&self) -> &str {
        "Proxy"
    }
}

#[test]
fn host_values_use_their_description_or_kind() {
    let date = Value::from(Host::new(Date("2020-01-01")));
    assert_eq!(show(&date), "2020-01-01");
    assert_eq!(repr(&date, &ReprOptions::default().sensitive(true)), "Date");
    assert_eq!(show(&Value::from(Host::new(Poisoned))), "Proxy");
    assert_eq!(date.type_name(), "Date");
}

#[test]
fn output_size_does_not_depend_on_input_size() {
    let small = Value::array((0..10).map(Value::from));
    let large = Value::array((0..10_000).map(Value::from));
    let huge_text = Value::text("x".repeat(1_000_000));

    assert_eq!(show(&small).len(), show(&large).len() - 3);
    assert!(show(&huge_text).chars().count() <= 101);
}

#[test]
fn long_class_names_are_cut_like_literals() {
    let options = ReprOptions::default().max_length(10);
    let object = Object::with_class("C".repeat(100_000));
    assert_eq!(repr(&Value::Object(object.clone()), &options), "CCCCC…CCCCC {}");

    object.insert("x", value!(1));
    assert_eq!(
        repr(&Value::Object(object.clone()), &options),
        "CCCCC…CCCCC {\n  \"x\": 1\n}"
    );
    assert_eq!(
        repr(&value!([(object.clone())]), &options),
        "[\n  CCCCC…CCCCC(1)\n]"
    );

    object.insert("me", Value::Object(object.clone()));
    let rendered = repr(&Value::Object(object), &options.depth(1));
    assert!(rendered.contains("circular CCCCC…CCCCC(2)"), "{rendered}");
    assert!(rendered.chars().count() < 60, "{rendered}");
}

struct Opaque(String);

impl HostValue for Opaque {
    fn kind(&self) -> &str {
        &self.0
    }
}

#[test]
fn long_host_kinds_are_cut_like_literals() {
    let host = Value::from(Host::new(Opaque("K".repeat(50_000))));
    let options = ReprOptions::default().max_length(8);
    assert_eq!(repr(&host, &options), "KKKK…KKKK");
    assert_eq!(repr(&host, &options.sensitive(true)), "KKKK…KKKK");
}
