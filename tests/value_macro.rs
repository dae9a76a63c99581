use shapecodec::{value, Array, Object, Value};

#[test]
fn literals() {
    assert_eq!(value!(null), Value::Null);
    assert_eq!(value!(undefined), Value::Undefined);
    assert_eq!(value!(true), Value::Bool(true));
    assert_eq!(value!(1), Value::Number(1.0));
    assert_eq!(value!("s"), Value::text("s"));
}

#[test]
fn containers_and_keys() {
    let key = String::from("dynamic");
    let v = value!({
        plain: 1,
        "quoted key": [1, (-2), [null]],
        (key): { nested: true },
    });
    let object = v.as_object().unwrap();
    assert_eq!(object.keys(), ["plain", "quoted key", "dynamic"]);
    assert_eq!(object.get("quoted key"), Some(value!([1, (-2), [null]])));
    assert_eq!(
        object.get("dynamic").unwrap().as_object().map(Object::len),
        Some(1)
    );
}

#[test]
fn expressions_and_options() {
    let n = 3_u32;
    let missing: Option<i32> = None;
    assert_eq!(value!([(n + 1), (missing), (Some("x"))]), value!([4, null, "x"]));
}

#[test]
fn object_equality_ignores_order_but_not_class() {
    assert_eq!(value!({ a: 1, b: 2 }), value!({ b: 2, a: 1 }));
    assert_ne!(value!({ a: 1 }), value!({ a: 1, b: 2 }));

    let classed = Object::with_class("Point");
    assert_ne!(Value::Object(classed), value!({}));
}

fn looped_array(head: f64) -> Value {
    let array = Array::new();
    array.push(Value::Number(head));
    array.push(Value::Array(array.clone()));
    Value::Array(array)
}

fn looped_object(name: &str) -> Value {
    let object = Object::new();
    object.insert("name", Value::text(name));
    object.insert("me", Value::Object(object.clone()));
    Value::Object(object)
}

#[test]
fn self_referential_values_compare_without_overflowing() {
    assert_eq!(looped_array(1.0), looped_array(1.0));
    assert_ne!(looped_array(1.0), looped_array(2.0));
    assert_eq!(looped_object("a"), looped_object("a"));
    assert_ne!(looped_object("a"), looped_object("b"));
    assert_ne!(looped_array(1.0), looped_object("a"));
}
