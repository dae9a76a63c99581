use shapecodec::{
    array, boolean, number, path, record, string, tuple, value, Entries, ErrorVariant, Object,
    Value,
};

#[test]
fn array_decodes_every_item() {
    let codec = array(number());
    assert_eq!(codec.decode(&value!([1, 2, 3])).unwrap(), vec![1.0, 2.0, 3.0]);
    assert_eq!(codec.decode(&value!([])).unwrap(), Vec::<f64>::new());
    assert_eq!(codec.encode(&vec![4.0, 5.0]), value!([4, 5]));
    assert_eq!(codec.encode(&Vec::new()), value!([]));
}

#[test]
fn array_stops_at_the_first_failure() {
    let err = array(number()).decode(&value!([1, "a", "b"])).unwrap_err();
    assert_eq!(err.path().cloned().collect::<Vec<_>>(), path![1]);
    assert_eq!(
        err.variant(),
        &ErrorVariant::Number {
            got: Value::text("a")
        }
    );
}

#[test]
fn array_rejects_non_sequences() {
    assert_eq!(array(number()).decode(&value!({})).unwrap_err().tag(), "array");
}

#[test]
fn nested_arrays_accumulate_paths_root_to_leaf() {
    let err = array(array(boolean()))
        .decode(&value!([[true], [false, 0]]))
        .unwrap_err();
    assert_eq!(err.path().cloned().collect::<Vec<_>>(), path![1, 1]);
}

#[test]
fn record_keeps_input_order() {
    let codec = record(number());
    let decoded = codec.decode(&value!({ b: 2, a: 1 })).unwrap();
    assert_eq!(
        decoded,
        Entries::new(vec![("b".to_owned(), 2.0), ("a".to_owned(), 1.0)])
    );
    assert_eq!(decoded.get("a"), Some(&1.0));

    let encoded = codec.encode(&decoded);
    assert_eq!(encoded.as_object().unwrap().keys(), ["b", "a"]);
}

#[test]
fn record_reports_the_failing_key() {
    let err = record(string()).decode(&value!({ ok: "x", bad: 1 })).unwrap_err();
    assert_eq!(err.path().cloned().collect::<Vec<_>>(), path!["bad"]);
    assert_eq!(err.tag(), "string");
}

#[test]
fn record_skips_the_reserved_key() {
    let input = Object::new();
    input.insert("a", Value::Number(1.0));
    input.insert("__proto__", Value::text("not a number"));
    let decoded = record(number()).decode(&Value::Object(input)).unwrap();
    assert_eq!(decoded.len(), 1);

    let encoded = record(number()).encode(&Entries::new(vec![
        ("__proto__".to_owned(), 1.0),
        ("b".to_owned(), 2.0),
    ]));
    assert_eq!(encoded, value!({ b: 2 }));
}

#[test]
fn tuple_checks_length_before_items() {
    let codec = tuple([number().dynamic(), string().dynamic()]);
    let err = codec.decode(&value!([1])).unwrap_err();
    assert_eq!(
        err.variant(),
        &ErrorVariant::TupleSize {
            expected: 2,
            got: 1
        }
    );

    // Wrong length wins over wrong items.
    let err = codec.decode(&value!(["a", 1, 2])).unwrap_err();
    assert_eq!(err.tag(), "tuple size");
}

#[test]
fn tuple_decodes_position_wise() {
    let codec = tuple([number().dynamic(), string().dynamic()]);
    assert_eq!(
        codec.decode(&value!([1, "a"])).unwrap(),
        vec![Value::Number(1.0), Value::text("a")]
    );

    let err = codec.decode(&value!(["a", 1])).unwrap_err();
    assert_eq!(err.path().cloned().collect::<Vec<_>>(), path![0]);
    assert_eq!(err.tag(), "number");

    assert_eq!(codec.encode(&vec![Value::Number(2.0), Value::text("b")]), value!([2, "b"]));
}

#[test]
fn empty_tuple_accepts_only_empty_sequences() {
    let codec = tuple(Vec::new());
    assert_eq!(codec.decode(&value!([])).unwrap(), Vec::<Value>::new());
    assert_eq!(codec.decode(&value!([1])).unwrap_err().tag(), "tuple size");
}
