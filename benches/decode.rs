#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use shapecodec::{
    array, field, fields_auto, fields_union, format, number, parse_json, repr, string, tag, Codec,
    Exact, Fields, ReprOptions, Value,
};

fn user() -> Codec<Value> {
    fields_auto(
        Fields::new()
            .field("id", number())
            .field("name", field(string()).rename_from("display_name"))
            .field("tags", array(string())),
        Exact::Deny,
    )
}

fn sample_users(n: usize) -> Value {
    Value::array((0..n).map(|i| {
        Value::object([
            ("id", Value::from(i)),
            ("display_name", Value::text(format!("user{i:03}"))),
            ("tags", Value::array([Value::text("a"), Value::text("b")])),
        ])
    }))
}

fn bench_decode(c: &mut Criterion) {
    let users = array(user());
    let medium = sample_users(64);

    c.bench_function("decode_records_medium", |b| {
        b.iter(|| {
            let v = users.decode(black_box(&medium)).unwrap();
            black_box(v);
        })
    });

    let decoded = users.decode(&medium).unwrap();
    c.bench_function("encode_records_medium", |b| {
        b.iter(|| {
            black_box(users.encode(black_box(&decoded)));
        })
    });

    let shapes = fields_union(
        "tag",
        [
            Fields::new().field("tag", tag("Circle")).field("radius", number()),
            Fields::new()
                .field("tag", tag("Rectangle"))
                .field("width", number())
                .field("height", number()),
        ],
        Exact::Allow,
    )
    .unwrap();
    let rect = parse_json(r#"{"tag":"Rectangle","width":1,"height":2}"#).unwrap();
    c.bench_function("decode_union", |b| {
        b.iter(|| {
            black_box(shapes.decode(black_box(&rect)).unwrap());
        })
    });
}

fn bench_errors(c: &mut Criterion) {
    let users = array(user());
    let bad = sample_users(1_000);
    if let Some(last) = bad.as_array().and_then(|a| a.get(999)) {
        last.as_object().unwrap().insert("id", Value::text("x"));
    }

    c.bench_function("decode_and_format_late_error", |b| {
        b.iter(|| {
            let err = users.decode(black_box(&bad)).unwrap_err();
            black_box(format(&err, &ReprOptions::default()));
        })
    });

    let options = ReprOptions::default().depth(2);
    c.bench_function("repr_large_value", |b| {
        b.iter(|| {
            black_box(repr(black_box(&bad), &options));
        })
    });
}

criterion_group!(benches, bench_decode, bench_errors);
criterion_main!(benches);
