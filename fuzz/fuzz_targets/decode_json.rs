#![no_main]

use libfuzzer_sys::fuzz_target;

use shapecodec::{
    array, field, fields_auto, fields_union, format, multi, nullable, number, parse_json, repr,
    string, tag, to_json, Exact, Fields, Kind, ReprOptions,
};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let value = match parse_json(text) {
        Ok(value) => value,
        Err(err) => {
            let _ = format(&err, &ReprOptions::default());
            return;
        }
    };

    let node = fields_auto(
        Fields::new()
            .field("id", multi([Kind::Number, Kind::String]).expect("kinds"))
            .field("name", field(nullable(string())).optional())
            .field("scores", array(number())),
        Exact::Deny,
    );
    let shape = fields_union(
        "type",
        [
            Fields::new().field("type", tag("a")).field("n", number()),
            Fields::new().field("type", tag("b")).field("s", string()),
        ],
        Exact::Allow,
    )
    .expect("union");

    for codec in [node, shape] {
        match codec.decode(&value) {
            // Anything that decodes must survive an encode/decode round-trip.
            Ok(decoded) => {
                let again = codec.decode(&codec.encode(&decoded)).expect("round-trip");
                assert_eq!(again, decoded);
            }
            Err(err) => {
                let rendered = format(&err, &ReprOptions::default());
                assert!(rendered.starts_with("At root"));
            }
        }
    }

    let options = ReprOptions::default().depth(3).max_length(20);
    let _ = repr(&value, &options);
    to_json(&value).expect("parsed JSON is acyclic");
});
