//! Human-readable rendering of [`DecoderError`].

use crate::error::{DecoderError, ErrorVariant};
use crate::repr::{quote, repr, ReprOptions};
use crate::Value;

const SENSITIVE_NOTE: &str = "\n(Actual values are hidden in sensitive mode.)";

/// Render a decoding failure as a single block of text.
///
/// The block starts with the location (`At root["a"][0]:`), followed by a one-line explanation, the
/// offending value rendered by [`repr`], and finally `Or expected: ...` when an optional or nullable
/// slot would also have accepted a sentinel.
///
/// ```
/// use shapecodec::{format, number, ReprOptions, Value};
///
/// let err = number().decode(&Value::text("5")).unwrap_err();
/// assert_eq!(format(&err, &ReprOptions::default()), "At root:\nExpected a number\nGot: \"5\"");
/// ```
#[must_use]
pub fn format(error: &DecoderError, options: &ReprOptions) -> String {
    let mut out = String::from("At root");
    for elem in error.path() {
        out.push_str(&elem.to_string());
    }
    out.push_str(":\n");
    out.push_str(&message(error.variant(), options));
    if let Some(or_expected) = error.or_expected() {
        out.push_str("\nOr expected: ");
        out.push_str(or_expected.as_str());
    }
    out
}

fn message(variant: &ErrorVariant, options: &ReprOptions) -> String {
    let got = |value: &Value| {
        let mut rendered = format!("\nGot: {}", repr(value, options));
        if options.sensitive {
            rendered.push_str(SENSITIVE_NOTE);
        }
        rendered
    };
    let got_text = |text: &str| got(&Value::text(text));

    match variant {
        ErrorVariant::Boolean { got: value } => format!("Expected a boolean{}", got(value)),
        ErrorVariant::Number { got: value } => format!("Expected a number{}", got(value)),
        ErrorVariant::String { got: value } => format!("Expected a string{}", got(value)),
        ErrorVariant::Array { got: value } => format!("Expected an array{}", got(value)),
        ErrorVariant::Object { got: value } => format!("Expected an object{}", got(value)),
        ErrorVariant::Custom { message, got: value } => match value {
            Some(value) => format!("{message}{}", got(value)),
            None => message.clone(),
        },
        ErrorVariant::MissingField { field, got: value } => format!(
            "Expected an object with a field called: {}{}",
            quote(field),
            got(value)
        ),
        ErrorVariant::ExactFields { known_fields, got: extra } => {
            let extra = Value::array(extra.iter().map(Value::text));
            let mut rendered = format!(
                "Expected only these fields: {}\nFound extra fields: {}",
                quoted_list(known_fields),
                repr(&extra, options)
            );
            if options.sensitive {
                rendered.push_str(SENSITIVE_NOTE);
            }
            rendered
        }
        ErrorVariant::TupleSize { expected, got } => {
            format!("Expected {expected} items\nGot: {got}")
        }
        ErrorVariant::WrongTag { expected, got } => format!(
            "Expected this string: {}{}",
            quote(expected),
            got_text(got)
        ),
        ErrorVariant::UnknownFieldsUnionTag { known_tags, got } => format!(
            "Expected one of these tags: {}{}",
            quoted_list(known_tags),
            got_text(got)
        ),
        ErrorVariant::UnknownMultiType { known_types, got: value } => {
            let kinds: Vec<&str> = known_types.iter().map(|kind| kind.as_str()).collect();
            format!("Expected one of these types: {}{}", kinds.join(", "), got(value))
        }
        ErrorVariant::UnknownStringUnionVariant { known_variants, got } => format!(
            "Expected one of these variants: {}{}",
            quoted_list(known_variants),
            got_text(got)
        ),
    }
}

fn quoted_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(none)".to_owned();
    }
    items
        .iter()
        .map(|item| quote(item))
        .collect::<Vec<_>>()
        .join(", ")
}
