//! Unions: tagged records, string literals, and runtime kinds.

use std::sync::Arc;

use crate::classify::{narrow_keyed_map, narrow_text, Kind, RESERVED_KEY};
use crate::codec::{Codec, Dynamic};
use crate::error::{DecoderError, DecoderResult, ErrorVariant, SchemaError};
use crate::fields::{Exact, Fields, RecordSchema};
use crate::Value;

type Table = Vec<(String, Arc<RecordSchema>)>;

// Returns `true` if `literal` was already present.
fn upsert(table: &mut Table, literal: &str, schema: &Arc<RecordSchema>) -> bool {
    if let Some(slot) = table.iter_mut().find(|(l, _)| l == literal) {
        slot.1 = Arc::clone(schema);
        return true;
    }
    table.push((literal.to_owned(), Arc::clone(schema)));
    false
}

/// A discriminated union of records.
///
/// Every variant must declare a [`crate::tag`] field under the decoded-side key `discriminant`, and all
/// of those fields must be stored under the same encoded key. Decoding reads that key as text and
/// hands the whole input to the variant whose encoded tag literal matches.
///
/// Two variants sharing an encoded tag literal is allowed: the later one replaces the earlier one for
/// both decoding and encoding, and a warning is logged.
///
/// ```
/// use shapecodec::{fields_union, number, tag, value, Exact, Fields};
///
/// let shape = fields_union(
///     "tag",
///     [
///         Fields::new().field("tag", tag("Circle")).field("radius", number()),
///         Fields::new()
///             .field("tag", tag("Rectangle"))
///             .field("width", number())
///             .field("height", number()),
///     ],
///     Exact::Allow,
/// )?;
///
/// let circle = value!({ tag: "Circle", radius: 5 });
/// assert_eq!(shape.decode(&circle)?, circle);
/// assert_eq!(shape.decode(&value!({ tag: "Square" })).unwrap_err().tag(), "unknown fieldsUnion tag");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns a [`SchemaError`] if `discriminant` is the reserved key, if there are no variants, if a
/// variant has no tag field under `discriminant`, or if variants disagree on its encoded name.
pub fn fields_union<I>(
    discriminant: impl Into<String>,
    variants: I,
    exact: Exact,
) -> Result<Codec<Value>, SchemaError>
where
    I: IntoIterator<Item = Fields>,
{
    let discriminant = discriminant.into();
    if discriminant == RESERVED_KEY {
        return Err(SchemaError::ReservedDiscriminant);
    }

    let mut encoded_field: Option<String> = None;
    let mut by_encoded = Table::new();
    let mut by_decoded = Table::new();
    for (index, fields) in variants.into_iter().enumerate() {
        let missing = || SchemaError::MissingTagField {
            variant: index,
            key: discriminant.clone(),
        };
        let field = fields.get(&discriminant).ok_or_else(missing)?;
        let literal = field.tag_literal().ok_or_else(missing)?.clone();
        let name = field.encoded_name(&discriminant).to_owned();
        match &encoded_field {
            Some(expected) if *expected != name => {
                return Err(SchemaError::InconsistentDiscriminant {
                    variant: index,
                    expected: expected.clone(),
                    got: name,
                });
            }
            Some(_) => {}
            None => encoded_field = Some(name),
        }

        let schema = Arc::new(RecordSchema::new(fields, exact));
        let replaced_encoded = upsert(&mut by_encoded, literal.encoded(), &schema);
        let replaced_decoded = upsert(&mut by_decoded, literal.decoded(), &schema);
        if replaced_encoded || replaced_decoded {
            tracing::warn!(
                "Union variant {} reuses tag {:?}; it replaces the earlier variant",
                index,
                literal.encoded()
            );
        }
    }
    let encoded_field = encoded_field.ok_or(SchemaError::NoVariants)?;
    tracing::debug!(
        "Built fields union on {:?} with tags {:?}",
        encoded_field,
        by_encoded.iter().map(|(tag, _)| tag.as_str()).collect::<Vec<_>>()
    );

    let decoder = move |value: &Value| -> DecoderResult<Value> {
        let object = narrow_keyed_map(value)?;
        let raw = object.get(&encoded_field).unwrap_or(Value::Undefined);
        let tag = narrow_text(&raw).map_err(|err| err.at(encoded_field.as_str()))?;
        match by_encoded.iter().find(|(literal, _)| literal == tag) {
            Some((_, schema)) => schema.decode(value),
            None => Err(DecoderError::new(ErrorVariant::UnknownFieldsUnionTag {
                known_tags: by_encoded.iter().map(|(literal, _)| literal.clone()).collect(),
                got: tag.to_owned(),
            })
            .at(encoded_field.as_str())),
        }
    };
    let encoder = move |value: &Value| {
        let schema = value
            .as_object()
            .and_then(|object| object.get(&discriminant))
            .and_then(|tag| {
                let tag = tag.as_str()?;
                by_decoded
                    .iter()
                    .find(|(literal, _)| literal == tag)
                    .map(|(_, schema)| Arc::clone(schema))
            });
        schema.map_or_else(|| value.clone(), |schema| schema.encode(value))
    };
    Ok(Codec::new(decoder, encoder))
}

/// Text restricted to a fixed set of literals.
///
/// # Errors
///
/// Returns [`SchemaError::NoStringVariants`] if `variants` is empty.
pub fn string_union<I, S>(variants: I) -> Result<Codec<String>, SchemaError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut known: Vec<String> = Vec::new();
    for variant in variants {
        let variant = variant.into();
        if !known.contains(&variant) {
            known.push(variant);
        }
    }
    if known.is_empty() {
        return Err(SchemaError::NoStringVariants);
    }
    Ok(Codec::new(
        move |value| {
            let got = narrow_text(value)?;
            if known.iter().any(|variant| variant == got) {
                Ok(got.to_owned())
            } else {
                Err(DecoderError::new(ErrorVariant::UnknownStringUnionVariant {
                    known_variants: known.clone(),
                    got: got.to_owned(),
                }))
            }
        },
        |s: &String| Value::Text(s.clone()),
    ))
}

/// A value tagged with its runtime kind, as produced by [`multi`].
#[derive(Debug, Clone, PartialEq)]
pub struct Typed {
    /// The kind the value was classified as.
    pub kind: Kind,
    /// The value itself.
    pub value: Value,
}

impl Dynamic for Typed {
    fn into_value(self) -> Value {
        self.value
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            kind: Kind::of(value),
            value: value.clone(),
        })
    }
}

/// Accept values of the given runtime kinds, tagging each with its kind.
///
/// # Errors
///
/// Returns [`SchemaError::NoKinds`] if `kinds` is empty.
pub fn multi<I>(kinds: I) -> Result<Codec<Typed>, SchemaError>
where
    I: IntoIterator<Item = Kind>,
{
    let mut known: Vec<Kind> = Vec::new();
    for kind in kinds {
        if !known.contains(&kind) {
            known.push(kind);
        }
    }
    if known.is_empty() {
        return Err(SchemaError::NoKinds);
    }
    Ok(Codec::new(
        move |value| {
            let kind = Kind::of(value);
            if known.contains(&kind) {
                Ok(Typed {
                    kind,
                    value: value.clone(),
                })
            } else {
                Err(DecoderError::new(ErrorVariant::UnknownMultiType {
                    known_types: known.clone(),
                    got: value.clone(),
                }))
            }
        },
        |typed: &Typed| typed.value.clone(),
    ))
}
