//! Fixed-shape records.

use std::sync::Arc;

use crate::classify::{narrow_keyed_map, narrow_text, RESERVED_KEY};
use crate::codec::{Codec, Dynamic};
use crate::error::{DecoderError, DecoderResult, ErrorVariant};
use crate::{Object, Value};

/// The decoded and encoded forms of a tag literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLiteral {
    decoded: String,
    encoded: String,
}

impl TagLiteral {
    /// Literal seen by decoded values.
    #[must_use]
    pub fn decoded(&self) -> &str {
        &self.decoded
    }

    /// Literal written to encoded values.
    #[must_use]
    pub fn encoded(&self) -> &str {
        &self.encoded
    }
}

/// A record member: a codec plus how it is stored in the encoded object.
#[derive(Debug, Clone)]
pub struct Field {
    codec: Codec<Value>,
    rename_from: Option<String>,
    optional: bool,
    tag: Option<TagLiteral>,
}

impl Field {
    /// A required field stored under its decoded-side key.
    #[must_use]
    pub const fn new(codec: Codec<Value>) -> Self {
        Self {
            codec,
            rename_from: None,
            optional: false,
            tag: None,
        }
    }

    /// Read and write this field under `encoded` instead of its decoded-side key.
    #[must_use]
    pub fn rename_from(mut self, encoded: impl Into<String>) -> Self {
        self.rename_from = Some(encoded.into());
        self
    }

    /// Allow the key to be absent. Absent keys are also absent from the decoded value.
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns `true` if the key may be absent.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// The tag literal, for fields built with [`tag`].
    #[must_use]
    pub const fn tag_literal(&self) -> Option<&TagLiteral> {
        self.tag.as_ref()
    }

    /// The key this field is stored under in encoded objects, given its decoded-side key.
    #[must_use]
    pub fn encoded_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.rename_from.as_deref().unwrap_or(key)
    }

    /// The field's codec.
    #[must_use]
    pub const fn codec(&self) -> &Codec<Value> {
        &self.codec
    }
}

impl<T: Dynamic + 'static> From<Codec<T>> for Field {
    fn from(codec: Codec<T>) -> Self {
        Self::new(codec.dynamic())
    }
}

/// A required field decoded with `codec`.
#[must_use]
pub fn field<T: Dynamic + 'static>(codec: Codec<T>) -> Field {
    Field::from(codec)
}

/// Ways to rename a tag independently of its decoded literal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagOptions {
    /// Encoded-side literal; defaults to the decoded literal.
    pub rename_tag_from: Option<String>,
    /// Encoded-side field name; defaults to the decoded-side key.
    pub rename_field_from: Option<String>,
}

impl TagOptions {
    /// No renaming.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rename_tag_from: None,
            rename_field_from: None,
        }
    }

    /// Set [`TagOptions::rename_tag_from`].
    #[must_use]
    pub fn rename_tag_from(mut self, encoded: impl Into<String>) -> Self {
        self.rename_tag_from = Some(encoded.into());
        self
    }

    /// Set [`TagOptions::rename_field_from`].
    #[must_use]
    pub fn rename_field_from(mut self, encoded: impl Into<String>) -> Self {
        self.rename_field_from = Some(encoded.into());
        self
    }
}

/// A field holding exactly the text `decoded`.
#[must_use]
pub fn tag(decoded: impl Into<String>) -> Field {
    tag_with(decoded, TagOptions::new())
}

/// A field holding one fixed literal, with independent encoded-side names.
///
/// Decoding requires the encoded literal and yields the decoded one; encoding always writes the encoded
/// literal.
#[must_use]
pub fn tag_with(decoded: impl Into<String>, options: TagOptions) -> Field {
    let decoded = decoded.into();
    let encoded = options.rename_tag_from.unwrap_or_else(|| decoded.clone());
    let literal = TagLiteral {
        decoded: decoded.clone(),
        encoded: encoded.clone(),
    };
    let expected = encoded.clone();
    let codec = Codec::new(
        move |value| {
            let got = narrow_text(value)?;
            if got == expected {
                Ok(Value::text(decoded.as_str()))
            } else {
                Err(DecoderError::new(ErrorVariant::WrongTag {
                    expected: expected.clone(),
                    got: got.to_owned(),
                }))
            }
        },
        move |_| Value::text(encoded.as_str()),
    );
    Field {
        codec,
        rename_from: options.rename_field_from,
        optional: false,
        tag: Some(literal),
    }
}

/// Strictness about keys a record does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Exact {
    /// Ignore extra keys.
    #[default]
    Allow,
    /// Ignore extra keys, but log them at `warn` level.
    Warn,
    /// Reject extra keys with an `exact fields` error.
    Deny,
}

/// An ordered set of named fields.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    entries: Vec<(String, Field)>,
}

impl Fields {
    /// No fields.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add a field under its decoded-side key. Adding the same key again replaces the earlier field.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, field: impl Into<Field>) -> Self {
        let key = key.into();
        let field = field.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = field,
            None => self.entries.push((key, field)),
        }
        self
    }

    /// Return the field declared under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Field> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no fields are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decoded-side keys and fields, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.entries.iter().map(|(k, f)| (k.as_str(), f))
    }
}

pub(crate) struct RecordSchema {
    fields: Fields,
    exact: Exact,
}

impl RecordSchema {
    pub(crate) const fn new(fields: Fields, exact: Exact) -> Self {
        Self { fields, exact }
    }

    fn declared(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().filter(|(key, _)| *key != RESERVED_KEY)
    }

    pub(crate) fn decode(&self, value: &Value) -> DecoderResult<Value> {
        let object = narrow_keyed_map(value)?;
        let out = Object::new();
        for (key, field) in self.declared() {
            let encoded = field.encoded_name(key);
            match object.get(encoded) {
                Some(item) => {
                    let decoded = field.codec.decode(&item).map_err(|err| err.at(key))?;
                    out.insert(key, decoded);
                }
                None if field.optional => {}
                None => {
                    return Err(DecoderError::new(ErrorVariant::MissingField {
                        field: encoded.to_owned(),
                        got: value.clone(),
                    }));
                }
            }
        }

        if self.exact != Exact::Allow {
            self.check_extra(object)?;
        }
        Ok(Value::Object(out))
    }

    fn check_extra(&self, object: &Object) -> DecoderResult<()> {
        let known: Vec<String> = self
            .declared()
            .map(|(key, field)| field.encoded_name(key).to_owned())
            .collect();
        let extra: Vec<String> = object
            .keys()
            .into_iter()
            .filter(|key| key != RESERVED_KEY && !known.contains(key))
            .collect();
        if extra.is_empty() {
            return Ok(());
        }
        if self.exact == Exact::Warn {
            tracing::warn!(
                "Record has fields it does not declare: extra {:?}, known {:?}",
                extra,
                known
            );
            return Ok(());
        }
        Err(DecoderError::new(ErrorVariant::ExactFields {
            known_fields: known,
            got: extra,
        }))
    }

    pub(crate) fn encode(&self, value: &Value) -> Value {
        let Some(object) = value.as_object() else {
            return value.clone();
        };
        let out = Object::new();
        for (key, field) in self.declared() {
            match object.get(key) {
                Some(item) => {
                    out.insert(field.encoded_name(key), field.codec.encode(&item));
                }
                None if field.optional => {}
                None => {
                    out.insert(field.encoded_name(key), field.codec.encode(&Value::Undefined));
                }
            }
        }
        Value::Object(out)
    }
}

/// A keyed map with a fixed set of named fields, decoded to an [`Object`] keyed by decoded-side names.
///
/// A required field whose encoded key is absent fails with `missing field`; a failing field is reported
/// under its decoded-side key. Keys not declared are handled according to `exact`.
#[must_use]
pub fn fields_auto(fields: Fields, exact: Exact) -> Codec<Value> {
    let schema = Arc::new(RecordSchema::new(fields, exact));
    let encoder = Arc::clone(&schema);
    Codec::new(
        move |value| schema.decode(value),
        move |value| encoder.encode(value),
    )
}
