//! Homogeneous and positional containers.

use std::sync::Arc;

use crate::classify::{narrow_keyed_map, narrow_sequence, RESERVED_KEY};
use crate::codec::{Codec, Dynamic};
use crate::error::{DecoderError, ErrorVariant};
use crate::{Object, Value};

/// A keyed map represented as ordered key/value entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entries<T>(pub Vec<(String, T)>);

impl<T> Entries<T> {
    /// Wrap an existing vector of entries.
    #[must_use]
    pub const fn new(entries: Vec<(String, T)>) -> Self {
        Self(entries)
    }

    /// Return the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Dynamic> Dynamic for Entries<T> {
    fn into_value(self) -> Value {
        Value::object(self.0.into_iter().map(|(k, v)| (k, v.into_value())))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_object()?
            .entries()
            .iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k.clone(), v)))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }

    fn into_value_with(self, sentinels: &[Value]) -> Value {
        Value::object(
            self.0
                .into_iter()
                .map(|(k, v)| (k, v.into_value_with(sentinels))),
        )
    }

    fn from_value_with(value: &Value, sentinels: &[Value]) -> Option<Self> {
        value
            .as_object()?
            .entries()
            .iter()
            .map(|(k, v)| T::from_value_with(v, sentinels).map(|v| (k.clone(), v)))
            .collect::<Option<Vec<_>>>()
            .map(Self)
    }
}

/// A sequence whose items all decode with `item`.
///
/// Decoding stops at the first failing item and reports it at its index.
#[must_use]
pub fn array<T: 'static>(item: Codec<T>) -> Codec<Vec<T>> {
    let sentinels = Arc::clone(item.sentinels());
    let encoder = item.clone();
    Codec::new(
        move |value| {
            let items = narrow_sequence(value)?.items();
            let mut out = Vec::with_capacity(items.len());
            for (index, v) in items.iter().enumerate() {
                out.push(item.decode(v).map_err(|err| err.at(index))?);
            }
            Ok(out)
        },
        move |items: &Vec<T>| Value::array(items.iter().map(|v| encoder.encode(v))),
    )
    .with_sentinels(sentinels)
}

/// A keyed map whose values all decode with `item`.
///
/// Entries keep their input order. The reserved key is neither decoded nor encoded.
#[must_use]
pub fn record<T: 'static>(item: Codec<T>) -> Codec<Entries<T>> {
    let sentinels = Arc::clone(item.sentinels());
    let encoder = item.clone();
    Codec::new(
        move |value| {
            let entries = narrow_keyed_map(value)?.entries();
            let mut out = Vec::with_capacity(entries.len());
            for (key, v) in entries.iter() {
                if key == RESERVED_KEY {
                    continue;
                }
                let decoded = item.decode(v).map_err(|err| err.at(key.as_str()))?;
                out.push((key.clone(), decoded));
            }
            Ok(Entries(out))
        },
        move |entries: &Entries<T>| {
            let object = Object::new();
            for (key, v) in &entries.0 {
                if key != RESERVED_KEY {
                    object.insert(key.as_str(), encoder.encode(v));
                }
            }
            Value::Object(object)
        },
    )
    .with_sentinels(sentinels)
}

/// A sequence of exactly `codecs.len()` items, decoded position-wise.
///
/// The length is checked before any item is decoded.
#[must_use]
pub fn tuple<I>(codecs: I) -> Codec<Vec<Value>>
where
    I: IntoIterator<Item = Codec<Value>>,
{
    let codecs: Vec<Codec<Value>> = codecs.into_iter().collect();
    let encoders = codecs.clone();
    Codec::new(
        move |value| {
            let items = narrow_sequence(value)?.items();
            if items.len() != codecs.len() {
                return Err(DecoderError::new(ErrorVariant::TupleSize {
                    expected: codecs.len(),
                    got: items.len(),
                }));
            }
            let mut out = Vec::with_capacity(items.len());
            for (index, (codec, v)) in codecs.iter().zip(items.iter()).enumerate() {
                out.push(codec.decode(v).map_err(|err| err.at(index))?);
            }
            Ok(out)
        },
        move |items: &Vec<Value>| {
            Value::array(
                encoders
                    .iter()
                    .zip(items)
                    .map(|(codec, v)| codec.encode(v)),
            )
        },
    )
}
