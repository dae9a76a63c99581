//! Sentinel-accepting wrappers.
//!
//! When the wrapped codec fails on the value handed to the wrapper itself, the error notes which
//! sentinel would also have been accepted. Nested wrappers merge their notes into one. Failures deeper
//! inside the value are passed through untouched.

use std::sync::Arc;

use crate::codec::Codec;
use crate::error::{DecoderError, OrExpected};
use crate::Value;

fn annotate(err: DecoderError, added: OrExpected) -> DecoderError {
    if err.is_at_root() {
        let merged = OrExpected::merge(err.or_expected(), added);
        err.with_or_expected(merged)
    } else {
        err
    }
}

/// Accept `null` as `None`, anything else through `codec`.
#[must_use]
pub fn nullable<T: 'static>(codec: Codec<T>) -> Codec<Option<T>> {
    sentinel_or(codec, &Value::Null, OrExpected::Null)
}

/// Accept `null` as `default`, anything else through `codec`.
#[must_use]
pub fn nullable_with<T: Clone + Send + Sync + 'static>(codec: Codec<T>, default: T) -> Codec<T> {
    sentinel_or_default(codec, default, &Value::Null, OrExpected::Null)
}

/// Accept `undefined` as `None`, anything else through `codec`.
#[must_use]
pub fn undefined_or<T: 'static>(codec: Codec<T>) -> Codec<Option<T>> {
    sentinel_or(codec, &Value::Undefined, OrExpected::Undefined)
}

/// Accept `undefined` as `default`, anything else through `codec`.
#[must_use]
pub fn undefined_or_with<T: Clone + Send + Sync + 'static>(
    codec: Codec<T>,
    default: T,
) -> Codec<T> {
    sentinel_or_default(codec, default, &Value::Undefined, OrExpected::Undefined)
}

fn sentinel_or<T: 'static>(
    codec: Codec<T>,
    sentinel: &Value,
    or_expected: OrExpected,
) -> Codec<Option<T>> {
    let sentinels: Arc<[Value]> = core::iter::once(sentinel.clone())
        .chain(codec.sentinels().iter().cloned())
        .collect();
    let encoder = codec.clone();
    let accepted = sentinel.clone();
    let absent = sentinel.clone();
    Codec::new(
        move |value| {
            if *value == accepted {
                return Ok(None);
            }
            codec
                .decode(value)
                .map(Some)
                .map_err(|err| annotate(err, or_expected))
        },
        move |value: &Option<T>| {
            value
                .as_ref()
                .map_or_else(|| absent.clone(), |inner| encoder.encode(inner))
        },
    )
    .with_sentinels(sentinels)
}

fn sentinel_or_default<T: Clone + Send + Sync + 'static>(
    codec: Codec<T>,
    default: T,
    sentinel: &Value,
    or_expected: OrExpected,
) -> Codec<T> {
    let sentinels = Arc::clone(codec.sentinels());
    let encoder = codec.clone();
    let accepted = sentinel.clone();
    Codec::new(
        move |value| {
            if *value == accepted {
                return Ok(default.clone());
            }
            codec.decode(value).map_err(|err| annotate(err, or_expected))
        },
        move |value: &T| encoder.encode(value),
    )
    .with_sentinels(sentinels)
}
