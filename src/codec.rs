use core::fmt;
use std::sync::Arc;

use crate::classify::{narrow_boolean, narrow_number, narrow_text};
use crate::error::DecoderResult;
use crate::Value;

type DecodeFn<T> = dyn Fn(&Value) -> DecoderResult<T> + Send + Sync;
type EncodeFn<T> = dyn Fn(&T) -> Value + Send + Sync;

/// A decoder paired with its inverse encoder.
///
/// Decoding validates an untrusted [`Value`] into a `T`; encoding turns a `T` back into a [`Value`] and
/// cannot fail. Codecs are immutable once built and cheap to clone; combinators take codecs by value
/// and return new ones.
pub struct Codec<T> {
    decoder: Arc<DecodeFn<T>>,
    encoder: Arc<EncodeFn<T>>,
    // Sentinels decoded to `None`, one per `Option` layer of `T`, outermost first.
    sentinels: Arc<[Value]>,
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            decoder: Arc::clone(&self.decoder),
            encoder: Arc::clone(&self.encoder),
            sentinels: Arc::clone(&self.sentinels),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("decoded", &core::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Codec<T> {
    /// Build a codec from a decoder and an encoder.
    ///
    /// The encoder should be the inverse of the decoder: decoding an encoded value yields the value
    /// that was encoded.
    pub fn new<D, E>(decoder: D, encoder: E) -> Self
    where
        D: Fn(&Value) -> DecoderResult<T> + Send + Sync + 'static,
        E: Fn(&T) -> Value + Send + Sync + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
            sentinels: Arc::from(Vec::new()),
        }
    }

    pub(crate) const fn sentinels(&self) -> &Arc<[Value]> {
        &self.sentinels
    }

    pub(crate) fn with_sentinels(mut self, sentinels: Arc<[Value]>) -> Self {
        self.sentinels = sentinels;
        self
    }

    /// Validate `value`.
    ///
    /// # Errors
    ///
    /// Returns the first structural mismatch found, located by its path from `value`.
    #[inline]
    pub fn decode(&self, value: &Value) -> DecoderResult<T> {
        (self.decoder)(value)
    }

    /// Produce the transmittable shape of `value`.
    #[inline]
    #[must_use]
    pub fn encode(&self, value: &T) -> Value {
        (self.encoder)(value)
    }

    /// Transform decoded values with a total function.
    ///
    /// `from` must invert `to`; the encoder applies it before encoding with this codec.
    #[must_use]
    pub fn map<U, F, G>(&self, to: F, from: G) -> Codec<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
        G: Fn(&U) -> T + Send + Sync + 'static,
    {
        let decoder = Arc::clone(&self.decoder);
        let encoder = Arc::clone(&self.encoder);
        Codec::new(
            move |value| decoder(value).map(&to),
            move |value| encoder(&from(value)),
        )
    }

    /// Transform decoded values with a fallible function.
    ///
    /// Errors returned by `to` are reported at the path of the value this codec decoded, so enclosing
    /// combinators locate them like any other mismatch. `from` must invert `to`.
    #[must_use]
    pub fn flat_map<U, F, G>(&self, to: F, from: G) -> Codec<U>
    where
        U: 'static,
        F: Fn(T) -> DecoderResult<U> + Send + Sync + 'static,
        G: Fn(&U) -> T + Send + Sync + 'static,
    {
        let decoder = Arc::clone(&self.decoder);
        let encoder = Arc::clone(&self.encoder);
        Codec::new(
            move |value| decoder(value).and_then(&to),
            move |value| encoder(&from(value)),
        )
    }
}

impl<T: Dynamic + 'static> Codec<T> {
    /// Erase the decoded type so the codec can sit inside records, unions and tuples.
    ///
    /// Encoding a [`Value`] that does not convert back into a `T` passes it through unchanged. An
    /// absent value decoded by [`crate::nullable`] or [`crate::undefined_or`] stays the sentinel it was
    /// read from.
    #[must_use]
    pub fn dynamic(&self) -> Codec<Value> {
        let decoder = Arc::clone(&self.decoder);
        let encoder = Arc::clone(&self.encoder);
        let decoded = Arc::clone(&self.sentinels);
        let encoded = Arc::clone(&self.sentinels);
        Codec::new(
            move |value| decoder(value).map(|typed| typed.into_value_with(&decoded)),
            move |value| match T::from_value_with(value, &encoded) {
                Some(typed) => encoder(&typed),
                None => value.clone(),
            },
        )
    }
}

/// Conversion between a decoded type and its dynamic [`Value`] form.
///
/// Heterogeneous combinators (records, unions, tuples) hold their children as `Codec<Value>`; this trait
/// is how a typed child crosses that boundary in both directions.
pub trait Dynamic: Sized {
    /// Convert into a dynamic value.
    fn into_value(self) -> Value;

    /// Convert back; `None` if `value` does not have the shape `into_value` produces.
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert into a dynamic value, writing each `None` layer as its sentinel.
    ///
    /// `sentinels` lists, outermost first, the value each nested `Option` layer stands for when it is
    /// `None`. Types without `Option` layers ignore it.
    fn into_value_with(self, sentinels: &[Value]) -> Value {
        let _ = sentinels;
        self.into_value()
    }

    /// Convert back, reading each sentinel in `sentinels` as `None` at its layer.
    fn from_value_with(value: &Value, sentinels: &[Value]) -> Option<Self> {
        let _ = sentinels;
        Self::from_value(value)
    }
}

impl Dynamic for Value {
    fn into_value(self) -> Value {
        self
    }

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

impl Dynamic for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

impl Dynamic for f64 {
    fn into_value(self) -> Value {
        Value::Number(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }
}

impl Dynamic for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl<T: Dynamic> Dynamic for Vec<T> {
    fn into_value(self) -> Value {
        Value::array(self.into_iter().map(Dynamic::into_value))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_array()?.items().iter().map(T::from_value).collect()
    }

    fn into_value_with(self, sentinels: &[Value]) -> Value {
        Value::array(self.into_iter().map(|item| item.into_value_with(sentinels)))
    }

    fn from_value_with(value: &Value, sentinels: &[Value]) -> Option<Self> {
        value
            .as_array()?
            .items()
            .iter()
            .map(|item| T::from_value_with(item, sentinels))
            .collect()
    }
}

/// Without a known sentinel, `None` is `null` and both sentinels convert back to `None`.
impl<T: Dynamic> Dynamic for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, Dynamic::into_value)
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Undefined => Some(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn into_value_with(self, sentinels: &[Value]) -> Value {
        match sentinels.split_first() {
            Some((absent, inner)) => {
                self.map_or_else(|| absent.clone(), |value| value.into_value_with(inner))
            }
            None => self.into_value(),
        }
    }

    fn from_value_with(value: &Value, sentinels: &[Value]) -> Option<Self> {
        match sentinels.split_first() {
            Some((absent, _)) if value == absent => Some(None),
            Some((_, inner)) => T::from_value_with(value, inner).map(Some),
            None => Self::from_value(value),
        }
    }
}

/// Accept booleans.
#[must_use]
pub fn boolean() -> Codec<bool> {
    Codec::new(narrow_boolean, |b: &bool| Value::Bool(*b))
}

/// Accept numbers, including `NaN` and the infinities.
#[must_use]
pub fn number() -> Codec<f64> {
    Codec::new(narrow_number, |n: &f64| Value::Number(*n))
}

/// Accept text.
#[must_use]
pub fn string() -> Codec<String> {
    Codec::new(
        |value| narrow_text(value).map(str::to_owned),
        |s: &String| Value::Text(s.clone()),
    )
}

/// Accept anything, unchanged.
#[must_use]
pub fn unknown() -> Codec<Value> {
    Codec::new(|value| Ok(value.clone()), Value::clone)
}
