//! # shapecodec
//!
//! Bidirectional validation of untrusted, dynamically-typed values.
//!
//! A [`Codec`] pairs a decoder, which checks an arbitrary [`Value`] against a shape and produces a typed
//! result, with an encoder that turns the result back into a transmittable [`Value`]. Codecs are built
//! from primitives ([`boolean`], [`number`], [`string`], [`unknown`]) and combinators ([`array`],
//! [`record`], [`fields_auto`], [`fields_union`], [`tuple`], [`multi`], [`string_union`],
//! [`nullable`], [`undefined_or`], [`recursive`], [`Codec::map`], [`Codec::flat_map`]).
//!
//! ## Design principles
//!
//! - **Failures are values.**
//!   Decoding never panics on malformed input. The first mismatch is returned as a [`DecoderError`]
//!   carrying the path to the offending value, and [`format`] renders it for humans.
//! - **Schema mistakes are caught at construction.**
//!   Combinators that can be misconfigured return [`SchemaError`] when they are built, never while
//!   decoding.
//! - **Rendering is bounded.**
//!   [`repr`] prints any value, including self-referential ones, in space that depends only on its
//!   [`ReprOptions`].
//!
//! ## Example
//!
//! ```
//! use shapecodec::{array, fields_auto, field, format, number, string, value, Exact, Fields, ReprOptions};
//!
//! let person = fields_auto(
//!     Fields::new()
//!         .field("name", string())
//!         .field("age", field(number()).rename_from("years"))
//!         .field("tags", field(array(string())).optional()),
//!     Exact::Deny,
//! );
//!
//! let decoded = person.decode(&value!({ name: "Ada", years: 36 })).unwrap();
//! assert_eq!(decoded, value!({ name: "Ada", age: 36 }));
//! assert_eq!(person.encode(&decoded), value!({ name: "Ada", years: 36 }));
//!
//! let err = person.decode(&value!({ name: "Ada", years: "old" })).unwrap_err();
//! assert_eq!(
//!     format(&err, &ReprOptions::default()),
//!     "At root[\"age\"]:\nExpected a number\nGot: \"old\""
//! );
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events: `debug` when a union or forward codec is built, `warn` when union
//! variants share a tag literal and when an [`Exact::Warn`] record meets undeclared fields. It never
//! installs a subscriber.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod classify;
mod codec;
mod containers;
mod error;
mod fields;
mod format;
mod macros;
mod optional;
mod recursive;
mod repr;
mod serde_impl;
mod union;
mod value;

pub use crate::classify::{
    narrow_boolean, narrow_keyed_map, narrow_number, narrow_sequence, narrow_text, Kind,
    RESERVED_KEY,
};
pub use crate::codec::{boolean, number, string, unknown, Codec, Dynamic};
pub use crate::containers::{array, record, tuple, Entries};
pub use crate::error::{
    DecoderError, DecoderResult, ErrorVariant, OrExpected, PathElem, SchemaError,
};
pub use crate::fields::{
    field, fields_auto, tag, tag_with, Exact, Field, Fields, TagLiteral, TagOptions,
};
pub use crate::format::format;
#[doc(hidden)]
pub use crate::macros::__value_macro;
pub use crate::optional::{nullable, nullable_with, undefined_or, undefined_or_with};
pub use crate::recursive::{recursive, Forward};
pub use crate::repr::{repr, ReprOptions};
pub use crate::serde_impl::{parse_json, to_json};
pub use crate::union::{fields_union, multi, string_union, Typed};
pub use crate::value::{Array, Function, Host, HostValue, Object, RegExp, Symbol, Value};

/// Construct a path for comparing against [`DecoderError::path`].
///
/// ```
/// use shapecodec::{array, number, path, value};
///
/// let err = array(number()).decode(&value!([1, "x"])).unwrap_err();
/// assert_eq!(err.path().cloned().collect::<Vec<_>>(), path![1]);
/// ```
#[macro_export]
macro_rules! path {
    ($($seg:expr),* $(,)?) => {
        [$($crate::__path_elem!($seg)),*]
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __path_elem {
    ($seg:expr) => {
        $crate::PathElem::from($seg)
    };
}
