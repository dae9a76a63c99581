// src/macros.rs

//! Value construction macro.
//!
//! This module provides [`value!`], a convenient macro to build [`crate::Value`] trees.
//!
//! Map key rules (same ergonomics as `serde_json::json!`):
//! - `{ a: 1 }` uses the literal key `"a"` (identifier stringized)
//! - `{ "a": 1 }` uses the literal string key `"a"`
//! - `{ (k): 1 }` uses the expression `k` as the key (must be `&str`, `String`, or `char`)
//!
//! Negative numbers and other multi-token expressions must be parenthesized: `[(-1), (x + 1)]`.
//!
//! ```
//! # use shapecodec::value;
//! let user_key = "dynamic";
//! let v = value!({
//!     a: 1,
//!     (user_key): [true, null, 1.5],
//!     missing: undefined,
//! });
//! assert_eq!(v.as_object().map(shapecodec::Object::len), Some(3));
//! ```

/// Construct a [`crate::Value`] using a JSON-like literal syntax.
///
/// Supported forms:
/// - `value!(null)` / `value!(undefined)`
/// - `value!(true)` / `value!(false)`
/// - `value!("text")`
/// - `value!([ ... ])`
/// - `value!({ key: value, "key": value, (expr_key): value, ... })`
/// - `value!(expr)` where `crate::Value: From<expr>`
///   (covers numbers, `bool`, `&str`, `String`, `Option<T>`, container handles, etc.).
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };
    (undefined) => {
        $crate::Value::Undefined
    };
    (true) => {
        $crate::Value::Bool(true)
    };
    (false) => {
        $crate::Value::Bool(false)
    };

    // Array literal: value!([ ... ])
    ([ $($elem:tt),* $(,)? ]) => {{
        let items: $crate::__value_macro::Vec<$crate::Value> =
            $crate::__value_macro::vec![$($crate::value!($elem)),*];
        $crate::Value::array(items)
    }};

    // Map literal: value!({ ... })
    ({ $($key:tt : $value:tt),* $(,)? }) => {{
        let object = $crate::Object::new();
        $(
            object.insert($crate::__value_key!($key), $crate::value!($value));
        )*
        $crate::Value::Object(object)
    }};

    // Fallback: convert an expression into Value
    ($other:expr) => {{
        $crate::Value::from($other)
    }};
}

/// Internal helper for map keys.
///
/// - `ident` becomes `"ident"`
/// - `"literal"` must be a string literal
/// - `(expr)` uses the runtime expression as key
#[doc(hidden)]
#[macro_export]
macro_rules! __value_key {
    ($key:ident) => {{
        $crate::__value_macro::IntoValueKey::into_value_key(::core::stringify!($key))
    }};
    (($key:expr)) => {{
        $crate::__value_macro::IntoValueKey::into_value_key($key)
    }};
    ($key:literal) => {{
        // Intentionally requires a string literal type (`&'static str`).
        $crate::__value_macro::IntoValueKey::into_value_key($key)
    }};
}

/// Hidden support module used by `value!` expansions.
#[doc(hidden)]
#[allow(missing_docs)]
pub mod __value_macro {
    pub use std::vec;
    pub use std::vec::Vec;

    pub trait IntoValueKey {
        fn into_value_key(self) -> String;
    }

    impl IntoValueKey for String {
        fn into_value_key(self) -> String {
            self
        }
    }

    impl IntoValueKey for &String {
        fn into_value_key(self) -> String {
            self.clone()
        }
    }

    impl IntoValueKey for &str {
        fn into_value_key(self) -> String {
            self.to_owned()
        }
    }

    impl IntoValueKey for char {
        fn into_value_key(self) -> String {
            self.to_string()
        }
    }
}
