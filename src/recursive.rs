//! Self-referential schemas.

use core::fmt;
use std::sync::{Arc, OnceLock};

use crate::codec::Codec;
use crate::error::SchemaError;

struct Lazy<T, F> {
    cell: OnceLock<Codec<T>>,
    thunk: F,
}

impl<T, F: Fn() -> Codec<T>> Lazy<T, F> {
    fn get(&self) -> &Codec<T> {
        self.cell.get_or_init(&self.thunk)
    }
}

/// Defer building a codec until it is first used.
///
/// `thunk` runs at most once, on the first decode or encode; its codec is reused afterwards. A schema
/// function can therefore refer to itself:
///
/// ```
/// use shapecodec::{array, fields_auto, recursive, string, value, Codec, Exact, Fields, Value};
///
/// fn tree() -> Codec<Value> {
///     fields_auto(
///         Fields::new()
///             .field("name", string())
///             .field("children", array(recursive(tree))),
///         Exact::Allow,
///     )
/// }
///
/// let input = value!({ name: "root", children: [{ name: "leaf", children: [] }] });
/// assert_eq!(tree().decode(&input).unwrap(), input);
/// ```
#[must_use]
pub fn recursive<T, F>(thunk: F) -> Codec<T>
where
    T: 'static,
    F: Fn() -> Codec<T> + Send + Sync + 'static,
{
    let lazy = Arc::new(Lazy {
        cell: OnceLock::new(),
        thunk,
    });
    let encoder = Arc::clone(&lazy);
    Codec::new(
        move |value| lazy.get().decode(value),
        move |value: &T| encoder.get().encode(value),
    )
}

/// A codec handle that is filled in after it has been handed out.
///
/// Clone the handle's [`Forward::codec`] into the schema that refers to it, then [`Forward::define`]
/// the schema itself. The handle and its definition keep each other alive, so a schema closed over
/// this way lives until the end of the program.
pub struct Forward<T> {
    slot: Arc<OnceLock<Codec<T>>>,
}

impl<T> Clone for Forward<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Forward<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(OnceLock::new()),
        }
    }
}

impl<T> fmt::Debug for Forward<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forward")
            .field("defined", &self.slot.get().is_some())
            .finish()
    }
}

fn resolve<T>(slot: &OnceLock<Codec<T>>) -> &Codec<T> {
    slot.get().unwrap_or_else(|| {
        panic!(
            "forward codec for `{}` used before it was defined",
            core::any::type_name::<T>()
        )
    })
}

impl<T: 'static> Forward<T> {
    /// An undefined handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A codec that delegates to the definition.
    ///
    /// # Panics
    ///
    /// The returned codec panics when used before [`Forward::define`] has been called.
    #[must_use]
    pub fn codec(&self) -> Codec<T> {
        let decoder = Arc::clone(&self.slot);
        let encoder = Arc::clone(&self.slot);
        Codec::new(
            move |value| resolve(&decoder).decode(value),
            move |value: &T| resolve(&encoder).encode(value),
        )
    }

    /// Fill the handle.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::AlreadyDefined`] if the handle was already filled.
    pub fn define(&self, codec: Codec<T>) -> Result<(), SchemaError> {
        self.slot
            .set(codec)
            .map_err(|_| SchemaError::AlreadyDefined)?;
        tracing::debug!(
            "Defined forward codec for {}",
            core::any::type_name::<T>()
        );
        Ok(())
    }

    /// Returns `true` once [`Forward::define`] has succeeded.
    #[must_use]
    pub fn is_defined(&self) -> bool {
        self.slot.get().is_some()
    }
}
