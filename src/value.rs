//! The dynamic value model.
//!
//! Decoders consume [`Value`]s and encoders produce them. The model mirrors the runtime kinds found in
//! dynamically-typed hosts: containers ([`Array`], [`Object`]) are shared handles with interior
//! mutability, so a value can be aliased and can even contain itself.

use core::fmt;
use std::borrow::Cow;
use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

/// An untrusted, dynamically-typed value.
#[derive(Clone)]
pub enum Value {
    /// The absent sentinel.
    Undefined,
    /// The null sentinel.
    Null,
    /// A boolean.
    Bool(bool),
    /// A double-precision number.
    Number(f64),
    /// A text string.
    Text(String),
    /// An opaque value compared by identity.
    Symbol(Symbol),
    /// A regular-expression literal.
    RegExp(RegExp),
    /// A named callable.
    Function(Function),
    /// A sequence of values.
    Array(Array),
    /// An ordered key/value map.
    Object(Object),
    /// A value supplied by the embedder that the engine only knows by kind.
    Host(Host),
}

impl Value {
    /// Build an [`Array`] value.
    #[must_use]
    pub fn array<I: IntoIterator<Item = Self>>(items: I) -> Self {
        Self::Array(Array::from_vec(items.into_iter().collect()))
    }

    /// Build a plain [`Object`] value. Later duplicates of a key replace earlier ones.
    #[must_use]
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Self)>,
    {
        Self::Object(Object::from_entries(entries))
    }

    /// Build a text value.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Returns `true` for [`Value::Undefined`].
    #[inline]
    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Return the boolean if this is a [`Value::Bool`].
    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Return the number if this is a [`Value::Number`].
    #[inline]
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the text if this is a [`Value::Text`].
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Return the array handle if this is a [`Value::Array`].
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> Option<&Array> {
        match self {
            Self::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Return the object handle if this is a [`Value::Object`].
    #[inline]
    #[must_use]
    pub const fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// The runtime type name, e.g. `Number`, `RegExp`, `Array`, or a host value's kind.
    #[must_use]
    pub fn type_name(&self) -> Cow<'_, str> {
        match self {
            Self::Undefined => Cow::Borrowed("Undefined"),
            Self::Null => Cow::Borrowed("Null"),
            Self::Bool(_) => Cow::Borrowed("Boolean"),
            Self::Number(_) => Cow::Borrowed("Number"),
            Self::Text(_) => Cow::Borrowed("String"),
            Self::Symbol(_) => Cow::Borrowed("Symbol"),
            Self::RegExp(_) => Cow::Borrowed("RegExp"),
            Self::Function(_) => Cow::Borrowed("Function"),
            Self::Array(_) => Cow::Borrowed("Array"),
            Self::Object(_) => Cow::Borrowed("Object"),
            Self::Host(h) => Cow::Borrowed(h.kind()),
        }
    }
}

/// Deep equality. Self-referential values compare equal when they unfold to the same structure.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_eq(self, other, &mut Vec::new())
    }
}

// Container pairs currently being compared; meeting one again means the comparison has come full
// circle without finding a difference.
type Pairs = Vec<(usize, usize)>;

fn values_eq(a: &Value, b: &Value, pairs: &mut Pairs) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        #[allow(clippy::float_cmp)]
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Text(a), Value::Text(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::RegExp(a), Value::RegExp(b)) => a == b,
        (Value::Function(a), Value::Function(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => arrays_eq(a, b, pairs),
        (Value::Object(a), Value::Object(b)) => objects_eq(a, b, pairs),
        (Value::Host(a), Value::Host(b)) => a == b,
        _ => false,
    }
}

fn arrays_eq(a: &Array, b: &Array, pairs: &mut Pairs) -> bool {
    let pair = (a.id(), b.id());
    if a.ptr_eq(b) || pairs.contains(&pair) {
        return true;
    }
    let ours = a.items();
    let theirs = b.items();
    if ours.len() != theirs.len() {
        return false;
    }
    pairs.push(pair);
    let equal = ours
        .iter()
        .zip(theirs.iter())
        .all(|(x, y)| values_eq(x, y, pairs));
    pairs.pop();
    equal
}

fn objects_eq(a: &Object, b: &Object, pairs: &mut Pairs) -> bool {
    let pair = (a.id(), b.id());
    if a.ptr_eq(b) || pairs.contains(&pair) {
        return true;
    }
    if a.class() != b.class() {
        return false;
    }
    let ours = a.entries();
    let theirs = b.entries();
    if ours.len() != theirs.len() {
        return false;
    }
    pairs.push(pair);
    let equal = ours.iter().all(|(key, value)| {
        theirs
            .iter()
            .find(|(k, _)| k == key)
            .is_some_and(|(_, v)| values_eq(value, v, pairs))
    });
    pairs.pop();
    equal
}

impl Default for Value {
    fn default() -> Self {
        Self::Undefined
    }
}

/// A shared, growable sequence of values.
///
/// Cloning an `Array` clones the handle, not the items.
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// Create an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing items.
    #[must_use]
    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.read_recursive().len()
    }

    /// Returns `true` if the array has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append an item.
    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Return a clone of the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read_recursive().get(index).cloned()
    }

    /// Borrow the items.
    ///
    /// Reads are re-entrant, so a self-referential array may be borrowed again while this guard is held.
    /// Calling [`Array::push`] on the same array while the guard is alive deadlocks.
    #[must_use]
    pub fn items(&self) -> MappedRwLockReadGuard<'_, [Value]> {
        RwLockReadGuard::map(self.0.read_recursive(), Vec::as_slice)
    }

    /// Copy the items into a new vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read_recursive().clone()
    }

    /// Returns `true` if both handles point at the same array.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        arrays_eq(self, other, &mut Vec::new())
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self::from_vec(items)
    }
}

struct ObjectInner {
    class: Option<String>,
    entries: RwLock<Vec<(String, Value)>>,
}

/// A shared, insertion-ordered map from text keys to values.
///
/// An object may carry a class name (the name of the constructor that built it); plain objects have none.
/// Cloning an `Object` clones the handle, not the entries.
#[derive(Clone)]
pub struct Object(Arc<ObjectInner>);

impl Object {
    /// Create an empty plain object.
    #[must_use]
    pub fn new() -> Self {
        Self(Arc::new(ObjectInner {
            class: None,
            entries: RwLock::new(Vec::new()),
        }))
    }

    /// Create an empty object with a class name.
    #[must_use]
    pub fn with_class(class: impl Into<String>) -> Self {
        Self(Arc::new(ObjectInner {
            class: Some(class.into()),
            entries: RwLock::new(Vec::new()),
        }))
    }

    /// Create a plain object from entries. Later duplicates of a key replace earlier ones.
    #[must_use]
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let object = Self::new();
        for (key, value) in entries {
            object.insert(key, value);
        }
        object
    }

    /// The class name, or `None` for a plain object.
    #[must_use]
    pub fn class(&self) -> Option<&str> {
        self.0.class.as_deref()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.entries.read_recursive().len()
    }

    /// Returns `true` if the object has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert or replace an entry, returning the previous value.
    ///
    /// Replacing keeps the key at its original position.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        let key = key.into();
        let mut entries = self.0.entries.write();
        if let Some(slot) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(core::mem::replace(&mut slot.1, value));
        }
        entries.push((key, value));
        None
    }

    /// Remove an entry, returning its value.
    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.0.entries.write();
        let pos = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(pos).1)
    }

    /// Return a clone of the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .entries
            .read_recursive()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Returns `true` if `key` is present, even when its value is [`Value::Undefined`].
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0
            .entries
            .read_recursive()
            .iter()
            .any(|(k, _)| k == key)
    }

    /// The keys in insertion order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.0
            .entries
            .read_recursive()
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Borrow the entries in insertion order.
    ///
    /// Reads are re-entrant; calling [`Object::insert`] or [`Object::remove`] on the same object while
    /// the guard is alive deadlocks.
    #[must_use]
    pub fn entries(&self) -> MappedRwLockReadGuard<'_, [(String, Value)]> {
        RwLockReadGuard::map(self.0.entries.read_recursive(), Vec::as_slice)
    }

    /// Returns `true` if both handles point at the same object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.0).cast::<()>() as usize
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

/// Objects compare by class and by entries, ignoring entry order.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        objects_eq(self, other, &mut Vec::new())
    }
}

/// An opaque value with a description, equal only to itself.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a fresh symbol.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self(Arc::from(description.into()))
    }

    /// The description given at creation.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// A regular-expression literal: pattern source plus flags.
///
/// The engine never compiles it; it is carried and printed as `/source/flags`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegExp {
    source: String,
    flags: String,
}

impl RegExp {
    /// Create a literal from its source and flags.
    #[must_use]
    pub fn new(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            flags: flags.into(),
        }
    }

    /// The pattern source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flags.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }
}

impl fmt::Display for RegExp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

type NativeFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named callable value.
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    call: Arc<NativeFn>,
}

impl Function {
    /// Wrap a closure under a name.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            call: Arc::new(call),
        }
    }

    /// The function's name; may be empty for anonymous functions.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function.
    pub fn call(&self, args: &[Value]) -> Value {
        (self.call)(args)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.call).cast::<()>() == Arc::as_ptr(&other.call).cast::<()>()
    }
}

/// A value owned by the embedding application.
///
/// The engine knows host values only by their kind name. Rendering asks [`HostValue::describe`] for a
/// literal form; an implementation that returns an error (the default) is printed as its kind.
pub trait HostValue: Send + Sync {
    /// Runtime kind name, e.g. `Date`.
    fn kind(&self) -> &str;

    /// Write a literal form of the value.
    ///
    /// # Errors
    ///
    /// Returns [`fmt::Error`] when the value has no literal form or cannot be introspected.
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let _ = f;
        Err(fmt::Error)
    }
}

/// A shared handle to a [`HostValue`], compared by identity.
#[derive(Clone)]
pub struct Host(Arc<dyn HostValue>);

impl Host {
    /// Wrap a host value.
    #[must_use]
    pub fn new<H: HostValue + 'static>(value: H) -> Self {
        Self(Arc::new(value))
    }

    /// Runtime kind name.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.0.kind()
    }

    /// Literal form, or `None` if [`HostValue::describe`] failed.
    pub(crate) fn describe(&self) -> Option<String> {
        struct Describe<'a>(&'a dyn HostValue);

        impl fmt::Display for Describe<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.describe(f)
            }
        }

        let mut out = String::new();
        fmt::write(&mut out, format_args!("{}", Describe(self.0.as_ref()))).ok()?;
        Some(out)
    }
}

impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.0).cast::<()>() == Arc::as_ptr(&other.0).cast::<()>()
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, i16, i32, u8, u16, u32);

macro_rules! impl_from_wide_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[allow(clippy::cast_precision_loss)]
                fn from(value: $t) -> Self {
                    Self::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_wide_number!(i64, u64, isize, usize);

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<RegExp> for Value {
    fn from(value: RegExp) -> Self {
        Self::RegExp(value)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

impl From<Host> for Value {
    fn from(value: Host) -> Self {
        Self::Host(value)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Array(Array::from_vec(items))
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&Self> for Value {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}
