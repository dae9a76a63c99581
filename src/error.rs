use core::fmt;

use crate::classify::Kind;
use crate::repr::{quote, ReprOptions};
use crate::Value;

/// Result of decoding: the decoded value, or the first structural mismatch found.
pub type DecoderResult<T> = Result<T, DecoderError>;

/// One step of a path into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElem {
    /// An object key.
    Key(String),
    /// An array index.
    Index(usize),
}

impl From<&str> for PathElem {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathElem {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathElem {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Bracket notation: `["key"]` or `[0]`.
impl fmt::Display for PathElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "[{}]", quote(key)),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// The extra sentinels an optional/nullable slot would also have accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrExpected {
    /// `null` was also acceptable.
    Null,
    /// `undefined` was also acceptable.
    Undefined,
    /// Both sentinels were acceptable.
    NullOrUndefined,
}

impl OrExpected {
    /// Stable text form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::NullOrUndefined => "null or undefined",
        }
    }

    /// Combine an existing annotation with one more accepted sentinel.
    #[must_use]
    pub const fn merge(existing: Option<Self>, added: Self) -> Self {
        match (existing, added) {
            (None, added) => added,
            (Some(Self::Null), Self::Null) => Self::Null,
            (Some(Self::Undefined), Self::Undefined) => Self::Undefined,
            _ => Self::NullOrUndefined,
        }
    }
}

impl fmt::Display for OrExpected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What went wrong at the failing location.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorVariant {
    /// Expected a boolean.
    Boolean {
        /// The offending value.
        got: Value,
    },
    /// Expected a number.
    Number {
        /// The offending value.
        got: Value,
    },
    /// Expected a text string.
    String {
        /// The offending value.
        got: Value,
    },
    /// Expected an array.
    Array {
        /// The offending value.
        got: Value,
    },
    /// Expected a plain object.
    Object {
        /// The offending value.
        got: Value,
    },
    /// A user-supplied transform rejected the value.
    Custom {
        /// Human-readable explanation.
        message: String,
        /// The offending value, when there is one.
        got: Option<Value>,
    },
    /// A required field is absent.
    MissingField {
        /// Encoded-side name of the field.
        field: String,
        /// The object that was inspected.
        got: Value,
    },
    /// The object carries fields the schema does not declare.
    ExactFields {
        /// Encoded-side names of the declared fields.
        known_fields: Vec<String>,
        /// The unexpected field names.
        got: Vec<String>,
    },
    /// A tuple has the wrong number of items.
    TupleSize {
        /// Declared length.
        expected: usize,
        /// Actual length.
        got: usize,
    },
    /// A tag field holds a different literal.
    WrongTag {
        /// The encoded literal the tag requires.
        expected: String,
        /// The literal found.
        got: String,
    },
    /// A discriminated union's tag matches no variant.
    UnknownFieldsUnionTag {
        /// Every encoded tag literal the union accepts.
        known_tags: Vec<String>,
        /// The tag found.
        got: String,
    },
    /// The value's runtime kind is not among the accepted ones.
    UnknownMultiType {
        /// The accepted kinds.
        known_types: Vec<Kind>,
        /// The offending value.
        got: Value,
    },
    /// A text value is not one of the allowed literals.
    UnknownStringUnionVariant {
        /// The allowed literals.
        known_variants: Vec<String>,
        /// The text found.
        got: String,
    },
}

impl ErrorVariant {
    /// Stable tag text naming this variant, e.g. `"missing field"`.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Boolean { .. } => "boolean",
            Self::Number { .. } => "number",
            Self::String { .. } => "string",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
            Self::Custom { .. } => "custom",
            Self::MissingField { .. } => "missing field",
            Self::ExactFields { .. } => "exact fields",
            Self::TupleSize { .. } => "tuple size",
            Self::WrongTag { .. } => "wrong tag",
            Self::UnknownFieldsUnionTag { .. } => "unknown fieldsUnion tag",
            Self::UnknownMultiType { .. } => "unknown multi type",
            Self::UnknownStringUnionVariant { .. } => "unknown stringUnion variant",
        }
    }
}

/// A decoding failure: what went wrong, where, and which sentinels were also acceptable there.
///
/// The path is accumulated while the failure unwinds: every enclosing combinator adds its key or index
/// as the outermost element. [`DecoderError::path`] yields it root-to-leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderError {
    variant: ErrorVariant,
    or_expected: Option<OrExpected>,
    // Outermost-last.
    path: Vec<PathElem>,
}

impl DecoderError {
    /// Construct an error located at the current value.
    #[must_use]
    pub const fn new(variant: ErrorVariant) -> Self {
        Self {
            variant,
            or_expected: None,
            path: Vec::new(),
        }
    }

    /// Construct a `custom` error carrying the offending value.
    #[must_use]
    pub fn custom(message: impl Into<String>, got: Value) -> Self {
        Self::new(ErrorVariant::Custom {
            message: message.into(),
            got: Some(got),
        })
    }

    /// Construct a `custom` error with a message only.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(ErrorVariant::Custom {
            message: message.into(),
            got: None,
        })
    }

    /// What went wrong.
    #[inline]
    #[must_use]
    pub const fn variant(&self) -> &ErrorVariant {
        &self.variant
    }

    /// Stable tag text of the variant.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.variant.tag()
    }

    /// The sentinels that were also acceptable at the failing slot.
    #[inline]
    #[must_use]
    pub const fn or_expected(&self) -> Option<OrExpected> {
        self.or_expected
    }

    /// The location of the failure, root-to-leaf.
    pub fn path(&self) -> impl DoubleEndedIterator<Item = &PathElem> + ExactSizeIterator {
        self.path.iter().rev()
    }

    /// Returns `true` if the failure is at the value handed to the failing decoder itself.
    #[inline]
    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Locate this error one level deeper: `elem` becomes the outermost path element.
    #[must_use]
    pub fn at(mut self, elem: impl Into<PathElem>) -> Self {
        self.path.push(elem.into());
        self
    }

    /// Replace the sentinel annotation.
    #[must_use]
    pub fn with_or_expected(mut self, or_expected: OrExpected) -> Self {
        self.or_expected = Some(or_expected);
        self
    }

    /// Render with the given options; see [`crate::format`].
    #[must_use]
    pub fn format(&self, options: &ReprOptions) -> String {
        crate::format::format(self, options)
    }
}

/// Renders with default [`ReprOptions`].
impl fmt::Display for DecoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&ReprOptions::default()))
    }
}

impl std::error::Error for DecoderError {}

/// A schema that cannot be built.
///
/// These are programming errors in the schema definition, reported when the codec is constructed and
/// never while decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// The reserved key cannot serve as a discriminant.
    ReservedDiscriminant,
    /// A union needs at least one variant.
    NoVariants,
    /// A union variant does not declare a tag field under the discriminant key.
    MissingTagField {
        /// Zero-based position of the variant.
        variant: usize,
        /// The discriminant key.
        key: String,
    },
    /// Union variants disagree on the encoded name of the discriminant field.
    InconsistentDiscriminant {
        /// Zero-based position of the offending variant.
        variant: usize,
        /// Encoded name used by the earlier variants.
        expected: String,
        /// Encoded name used by the offending variant.
        got: String,
    },
    /// A type-dispatch union needs at least one accepted kind.
    NoKinds,
    /// A string union needs at least one literal.
    NoStringVariants,
    /// A forward codec handle was defined twice.
    AlreadyDefined,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReservedDiscriminant => {
                write!(f, "schema error: \"__proto__\" cannot be used as a discriminant")
            }
            Self::NoVariants => write!(f, "schema error: union must have at least one variant"),
            Self::MissingTagField { variant, key } => write!(
                f,
                "schema error: variant {variant} has no tag field under {}",
                quote(key)
            ),
            Self::InconsistentDiscriminant {
                variant,
                expected,
                got,
            } => write!(
                f,
                "schema error: variant {variant} encodes the discriminant as {} but earlier variants use {}",
                quote(got),
                quote(expected)
            ),
            Self::NoKinds => write!(f, "schema error: multi must accept at least one type"),
            Self::NoStringVariants => {
                write!(f, "schema error: string union must have at least one variant")
            }
            Self::AlreadyDefined => write!(f, "schema error: forward codec is already defined"),
        }
    }
}

impl std::error::Error for SchemaError {}
