//! Bounded, cycle-safe rendering of arbitrary values.
//!
//! [`repr`] is used by error formatting and is handy on its own for logging untrusted input: the size
//! of its output depends only on the [`ReprOptions`], never on the size of the value.

use core::fmt;
use std::borrow::Cow;

use crate::value::{Array, Function, Host, Object, Symbol};
use crate::Value;

/// Rendering limits for [`repr`] and [`crate::format`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReprOptions {
    /// Deepest container level that is expanded. Level 0 is the value itself; deeper containers
    /// collapse to `Kind(len)`.
    pub depth: usize,
    /// One level of indentation for multi-line output.
    pub indent: Cow<'static, str>,
    /// Array items shown before collapsing the rest to `(n more)`.
    pub max_array_children: usize,
    /// Object entries shown before collapsing the rest to `(n more)`.
    pub max_object_children: usize,
    /// Longest literal (string, number, key, ...) printed before it is cut in the middle.
    pub max_length: usize,
    /// Print only kind names instead of literal values.
    pub sensitive: bool,
}

impl ReprOptions {
    /// Defaults: depth 0, two-space indent, 5 array items, 5 object entries, 100-character literals.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            depth: 0,
            indent: Cow::Borrowed("  "),
            max_array_children: 5,
            max_object_children: 5,
            max_length: 100,
            sensitive: false,
        }
    }

    /// Set [`ReprOptions::depth`].
    #[must_use]
    pub const fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set [`ReprOptions::indent`].
    #[must_use]
    pub fn indent(mut self, indent: impl Into<Cow<'static, str>>) -> Self {
        self.indent = indent.into();
        self
    }

    /// Set [`ReprOptions::max_array_children`].
    #[must_use]
    pub const fn max_array_children(mut self, max: usize) -> Self {
        self.max_array_children = max;
        self
    }

    /// Set [`ReprOptions::max_object_children`].
    #[must_use]
    pub const fn max_object_children(mut self, max: usize) -> Self {
        self.max_object_children = max;
        self
    }

    /// Set [`ReprOptions::max_length`].
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = max;
        self
    }

    /// Set [`ReprOptions::sensitive`].
    #[must_use]
    pub const fn sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    // Used by the `Debug` impls.
    const fn debug() -> Self {
        Self {
            depth: 32,
            indent: Cow::Borrowed("  "),
            max_array_children: 64,
            max_object_children: 64,
            max_length: 1000,
            sensitive: false,
        }
    }
}

impl Default for ReprOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `value` as bounded, human-readable text.
///
/// Containers already being printed further up render as `circular Kind(len)`.
#[must_use]
pub fn repr(value: &Value, options: &ReprOptions) -> String {
    let mut seen = Vec::new();
    Printer { options }.value(value, 0, &mut seen)
}

struct Printer<'o> {
    options: &'o ReprOptions,
}

impl Printer<'_> {
    fn value(&self, value: &Value, level: usize, seen: &mut Vec<usize>) -> String {
        let options = self.options;
        match value {
            Value::Undefined
            | Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::Symbol(_)
            | Value::RegExp(_) => {
                if options.sensitive {
                    value.type_name().to_lowercase()
                } else {
                    truncate(&primitive_literal(value), options.max_length)
                }
            }
            Value::Text(text) => {
                if options.sensitive {
                    "string".to_owned()
                } else {
                    truncate(&quote(text), options.max_length)
                }
            }
            Value::Function(function) => {
                format!("function {}", truncate(&quote(function.name()), options.max_length))
            }
            Value::Array(array) => self.array(array, level, seen),
            Value::Object(object) => self.object(object, level, seen),
            Value::Host(host) => match host.describe() {
                Some(literal) if !options.sensitive => truncate(&literal, options.max_length),
                _ => truncate(host.kind(), options.max_length),
            },
        }
    }

    fn array(&self, array: &Array, level: usize, seen: &mut Vec<usize>) -> String {
        let items = array.items();
        let len = items.len();
        if len == 0 {
            return "[]".to_owned();
        }
        if seen.contains(&array.id()) {
            return format!("circular Array({len})");
        }
        if self.options.depth < level {
            return format!("Array({len})");
        }

        let shown = len.min(self.options.max_array_children);
        let mut parts = Vec::with_capacity(shown + 1);
        seen.push(array.id());
        for item in &items[..shown] {
            parts.push(self.value(item, level + 1, seen));
        }
        seen.pop();
        if shown < len {
            parts.push(format!("({} more)", len - shown));
        }
        self.block('[', ']', &parts, level)
    }

    fn object(&self, object: &Object, level: usize, seen: &mut Vec<usize>) -> String {
        let entries = object.entries();
        let len = entries.len();
        let max_length = self.options.max_length;
        let class = object.class().map(|c| truncate(c, max_length));
        let prefix = class.as_ref().map(|c| format!("{c} ")).unwrap_or_default();
        let name = class.as_deref().unwrap_or("Object");
        if len == 0 {
            return format!("{prefix}{{}}");
        }
        if seen.contains(&object.id()) {
            return format!("circular {name}({len})");
        }
        if self.options.depth < level {
            return format!("{name}({len})");
        }

        let indent_len = self.options.indent.chars().count();
        let shown = len.min(self.options.max_object_children);
        let mut parts = Vec::with_capacity(shown + 1);
        seen.push(object.id());
        for (key, item) in &entries[..shown] {
            let key = truncate(&quote(key), max_length);
            let rendered = self.value(item, level + 1, seen);
            let fits = key.chars().count() + rendered.chars().count() + indent_len <= max_length;
            if rendered.contains('\n') || fits {
                parts.push(format!("{key}: {rendered}"));
            } else {
                let indent = self.options.indent.repeat(level + 2);
                parts.push(format!("{key}:\n{indent}{rendered}"));
            }
        }
        seen.pop();
        if shown < len {
            parts.push(format!("({} more)", len - shown));
        }
        format!("{prefix}{}", self.block('{', '}', &parts, level))
    }

    fn block(&self, open: char, close: char, parts: &[String], level: usize) -> String {
        let inner = self.options.indent.repeat(level + 1);
        let outer = self.options.indent.repeat(level);
        let separator = format!(",\n{inner}");
        format!("{open}\n{inner}{}\n{outer}{close}", parts.join(&separator))
    }
}

fn primitive_literal(value: &Value) -> String {
    match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(*n),
        Value::Symbol(s) => s.to_string(),
        Value::RegExp(r) => r.to_string(),
        _ => value.type_name().into_owned(),
    }
}

/// Number text as a dynamic host prints it: `5`, `1.5`, `NaN`, `Infinity`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else {
        n.to_string()
    }
}

/// Quote `text` as a JSON string literal.
pub(crate) fn quote(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("{text:?}"))
}

/// Cut `text` to `max_length` characters by keeping both ends around an ellipsis.
fn truncate(text: &str, max_length: usize) -> String {
    let count = text.chars().count();
    if count <= max_length {
        return text.to_owned();
    }
    let half = max_length / 2;
    let head: String = text.chars().take(half).collect();
    let tail: String = text.chars().skip(count - half).collect();
    format!("{head}…{tail}")
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr(self, &ReprOptions::debug()))
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "function {}", quote(self.name()))
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Host(self.clone()), f)
    }
}
