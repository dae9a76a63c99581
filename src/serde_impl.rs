use core::cell::RefCell;
use core::fmt;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{DecoderError, DecoderResult};
use crate::{Array, Object, Value};

// Largest magnitude below which every integral f64 is exact.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Serializes with JSON stringification rules.
///
/// Numbers that are not finite become `null`. Regular expressions become empty maps. Undefined values,
/// functions, symbols and host values are left out of objects and written as `null` elsewhere.
/// Serializing a value that contains itself fails.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ancestors = RefCell::new(Vec::new());
        Guarded {
            value: self,
            ancestors: &ancestors,
        }
        .serialize(serializer)
    }
}

struct Guarded<'a> {
    value: &'a Value,
    ancestors: &'a RefCell<Vec<usize>>,
}

impl Guarded<'_> {
    fn enter<E: serde::ser::Error>(&self, id: usize) -> Result<(), E> {
        let mut ancestors = self.ancestors.borrow_mut();
        if ancestors.contains(&id) {
            return Err(E::custom("cannot serialize a circular structure"));
        }
        ancestors.push(id);
        Ok(())
    }

    fn leave(&self) {
        self.ancestors.borrow_mut().pop();
    }

    const fn child<'b>(&'b self, value: &'b Value) -> Guarded<'b> {
        Guarded {
            value,
            ancestors: self.ancestors,
        }
    }

    fn array<S: Serializer>(&self, array: &Array, serializer: S) -> Result<S::Ok, S::Error> {
        self.enter::<S::Error>(array.id())?;
        let items = array.items();
        let mut seq = serializer.serialize_seq(Some(items.len()))?;
        for item in items.iter() {
            seq.serialize_element(&self.child(item))?;
        }
        self.leave();
        seq.end()
    }

    fn object<S: Serializer>(&self, object: &Object, serializer: S) -> Result<S::Ok, S::Error> {
        self.enter::<S::Error>(object.id())?;
        let entries = object.entries();
        let kept: Vec<&(String, Value)> = entries.iter().filter(|(_, v)| !omitted(v)).collect();
        let mut map = serializer.serialize_map(Some(kept.len()))?;
        for (key, item) in kept {
            map.serialize_entry(key, &self.child(item))?;
        }
        self.leave();
        map.end()
    }
}

const fn omitted(value: &Value) -> bool {
    matches!(
        value,
        Value::Undefined | Value::Function(_) | Value::Symbol(_) | Value::Host(_)
    )
}

impl Serialize for Guarded<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.value {
            Value::Null
            | Value::Undefined
            | Value::Function(_)
            | Value::Symbol(_)
            | Value::Host(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serialize_number(*n, serializer),
            Value::Text(s) => serializer.serialize_str(s),
            Value::RegExp(_) => serializer.serialize_map(Some(0))?.end(),
            Value::Array(array) => self.array(array, serializer),
            Value::Object(object) => self.object(object, serializer),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn serialize_number<S: Serializer>(n: f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a JSON-compatible value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::text(v))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(v) = seq.next_element::<Value>()? {
            items.push(v);
        }
        Ok(Value::array(items))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let object = Object::new();
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            object.insert(k, v);
        }
        Ok(Value::Object(object))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::array(items.into_iter().map(Self::from)),
            serde_json::Value::Object(map) => {
                Self::object(map.into_iter().map(|(k, v)| (k, Self::from(v))))
            }
        }
    }
}

/// Parse JSON text into a [`Value`], keeping object keys in document order.
///
/// ```
/// use shapecodec::{parse_json, value};
///
/// assert_eq!(parse_json(r#"{"b": 1, "a": [true]}"#)?, value!({ b: 1, a: [true] }));
/// assert_eq!(parse_json("{").unwrap_err().tag(), "custom");
/// # Ok::<(), shapecodec::DecoderError>(())
/// ```
///
/// # Errors
///
/// Returns a `custom` [`DecoderError`] carrying the syntax error message and the text.
pub fn parse_json(text: &str) -> DecoderResult<Value> {
    serde_json::from_str(text).map_err(|err| DecoderError::custom(err.to_string(), Value::text(text)))
}

/// Write a [`Value`] as compact JSON text. See the [`Serialize`] impl for how non-JSON kinds are written.
///
/// # Errors
///
/// Returns an error if the value contains itself.
pub fn to_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
