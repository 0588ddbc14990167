//! Dynamic attribute and child values.
//!
//! The factory's attribute-map-plus-children idiom is dynamically typed at
//! the call site; `Value` is the closed union of everything a caller may
//! pass. Shape dispatch (class lists, style maps, omission signals) happens
//! by matching on the variant, never by runtime probing.

use std::fmt;

use crate::NodeId;

/// A dynamically-typed attribute or child value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent; an "omit this" signal from conditional UI logic
    Null,
    /// `false` also means "omit"; `true` coerces like any scalar
    Bool(bool),
    Str(String),
    Num(f64),
    /// Ordered sequence (class lists, child sequences)
    List(Vec<Value>),
    /// String-keyed mapping (inline style declarations)
    Map(Vec<(String, Value)>),
    /// An already-constructed node
    Node(NodeId),
}

impl Value {
    /// Build a `Value::List` from anything iterable.
    pub fn list<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a `Value::Map` from key/value pairs.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether this is the null sentinel.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// JSON-like rendering used in diagnostics; strings come out quoted.
    pub fn serialized(&self) -> String {
        self.to_string()
    }

    /// Attribute-assignment coercion: strings stay unquoted, numbers render
    /// via `f64` display (so `12.0` becomes `12`), structured values fall
    /// back to the serialized form.
    pub fn coerce_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Num(n) => n.to_string(),
            other => other.serialized(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{key:?}:{value}")?;
                }
                write!(f, "}}")
            }
            Value::Node(id) => write!(f, "[node {}]", id.0),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Num(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Num(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Num(n as f64)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Num(f64::from(n))
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Value::Node(id)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::list(items)
    }
}
