//! Untyped parameter values as they arrive from the client.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A raw, untyped request parameter.
///
/// Query strings and form bodies only ever produce `String`, `Array` and `Map`.
/// JSON bodies (and tests) can produce every variant.
///
/// # Examples
///
/// ```
/// use web_params::ParamValue;
///
/// let v = ParamValue::from("42");
/// assert!(v.is_scalar());
///
/// let list = ParamValue::from(vec!["a", "b"]);
/// assert!(!list.is_scalar());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Explicit null; treated the same as an absent parameter
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// String scalar
    String(String),
    /// Ordered list
    Array(Vec<ParamValue>),
    /// Ordered string-keyed map
    Map(IndexMap<String, ParamValue>),
}

impl ParamValue {
    /// Returns `true` for the null variant.
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Returns `true` for bool, int, float and string values.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ParamValue::Bool(_) | ParamValue::Int(_) | ParamValue::Float(_) | ParamValue::String(_)
        )
    }

    /// Returns `true` for the empty string.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, ParamValue::String(s) if s.is_empty())
    }

    /// Short name of the variant, used in log fields.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Null => "null",
            ParamValue::Bool(_) => "bool",
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::String(_) => "string",
            ParamValue::Array(_) => "array",
            ParamValue::Map(_) => "map",
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::String(v)
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

impl From<IndexMap<String, ParamValue>> for ParamValue {
    fn from(v: IndexMap<String, ParamValue>) -> Self {
        ParamValue::Map(v)
    }
}

impl From<serde_json::Value> for ParamValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;

        match v {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ParamValue::Int(i),
                // u64 beyond i64::MAX and real numbers
                None => ParamValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => ParamValue::String(s),
            Value::Array(items) => ParamValue::Array(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                ParamValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// A list or keyed array, as returned by `get_array`.
///
/// Bracketed query keys such as `filter[a]=1` and JSON objects arrive as
/// [`Keyed`](ParamArray::Keyed); everything else as a [`List`](ParamArray::List).
///
/// # Examples
///
/// ```
/// use web_params::{ParamArray, ParamValue};
///
/// let list = ParamArray::from(vec!["a", "b"]);
/// assert_eq!(list.get("1"), Some(&ParamValue::from("b")));
///
/// let keyed: ParamArray = [("min", "1"), ("max", "9")].into_iter().collect();
/// assert_eq!(keyed.get("max"), Some(&ParamValue::from("9")));
/// assert_eq!(keyed.values().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ParamArray {
    /// Sequentially indexed values
    List(Vec<ParamValue>),
    /// String-keyed values in client order
    Keyed(IndexMap<String, ParamValue>),
}

impl Default for ParamArray {
    fn default() -> Self {
        ParamArray::List(Vec::new())
    }
}

impl ParamArray {
    /// Number of elements.
    pub fn len(&self) -> usize {
        match self {
            ParamArray::List(items) => items.len(),
            ParamArray::Keyed(map) => map.len(),
        }
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element under `key`. List elements are addressed by
    /// their decimal index.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        match self {
            ParamArray::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            ParamArray::Keyed(map) => map.get(key),
        }
    }

    /// Iterates over the values in order, dropping keys.
    pub fn values(&self) -> impl Iterator<Item = &ParamValue> {
        let (list, keyed) = match self {
            ParamArray::List(items) => (Some(items.iter()), None),
            ParamArray::Keyed(map) => (None, Some(map.values())),
        };
        list.into_iter().flatten().chain(keyed.into_iter().flatten())
    }

    /// Consumes the array, returning its values in order.
    pub fn into_values(self) -> Vec<ParamValue> {
        match self {
            ParamArray::List(items) => items,
            ParamArray::Keyed(map) => map.into_values().collect(),
        }
    }
}

impl<T: Into<ParamValue>> From<Vec<T>> for ParamArray {
    fn from(v: Vec<T>) -> Self {
        ParamArray::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, ParamValue>> for ParamArray {
    fn from(v: IndexMap<String, ParamValue>) -> Self {
        ParamArray::Keyed(v)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParamArray {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ParamArray::Keyed(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<ParamArray> for ParamValue {
    fn from(v: ParamArray) -> Self {
        match v {
            ParamArray::List(items) => ParamValue::Array(items),
            ParamArray::Keyed(map) => ParamValue::Map(map),
        }
    }
}
