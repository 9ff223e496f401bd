//! Parameter sources: the query and body maps of a request.

use std::fmt;

use indexmap::IndexMap;

use crate::error::BodyError;
use crate::value::ParamValue;

/// Which half of the request a parameter is read from.
///
/// The two scopes share one extraction policy but differ in two places:
/// an empty query string value counts as missing for scalar kinds, and
/// query scalars are wrapped when an array is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// URL query parameters
    Query,
    /// Decoded request body parameters
    Body,
}

impl Scope {
    /// Whether `""` is treated as an absent value for int/float/bool.
    pub fn empty_is_missing(self) -> bool {
        matches!(self, Scope::Query)
    }

    /// Whether a scalar is wrapped into a one-element array by `get_array`.
    pub fn wraps_scalars(self) -> bool {
        matches!(self, Scope::Query)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Query => write!(f, "query"),
            Scope::Body => write!(f, "body"),
        }
    }
}

/// An immutable-by-convention map of raw parameters.
///
/// # Examples
///
/// ```
/// use web_params::{ParamSource, ParamValue};
///
/// let source = ParamSource::from_urlencoded("id=42&tags[]=a&tags[]=b").unwrap();
/// assert_eq!(source.get("id"), Some(&ParamValue::from("42")));
/// assert_eq!(source.get("tags"), Some(&ParamValue::from(vec!["a", "b"])));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSource {
    params: IndexMap<String, ParamValue>,
}

impl ParamSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Inserts or replaces a parameter.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(name.into(), value.into());
    }

    /// Returns `true` if a parameter with this name exists (even if null).
    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of top-level parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if the source has no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Iterates over the top-level parameters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Decodes an `application/x-www-form-urlencoded` string (or URL query string).
    ///
    /// Bracketed keys build nested values: `a[]=1` appends to a list,
    /// `a[k]=v` sets a map entry, and `a[0]=x&a[1]=y` produces a list because
    /// its keys are sequential. A repeated plain key keeps the last value.
    /// Keys nested deeper than [`MAX_NESTING`] levels are dropped.
    ///
    /// # Errors
    ///
    /// Returns `BodyError::MalformedForm` if the input cannot be decoded.
    pub fn from_urlencoded(input: &str) -> Result<Self, BodyError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)
            .map_err(|e| BodyError::MalformedForm(e.to_string()))?;

        let mut params: IndexMap<String, ParamValue> = IndexMap::new();
        for (key, value) in pairs {
            let Some((base, segments)) = split_key(&key) else {
                continue;
            };
            let slot = params.entry(base).or_insert(ParamValue::Null);
            insert_path(slot, &segments, ParamValue::String(value));
        }

        Ok(Self {
            params: params
                .into_iter()
                .map(|(k, v)| (k, normalize_lists(v)))
                .collect(),
        })
    }

    /// Decodes a JSON body. The root must be an object; an empty body yields
    /// an empty source.
    ///
    /// # Errors
    ///
    /// Returns `BodyError::MalformedJson` for invalid JSON and
    /// `BodyError::NotAnObject` when the root is an array or scalar.
    pub fn from_json_slice(body: &[u8]) -> Result<Self, BodyError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::new());
        }

        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| BodyError::MalformedJson(e.to_string()))?;

        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            _ => Err(BodyError::NotAnObject),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ParamSource
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Deepest bracket nesting accepted in a form key, counted in `[...]`
/// segments after the base name.
pub const MAX_NESTING: usize = 64;

/// Splits `a[b][]` into `("a", ["b", ""])`. Keys without a well-formed
/// bracket suffix are returned whole. Returns `None` for keys nested
/// deeper than [`MAX_NESTING`].
fn split_key(key: &str) -> Option<(String, Vec<String>)> {
    let Some(open) = key.find('[') else {
        return Some((key.to_string(), Vec::new()));
    };
    if open == 0 {
        return Some((key.to_string(), Vec::new()));
    }

    let base = &key[..open];
    let mut rest = &key[open..];
    let mut segments = Vec::new();

    while let Some(inner) = rest.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            // unclosed bracket
            return Some((key.to_string(), Vec::new()));
        };
        if segments.len() == MAX_NESTING {
            return None;
        }
        segments.push(inner[..close].to_string());
        rest = &inner[close + 1..];
    }

    Some((base.to_string(), segments))
}

fn insert_path(slot: &mut ParamValue, segments: &[String], value: ParamValue) {
    match segments.split_first() {
        None => *slot = value,
        Some((head, rest)) => insert_path(child_slot(slot, head), rest, value),
    }
}

/// Returns the child of `slot` addressed by `key`, turning `slot` into a
/// container first if needed. An empty key appends.
fn child_slot<'a>(slot: &'a mut ParamValue, key: &str) -> &'a mut ParamValue {
    if !matches!(slot, ParamValue::Array(_) | ParamValue::Map(_)) {
        *slot = if key.is_empty() {
            ParamValue::Array(Vec::new())
        } else {
            ParamValue::Map(IndexMap::new())
        };
    }

    // A named key that does not extend the list turns it into a map
    let promoted = match slot {
        ParamValue::Array(items) if !extends_list(key, items.len()) => Some(
            std::mem::take(items)
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect::<IndexMap<_, _>>(),
        ),
        _ => None,
    };
    if let Some(map) = promoted {
        *slot = ParamValue::Map(map);
    }

    match slot {
        ParamValue::Array(items) => {
            let index = key.parse::<usize>().unwrap_or(items.len());
            if index == items.len() {
                items.push(ParamValue::Null);
            }
            &mut items[index]
        }
        ParamValue::Map(map) => {
            let key = if key.is_empty() {
                next_index(map)
            } else {
                key.to_string()
            };
            map.entry(key).or_insert(ParamValue::Null)
        }
        other => other,
    }
}

fn extends_list(key: &str, len: usize) -> bool {
    if key.is_empty() {
        return true;
    }
    match key.parse::<usize>() {
        Ok(index) => index <= len && index.to_string() == key,
        Err(_) => false,
    }
}

fn next_index(map: &IndexMap<String, ParamValue>) -> String {
    map.keys()
        .filter_map(|k| k.parse::<usize>().ok())
        .max()
        .map_or(0, |max| max + 1)
        .to_string()
}

/// Maps keyed `"0".."n-1"` in order become lists.
fn normalize_lists(value: ParamValue) -> ParamValue {
    match value {
        ParamValue::Array(items) => {
            ParamValue::Array(items.into_iter().map(normalize_lists).collect())
        }
        ParamValue::Map(map) => {
            let sequential = map
                .keys()
                .enumerate()
                .all(|(i, k)| k.parse::<usize>().ok() == Some(i) && i.to_string() == *k);
            if sequential && !map.is_empty() {
                ParamValue::Array(map.into_values().map(normalize_lists).collect())
            } else {
                ParamValue::Map(
                    map.into_iter()
                        .map(|(k, v)| (k, normalize_lists(v)))
                        .collect(),
                )
            }
        }
        other => other,
    }
}
