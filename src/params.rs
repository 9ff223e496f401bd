//! Typed parameter extraction.
//!
//! [`ParamLookup`] is the narrow interface a host request exposes: raw
//! query and body lookups by name. [`TypedParams`] is an extension trait,
//! implemented for every `ParamLookup`, that turns those raw values into
//! typed ones under a single default/required/error policy:
//!
//! 1. An absent or null value is *missing*. For the query scope an empty
//!    string is also missing when an int, float or bool is requested.
//! 2. Missing and required fails with [`ParamErrorKind::Missing`](crate::ParamErrorKind).
//!    Missing and optional returns the caller's default untouched.
//! 3. A present value is coerced. Failure is [`ParamErrorKind::Invalid`](crate::ParamErrorKind).
//!
//! Every call is independent and reads the sources without mutating them.

use std::fmt;

use indexmap::IndexMap;

use crate::coerce;
use crate::error::ParamError;
use crate::logging::ParamLog;
use crate::source::Scope;
use crate::value::{ParamArray, ParamValue};

/// The kind a parameter is extracted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// `i64`
    Int,
    /// `f64`
    Float,
    /// `bool`
    Bool,
    /// `String`
    String,
    /// [`ParamArray`]
    Array,
    /// `IndexMap<String, ParamValue>`
    Map,
}

impl ParamKind {
    /// Kinds for which an empty query string counts as missing.
    fn empty_string_is_missing(self) -> bool {
        matches!(self, ParamKind::Int | ParamKind::Float | ParamKind::Bool)
    }

    fn as_str(self) -> &'static str {
        match self {
            ParamKind::Int => "int",
            ParamKind::Float => "float",
            ParamKind::Bool => "bool",
            ParamKind::String => "string",
            ParamKind::Array => "array",
            ParamKind::Map => "map",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw parameter access provided by a host request.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use web_params::{ParamLookup, ParamValue, TypedParams};
///
/// struct FrameworkRequest {
///     query: HashMap<String, ParamValue>,
/// }
///
/// impl ParamLookup for FrameworkRequest {
///     fn query_param(&self, name: &str) -> Option<&ParamValue> {
///         self.query.get(name)
///     }
///
///     fn body_param(&self, _name: &str) -> Option<&ParamValue> {
///         None
///     }
/// }
///
/// let req = FrameworkRequest {
///     query: HashMap::from([("page".to_string(), ParamValue::from("3"))]),
/// };
/// assert_eq!(req.query_int("page", None, false), Ok(Some(3)));
/// ```
pub trait ParamLookup {
    /// Returns the raw query parameter, if any.
    fn query_param(&self, name: &str) -> Option<&ParamValue>;

    /// Returns the raw body parameter, if any.
    fn body_param(&self, name: &str) -> Option<&ParamValue>;

    /// Identifier attached to extraction log events.
    fn request_id(&self) -> &str {
        "-"
    }

    /// Returns the raw parameter from the given scope.
    fn param(&self, scope: Scope, name: &str) -> Option<&ParamValue> {
        match scope {
            Scope::Query => self.query_param(name),
            Scope::Body => self.body_param(name),
        }
    }
}

/// Typed accessors over any [`ParamLookup`].
///
/// Each accessor takes the parameter name, a default returned when the
/// parameter is missing and not required, and the required flag. The
/// `Ok` value is `None` only when the parameter was missing and the default
/// was `None`.
pub trait TypedParams: ParamLookup {
    /// Extracts an integer from `scope`.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but not an integer.
    fn get_int(
        &self,
        scope: Scope,
        name: &str,
        default: Option<i64>,
        required: bool,
    ) -> Result<Option<i64>, ParamError> {
        extract(self, scope, name, ParamKind::Int, default, required, |v, _| {
            coerce::to_int(v)
        })
    }

    /// Extracts a float from `scope`.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but not a number.
    fn get_float(
        &self,
        scope: Scope,
        name: &str,
        default: Option<f64>,
        required: bool,
    ) -> Result<Option<f64>, ParamError> {
        extract(self, scope, name, ParamKind::Float, default, required, |v, _| {
            coerce::to_float(v)
        })
    }

    /// Extracts a boolean from `scope`.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but not a boolean token.
    fn get_bool(
        &self,
        scope: Scope,
        name: &str,
        default: Option<bool>,
        required: bool,
    ) -> Result<Option<bool>, ParamError> {
        extract(self, scope, name, ParamKind::Bool, default, required, |v, _| {
            coerce::to_bool(v)
        })
    }

    /// Extracts a string from `scope`. Any scalar is stringified.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but an array or map.
    fn get_string(
        &self,
        scope: Scope,
        name: &str,
        default: Option<String>,
        required: bool,
    ) -> Result<Option<String>, ParamError> {
        extract(self, scope, name, ParamKind::String, default, required, |v, _| {
            coerce::to_string(v)
        })
    }

    /// Extracts an array from `scope`.
    ///
    /// Lists and keyed arrays pass through unchanged. Query scalars are
    /// wrapped into a one-element list. Body scalars are rejected.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but not acceptable.
    fn get_array(
        &self,
        scope: Scope,
        name: &str,
        default: Option<ParamArray>,
        required: bool,
    ) -> Result<Option<ParamArray>, ParamError> {
        extract(self, scope, name, ParamKind::Array, default, required, |v, scope| {
            match v {
                ParamValue::Array(items) => Some(ParamArray::List(items.clone())),
                ParamValue::Map(map) => Some(ParamArray::Keyed(map.clone())),
                scalar if scalar.is_scalar() && scope.wraps_scalars() => {
                    Some(ParamArray::List(vec![scalar.clone()]))
                }
                _ => None,
            }
        })
    }

    /// Extracts a string-keyed map from `scope`.
    ///
    /// # Errors
    ///
    /// `Missing` if required and absent, `Invalid` if present but not a map.
    fn get_map(
        &self,
        scope: Scope,
        name: &str,
        default: Option<IndexMap<String, ParamValue>>,
        required: bool,
    ) -> Result<Option<IndexMap<String, ParamValue>>, ParamError> {
        extract(self, scope, name, ParamKind::Map, default, required, |v, _| match v {
            ParamValue::Map(map) => Some(map.clone()),
            _ => None,
        })
    }

    /// Query integer. See [`get_int`](Self::get_int).
    fn query_int(
        &self,
        name: &str,
        default: Option<i64>,
        required: bool,
    ) -> Result<Option<i64>, ParamError> {
        self.get_int(Scope::Query, name, default, required)
    }

    /// Query float. See [`get_float`](Self::get_float).
    fn query_float(
        &self,
        name: &str,
        default: Option<f64>,
        required: bool,
    ) -> Result<Option<f64>, ParamError> {
        self.get_float(Scope::Query, name, default, required)
    }

    /// Query boolean. See [`get_bool`](Self::get_bool).
    fn query_bool(
        &self,
        name: &str,
        default: Option<bool>,
        required: bool,
    ) -> Result<Option<bool>, ParamError> {
        self.get_bool(Scope::Query, name, default, required)
    }

    /// Query string. See [`get_string`](Self::get_string).
    fn query_string(
        &self,
        name: &str,
        default: Option<String>,
        required: bool,
    ) -> Result<Option<String>, ParamError> {
        self.get_string(Scope::Query, name, default, required)
    }

    /// Query array. See [`get_array`](Self::get_array).
    fn query_array(
        &self,
        name: &str,
        default: Option<ParamArray>,
        required: bool,
    ) -> Result<Option<ParamArray>, ParamError> {
        self.get_array(Scope::Query, name, default, required)
    }

    /// Query map. See [`get_map`](Self::get_map).
    fn query_map(
        &self,
        name: &str,
        default: Option<IndexMap<String, ParamValue>>,
        required: bool,
    ) -> Result<Option<IndexMap<String, ParamValue>>, ParamError> {
        self.get_map(Scope::Query, name, default, required)
    }

    /// Body integer. See [`get_int`](Self::get_int).
    fn body_int(
        &self,
        name: &str,
        default: Option<i64>,
        required: bool,
    ) -> Result<Option<i64>, ParamError> {
        self.get_int(Scope::Body, name, default, required)
    }

    /// Body float. See [`get_float`](Self::get_float).
    fn body_float(
        &self,
        name: &str,
        default: Option<f64>,
        required: bool,
    ) -> Result<Option<f64>, ParamError> {
        self.get_float(Scope::Body, name, default, required)
    }

    /// Body boolean. See [`get_bool`](Self::get_bool).
    fn body_bool(
        &self,
        name: &str,
        default: Option<bool>,
        required: bool,
    ) -> Result<Option<bool>, ParamError> {
        self.get_bool(Scope::Body, name, default, required)
    }

    /// Body string. See [`get_string`](Self::get_string).
    fn body_string(
        &self,
        name: &str,
        default: Option<String>,
        required: bool,
    ) -> Result<Option<String>, ParamError> {
        self.get_string(Scope::Body, name, default, required)
    }

    /// Body array. See [`get_array`](Self::get_array).
    fn body_array(
        &self,
        name: &str,
        default: Option<ParamArray>,
        required: bool,
    ) -> Result<Option<ParamArray>, ParamError> {
        self.get_array(Scope::Body, name, default, required)
    }

    /// Body map. See [`get_map`](Self::get_map).
    fn body_map(
        &self,
        name: &str,
        default: Option<IndexMap<String, ParamValue>>,
        required: bool,
    ) -> Result<Option<IndexMap<String, ParamValue>>, ParamError> {
        self.get_map(Scope::Body, name, default, required)
    }
}

impl<T: ParamLookup + ?Sized> TypedParams for T {}

/// The shared missing/default/coerce pipeline behind every accessor.
fn extract<L, T, F>(
    lookup: &L,
    scope: Scope,
    name: &str,
    kind: ParamKind,
    default: Option<T>,
    required: bool,
    convert: F,
) -> Result<Option<T>, ParamError>
where
    L: ParamLookup + ?Sized,
    F: FnOnce(&ParamValue, Scope) -> Option<T>,
{
    let log = ParamLog::new(lookup.request_id());

    let value = match lookup.param(scope, name) {
        Some(v) if !is_missing(v, scope, kind) => v,
        _ => {
            if required {
                log.missing(scope, name, kind.as_str());
                return Err(ParamError::missing(name));
            }
            log.defaulted(scope, name, kind.as_str());
            return Ok(default);
        }
    };

    match convert(value, scope) {
        Some(converted) => Ok(Some(converted)),
        None => {
            log.invalid(scope, name, kind.as_str(), value.type_name());
            Err(ParamError::invalid(name))
        }
    }
}

fn is_missing(value: &ParamValue, scope: Scope, kind: ParamKind) -> bool {
    value.is_null()
        || (scope.empty_is_missing() && kind.empty_string_is_missing() && value.is_empty_string())
}
