//! Deserializable configuration for cookie defaults and form rendering.

use serde::Deserialize;

use crate::cookie::{deserialize_same_site, SameSite};
use crate::error::ConfigError;

/// Top-level configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
///
/// # Examples
///
/// ```
/// use web_params::WebConfig;
///
/// let config = WebConfig::from_json_str(r#"{ "cookie": { "secure": true } }"#).unwrap();
/// assert!(config.cookie.secure);
/// assert_eq!(config.cookie.path, "/");
/// assert_eq!(config.html.method_param, "_method");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Defaults for cookies built from [`CookieData`](crate::CookieData)
    pub cookie: CookieConfig,
    /// Form rendering settings
    pub html: HtmlConfig,
}

impl WebConfig {
    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the document is not valid JSON or a field
    /// has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::new(e.to_string()))
    }
}

/// Attribute defaults for new cookies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    /// `Path` attribute
    pub path: String,
    /// `Domain` attribute; empty means host-only
    pub domain: String,
    /// `Secure` flag
    pub secure: bool,
    /// `HttpOnly` flag
    pub http_only: bool,
    /// `SameSite` policy; `null` omits the attribute
    #[serde(deserialize_with = "deserialize_same_site")]
    pub same_site: Option<SameSite>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            domain: String::new(),
            secure: false,
            http_only: true,
            same_site: Some(SameSite::Lax),
        }
    }
}

/// Settings for [`single_button_form`](crate::html::single_button_form).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// Prefix joined with route paths when resolving form actions
    pub base_url: String,
    /// Hidden field carrying methods a browser form cannot submit
    pub method_param: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            method_param: "_method".to_string(),
        }
    }
}
