//! High-level cookie access spanning the request and response.

use ::cookie::Cookie as HttpCookie;
use indexmap::IndexMap;

use crate::config::CookieConfig;
use crate::cookie::{Cookie, CookieData, CookieTarget};
use crate::request::Request;
use crate::response::Response;

/// Cookies exactly as the client sent them in the `Cookie` header.
///
/// Unlike [`Request::cookies`], nothing here has been validated. It is
/// passed explicitly to the `*_raw` methods of [`CookieManager`].
///
/// # Examples
///
/// ```
/// use web_params::RawCookies;
///
/// let raw = RawCookies::parse("sid=abc; theme=dark%20blue; empty=");
/// assert_eq!(raw.get("theme"), Some("dark blue"));
/// assert_eq!(raw.get("empty"), Some(""));
/// assert_eq!(raw.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCookies {
    values: IndexMap<String, String>,
}

impl RawCookies {
    /// Parses a `Cookie` header. Pairs without `=` or with an empty name
    /// are skipped; the first occurrence of a repeated name wins. Values are
    /// percent-decoded, or kept verbatim when they do not decode to UTF-8.
    pub fn parse(header: &str) -> Self {
        let mut values = IndexMap::new();

        for pair in header.split(';').map(str::trim) {
            let Ok(parsed) = HttpCookie::parse_encoded(pair).or_else(|_| HttpCookie::parse(pair))
            else {
                continue;
            };
            if !values.contains_key(parsed.name()) {
                values.insert(parsed.name().to_string(), parsed.value().to_string());
            }
        }

        Self { values }
    }

    /// Returns the raw value, if the client sent one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Sets a value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Iterates over name/value pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the header held no cookies.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawCookies {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Reads request cookies and queues response cookies.
///
/// # Examples
///
/// ```
/// use web_params::{Cookie, CookieManager, Request, Response};
///
/// let request = Request::new("req-1");
/// let mut response = Response::new();
///
/// let mut cookies = CookieManager::new(&request, &mut response);
/// cookies.add(Cookie::new("theme", "dark"));
/// cookies.remove("sid", true);
///
/// assert_eq!(response.cookies().len(), 2);
/// ```
#[derive(Debug)]
pub struct CookieManager<'a> {
    request: &'a Request,
    response: &'a mut Response,
    defaults: CookieConfig,
}

impl<'a> CookieManager<'a> {
    /// Creates a manager using the default cookie attributes.
    pub fn new(request: &'a Request, response: &'a mut Response) -> Self {
        Self::with_defaults(request, response, CookieConfig::default())
    }

    /// Creates a manager that fills unset cookie attributes from `defaults`.
    pub fn with_defaults(
        request: &'a Request,
        response: &'a mut Response,
        defaults: CookieConfig,
    ) -> Self {
        Self {
            request,
            response,
            defaults,
        }
    }

    /// Returns `true` if the request carries a live cookie with this name:
    /// present, non-empty and not expired.
    pub fn has(&self, name: &str) -> bool {
        self.request.cookies().has(name)
    }

    /// Returns the request cookie with this name.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.request.cookies().get(name)
    }

    /// Returns `true` if the raw header carries a non-empty value.
    pub fn has_raw(&self, raw: &RawCookies, name: &str) -> bool {
        raw.get(name).is_some_and(|value| !value.is_empty())
    }

    /// Builds a session cookie from the raw header value. Empty values are
    /// returned as-is.
    pub fn get_raw(&self, raw: &RawCookies, name: &str) -> Option<Cookie> {
        raw.get(name)
            .map(|value| Cookie::with_defaults(name, value, &self.defaults))
    }

    /// Queues a cookie on the response, replacing any with the same name.
    pub fn add(&mut self, cookie: Cookie) {
        self.request
            .log()
            .debug(format_args!("cookie {} added", cookie.name));
        self.response.cookies_mut().add(cookie);
    }

    /// Queues a cookie described by `data`, filling unset attributes from
    /// the manager's defaults.
    pub fn add_data(&mut self, data: CookieData) {
        let cookie = data.into_cookie(&self.defaults);
        self.add(cookie);
    }

    /// Removes a cookie from the response.
    ///
    /// See [`CookieCollection::remove`](crate::CookieCollection::remove).
    pub fn remove(&mut self, target: impl Into<CookieTarget>, from_browser: bool) {
        let target = target.into();
        self.request.log().debug(format_args!(
            "cookie {} removed (from_browser={})",
            target.name(),
            from_browser
        ));

        let target = match target {
            CookieTarget::Name(name)
                if from_browser && self.response.cookies().get(&name).is_none() =>
            {
                CookieTarget::Cookie(Cookie::with_defaults(name, "", &self.defaults))
            }
            other => other,
        };
        self.response.cookies_mut().remove(target, from_browser);
    }

    /// Drops every pending response cookie.
    pub fn remove_all(&mut self) {
        self.request.log().debug(format_args!("all cookies removed"));
        self.response.cookies_mut().remove_all();
    }
}
