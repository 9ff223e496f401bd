//! Cookie model and the ordered cookie collection.
//!
//! Wire concerns (percent-encoding, attribute syntax, header parsing) are
//! delegated to the `cookie` crate; this module adds config defaults,
//! `chrono` expiries and insertion-ordered storage on top.

use ::cookie::time::{Duration as HttpDuration, OffsetDateTime};
use ::cookie::Expiration;
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::config::CookieConfig;

pub use ::cookie::SameSite;

/// Latest instant an `Expires` attribute can carry (9999-12-31T23:59:59Z).
const MAX_HTTP_TIMESTAMP: i64 = 253_402_300_799;

/// Parses a `SameSite` policy name, ignoring case.
pub(crate) fn parse_same_site(name: &str) -> Option<SameSite> {
    if name.eq_ignore_ascii_case("strict") {
        Some(SameSite::Strict)
    } else if name.eq_ignore_ascii_case("lax") {
        Some(SameSite::Lax)
    } else if name.eq_ignore_ascii_case("none") {
        Some(SameSite::None)
    } else {
        None
    }
}

/// Deserializes an optional `SameSite` policy from its name.
pub(crate) fn deserialize_same_site<'de, D>(deserializer: D) -> Result<Option<SameSite>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|name| {
            parse_same_site(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown SameSite policy: {}", name)))
        })
        .transpose()
}

/// When a cookie expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiry {
    /// Discarded when the browser session ends
    #[default]
    Session,
    /// Absolute point in time
    At(DateTime<Utc>),
    /// Relative lifetime, sent as `Max-Age`
    After(Duration),
}

impl Expiry {
    /// The expiry used to delete a cookie from the browser: one second
    /// after the Unix epoch.
    pub fn removal() -> Self {
        Expiry::At(DateTime::<Utc>::default() + Duration::seconds(1))
    }

    /// Returns `true` if a cookie with this expiry is no longer valid at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self {
            Expiry::Session => false,
            Expiry::At(at) => *at < now,
            Expiry::After(lifetime) => *lifetime <= Duration::zero(),
        }
    }

    /// A relative expiry of `secs` seconds, saturating at the bounds of
    /// [`Duration`].
    pub fn after_secs(secs: i64) -> Self {
        let lifetime = Duration::try_seconds(secs).unwrap_or(if secs < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        });
        Expiry::After(lifetime)
    }

    /// Builds an expiry from a Unix timestamp; `0` means session.
    pub fn from_timestamp(secs: i64) -> Self {
        if secs == 0 {
            return Expiry::Session;
        }
        let at = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or(if secs < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        });
        Expiry::At(at)
    }
}

/// An HTTP cookie.
///
/// # Examples
///
/// ```
/// use web_params::{Cookie, SameSite};
///
/// let cookie = Cookie::new("theme", "dark")
///     .with_path("/app")
///     .secure(true)
///     .same_site(Some(SameSite::Strict));
///
/// assert_eq!(cookie.name, "theme");
/// assert!(cookie.http_only);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name
    pub name: String,
    /// Cookie value; empty means "not set"
    pub value: String,
    /// Expiry
    pub expire: Expiry,
    /// `Path` attribute
    pub path: String,
    /// `Domain` attribute; empty means host-only
    pub domain: String,
    /// `Secure` flag
    pub secure: bool,
    /// `HttpOnly` flag
    pub http_only: bool,
    /// `SameSite` policy
    pub same_site: Option<SameSite>,
}

impl Cookie {
    /// Creates a session cookie with the default attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_defaults(name, value, &CookieConfig::default())
    }

    /// Creates a session cookie with attributes taken from `defaults`.
    pub fn with_defaults(
        name: impl Into<String>,
        value: impl Into<String>,
        defaults: &CookieConfig,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            expire: Expiry::Session,
            path: defaults.path.clone(),
            domain: defaults.domain.clone(),
            secure: defaults.secure,
            http_only: defaults.http_only,
            same_site: defaults.same_site,
        }
    }

    /// Sets the expiry.
    pub fn expires(mut self, expire: Expiry) -> Self {
        self.expire = expire;
        self
    }

    /// Sets the path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Sets the `Secure` flag.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the `HttpOnly` flag.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Sets the `SameSite` policy.
    pub fn same_site(mut self, same_site: Option<SameSite>) -> Self {
        self.same_site = same_site;
        self
    }

    /// Turns this cookie into its browser-deletion form: empty value and
    /// an expiry in the past. Path and domain are kept so the deletion
    /// matches the original cookie.
    pub fn into_removal(mut self) -> Self {
        self.value.clear();
        self.expire = Expiry::removal();
        self
    }

    /// Returns `true` if the cookie has a value and has not expired at `now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.value.is_empty() && !self.expire.is_expired(now)
    }

    /// Converts to a wire cookie. Relative expiries are resolved against
    /// `now` and sent as both `Expires` and `Max-Age`.
    pub fn to_http_cookie(&self, now: DateTime<Utc>) -> ::cookie::Cookie<'static> {
        let mut builder = ::cookie::Cookie::build((self.name.clone(), self.value.clone()))
            .secure(self.secure)
            .http_only(self.http_only);

        if !self.path.is_empty() {
            builder = builder.path(self.path.clone());
        }
        if !self.domain.is_empty() {
            builder = builder.domain(self.domain.clone());
        }
        if let Some(same_site) = self.same_site {
            builder = builder.same_site(same_site);
        }

        match self.expire {
            Expiry::Session => {}
            Expiry::At(at) => {
                builder = builder.expires(http_expiration(at));
            }
            Expiry::After(lifetime) => {
                let at = now.checked_add_signed(lifetime).unwrap_or(if lifetime < Duration::zero() {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    DateTime::<Utc>::MAX_UTC
                });
                builder = builder
                    .expires(http_expiration(at))
                    .max_age(HttpDuration::seconds(lifetime.num_seconds().max(0)));
            }
        }

        builder.build()
    }

    /// Renders the percent-encoded `Set-Cookie` header value.
    pub fn to_header_value(&self, now: DateTime<Utc>) -> String {
        self.to_http_cookie(now).encoded().to_string()
    }
}

/// `Expires` for `at`, clamped to the range an HTTP date can express.
fn http_expiration(at: DateTime<Utc>) -> Expiration {
    let secs = at.timestamp().clamp(0, MAX_HTTP_TIMESTAMP);
    OffsetDateTime::from_unix_timestamp(secs).map_or(Expiration::Session, Expiration::DateTime)
}

/// Expiry as written in configuration or request payloads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExpireSpec {
    /// Unix timestamp in seconds; `0` means session
    Timestamp(i64),
    /// RFC 3339 time
    Time(DateTime<Utc>),
    /// Lifetime in seconds from when the header is rendered
    After {
        /// Seconds
        after_secs: i64,
    },
}

impl From<ExpireSpec> for Expiry {
    fn from(spec: ExpireSpec) -> Self {
        match spec {
            ExpireSpec::Timestamp(secs) => Expiry::from_timestamp(secs),
            ExpireSpec::Time(at) => Expiry::At(at),
            ExpireSpec::After { after_secs } => Expiry::after_secs(after_secs),
        }
    }
}

/// A loosely specified cookie. Unset attributes are filled in from a
/// [`CookieConfig`] by [`into_cookie`](Self::into_cookie).
///
/// # Examples
///
/// ```
/// use web_params::{CookieConfig, CookieData, Expiry};
///
/// let data: CookieData = serde_json::from_str(
///     r#"{ "name": "cart", "value": "3", "expire": { "after_secs": 3600 } }"#,
/// ).unwrap();
/// let cookie = data.into_cookie(&CookieConfig::default());
///
/// assert_eq!(cookie.path, "/");
/// assert!(matches!(cookie.expire, Expiry::After(_)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CookieData {
    /// Cookie name
    pub name: String,
    /// Cookie value
    #[serde(default)]
    pub value: String,
    /// Expiry; absent means session
    #[serde(default)]
    pub expire: Option<ExpireSpec>,
    /// `Path` override
    #[serde(default)]
    pub path: Option<String>,
    /// `Domain` override
    #[serde(default)]
    pub domain: Option<String>,
    /// `Secure` override
    #[serde(default)]
    pub secure: Option<bool>,
    /// `HttpOnly` override
    #[serde(default)]
    pub http_only: Option<bool>,
    /// `SameSite` override
    #[serde(default, deserialize_with = "deserialize_same_site")]
    pub same_site: Option<SameSite>,
}

impl CookieData {
    /// Resolves the descriptor into a full cookie.
    pub fn into_cookie(self, defaults: &CookieConfig) -> Cookie {
        Cookie {
            name: self.name,
            value: self.value,
            expire: self.expire.map(Expiry::from).unwrap_or_default(),
            path: self.path.unwrap_or_else(|| defaults.path.clone()),
            domain: self.domain.unwrap_or_else(|| defaults.domain.clone()),
            secure: self.secure.unwrap_or(defaults.secure),
            http_only: self.http_only.unwrap_or(defaults.http_only),
            same_site: self.same_site.or(defaults.same_site),
        }
    }
}

/// What to remove from a [`CookieCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieTarget {
    /// A cookie addressed by name
    Name(String),
    /// A full cookie; its path and domain are used for the deletion
    Cookie(Cookie),
}

impl CookieTarget {
    /// Name of the targeted cookie.
    pub fn name(&self) -> &str {
        match self {
            CookieTarget::Name(name) => name,
            CookieTarget::Cookie(cookie) => &cookie.name,
        }
    }
}

impl From<&str> for CookieTarget {
    fn from(name: &str) -> Self {
        CookieTarget::Name(name.to_string())
    }
}

impl From<String> for CookieTarget {
    fn from(name: String) -> Self {
        CookieTarget::Name(name)
    }
}

impl From<Cookie> for CookieTarget {
    fn from(cookie: Cookie) -> Self {
        CookieTarget::Cookie(cookie)
    }
}

/// Cookies keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieCollection {
    cookies: IndexMap<String, Cookie>,
}

impl CookieCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the cookie exists, has a value and has not expired.
    pub fn has(&self, name: &str) -> bool {
        self.has_at(name, Utc::now())
    }

    /// [`has`](Self::has) evaluated at a fixed instant.
    pub fn has_at(&self, name: &str, now: DateTime<Utc>) -> bool {
        self.cookies.get(name).is_some_and(|c| c.is_live(now))
    }

    /// Returns the cookie with this name, expired or not.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.get(name)
    }

    /// Returns the value of the cookie, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(|c| c.value.as_str())
    }

    /// Adds a cookie. An existing cookie with the same name is replaced and
    /// the new one moves to the end.
    pub fn add(&mut self, cookie: Cookie) {
        self.cookies.shift_remove(&cookie.name);
        self.cookies.insert(cookie.name.clone(), cookie);
    }

    /// Removes a cookie.
    ///
    /// With `from_browser` the collection keeps a deletion cookie (empty
    /// value, past expiry) so the browser drops it too; when removing by
    /// name, a pending cookie's path and domain are reused. Without
    /// `from_browser` the entry is simply dropped.
    pub fn remove(&mut self, target: impl Into<CookieTarget>, from_browser: bool) {
        let target = target.into();

        if !from_browser {
            self.cookies.shift_remove(target.name());
            return;
        }

        let removal = match target {
            CookieTarget::Cookie(cookie) => cookie.into_removal(),
            CookieTarget::Name(name) => match self.cookies.get(&name) {
                Some(pending) => pending.clone().into_removal(),
                None => Cookie::new(name, "").into_removal(),
            },
        };
        // `insert` keeps the position of an existing entry
        self.cookies.insert(removal.name.clone(), removal);
    }

    /// Removes every cookie.
    pub fn remove_all(&mut self) {
        self.cookies.clear();
    }

    /// Number of cookies.
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    /// Returns `true` if there are no cookies.
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    /// Iterates over the cookies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.values()
    }
}

impl FromIterator<Cookie> for CookieCollection {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut collection = Self::new();
        for cookie in iter {
            collection.add(cookie);
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn new_cookie_uses_defaults() {
        let cookie = Cookie::new("sid", "abc");
        assert_eq!(cookie.expire, Expiry::Session);
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.domain, "");
        assert!(!cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.same_site, Some(SameSite::Lax));
    }

    #[test]
    fn expiry_checks() {
        let now = at(1_000);
        assert!(!Expiry::Session.is_expired(now));
        assert!(!Expiry::At(at(1_100)).is_expired(now));
        assert!(Expiry::At(at(900)).is_expired(now));
        assert!(!Expiry::After(Duration::seconds(10)).is_expired(now));
        assert!(Expiry::After(Duration::seconds(0)).is_expired(now));
        assert!(Expiry::removal().is_expired(now));
    }

    #[test]
    fn timestamp_zero_is_session() {
        assert_eq!(Expiry::from_timestamp(0), Expiry::Session);
        assert_eq!(Expiry::from_timestamp(1), Expiry::removal());
        assert_eq!(Expiry::from_timestamp(i64::MAX), Expiry::At(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn has_requires_value_and_validity() {
        let now = at(10_000);
        let collection: CookieCollection = [
            Cookie::new("test1", "test").expires(Expiry::At(at(10_100))),
            Cookie::new("test2", "").expires(Expiry::At(at(10_100))),
            Cookie::new("test3", "test").expires(Expiry::At(at(9_900))),
        ]
        .into_iter()
        .collect();

        assert!(collection.has_at("test1", now));
        assert!(!collection.has_at("test2", now));
        assert!(!collection.has_at("test3", now));
        assert!(!collection.has_at("nonExistent", now));
        // `get` still returns expired cookies
        assert!(collection.get("test3").is_some());
    }

    #[test]
    fn add_replaces_and_moves_to_end() {
        let mut collection = CookieCollection::new();
        collection.add(Cookie::new("a", "1"));
        collection.add(Cookie::new("b", "2"));
        collection.add(Cookie::new("a", "3"));

        let names: Vec<&str> = collection.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert_eq!(collection.value("a"), Some("3"));
    }

    #[test]
    fn remove_from_browser_by_name() {
        let mut collection = CookieCollection::new();
        collection.add(Cookie::new("sid", "abc").with_path("/app").with_domain("example.com"));
        collection.remove("sid", true);

        let removed = collection.get("sid").unwrap();
        assert_eq!(removed.value, "");
        assert_eq!(removed.expire, Expiry::removal());
        assert_eq!(removed.path, "/app");
        assert_eq!(removed.domain, "example.com");
    }

    #[test]
    fn remove_from_browser_unknown_name_uses_defaults() {
        let mut collection = CookieCollection::new();
        collection.remove("ghost", true);

        let removed = collection.get("ghost").unwrap();
        assert_eq!(removed.path, "/");
        assert_eq!(removed.expire, Expiry::removal());
    }

    #[test]
    fn remove_by_cookie_keeps_its_attributes() {
        let mut collection = CookieCollection::new();
        let cookie = Cookie::new("pref", "x").with_path("/p");
        collection.remove(cookie, true);

        let removed = collection.get("pref").unwrap();
        assert_eq!(removed.path, "/p");
        assert!(removed.value.is_empty());
    }

    #[test]
    fn remove_without_browser_drops_entry() {
        let mut collection = CookieCollection::new();
        collection.add(Cookie::new("a", "1"));
        collection.add(Cookie::new("b", "2"));
        collection.remove("a", false);

        assert!(collection.get("a").is_none());
        assert_eq!(collection.len(), 1);
    }

    #[test]
    fn remove_from_browser_keeps_position() {
        let mut collection = CookieCollection::new();
        collection.add(Cookie::new("a", "1"));
        collection.add(Cookie::new("b", "2"));
        collection.remove("a", true);

        let names: Vec<&str> = collection.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn remove_all_clears() {
        let mut collection: CookieCollection =
            [Cookie::new("a", "1"), Cookie::new("b", "2")].into_iter().collect();
        collection.remove_all();
        assert!(collection.is_empty());
    }

    fn parse_header(header: &str) -> ::cookie::Cookie<'static> {
        ::cookie::Cookie::parse_encoded(header.to_string()).unwrap()
    }

    #[test]
    fn header_for_absolute_expiry() {
        let cookie = Cookie::new("sid", "abc")
            .expires(Expiry::At(at(1)))
            .with_domain("example.com")
            .secure(true);

        let header = cookie.to_header_value(at(0));
        assert!(header.starts_with("sid=abc;"));
        assert!(header.contains("Expires=Thu, 01 Jan 1970 00:00:01 GMT"));
        assert!(!header.contains("Max-Age"));

        let wire = parse_header(&header);
        assert_eq!(wire.path(), Some("/"));
        assert_eq!(wire.domain(), Some("example.com"));
        assert_eq!(wire.secure(), Some(true));
        assert_eq!(wire.http_only(), Some(true));
        assert_eq!(wire.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn header_for_relative_expiry() {
        let cookie = Cookie::new("cart", "3")
            .expires(Expiry::After(Duration::seconds(60)))
            .http_only(false)
            .same_site(None);

        let header = cookie.to_header_value(at(0));
        assert!(header.contains("Expires=Thu, 01 Jan 1970 00:01:00 GMT"));
        assert!(header.contains("Max-Age=60"));
        assert!(!header.contains("HttpOnly"));
        assert!(!header.contains("SameSite"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn header_value_is_encoded() {
        let cookie = Cookie::new("q", "a b;c").http_only(false).same_site(None);
        let header = cookie.to_header_value(at(0));
        assert!(header.starts_with("q=a%20b"));

        let wire = parse_header(&header);
        assert_eq!(wire.name(), "q");
        assert_eq!(wire.value(), "a b;c");
    }

    #[test]
    fn huge_relative_expiry_saturates() {
        let data: CookieData = serde_json::from_str(
            r#"{"name": "a", "value": "1", "expire": {"after_secs": 9223372036854775807}}"#,
        )
        .unwrap();
        let cookie = data.into_cookie(&CookieConfig::default());
        assert_eq!(cookie.expire, Expiry::After(Duration::MAX));
        assert!(cookie.is_live(Utc::now()));

        let past = Expiry::after_secs(i64::MIN);
        assert_eq!(past, Expiry::After(Duration::MIN));
        assert!(past.is_expired(Utc::now()));
    }

    #[test]
    fn far_future_header_is_clamped() {
        let cookie = Cookie::new("a", "1").expires(Expiry::after_secs(900_000_000_000_000));
        let header = cookie.to_header_value(Utc::now());
        assert!(header.contains("Expires=Fri, 31 Dec 9999 23:59:59 GMT"));
        assert!(header.contains("Max-Age=900000000000000"));

        let cookie = Cookie::new("a", "1").expires(Expiry::At(DateTime::<Utc>::MAX_UTC));
        assert!(cookie
            .to_header_value(at(0))
            .contains("Expires=Fri, 31 Dec 9999 23:59:59 GMT"));
    }

    #[test]
    fn same_site_names_ignore_case() {
        assert_eq!(parse_same_site("strict"), Some(SameSite::Strict));
        assert_eq!(parse_same_site("LAX"), Some(SameSite::Lax));
        assert_eq!(parse_same_site("None"), Some(SameSite::None));
        assert_eq!(parse_same_site("sometimes"), None);

        let err = serde_json::from_str::<CookieData>(r#"{"name": "a", "same_site": "sometimes"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn cookie_data_fills_defaults() {
        let defaults = CookieConfig {
            secure: true,
            ..CookieConfig::default()
        };
        let data = CookieData {
            name: "n".to_string(),
            value: "v".to_string(),
            path: Some("/x".to_string()),
            ..CookieData::default()
        };

        let cookie = data.into_cookie(&defaults);
        assert_eq!(cookie.path, "/x");
        assert!(cookie.secure);
        assert!(cookie.http_only);
        assert_eq!(cookie.expire, Expiry::Session);
    }

    #[test]
    fn cookie_data_expire_forms() {
        let parse = |json: &str| -> Expiry {
            let data: CookieData = serde_json::from_str(json).unwrap();
            data.into_cookie(&CookieConfig::default()).expire
        };

        assert_eq!(parse(r#"{"name": "a", "expire": 0}"#), Expiry::Session);
        assert_eq!(parse(r#"{"name": "a", "expire": 1}"#), Expiry::removal());
        assert_eq!(
            parse(r#"{"name": "a", "expire": "1970-01-01T00:00:01Z"}"#),
            Expiry::removal()
        );
        assert_eq!(
            parse(r#"{"name": "a", "expire": {"after_secs": 30}}"#),
            Expiry::After(Duration::seconds(30))
        );
        assert_eq!(parse(r#"{"name": "a"}"#), Expiry::Session);
    }
}
