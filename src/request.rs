//! The request half: parameter sources and incoming cookies.

use crate::cookie::CookieCollection;
use crate::logging::ParamLog;
use crate::params::ParamLookup;
use crate::source::ParamSource;
use crate::value::ParamValue;

/// An incoming request as seen by handlers.
///
/// Holds the query and body parameter sources and the (already validated)
/// request cookies. Typed access comes from [`TypedParams`](crate::TypedParams),
/// which every `Request` implements.
///
/// # Examples
///
/// ```
/// use web_params::{ParamSource, Request, TypedParams};
///
/// let mut req = Request::new("req-1");
/// req.set_query_params(ParamSource::from_urlencoded("page=2").unwrap());
///
/// assert_eq!(req.query_int("page", Some(1), false), Ok(Some(2)));
/// assert_eq!(req.query_int("size", Some(20), false), Ok(Some(20)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Request {
    request_id: String,
    query: ParamSource,
    body: ParamSource,
    cookies: CookieCollection,
}

impl Request {
    /// Creates a request with empty sources.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Replaces the query parameters.
    pub fn set_query_params(&mut self, query: ParamSource) {
        self.query = query;
    }

    /// Replaces the body parameters.
    pub fn set_body_params(&mut self, body: ParamSource) {
        self.body = body;
    }

    /// Replaces the request cookies.
    pub fn set_cookies(&mut self, cookies: CookieCollection) {
        self.cookies = cookies;
    }

    /// Builder form of [`set_query_params`](Self::set_query_params).
    pub fn with_query(mut self, query: ParamSource) -> Self {
        self.query = query;
        self
    }

    /// Builder form of [`set_body_params`](Self::set_body_params).
    pub fn with_body(mut self, body: ParamSource) -> Self {
        self.body = body;
        self
    }

    /// Builder form of [`set_cookies`](Self::set_cookies).
    pub fn with_cookies(mut self, cookies: CookieCollection) -> Self {
        self.cookies = cookies;
        self
    }

    /// Query parameters.
    pub fn query(&self) -> &ParamSource {
        &self.query
    }

    /// Body parameters.
    pub fn body(&self) -> &ParamSource {
        &self.body
    }

    /// Request cookies.
    pub fn cookies(&self) -> &CookieCollection {
        &self.cookies
    }

    /// Returns a logger bound to this request's id.
    pub fn log(&self) -> ParamLog<'_> {
        ParamLog::new(&self.request_id)
    }
}

impl ParamLookup for Request {
    fn query_param(&self, name: &str) -> Option<&ParamValue> {
        self.query.get(name)
    }

    fn body_param(&self, name: &str) -> Option<&ParamValue> {
        self.body.get(name)
    }

    fn request_id(&self) -> &str {
        &self.request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookie::Cookie;
    use crate::params::TypedParams;

    #[test]
    fn new_request_is_empty() {
        let req = Request::new("req-1");
        assert_eq!(ParamLookup::request_id(&req), "req-1");
        assert!(req.query().is_empty());
        assert!(req.body().is_empty());
        assert!(req.cookies().is_empty());
    }

    #[test]
    fn setters_replace_sources() {
        let mut req = Request::new("req-1");
        req.set_query_params([("a", "1")].into_iter().collect());
        req.set_query_params([("b", "2")].into_iter().collect());

        assert!(req.query_param("a").is_none());
        assert_eq!(req.query_int("b", None, true), Ok(Some(2)));
    }

    #[test]
    fn scopes_are_separate() {
        let req = Request::new("req-1")
            .with_query([("id", "1")].into_iter().collect())
            .with_body([("id", "2")].into_iter().collect());

        assert_eq!(req.query_int("id", None, false), Ok(Some(1)));
        assert_eq!(req.body_int("id", None, false), Ok(Some(2)));
    }

    #[test]
    fn cookies_are_attached() {
        let req = Request::new("req-1")
            .with_cookies([Cookie::new("sid", "abc")].into_iter().collect());
        assert!(req.cookies().has("sid"));
    }

    #[test]
    fn log_uses_request_id() {
        let req = Request::new("req-42");
        assert_eq!(req.log().request_id(), "req-42");
    }

    #[test]
    fn request_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Request>();
    }
}
