//! Request adapter for mapping raw HTTP parts to a [`Request`].

use crate::config::CookieConfig;
use crate::cookie::{Cookie, CookieCollection};
use crate::cookie_manager::RawCookies;
use crate::error::BodyError;
use crate::logging::ParamLog;
use crate::request::Request;
use crate::source::ParamSource;

use super::{ExtractRawCookies, ExtractRequest};

/// Content types whose bodies are decoded into body parameters.
const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Adapter for converting framework-specific HTTP requests into [`Request`]s.
///
/// `RequestAdapter` holds simple, owned copies of the parts this crate
/// needs: request id, raw query string, `Content-Type`, body bytes and the
/// `Cookie` header. Framework integrations fill it in (typically through a
/// `From<FrameworkRequest>` impl) and then call
/// [`extract_request`](ExtractRequest::extract_request).
///
/// # Examples
///
/// ```
/// use web_params::web::{ExtractRequest, RequestAdapter};
/// use web_params::TypedParams;
///
/// let mut adapter = RequestAdapter::new("req-12345");
/// adapter.set_query_string("page=2&tags[]=a&tags[]=b");
/// adapter.set_body("application/json", br#"{"confirm": true}"#.to_vec());
///
/// let req = adapter.extract_request().unwrap();
/// assert_eq!(req.query_int("page", None, true), Ok(Some(2)));
/// assert_eq!(req.body_bool("confirm", Some(false), false), Ok(Some(true)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestAdapter {
    request_id: String,
    query_string: String,
    content_type: Option<String>,
    body: Vec<u8>,
    cookie_header: Option<String>,
    cookie_defaults: CookieConfig,
}

impl RequestAdapter {
    /// Creates an adapter with no query, body or cookies.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Sets the raw query string, with or without a leading `?`.
    pub fn set_query_string(&mut self, query: impl Into<String>) {
        self.query_string = query.into();
    }

    /// Sets the body and its `Content-Type` header value.
    pub fn set_body(&mut self, content_type: impl Into<String>, body: Vec<u8>) {
        self.content_type = Some(content_type.into());
        self.body = body;
    }

    /// Sets the `Cookie` header value.
    pub fn set_cookie_header(&mut self, header: impl Into<String>) {
        self.cookie_header = Some(header.into());
    }

    /// Sets the attributes given to request cookies.
    pub fn set_cookie_defaults(&mut self, defaults: CookieConfig) {
        self.cookie_defaults = defaults;
    }

    /// Returns the request ID.
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    fn log(&self) -> ParamLog<'_> {
        ParamLog::new(&self.request_id)
    }

    fn decode_query(&self) -> ParamSource {
        let query = self.query_string.trim_start_matches('?');
        ParamSource::from_urlencoded(query).unwrap_or_else(|e| {
            self.log().warn(format_args!("query string ignored: {}", e));
            ParamSource::new()
        })
    }

    fn decode_body(&self) -> Result<ParamSource, BodyError> {
        let Some(content_type) = self.content_type.as_deref() else {
            return Ok(ParamSource::new());
        };
        // drop parameters such as `; charset=utf-8`
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        let decoded = match mime.as_str() {
            JSON => ParamSource::from_json_slice(&self.body),
            FORM => std::str::from_utf8(&self.body)
                .map_err(|e| BodyError::MalformedForm(e.to_string()))
                .and_then(ParamSource::from_urlencoded),
            _ => {
                self.log()
                    .debug(format_args!("body with content type {} not decoded", mime));
                return Ok(ParamSource::new());
            }
        };

        decoded.inspect_err(|e| self.log().warn(format_args!("body rejected: {}", e)))
    }
}

impl ExtractRequest for RequestAdapter {
    fn extract_request(&self) -> Result<Request, BodyError> {
        let cookies: CookieCollection = self
            .extract_raw_cookies()
            .iter()
            .map(|(name, value)| Cookie::with_defaults(name, value, &self.cookie_defaults))
            .collect();

        Ok(Request::new(self.request_id.clone())
            .with_query(self.decode_query())
            .with_body(self.decode_body()?)
            .with_cookies(cookies))
    }

    fn request_id(&self) -> &str {
        RequestAdapter::request_id(self)
    }
}

impl ExtractRawCookies for RequestAdapter {
    fn extract_raw_cookies(&self) -> RawCookies {
        self.cookie_header
            .as_deref()
            .map(RawCookies::parse)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TypedParams;
    use crate::value::{ParamArray, ParamValue};

    #[test]
    fn request_adapter_new() {
        let adapter = RequestAdapter::new("req-test");
        assert_eq!(adapter.request_id(), "req-test");

        let req = adapter.extract_request().unwrap();
        assert!(req.query().is_empty());
        assert!(req.body().is_empty());
        assert!(req.cookies().is_empty());
    }

    #[test]
    fn query_string_with_leading_question_mark() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_query_string("?id=42");

        let req = adapter.extract_request().unwrap();
        assert_eq!(req.query_int("id", None, true), Ok(Some(42)));
    }

    #[test]
    fn form_body_is_decoded() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_body(
            "application/x-www-form-urlencoded; charset=UTF-8",
            b"ids[]=1&ids[]=2&name=bob".to_vec(),
        );

        let req = adapter.extract_request().unwrap();
        assert_eq!(
            req.body_array("ids", None, true),
            Ok(Some(ParamArray::from(vec!["1", "2"])))
        );
        assert_eq!(req.body_string("name", None, true), Ok(Some("bob".to_string())));
    }

    #[test]
    fn json_body_keeps_types() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_body("Application/JSON", br#"{"n": 5, "f": 1.5}"#.to_vec());

        let req = adapter.extract_request().unwrap();
        assert_eq!(req.body().get("n"), Some(&ParamValue::Int(5)));
        assert_eq!(req.body_float("f", None, true), Ok(Some(1.5)));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_body("application/json", b"{oops".to_vec());
        assert!(matches!(
            adapter.extract_request(),
            Err(BodyError::MalformedJson(_))
        ));
    }

    #[test]
    fn non_utf8_form_is_rejected() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_body(FORM, vec![0xff, 0xfe]);
        assert!(matches!(
            adapter.extract_request(),
            Err(BodyError::MalformedForm(_))
        ));
    }

    #[test]
    fn other_content_types_yield_empty_body() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_body("text/plain", b"id=1".to_vec());

        let req = adapter.extract_request().unwrap();
        assert!(req.body().is_empty());
    }

    #[test]
    fn cookies_reach_both_views() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_cookie_header("sid=abc; empty=");
        adapter.set_cookie_defaults(CookieConfig {
            path: "/app".to_string(),
            ..CookieConfig::default()
        });

        let raw = adapter.extract_raw_cookies();
        assert_eq!(raw.get("empty"), Some(""));

        let req = adapter.extract_request().unwrap();
        assert!(req.cookies().has("sid"));
        assert!(!req.cookies().has("empty"));
        assert_eq!(req.cookies().get("sid").map(|c| c.path.as_str()), Some("/app"));
    }

    #[test]
    fn repeated_extractions_are_independent() {
        let mut adapter = RequestAdapter::new("req-1");
        adapter.set_query_string("k=v");

        let first = adapter.extract_request().unwrap();
        let second = adapter.extract_request().unwrap();
        assert_eq!(first.query(), second.query());
    }
}
