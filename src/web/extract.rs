//! Extraction boundary traits for web integration.
//!
//! Framework integrations implement these for their own request types (or
//! build a [`RequestAdapter`](super::RequestAdapter), which implements both).

use crate::cookie_manager::RawCookies;
use crate::error::BodyError;
use crate::request::Request;

/// Builds a [`Request`] from a framework-specific request.
///
/// # Examples
///
/// ```
/// use web_params::web::ExtractRequest;
/// use web_params::{BodyError, ParamSource, Request};
///
/// struct MyFrameworkRequest {
///     id: String,
///     query: String,
/// }
///
/// impl ExtractRequest for MyFrameworkRequest {
///     fn extract_request(&self) -> Result<Request, BodyError> {
///         let query = ParamSource::from_urlencoded(&self.query)?;
///         Ok(Request::new(self.id.clone()).with_query(query))
///     }
///
///     fn request_id(&self) -> &str {
///         &self.id
///     }
/// }
/// ```
pub trait ExtractRequest {
    /// Decodes query, body and cookies into a `Request`.
    ///
    /// # Errors
    ///
    /// Returns `BodyError` if the body cannot be decoded.
    fn extract_request(&self) -> Result<Request, BodyError>;

    /// Request id used for log events raised before a `Request` exists.
    fn request_id(&self) -> &str {
        "-"
    }
}

/// Exposes the unvalidated `Cookie` header.
pub trait ExtractRawCookies {
    /// Parses the `Cookie` header; an absent header yields no cookies.
    fn extract_raw_cookies(&self) -> RawCookies;
}
