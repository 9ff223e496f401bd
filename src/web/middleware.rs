//! Middleware glue: run a handler against an extracted request and turn
//! failures into HTTP error responses.
//!
//! # Integration Flow
//!
//! ```text
//! HTTP Request
//!   ↓
//! Framework-specific code builds a RequestAdapter
//!   ↓
//! with_params(adapter, handler)
//!   ↓
//! handler reads typed params and queues cookies
//!   ↓
//! Ok(Handled { value, response })  or  Err(ErrorResponse { 400 | 500 })
//! ```

use std::fmt;

use crate::error::Error;
use crate::params::ParamLookup;
use crate::request::Request;
use crate::response::Response;

use super::ExtractRequest;

/// An error translated for the client.
///
/// Only the error's `Display` text is exposed. Parameter errors name the
/// parameter but never echo its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    /// HTTP status code
    pub status: u16,
    /// Message safe to return to the client
    pub message: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            status: err.status_code(),
            message: err.to_string(),
        }
    }
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

/// Translates an error and logs it against the request id.
///
/// Client errors are logged at `debug`, server errors at `warn`.
pub fn into_error_response(err: &Error, request_id: &str) -> ErrorResponse {
    let response = ErrorResponse::from(err);
    if response.status >= 500 {
        tracing::warn!(request_id, status = response.status, "{}", err);
    } else {
        tracing::debug!(request_id, status = response.status, "{}", err);
    }
    response
}

/// A handler's result paired with the response state it produced.
#[derive(Debug)]
pub struct Handled<T> {
    /// The handler's return value
    pub value: T,
    /// Response cookies queued by the handler
    pub response: Response,
}

/// Extracts a request, runs `handler`, and translates any error.
///
/// # Errors
///
/// Returns an `ErrorResponse` if the body cannot be decoded or the handler
/// fails. Cookies queued before a handler failure are discarded.
///
/// # Examples
///
/// ```
/// use web_params::web::{with_params, RequestAdapter};
/// use web_params::TypedParams;
///
/// let mut adapter = RequestAdapter::new("req-001");
/// adapter.set_query_string("page=abc");
///
/// let err = with_params(&adapter, |req, _res| Ok(req.query_int("page", Some(1), false)?))
///     .unwrap_err();
/// assert_eq!(err.status, 400);
/// assert_eq!(err.message, "Invalid value for parameter: page");
/// ```
pub fn with_params<A, T, F>(adapter: &A, handler: F) -> Result<Handled<T>, ErrorResponse>
where
    A: ExtractRequest + ?Sized,
    F: FnOnce(&Request, &mut Response) -> Result<T, Error>,
{
    let request = adapter
        .extract_request()
        .map_err(|e| into_error_response(&Error::from(e), adapter.request_id()))?;

    let mut response = Response::new();
    match handler(&request, &mut response) {
        Ok(value) => Ok(Handled { value, response }),
        Err(err) => Err(into_error_response(&err, request.request_id())),
    }
}
