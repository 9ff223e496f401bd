//! Web framework integration surface.
//!
//! This module is the boundary between HTTP frameworks and this crate's
//! request/response types. It handles:
//! - Decoding raw HTTP parts (query string, body, `Cookie` header) into a [`Request`](crate::Request)
//! - Running handlers and translating [`Error`](crate::Error)s into HTTP error responses
//!
//! # Design Principles
//!
//! 1. **No Framework Dependencies**: nothing here depends on a specific
//!    framework. Integrations build a [`RequestAdapter`] or implement
//!    [`ExtractRequest`] for their own request type.
//!
//! 2. **Explicit Context**: no global state. The raw cookie header is only
//!    reachable through an explicitly extracted [`RawCookies`](crate::RawCookies).
//!
//! # Example Flow
//!
//! ```
//! use web_params::web::{with_params, RequestAdapter};
//! use web_params::{CookieManager, TypedParams};
//!
//! // 1. Copy the raw parts out of the framework request
//! let mut adapter = RequestAdapter::new("req-7");
//! adapter.set_query_string("id=42");
//!
//! // 2. Run the handler; errors become 400/500 responses
//! let handled = with_params(&adapter, |req, res| {
//!     let id = req.query_int("id", None, true)?;
//!     CookieManager::new(req, res).add(web_params::Cookie::new("last_id", "42"));
//!     Ok(id)
//! })
//! .unwrap();
//!
//! assert_eq!(handled.value, Some(42));
//! assert_eq!(handled.response.cookies().len(), 1);
//! ```

mod adapter;
pub mod example_handler;
mod extract;
mod middleware;

pub use adapter::RequestAdapter;
pub use extract::{ExtractRawCookies, ExtractRequest};
pub use middleware::{into_error_response, with_params, ErrorResponse, Handled};
