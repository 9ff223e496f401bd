//! The response half: cookies queued for the client.

use chrono::{DateTime, Utc};

use crate::cookie::CookieCollection;

/// Outgoing response state owned by this crate.
///
/// Only the cookie collection lives here; status, headers and body belong
/// to the host framework, which copies [`set_cookie_headers`](Self::set_cookie_headers)
/// into its own response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    cookies: CookieCollection,
}

impl Response {
    /// Creates a response with no pending cookies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pending cookies.
    pub fn cookies(&self) -> &CookieCollection {
        &self.cookies
    }

    /// Mutable access to the pending cookies.
    pub fn cookies_mut(&mut self) -> &mut CookieCollection {
        &mut self.cookies
    }

    /// Renders one `Set-Cookie` value per pending cookie, in order.
    pub fn set_cookie_headers(&self, now: DateTime<Utc>) -> Vec<String> {
        self.cookies.iter().map(|c| c.to_header_value(now)).collect()
    }
}
