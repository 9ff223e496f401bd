//! Typed request parameters, cookie helpers and single-button forms.
//!
//! This crate provides small conveniences over a web request/response pair:
//! - **Typed parameters**: read query and body parameters as `i64`, `f64`,
//!   `bool`, `String`, lists or maps, with one default/required/error policy
//! - **Cookies**: check, read, queue and delete cookies across the request
//!   and response
//! - **Forms**: render a form consisting of hidden inputs and a single
//!   submit button
//!
//! # Core Types
//!
//! - [`TypedParams`]: typed accessors over anything implementing [`ParamLookup`]
//! - [`Request`]: query/body [`ParamSource`]s plus request cookies
//! - [`ParamError`]: `Missing` or `Invalid`, carrying the parameter name
//! - [`CookieManager`]: cookie access spanning [`Request`] and [`Response`]
//! - [`html::single_button_form`]: form rendering
//!
//! # Examples
//!
//! ```
//! use web_params::{ParamErrorKind, ParamSource, Request, TypedParams};
//!
//! let req = Request::new("req-123")
//!     .with_query(ParamSource::from_urlencoded("id=42&page=").unwrap())
//!     .with_body(ParamSource::from_json_slice(br#"{"flag": "yes-not-valid"}"#).unwrap());
//!
//! assert_eq!(req.query_int("id", None, false), Ok(Some(42)));
//! // an empty query value counts as missing
//! assert_eq!(req.query_int("page", Some(1), false), Ok(Some(1)));
//! assert_eq!(
//!     req.query_int("missing", None, true).unwrap_err().kind(),
//!     ParamErrorKind::Missing
//! );
//! assert_eq!(
//!     req.body_bool("flag", None, false).unwrap_err().kind(),
//!     ParamErrorKind::Invalid
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod coerce;
mod config;
mod cookie;
mod cookie_manager;
mod error;
pub mod html;
mod logging;
mod params;
mod request;
mod response;
mod source;
mod value;
pub mod web;

pub use config::{CookieConfig, HtmlConfig, WebConfig};
pub use self::cookie::{Cookie, CookieCollection, CookieData, CookieTarget, ExpireSpec, Expiry, SameSite};
pub use cookie_manager::{CookieManager, RawCookies};
pub use error::{BodyError, ConfigError, Error, ParamError, ParamErrorKind, BAD_REQUEST};
pub use logging::ParamLog;
pub use params::{ParamKind, ParamLookup, TypedParams};
pub use request::Request;
pub use response::Response;
pub use source::{ParamSource, Scope, MAX_NESTING};
pub use value::{ParamArray, ParamValue};
