//! Example handlers demonstrating typed parameters, cookies and forms.
//!
//! **These examples are for documentation and testing only.**
//! They demonstrate usage patterns without requiring an HTTP server.

use crate::config::WebConfig;
use crate::cookie::{Cookie, Expiry};
use crate::cookie_manager::CookieManager;
use crate::html::{FormAction, Html};
use crate::params::TypedParams;
use crate::value::ParamValue;

use super::{with_params, ErrorResponse, ExtractRawCookies, Handled, RequestAdapter};

/// Name of the cookie remembering the preferred listing order.
pub const SORT_COOKIE: &str = "product_sort";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

/// Parsed product listing query.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductListing {
    /// Request ID for tracing
    pub request_id: String,
    /// 1-based page number
    pub page: i64,
    /// Page size
    pub per_page: i64,
    /// Sort column
    pub sort: String,
    /// Tag filters
    pub tags: Vec<String>,
    /// Only items in stock
    pub in_stock: bool,
    /// Upper price bound
    pub max_price: Option<f64>,
}

/// Handles `GET /products`.
///
/// Optional query parameters fall back to defaults; the sort order falls
/// back to the remembered cookie, and an explicit sort is remembered for
/// 30 days.
///
/// # Examples
///
/// ```
/// use web_params::web::{example_handler::handle_product_list, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-list-001");
/// adapter.set_query_string("page=2&tags[]=red&in_stock=yes");
///
/// let handled = handle_product_list(&adapter).expect("valid query");
/// assert_eq!(handled.value.page, 2);
/// assert_eq!(handled.value.tags, ["red"]);
/// assert!(handled.value.in_stock);
/// ```
///
/// ```
/// use web_params::web::{example_handler::handle_product_list, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-list-002");
/// adapter.set_query_string("page=first");
///
/// let err = handle_product_list(&adapter).unwrap_err();
/// assert_eq!(err.status, 400);
/// ```
pub fn handle_product_list(
    adapter: &RequestAdapter,
) -> Result<Handled<ProductListing>, ErrorResponse> {
    with_params(adapter, |req, res| {
        let page = req.query_int("page", Some(1), false)?.unwrap_or(1);
        let per_page = req.query_int("per_page", Some(20), false)?.unwrap_or(20);
        let in_stock = req.query_bool("in_stock", Some(false), false)?.unwrap_or(false);
        let max_price = req.query_float("max_price", None, false)?;
        let tags = req
            .query_array("tags", None, false)?
            .unwrap_or_default()
            .values()
            .filter_map(|tag| match tag {
                ParamValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect();

        let explicit_sort = req.query_string("sort", None, false)?;
        let mut cookies = CookieManager::new(req, res);
        let sort = match explicit_sort {
            Some(sort) => {
                cookies.add(
                    Cookie::new(SORT_COOKIE, sort.clone())
                        .expires(Expiry::After(chrono::Duration::days(30))),
                );
                sort
            }
            None if cookies.has(SORT_COOKIE) => cookies
                .get(SORT_COOKIE)
                .map_or_else(|| "name".to_string(), |c| c.value.clone()),
            None => "name".to_string(),
        };

        Ok(ProductListing {
            request_id: req.log().request_id().to_string(),
            page,
            per_page,
            sort,
            tags,
            in_stock,
            max_price,
        })
    })
}

/// Outcome of a product deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteResult {
    /// Deleted product ID
    pub product_id: i64,
    /// Whether the deletion was carried out
    pub deleted: bool,
}

/// Handles `POST /product/delete` as submitted by [`delete_button`].
///
/// # Examples
///
/// ```
/// use web_params::web::{example_handler::handle_delete_product, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-del-001");
/// adapter.set_body("application/x-www-form-urlencoded", b"id=7&confirm=1".to_vec());
///
/// let handled = handle_delete_product(&adapter).expect("valid body");
/// assert_eq!(handled.value.product_id, 7);
/// assert!(handled.value.deleted);
/// ```
pub fn handle_delete_product(
    adapter: &RequestAdapter,
) -> Result<Handled<DeleteResult>, ErrorResponse> {
    with_params(adapter, |req, _res| {
        // required, so `None` never comes back
        let product_id = req.body_int("id", None, true)?.unwrap_or_default();
        let confirm = req.body_bool("confirm", Some(false), false)?.unwrap_or(false);

        req.log()
            .debug(format_args!("delete product {} (confirm={})", product_id, confirm));

        Ok(DeleteResult {
            product_id,
            deleted: confirm,
        })
    })
}

/// Renders the "Delete" button for a product listing row.
///
/// # Examples
///
/// ```
/// use web_params::web::example_handler::delete_button;
/// use web_params::WebConfig;
///
/// let html = delete_button(&WebConfig::default(), 7);
/// assert!(html.starts_with(r#"<form action="/product/delete" method="post">"#));
/// assert!(html.contains(r#"<input type="hidden" name="id" value="7">"#));
/// ```
pub fn delete_button(config: &WebConfig, product_id: i64) -> String {
    let id = product_id.to_string();
    Html::from_config(&config.html).single_button_form(
        FormAction::route("product/delete"),
        &[("id", Some(id.as_str())), ("confirm", Some("1"))],
        "Delete",
        &[("class", "btn btn-danger")],
        "post",
        &[],
    )
}

/// Handles `POST /logout`: expires the session cookie in the browser.
///
/// The session is read from the raw `Cookie` header so a logout works even
/// when the request cookie failed validation upstream.
///
/// # Examples
///
/// ```
/// use web_params::web::{example_handler::handle_logout, RequestAdapter};
///
/// let mut adapter = RequestAdapter::new("req-logout-001");
/// adapter.set_cookie_header("sid=abc123");
///
/// let handled = handle_logout(&adapter).unwrap();
/// assert!(handled.value);
/// assert_eq!(handled.response.cookies().value("sid"), Some(""));
/// ```
pub fn handle_logout(adapter: &RequestAdapter) -> Result<Handled<bool>, ErrorResponse> {
    let raw = adapter.extract_raw_cookies();
    with_params(adapter, |req, res| {
        let mut cookies = CookieManager::new(req, res);
        if !cookies.has_raw(&raw, SESSION_COOKIE) {
            return Ok(false);
        }
        cookies.remove_all();
        cookies.remove(SESSION_COOKIE, true);
        Ok(true)
    })
}
