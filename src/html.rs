//! Single-button form rendering.
//!
//! A single-button form is a `<form>` with hidden inputs and one submit
//! button, handy for actions such as "delete this item" that must be sent
//! as a POST without building a form by hand.

use indexmap::IndexMap;

use crate::config::HtmlConfig;

/// Attributes rendered first, in this order. Others follow in insertion order.
const ATTRIBUTE_ORDER: [&str; 26] = [
    "type", "id", "class", "name", "value", "href", "src", "srcset", "form", "action", "method",
    "selected", "checked", "readonly", "disabled", "multiple", "size", "maxlength", "width",
    "height", "rows", "cols", "alt", "title", "rel", "media",
];

/// Where a form is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    /// A literal URL, used as-is
    Url(String),
    /// An application route resolved through a [`UrlResolver`]
    Route {
        /// Route path, e.g. `product/delete`
        route: String,
        /// Query parameters appended to the resolved URL
        params: Vec<(String, String)>,
    },
}

impl FormAction {
    /// A route without parameters.
    pub fn route(route: impl Into<String>) -> Self {
        FormAction::Route {
            route: route.into(),
            params: Vec::new(),
        }
    }
}

impl From<&str> for FormAction {
    fn from(url: &str) -> Self {
        FormAction::Url(url.to_string())
    }
}

impl From<String> for FormAction {
    fn from(url: String) -> Self {
        FormAction::Url(url)
    }
}

/// Turns application routes into URLs.
pub trait UrlResolver {
    /// Resolves `route` with query `params` into a URL.
    fn resolve(&self, route: &str, params: &[(String, String)]) -> String;
}

/// Resolves routes by joining them onto a base URL.
///
/// # Examples
///
/// ```
/// use web_params::html::{BaseUrlResolver, UrlResolver};
///
/// let resolver = BaseUrlResolver::new("https://shop.example/admin/");
/// assert_eq!(
///     resolver.resolve("product/delete", &[("id".into(), "7".into())]),
///     "https://shop.example/admin/product/delete?id=7"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BaseUrlResolver {
    base_url: String,
}

impl BaseUrlResolver {
    /// Creates a resolver for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl UrlResolver for BaseUrlResolver {
    fn resolve(&self, route: &str, params: &[(String, String)]) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        );
        if !params.is_empty() {
            if let Ok(query) = serde_urlencoded::to_string(params) {
                url.push('?');
                url.push_str(&query);
            }
        }
        url
    }
}

/// Form renderer bound to a URL resolver and method-tunnelling setting.
///
/// # Examples
///
/// ```
/// use web_params::html::{FormAction, Html};
/// use web_params::HtmlConfig;
///
/// let config = HtmlConfig {
///     base_url: "https://shop.example".to_string(),
///     ..HtmlConfig::default()
/// };
/// let html = Html::from_config(&config);
///
/// let form = html.single_button_form(
///     FormAction::route("product/delete"),
///     &[("id", Some("7"))],
///     "Delete",
///     &[("class", "btn btn-danger")],
///     "delete",
///     &[],
/// );
/// assert_eq!(
///     form,
///     "<form action=\"https://shop.example/product/delete\" method=\"post\">\
///      <input type=\"hidden\" name=\"_method\" value=\"delete\">\
///      <input type=\"hidden\" name=\"id\" value=\"7\">\
///      <button type=\"submit\" class=\"btn btn-danger\">Delete</button>\
///      </form>"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Html<R = BaseUrlResolver> {
    resolver: R,
    method_param: String,
}

impl Html<BaseUrlResolver> {
    /// Renderer with default settings.
    pub fn new() -> Self {
        Self::from_config(&HtmlConfig::default())
    }

    /// Renderer resolving routes against `config.base_url`.
    pub fn from_config(config: &HtmlConfig) -> Self {
        Self::with_resolver(BaseUrlResolver::new(config.base_url.clone()), config)
    }
}

impl Default for Html<BaseUrlResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: UrlResolver> Html<R> {
    /// Renderer using a custom resolver.
    pub fn with_resolver(resolver: R, config: &HtmlConfig) -> Self {
        Self {
            resolver,
            method_param: config.method_param.clone(),
        }
    }

    /// Renders a form with one hidden input per `data` entry (in order)
    /// followed by a submit button.
    ///
    /// `button_content` is inserted without escaping. The method is
    /// case-insensitive; methods other than GET and POST are sent as POST
    /// with the original method in a hidden field.
    pub fn single_button_form(
        &self,
        action: impl Into<FormAction>,
        data: &[(&str, Option<&str>)],
        button_content: &str,
        button_options: &[(&str, &str)],
        method: &str,
        form_options: &[(&str, &str)],
    ) -> String {
        let mut content = self.begin_form(action.into(), method, form_options);
        for (name, value) in data {
            content.push_str(&hidden_input(name, *value));
        }
        content.push_str(&submit_button(button_content, button_options));
        content.push_str(end_form());
        content
    }

    /// Renders the opening form tag and any hidden inputs the method or a
    /// GET action's query string require.
    pub fn begin_form(
        &self,
        action: FormAction,
        method: &str,
        options: &[(&str, &str)],
    ) -> String {
        let mut action = match action {
            FormAction::Url(url) => url,
            FormAction::Route { route, params } => self.resolver.resolve(&route, &params),
        };

        let mut hidden = String::new();
        let mut method = method;
        if !method.eq_ignore_ascii_case("get") && !method.eq_ignore_ascii_case("post") {
            hidden.push_str(&hidden_input(&self.method_param, Some(method)));
            method = "post";
        }

        if method.eq_ignore_ascii_case("get") {
            if let Some(pos) = action.find('?') {
                let pairs: Vec<(String, String)> =
                    serde_urlencoded::from_str(&action[pos + 1..]).unwrap_or_default();
                for (name, value) in &pairs {
                    hidden.push_str(&hidden_input(name, Some(value.as_str())));
                }
                action.truncate(pos);
            }
        }

        let mut attrs: IndexMap<&str, &str> = options.iter().copied().collect();
        attrs.insert("action", &action);
        attrs.insert("method", method);

        format!("<form{}>{}", render_attributes(&attrs), hidden)
    }
}

/// Renders a single-button form with default settings; routes resolve
/// against an empty base URL.
///
/// # Examples
///
/// ```
/// use web_params::html::single_button_form;
///
/// let form = single_button_form("https://test.com", &[("test", Some("123"))], "Go", &[], "post", &[]);
/// assert_eq!(
///     form,
///     "<form action=\"https://test.com\" method=\"post\">\
///      <input type=\"hidden\" name=\"test\" value=\"123\">\
///      <button type=\"submit\">Go</button></form>"
/// );
/// ```
pub fn single_button_form(
    action: impl Into<FormAction>,
    data: &[(&str, Option<&str>)],
    button_content: &str,
    button_options: &[(&str, &str)],
    method: &str,
    form_options: &[(&str, &str)],
) -> String {
    Html::new().single_button_form(
        action,
        data,
        button_content,
        button_options,
        method,
        form_options,
    )
}

/// Renders `<input type="hidden">`. A `None` value omits the `value` attribute.
pub fn hidden_input(name: &str, value: Option<&str>) -> String {
    let mut attrs: IndexMap<&str, &str> = IndexMap::new();
    attrs.insert("type", "hidden");
    attrs.insert("name", name);
    if let Some(value) = value {
        attrs.insert("value", value);
    }
    format!("<input{}>", render_attributes(&attrs))
}

/// Renders a submit button. `content` is not escaped; a `type` option is overridden.
pub fn submit_button(content: &str, options: &[(&str, &str)]) -> String {
    let mut attrs: IndexMap<&str, &str> = options.iter().copied().collect();
    attrs.insert("type", "submit");
    format!("<button{}>{}</button>", render_attributes(&attrs), content)
}

/// Closing form tag.
pub fn end_form() -> &'static str {
    "</form>"
}

fn render_attributes(attrs: &IndexMap<&str, &str>) -> String {
    let prioritized = ATTRIBUTE_ORDER
        .iter()
        .filter_map(|name| attrs.get_key_value(name));
    let rest = attrs
        .iter()
        .filter(|(name, _)| !ATTRIBUTE_ORDER.contains(*name));

    let mut out = String::new();
    for (name, value) in prioritized.chain(rest) {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value));
        out.push('"');
    }
    out
}

/// Escapes `& < > " '` for use in attribute values.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}
