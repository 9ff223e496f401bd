//! Cookie manager behavior across the request and response.

use chrono::{Duration, Utc};
use web_params::{
    Cookie, CookieCollection, CookieConfig, CookieData, CookieManager, Expiry, RawCookies,
    Request, Response, SameSite,
};

const NON_EXISTENT: &str = "nonExistentCookieName";

fn request_with(cookies: Vec<Cookie>) -> Request {
    Request::new("req-cookies").with_cookies(cookies.into_iter().collect::<CookieCollection>())
}

#[test]
fn has_in_request() {
    let now = Utc::now();
    let request = request_with(vec![
        Cookie::new("test1", "test").expires(Expiry::At(now + Duration::seconds(100))),
        Cookie::new("test2", "").expires(Expiry::At(now + Duration::seconds(100))),
        Cookie::new("test3", "test").expires(Expiry::At(now - Duration::seconds(100))),
    ]);
    let mut response = Response::new();
    let manager = CookieManager::new(&request, &mut response);

    assert!(manager.has("test1"));
    assert!(!manager.has("test2"));
    assert!(!manager.has("test3"));
    assert!(!manager.has(NON_EXISTENT));
}

#[test]
fn has_raw() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let manager = CookieManager::new(&request, &mut response);
    let raw = RawCookies::parse("testHas1=123; testHas2=");

    assert!(manager.has_raw(&raw, "testHas1"));
    assert!(!manager.has_raw(&raw, "testHas2"));
    assert!(!manager.has_raw(&raw, ""));
}

#[test]
fn get_from_request() {
    let cookie1 = Cookie::new("test1", "test");
    let cookie2 = Cookie::new("test2", "test");
    let request = request_with(vec![cookie1.clone(), cookie2.clone()]);
    let mut response = Response::new();
    let manager = CookieManager::new(&request, &mut response);

    assert_eq!(manager.get("test1"), Some(&cookie1));
    assert_eq!(manager.get("test2"), Some(&cookie2));
    assert_eq!(manager.get(NON_EXISTENT), None);
}

#[test]
fn get_raw() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let manager = CookieManager::new(&request, &mut response);
    let raw = RawCookies::parse("testGet1=test; testGet2=");

    assert_eq!(manager.get_raw(&raw, "testGet1"), Some(Cookie::new("testGet1", "test")));
    assert_eq!(manager.get_raw(&raw, "testGet2"), Some(Cookie::new("testGet2", "")));
    assert_eq!(manager.get_raw(&raw, NON_EXISTENT), None);
}

#[test]
fn add_by_cookie_data() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let expire = Utc::now().timestamp() + 3600;

    let data: CookieData = serde_json::from_value(serde_json::json!({
        "name": "test",
        "value": "value",
        "expire": expire,
        "domain": "example.com",
        "same_site": "Strict",
    }))
    .unwrap();
    CookieManager::new(&request, &mut response).add_data(data);

    let cookie = response.cookies().get("test").unwrap();
    assert_eq!(cookie.value, "value");
    assert_eq!(cookie.expire, Expiry::from_timestamp(expire));
    assert_eq!(cookie.domain, "example.com");
    assert_eq!(cookie.same_site, Some(SameSite::Strict));
    assert_eq!(cookie.path, "/");
    assert!(cookie.http_only);
}

#[test]
fn add_by_cookie_object() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let cookie = Cookie::new("test", "value").secure(true);

    CookieManager::new(&request, &mut response).add(cookie.clone());

    assert_eq!(response.cookies().get("test"), Some(&cookie));
}

#[test]
fn add_replaces_existing() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    {
        let mut manager = CookieManager::new(&request, &mut response);
        manager.add(Cookie::new("test", "old"));
        manager.add(Cookie::new("test", "new"));
    }

    assert_eq!(response.cookies().len(), 1);
    assert_eq!(response.cookies().value("test"), Some("new"));
}

#[test]
fn remove_from_browser_by_name() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    {
        let mut manager = CookieManager::new(&request, &mut response);
        manager.add(Cookie::new("test", "value"));
        manager.remove("test", true);
    }

    let cookie = response.cookies().get("test").unwrap();
    assert_eq!(cookie.value, "");
    assert_eq!(cookie.expire, Expiry::removal());
    assert!(cookie.expire.is_expired(Utc::now()));
    assert!(!response.cookies().has("test"));
}

#[test]
fn remove_from_browser_by_object() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let cookie = Cookie::new("test", "value").with_path("/account");

    CookieManager::new(&request, &mut response).remove(cookie, true);

    let removed = response.cookies().get("test").unwrap();
    assert_eq!(removed.value, "");
    assert_eq!(removed.path, "/account");
    assert_eq!(removed.expire, Expiry::removal());
}

#[test]
fn remove_without_browser() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    {
        let mut manager = CookieManager::new(&request, &mut response);
        manager.add(Cookie::new("test", "value"));
        manager.remove("test", false);
        manager.remove(NON_EXISTENT, false);
    }

    assert!(response.cookies().get("test").is_none());
    assert!(response.cookies().is_empty());
}

#[test]
fn remove_all() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    {
        let mut manager = CookieManager::new(&request, &mut response);
        manager.add(Cookie::new("test1", "value"));
        manager.add(Cookie::new("test2", "value"));
        manager.remove_all();
    }

    assert!(response.cookies().is_empty());
}

#[test]
fn config_defaults_reach_new_cookies() {
    let request = Request::new("req-1");
    let mut response = Response::new();
    let defaults = CookieConfig {
        secure: true,
        same_site: None,
        ..CookieConfig::default()
    };

    CookieManager::with_defaults(&request, &mut response, defaults).add_data(CookieData {
        name: "pref".to_string(),
        value: "1".to_string(),
        ..CookieData::default()
    });

    let headers = response.set_cookie_headers(Utc::now());
    assert_eq!(headers.len(), 1);
    let sent = cookie::Cookie::parse_encoded(headers[0].clone()).unwrap();
    assert_eq!(sent.name_value(), ("pref", "1"));
    assert_eq!(sent.path(), Some("/"));
    assert_eq!(sent.secure(), Some(true));
    assert_eq!(sent.http_only(), Some(true));
    assert_eq!(sent.same_site(), None);
    assert!(!headers[0].contains("SameSite"));
}
