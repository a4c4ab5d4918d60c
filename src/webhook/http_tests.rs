//! Tests for HTTP request/response types.

use super::{HttpRequest, HttpResponse};

fn url(text: &str) -> url::Url {
    url::Url::parse(text).unwrap()
}

mod http_request {
    use super::*;

    #[test]
    fn get_creates_get_request() {
        let req = HttpRequest::get(url("https://example.com/?ip=192.0.2.1"));

        assert_eq!(req.method, http::Method::GET);
        assert_eq!(req.url.query(), Some("ip=192.0.2.1"));
    }

    #[test]
    fn new_keeps_method() {
        let req = HttpRequest::new(http::Method::POST, url("https://example.com/"));
        assert_eq!(req.method, http::Method::POST);
    }
}

mod http_response {
    use super::*;

    #[test]
    fn success_covers_2xx_only() {
        let target = url("https://example.com/");

        assert!(HttpResponse::new(http::StatusCode::OK, target.clone()).is_success());
        assert!(HttpResponse::new(http::StatusCode::NO_CONTENT, target.clone()).is_success());
        assert!(!HttpResponse::new(http::StatusCode::FOUND, target.clone()).is_success());
        assert!(!HttpResponse::new(http::StatusCode::UNAUTHORIZED, target).is_success());
    }

    #[test]
    fn keeps_effective_url() {
        let resp = HttpResponse::new(http::StatusCode::OK, url("https://example.com/final"));
        assert_eq!(resp.url.path(), "/final");
    }
}
