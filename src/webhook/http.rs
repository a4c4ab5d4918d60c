//! HTTP request/response types and client trait.

use super::HttpError;

/// An HTTP request to be sent.
///
/// Updates carry everything in the URL, so a request is just a method and
/// a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: http::Method,
    /// Target URL.
    pub url: url::Url,
}

impl HttpRequest {
    /// Creates a new HTTP request with the given method and URL.
    #[must_use]
    pub const fn new(method: http::Method, url: url::Url) -> Self {
        Self { method, url }
    }

    /// Creates a GET request to the given URL.
    #[must_use]
    pub const fn get(url: url::Url) -> Self {
        Self::new(http::Method::GET, url)
    }
}

/// The outcome of a completed request.
///
/// The response body is read and discarded; only the status and the URL the
/// request finally landed on are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: http::StatusCode,
    /// Effective URL after redirects.
    pub url: url::Url,
}

impl HttpResponse {
    /// Creates a new HTTP response.
    #[must_use]
    pub const fn new(status: http::StatusCode, url: url::Url) -> Self {
        Self { status, url }
    }

    /// Returns true if the status code indicates success (2xx).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Trait for making HTTP requests.
///
/// Abstracts the HTTP library so the transfer engine can be driven by a mock
/// client in tests.
///
/// # Example
///
/// ```ignore
/// use ddns_netlink::webhook::{HttpClient, HttpRequest, HttpResponse, HttpError};
///
/// #[derive(Clone)]
/// struct Echo;
///
/// impl HttpClient for Echo {
///     async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
///         Ok(HttpResponse::new(http::StatusCode::OK, req.url))
///     }
/// }
/// ```
pub trait HttpClient: Send + Sync {
    /// Sends an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] when:
    /// - The host name cannot be resolved ([`HttpError::Resolve`])
    /// - Network connection fails ([`HttpError::Connection`])
    /// - Request times out ([`HttpError::Timeout`])
    /// - URL is invalid ([`HttpError::InvalidUrl`])
    fn request(
        &self,
        req: HttpRequest,
    ) -> impl std::future::Future<Output = Result<HttpResponse, HttpError>> + Send;
}
