//! Production HTTP client implementation using reqwest.

use std::time::Duration;

use super::error::is_resolve_failure;
use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Production HTTP client using reqwest.
///
/// A thin wrapper around `reqwest::Client` that implements [`HttpClient`].
/// Cloning is cheap and shares the connection pool.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use ddns_netlink::webhook::{ReqwestClient, HttpClient, HttpRequest};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::with_timeouts(Duration::from_secs(10), Duration::from_secs(30))?;
/// let url = Url::parse("https://dyn.example.com/update?ip=192.0.2.1")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with a connect timeout and a total request timeout.
    ///
    /// # Errors
    ///
    /// Returns the reqwest error if the client cannot be initialized (for
    /// example when the TLS backend fails to load).
    pub fn with_timeouts(connect: Duration, total: Duration) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .connect_timeout(connect)
            .timeout(total)
            .build()?;
        Ok(Self { inner })
    }

    /// Creates an HTTP client from an existing reqwest client.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

fn classify(err: reqwest::Error) -> HttpError {
    if err.is_timeout() {
        HttpError::Timeout
    } else if err.is_builder() {
        HttpError::InvalidUrl(err.to_string())
    } else if is_resolve_failure(&err) {
        HttpError::Resolve(Box::new(err))
    } else {
        HttpError::Connection(Box::new(err))
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut response = self
            .inner
            .request(req.method, req.url.as_str())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let url = response.url().clone();

        // Drain the body without keeping it.
        while response.chunk().await.map_err(classify)?.is_some() {}

        Ok(HttpResponse::new(status, url))
    }
}
