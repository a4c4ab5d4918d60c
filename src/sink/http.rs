use std::net::IpAddr;
use std::task::{Context, Poll, ready};

use tracing::{debug, info, warn};

use super::{Sink, SinkError};
use crate::webhook::{
    Completion, HttpClient, HttpError, HttpRequest, RequestId, TransferEngine, UrlTemplate,
};

/// Delivers each address with an HTTP GET to a templated URL.
///
/// At most one request is outstanding: a new address cancels the request
/// for the previous one before its own is submitted, so the latest address
/// always wins and a superseded request is never reported as delivered.
#[derive(Debug)]
pub struct HttpSink<H> {
    template: UrlTemplate,
    url: String,
    capacity: usize,
    engine: TransferEngine<H>,
    current: Option<RequestId>,
}

impl<H: HttpClient + Clone + 'static> HttpSink<H> {
    /// Creates a sink sending requests through `client`.
    pub fn new(client: H, template: UrlTemplate) -> Self {
        let capacity = template.capacity();
        Self {
            url: String::with_capacity(capacity),
            capacity,
            template,
            engine: TransferEngine::new(client),
            current: None,
        }
    }

    /// The URL template.
    pub const fn template(&self) -> &UrlTemplate {
        &self.template
    }

    /// The request for the most recent address, if it is still running.
    pub const fn current(&self) -> Option<RequestId> {
        self.current
    }

    fn cancel_current(&mut self) {
        let Some(previous) = self.current.take() else {
            return;
        };
        if self.engine.remove(previous) {
            debug!(request = %previous, "Cancelled superseded update");
        }
    }

    fn report(&mut self, completion: Completion) {
        if self.current == Some(completion.id) {
            self.current = None;
        }

        let request = completion.id;
        match completion.result {
            Ok(response) if response.is_success() => {
                info!(%request, url = %response.url, status = %response.status, "Update delivered");
            }
            Ok(response) => {
                warn!(%request, url = %response.url, status = %response.status, "Update rejected");
            }
            Err(HttpError::Resolve(e)) => {
                warn!(
                    %request,
                    url = %completion.url,
                    "Could not resolve host, network may not be ready yet: {e}"
                );
            }
            Err(e) => {
                warn!(%request, url = %completion.url, "Update failed: {e}");
            }
        }
    }
}

impl<H: HttpClient + Clone + 'static> Sink for HttpSink<H> {
    fn update(&mut self, address: IpAddr) -> Result<(), SinkError> {
        self.template
            .substitute(address, &mut self.url, self.capacity)?;

        self.cancel_current();

        let url = match url::Url::parse(&self.url) {
            Ok(url) => url,
            Err(e) => {
                warn!(url = %self.url, "Update skipped, invalid URL for {address}: {e}");
                return Ok(());
            }
        };

        let request = self.engine.submit(HttpRequest::get(url));
        debug!(%request, url = %self.url, "Submitted update");
        self.current = Some(request);
        Ok(())
    }

    fn in_flight(&self) -> usize {
        self.engine.running()
    }

    fn poll_resume(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), SinkError>> {
        let completions = ready!(self.engine.poll_completions(cx));
        for completion in completions {
            self.report(completion);
        }
        Poll::Ready(Ok(()))
    }
}
