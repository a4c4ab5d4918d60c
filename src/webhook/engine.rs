//! Multi-request transfer engine.
//!
//! [`TransferEngine`] keeps any number of requests in flight and is driven
//! from the caller's event loop: nothing happens until
//! [`TransferEngine::poll_completions`] is polled. Socket readiness and
//! timeouts of the underlying client are registered with the runtime's
//! driver by the client itself, so the loop only needs to poll the engine
//! whenever it has requests running.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio_stream::{Stream, StreamMap};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Identifies one submitted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A finished request.
#[derive(Debug)]
pub struct Completion {
    /// Which request finished.
    pub id: RequestId,
    /// The URL that was requested.
    pub url: url::Url,
    /// The response or the failure.
    pub result: Result<HttpResponse, HttpError>,
}

type Transfer = Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>>>>;

/// A one-shot stream over a single transfer.
struct InFlight {
    url: url::Url,
    transfer: Option<Transfer>,
}

impl Stream for InFlight {
    type Item = (url::Url, Result<HttpResponse, HttpError>);

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(transfer) = this.transfer.as_mut() else {
            return Poll::Ready(None);
        };

        let result = ready!(transfer.as_mut().poll(cx));
        this.transfer = None;
        Poll::Ready(Some((this.url.clone(), result)))
    }
}

/// Drives concurrent HTTP requests from a single-threaded event loop.
///
/// Removing a request drops its future, which aborts the connection and
/// guarantees its result is never reported.
pub struct TransferEngine<H> {
    client: H,
    transfers: StreamMap<RequestId, InFlight>,
    next_id: u64,
}

impl<H> fmt::Debug for TransferEngine<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferEngine")
            .field("running", &self.transfers.len())
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl<H: HttpClient + Clone + 'static> TransferEngine<H> {
    /// Creates an idle engine issuing requests through `client`.
    pub fn new(client: H) -> Self {
        Self {
            client,
            transfers: StreamMap::new(),
            next_id: 0,
        }
    }

    /// Starts a request and returns its handle.
    ///
    /// The request makes progress the next time the engine is polled.
    pub fn submit(&mut self, request: HttpRequest) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);

        let client = self.client.clone();
        let url = request.url.clone();
        let transfer: Transfer = Box::pin(async move { client.request(request).await });

        self.transfers.insert(
            id,
            InFlight {
                url,
                transfer: Some(transfer),
            },
        );
        id
    }

    /// Cancels a request. Returns false if it was not running.
    pub fn remove(&mut self, id: RequestId) -> bool {
        self.transfers.remove(&id).is_some()
    }

    /// Number of requests still running.
    #[must_use]
    pub fn running(&self) -> usize {
        self.transfers.len()
    }

    /// Returns true if `id` is still running.
    #[must_use]
    pub fn contains(&self, id: RequestId) -> bool {
        self.transfers.contains_key(&id)
    }

    /// Advances every running request and collects those that finished.
    ///
    /// Finished requests are removed from the engine. Returns `Pending` if
    /// none finished; the waker fires when one of them can make progress.
    pub fn poll_completions(&mut self, cx: &mut Context<'_>) -> Poll<Vec<Completion>> {
        let mut done = Vec::new();

        while let Poll::Ready(Some((id, (url, result)))) =
            Pin::new(&mut self.transfers).poll_next(cx)
        {
            self.transfers.remove(&id);
            done.push(Completion { id, url, result });
        }

        if done.is_empty() {
            Poll::Pending
        } else {
            Poll::Ready(done)
        }
    }
}
