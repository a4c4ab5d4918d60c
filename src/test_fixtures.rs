//! Shared test fixtures: a scripted kernel channel, a mock HTTP client and a
//! recording sink.

use std::collections::VecDeque;
use std::io;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::netlink::{AddressRecord, EventChannel, ReadOutcome, encode};
use crate::network::AddressFilter;
use crate::sink::{Sink, SinkError};
use crate::webhook::{HttpClient, HttpError, HttpRequest, HttpResponse};

// ============================================================================
// Datagram builders
// ============================================================================

/// Encodes records into one datagram.
pub fn datagram(records: &[AddressRecord]) -> Vec<u8> {
    let mut buf = Vec::new();
    for record in records {
        record.encode_into(&mut buf);
    }
    buf
}

/// Encodes records followed by `NLMSG_DONE`, like a dump reply.
pub fn dump_reply(records: &[AddressRecord]) -> Vec<u8> {
    let mut buf = datagram(records);
    encode::push_done(&mut buf);
    buf
}

/// A global-scope record on `index`.
pub fn address_record(text: &str, index: u32) -> AddressRecord {
    AddressRecord::for_address(text.parse().unwrap(), 24, index)
}

// ============================================================================
// MockChannel
// ============================================================================

#[derive(Debug, Default)]
struct ChannelState {
    pending: VecDeque<(Instant, Vec<u8>)>,
    dump_replies: VecDeque<Vec<u8>>,
    dumps: Vec<AddressFilter>,
    closed_at: Option<Instant>,
    recv_error: Option<io::ErrorKind>,
    dump_error: Option<io::ErrorKind>,
}

/// A kernel channel fed from a script.
///
/// Datagrams become readable at scheduled (tokio) instants, so tests run with
/// paused time stay deterministic. Clones share the same script.
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    state: Arc<Mutex<ChannelState>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes a datagram readable now.
    pub fn push(&self, datagram: Vec<u8>) -> &Self {
        self.push_after(Duration::ZERO, datagram)
    }

    /// Makes a datagram readable `delay` from now.
    pub fn push_after(&self, delay: Duration, datagram: Vec<u8>) -> &Self {
        let at = Instant::now() + delay;
        let mut state = self.state.lock().unwrap();
        state.pending.push_back((at, datagram));
        state.pending.make_contiguous().sort_by_key(|(at, _)| *at);
        self
    }

    /// Queues the datagram delivered in reply to the next dump request.
    pub fn reply_to_dump(&self, datagram: Vec<u8>) -> &Self {
        self.state.lock().unwrap().dump_replies.push_back(datagram);
        self
    }

    /// Reports the channel closed once everything before `delay` was read.
    pub fn close_after(&self, delay: Duration) -> &Self {
        self.state.lock().unwrap().closed_at = Some(Instant::now() + delay);
        self
    }

    /// Makes the next receive fail.
    pub fn fail_recv(&self, kind: io::ErrorKind) -> &Self {
        self.state.lock().unwrap().recv_error = Some(kind);
        self
    }

    /// Makes the next dump request fail.
    pub fn fail_dump(&self, kind: io::ErrorKind) -> &Self {
        self.state.lock().unwrap().dump_error = Some(kind);
        self
    }

    /// Filters passed to every dump request so far.
    pub fn dumps(&self) -> Vec<AddressFilter> {
        self.state.lock().unwrap().dumps.clone()
    }

    /// Number of datagrams not yet received.
    pub fn unread(&self) -> usize {
        self.state.lock().unwrap().pending.len()
    }

    fn next_wakeup(&self) -> Option<Instant> {
        let state = self.state.lock().unwrap();
        if state.recv_error.is_some() {
            return Some(Instant::now());
        }
        let next = state.pending.front().map(|(at, _)| *at);
        match (next, state.closed_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

impl EventChannel for MockChannel {
    async fn readable(&self) -> io::Result<()> {
        match self.next_wakeup() {
            Some(at) => {
                tokio::time::sleep_until(at).await;
                Ok(())
            }
            None => std::future::pending().await,
        }
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<ReadOutcome> {
        let mut state = self.state.lock().unwrap();
        if let Some(kind) = state.recv_error.take() {
            return Err(io::Error::from(kind));
        }

        let now = Instant::now();
        if state.pending.front().is_some_and(|(at, _)| *at <= now) {
            let (_, datagram) = state.pending.pop_front().unwrap();
            let copied = datagram.len().min(buf.len());
            buf[..copied].copy_from_slice(&datagram[..copied]);
            return Ok(ReadOutcome::Datagram(datagram.len()));
        }

        if state.closed_at.is_some_and(|at| at <= now) {
            return Ok(ReadOutcome::Closed);
        }
        Ok(ReadOutcome::WouldBlock)
    }

    fn request_dump(&mut self, filter: &AddressFilter) -> io::Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(kind) = state.dump_error.take() {
            return Err(io::Error::from(kind));
        }

        state.dumps.push(*filter);
        if let Some(reply) = state.dump_replies.pop_front() {
            let now = Instant::now();
            // Ahead of anything scheduled later, behind anything due now.
            let at = state
                .pending
                .iter()
                .rposition(|(at, _)| *at <= now)
                .map_or(0, |i| i + 1);
            state.pending.insert(at, (now, reply));
        }
        Ok(())
    }
}

// ============================================================================
// RecordingSink
// ============================================================================

/// A synchronous sink that remembers every update.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub updates: Vec<IpAddr>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            updates: Vec::new(),
            fail: true,
        }
    }
}

impl Sink for RecordingSink {
    fn update(&mut self, address: IpAddr) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Write(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        self.updates.push(address);
        Ok(())
    }
}

// ============================================================================
// MockClient
// ============================================================================

/// What the mock server does with a request.
#[derive(Debug, Clone, Copy)]
pub enum Outcome {
    Status(http::StatusCode),
    Timeout,
    Unresolvable,
}

/// HTTP client answering after a fixed delay.
///
/// Clones share the request log, so a test can keep one to inspect traffic
/// while another drives the engine.
#[derive(Debug, Clone)]
pub struct MockClient {
    delay: Duration,
    outcome: Outcome,
    started: Arc<Mutex<Vec<url::Url>>>,
    finished: Arc<AtomicUsize>,
}

impl MockClient {
    pub fn new(delay: Duration, outcome: Outcome) -> Self {
        Self {
            delay,
            outcome,
            started: Arc::new(Mutex::new(Vec::new())),
            finished: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn ok_after(delay: Duration) -> Self {
        Self::new(delay, Outcome::Status(http::StatusCode::OK))
    }

    /// URLs of every request that started running.
    pub fn started(&self) -> Vec<url::Url> {
        self.started.lock().unwrap().clone()
    }

    /// Number of requests that ran to completion.
    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.started.lock().unwrap().push(req.url.clone());
        tokio::time::sleep(self.delay).await;
        self.finished.fetch_add(1, Ordering::SeqCst);

        match self.outcome {
            Outcome::Status(status) => Ok(HttpResponse::new(status, req.url)),
            Outcome::Timeout => Err(HttpError::Timeout),
            Outcome::Unresolvable => Err(HttpError::Resolve(Box::new(io::Error::other(
                "dns error: failed to lookup address information",
            )))),
        }
    }
}
