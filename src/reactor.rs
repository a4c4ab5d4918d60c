//! The single-threaded event loop tying the monitor to the sink.
//!
//! The reactor waits on three sources at once and dispatches whichever
//! becomes ready first:
//!
//! - a shutdown request, which stops the loop cleanly
//! - kernel channel readiness, which runs the monitor's read path
//! - progress of the sink's in-flight requests, polled only while the sink
//!   has any
//!
//! Everything runs on the caller's task. Socket readiness and timers of the
//! HTTP client are serviced by the same runtime driver that wakes the
//! kernel channel, so no handler ever blocks the others.

use std::future::{Future, poll_fn};
use std::pin::Pin;

use thiserror::Error;

use crate::monitor::{Monitor, MonitorError};
use crate::netlink::EventChannel;
use crate::sink::{Sink, SinkError};

#[cfg(test)]
#[path = "reactor_tests.rs"]
mod tests;

/// Error type for reactor failures.
#[derive(Debug, Error)]
pub enum ReactorError {
    /// The monitor path failed.
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    /// The sink failed while resuming in-flight work.
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// The reactor already stopped and cannot be restarted.
    #[error("Reactor already stopped")]
    Stopped,
}

/// Lifecycle of a [`Reactor`]. `Stopped` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactorState {
    /// Dispatching events.
    Running,
    /// Stopped after shutdown or a fatal error.
    Stopped,
}

/// What the wait step produced.
#[derive(Debug)]
enum Event {
    Shutdown,
    Kernel(Result<(), MonitorError>),
    Transfer(Result<(), SinkError>),
}

/// Owns the monitor and the sink and drives both.
///
/// Fields drop in declaration order: the monitor (and its channel) before
/// the sink (and its in-flight requests).
#[derive(Debug)]
pub struct Reactor<C, S> {
    monitor: Monitor<C>,
    sink: S,
    state: ReactorState,
}

impl<C: EventChannel, S: Sink> Reactor<C, S> {
    /// Creates a running reactor.
    pub const fn new(monitor: Monitor<C>, sink: S) -> Self {
        Self {
            monitor,
            sink,
            state: ReactorState::Running,
        }
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> ReactorState {
        self.state
    }

    /// The monitor.
    pub const fn monitor(&self) -> &Monitor<C> {
        &self.monitor
    }

    /// The sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Runs until `shutdown` completes or a fatal error occurs.
    ///
    /// Either way the reactor ends up [`ReactorState::Stopped`].
    ///
    /// # Errors
    ///
    /// Returns the first fatal monitor or sink error, or
    /// [`ReactorError::Stopped`] if the reactor was already stopped.
    pub async fn run<F: Future<Output = ()>>(&mut self, shutdown: F) -> Result<(), ReactorError> {
        if self.state == ReactorState::Stopped {
            return Err(ReactorError::Stopped);
        }

        let result = self.event_loop(shutdown).await;
        self.state = ReactorState::Stopped;
        result
    }

    async fn event_loop<F: Future<Output = ()>>(&mut self, shutdown: F) -> Result<(), ReactorError> {
        tokio::pin!(shutdown);

        loop {
            match self.wait(shutdown.as_mut()).await {
                Event::Shutdown => {
                    tracing::info!("Shutdown requested, stopping");
                    return Ok(());
                }
                Event::Kernel(ready) => {
                    ready?;
                    self.monitor.process_ready(&mut self.sink)?;
                }
                Event::Transfer(resumed) => resumed?,
            }
        }
    }

    async fn wait<F: Future<Output = ()>>(&mut self, shutdown: Pin<&mut F>) -> Event {
        let monitor = &self.monitor;
        let sink = &mut self.sink;
        let busy = sink.in_flight() > 0;

        tokio::select! {
            biased;

            () = shutdown => Event::Shutdown,
            ready = monitor.readable() => Event::Kernel(ready),
            resumed = poll_fn(|cx| sink.poll_resume(cx)), if busy => Event::Transfer(resumed),
        }
    }

    /// Stops the reactor and releases the monitor, then the sink.
    pub fn shutdown(self) {
        let Self { monitor, sink, .. } = self;
        drop(monitor);
        tracing::debug!("Kernel channel closed");
        let pending = sink.in_flight();
        drop(sink);
        if pending > 0 {
            tracing::debug!(pending, "Abandoned in-flight updates");
        }
    }
}
