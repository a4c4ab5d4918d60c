//! Application execution logic.
//!
//! Wires the validated configuration into a kernel channel, a monitor and a
//! sink, then runs the reactor until a shutdown signal or a fatal error.

use std::io;

use thiserror::Error;

use ddns_netlink::config::ValidatedConfig;
use ddns_netlink::monitor::MonitorError;
use ddns_netlink::network::{InterfaceError, resolve_interface};
use ddns_netlink::reactor::ReactorError;
use ddns_netlink::sink::{HttpSink, PrintSink, Sink};
use ddns_netlink::webhook::ReqwestClient;

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// The interface name could not be resolved to an index.
    #[error("Error resolving interface {name}: {source}")]
    Interface {
        /// Interface name as configured
        name: String,
        /// Lookup failure
        #[source]
        source: InterfaceError,
    },

    /// The kernel channel could not be opened or subscribed.
    #[error("Failed to open kernel channel: {0}")]
    Channel(#[source] io::Error),

    /// The initial dump request failed.
    #[error("Failed to request current addresses: {0}")]
    Dump(#[source] MonitorError),

    /// The HTTP client could not be built.
    #[error("Failed to initialise HTTP client: {0}")]
    EngineInit(#[source] reqwest::Error),

    /// The reactor stopped on a fatal error.
    #[error(transparent)]
    Reactor(#[from] ReactorError),

    /// No kernel channel exists for this platform.
    #[cfg(not(target_os = "linux"))]
    #[error("Address monitoring requires Linux rtnetlink")]
    Unsupported,
}

/// Resolves the configured interface name.
fn resolve(name: &str) -> Result<u32, RunError> {
    resolve_interface(name).map_err(|source| RunError::Interface {
        name: name.to_string(),
        source,
    })
}

/// Builds the sink: HTTP when a URL template is configured, print otherwise.
fn build_sink(config: &ValidatedConfig) -> Result<Box<dyn Sink>, RunError> {
    let Some(template) = &config.url else {
        return Ok(Box::new(PrintSink::stdout()));
    };

    let client = ReqwestClient::with_timeouts(config.connect_timeout, config.timeout)
        .map_err(RunError::EngineInit)?;
    Ok(Box::new(HttpSink::new(client, template.clone())))
}

/// Executes the main application loop.
///
/// This function:
/// 1. Resolves the interface and builds the address filter
/// 2. Creates the sink (HTTP or print)
/// 3. Opens the kernel channel and requests the current addresses
/// 4. Runs the reactor until shutdown signal (Ctrl+C / SIGTERM)
/// 5. Tears down the monitor, then the sink
///
/// # Errors
///
/// Returns an error if any setup step fails or the reactor stops on a fatal
/// error.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires:
/// - A live rtnetlink socket
/// - Real async runtime with signal handling
#[cfg(not(tarpaulin_include))]
#[cfg(target_os = "linux")]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    use ddns_netlink::monitor::Monitor;
    use ddns_netlink::netlink::NetlinkChannel;
    use ddns_netlink::reactor::Reactor;

    let index = resolve(&config.interface)?;
    let filter = config.filter(index);
    tracing::debug!(
        interface = %config.interface,
        index,
        families = %filter.version,
        allow_private = filter.allow_private,
        allow_temporary = filter.allow_temporary,
        "Monitoring interface"
    );

    let sink = build_sink(&config)?;
    match &config.url {
        Some(url) => tracing::info!("Sending updates to {url}"),
        None => tracing::info!("Printing updates to stdout"),
    }

    let channel = NetlinkChannel::open(&filter).map_err(RunError::Channel)?;
    let mut monitor = Monitor::new(channel, filter, config.buffer_size);
    monitor.request_dump().map_err(RunError::Dump)?;

    let mut reactor = Reactor::new(monitor, sink);
    let result = reactor.run(shutdown_signal()).await;
    reactor.shutdown();

    result.map_err(RunError::from)
}

/// Non-Linux stub.
#[cfg(not(tarpaulin_include))]
#[cfg(not(target_os = "linux"))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    resolve(&config.interface)?;
    build_sink(&config)?;
    Err(RunError::Unsupported)
}

/// Returns a future that completes when a shutdown signal is received.
///
/// A signal source that cannot be installed is logged and never fires.
///
/// Excluded from coverage - requires OS signal handling.
#[cfg(not(tarpaulin_include))]
#[cfg(target_os = "linux")]
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}
