//! Scanner module - probes and the dispatcher that drives them.
//!
//! A scan run uses one protocol for every port. The configured probe is
//! shared by all workers; each probe call owns its own socket.

pub mod dispatch;
pub mod tcp;
pub mod traits;
pub mod udp;

use crate::types::PortList;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

pub use dispatch::{Dispatcher, DEFAULT_WORKERS};
pub use tcp::TcpProbe;
pub use traits::{NoProgress, Probe, ProbeOutcome, ProbeState, ProgressReporter, Protocol};
pub use udp::UdpProbe;

/// Default per-operation timeout for both protocols.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Configuration for a scan run. Read-only once the scan starts.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Resolved target address.
    pub target: IpAddr,
    /// Protocol used for every probe.
    pub protocol: Protocol,
    /// Ports to probe.
    pub ports: PortList,
    /// Per-operation timeout.
    pub timeout: Duration,
    /// Worker pool size.
    pub workers: usize,
}

impl ScanConfig {
    /// Create a TCP scan configuration with default timeout and pool size.
    pub fn new(target: IpAddr, ports: PortList) -> Self {
        Self {
            target,
            protocol: Protocol::Tcp,
            ports,
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }
}

/// Build the probe matching the configured protocol.
pub fn create_probe(config: &ScanConfig) -> Arc<dyn Probe> {
    match config.protocol {
        Protocol::Tcp => Arc::new(TcpProbe::new(config.target, config.timeout)),
        Protocol::Udp => Arc::new(UdpProbe::new(config.target, config.timeout)),
    }
}

/// Probe every configured port and return all outcomes, unordered.
pub async fn run_scan<P>(config: &ScanConfig, progress: &P) -> Vec<ProbeOutcome>
where
    P: ProgressReporter + ?Sized,
{
    tracing::info!(
        target = %config.target,
        protocol = %config.protocol,
        ports = config.ports.len(),
        workers = config.workers,
        timeout_ms = config.timeout.as_millis() as u64,
        "starting scan"
    );

    let dispatcher = Dispatcher::new(create_probe(config), config.workers);
    let outcomes = dispatcher.run(&config.ports, progress).await;

    tracing::info!(outcomes = outcomes.len(), "scan finished");
    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), PortList::default())
            .with_protocol(Protocol::Udp)
            .with_timeout(Duration::from_millis(250))
            .with_workers(8);

        assert_eq!(config.protocol, Protocol::Udp);
        assert_eq!(config.timeout, Duration::from_millis(250));
        assert_eq!(config.workers, 8);
        assert_eq!(create_probe(&config).protocol(), Protocol::Udp);
    }

    #[test]
    fn test_config_defaults() {
        let config = ScanConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST), PortList::default());
        assert_eq!(config.protocol, Protocol::Tcp);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.workers, DEFAULT_WORKERS);
    }

    #[tokio::test]
    async fn test_run_scan_against_loopback() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap().port();

        let closed_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed = closed_listener.local_addr().unwrap().port();
        drop(closed_listener);

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(socket);
        });

        let config = ScanConfig::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            PortList::from_ports([open, closed]),
        )
        .with_timeout(Duration::from_millis(200))
        .with_workers(2);

        let mut outcomes = run_scan(&config, &NoProgress).await;
        outcomes.sort_by_key(|o| o.port);

        assert_eq!(outcomes.len(), 2);
        let state_of = |port: u16| outcomes.iter().find(|o| o.port == port).unwrap().state;
        assert_eq!(state_of(open), ProbeState::Open);
        assert_eq!(state_of(closed), ProbeState::Closed);
        server.await.unwrap();
    }
}
