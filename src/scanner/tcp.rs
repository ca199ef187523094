//! TCP connect probe.
//!
//! Completes the full handshake through the operating system's socket API,
//! so no elevated privileges are needed. An accepted connection is reused
//! for banner collection before it is closed.

use crate::banner::grab_banner_from_stream;
use crate::error::ProbeError;
use crate::scanner::traits::{Probe, ProbeOutcome, ProbeState, Protocol};
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Detail attached to filtered TCP ports.
pub const FILTERED_DETAIL: &str = "Filtered (no TCP response).";

/// TCP connect probe.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    target: IpAddr,
    timeout: Duration,
}

impl TcpProbe {
    /// Create a new TCP probe.
    ///
    /// # Arguments
    /// * `target` - Target IP address
    /// * `timeout` - Budget for the connect and, separately, for banner collection
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream, ProbeError> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProbeError::from_io(e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: u16) -> ProbeOutcome {
        let addr = SocketAddr::new(self.target, port);

        match self.connect(addr).await {
            Ok(mut stream) => {
                let host = self.target.to_string();
                let banner = grab_banner_from_stream(&mut stream, &host, self.timeout).await;
                tracing::debug!(port, "tcp port open");
                ProbeOutcome::new(port, ProbeState::Open, Protocol::Tcp, banner)
            }
            Err(e) => {
                let state = e.tcp_state();
                tracing::debug!(port, %state, error = %e, "tcp probe finished");
                let detail = match state {
                    ProbeState::Closed => String::new(),
                    ProbeState::Filtered => FILTERED_DETAIL.to_string(),
                    _ => e.to_string(),
                };
                ProbeOutcome::new(port, state, Protocol::Tcp, detail)
            }
        }
    }
}
