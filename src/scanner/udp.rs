//! UDP probe.
//!
//! Sends an empty datagram and waits for an answer. UDP is connectionless,
//! so the outcome is read from what comes back:
//!
//! 1. **Datagram received**: port is open
//! 2. **ICMP port unreachable** (surfaced as a refusal on the connected socket): closed
//! 3. **Silence until the timeout**: open or filtered, indistinguishable

use crate::error::ProbeError;
use crate::scanner::traits::{Probe, ProbeOutcome, ProbeState, Protocol};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

/// Bytes of a response shown in the outcome detail.
const PREVIEW_BYTES: usize = 100;

/// Receive buffer size.
const RECV_BUFFER: usize = 4096;

/// UDP probe.
#[derive(Debug, Clone)]
pub struct UdpProbe {
    target: IpAddr,
    timeout: Duration,
}

impl UdpProbe {
    /// Create a new UDP probe.
    ///
    /// # Arguments
    /// * `target` - Target IP address
    /// * `timeout` - How long to wait for a response
    pub fn new(target: IpAddr, timeout: Duration) -> Self {
        Self { target, timeout }
    }

    /// Send the empty datagram and wait for the first response.
    async fn exchange(&self, port: u16) -> Result<Vec<u8>, ProbeError> {
        let local_addr = match self.target {
            IpAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            IpAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };

        let socket = UdpSocket::bind(local_addr).await?;
        // Connecting lets the kernel report ICMP unreachable as a refusal.
        socket.connect(SocketAddr::new(self.target, port)).await?;
        socket.send(&[]).await?;

        let mut buf = vec![0u8; RECV_BUFFER];
        match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(buf)
            }
            Ok(Err(e)) => Err(ProbeError::from_io(e)),
            Err(_) => Err(ProbeError::Timeout),
        }
    }
}

#[async_trait]
impl Probe for UdpProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: u16) -> ProbeOutcome {
        match self.exchange(port).await {
            Ok(data) => {
                tracing::debug!(port, bytes = data.len(), "udp response received");
                let preview = String::from_utf8_lossy(&data[..data.len().min(PREVIEW_BYTES)]);
                ProbeOutcome::new(
                    port,
                    ProbeState::Open,
                    Protocol::Udp,
                    format!("Received: {preview}"),
                )
            }
            Err(e) => {
                let state = e.udp_state();
                tracing::debug!(port, %state, error = %e, "udp probe finished");
                let detail = match state {
                    ProbeState::OpenFiltered => "No response.".to_string(),
                    ProbeState::Closed => "Connection refused.".to_string(),
                    _ => e.to_string(),
                };
                ProbeOutcome::new(port, state, Protocol::Udp, detail)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    #[test]
    fn test_probe_creation() {
        let probe = UdpProbe::new(LOCALHOST, Duration::from_secs(1));
        assert_eq!(probe.target(), LOCALHOST);
        assert_eq!(probe.protocol(), Protocol::Udp);
    }

    #[tokio::test]
    async fn test_responding_port_is_open() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(b"pong", peer).await.unwrap();
        });

        let probe = UdpProbe::new(LOCALHOST, Duration::from_secs(2));
        let outcome = probe.probe(port).await;

        assert_eq!(outcome.state, ProbeState::Open);
        assert_eq!(outcome.detail, "Received: pong");
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_response_preview_is_capped() {
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let responder = tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, peer) = server.recv_from(&mut buf).await.unwrap();
            server.send_to(&[b'x'; 300], peer).await.unwrap();
        });

        let probe = UdpProbe::new(LOCALHOST, Duration::from_secs(2));
        let outcome = probe.probe(port).await;

        assert_eq!(outcome.detail, format!("Received: {}", "x".repeat(PREVIEW_BYTES)));
        responder.await.unwrap();
    }

    #[tokio::test]
    async fn test_silent_port_is_open_filtered() {
        // Bound but never answers.
        let server = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = server.local_addr().unwrap().port();

        let probe = UdpProbe::new(LOCALHOST, Duration::from_millis(200));
        let outcome = probe.probe(port).await;

        assert_eq!(outcome.state, ProbeState::OpenFiltered);
        assert_eq!(outcome.detail, "No response.");
        drop(server);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_unbound_port_is_closed() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = socket.local_addr().unwrap().port();
        drop(socket);

        let probe = UdpProbe::new(LOCALHOST, Duration::from_millis(500));
        let outcome = probe.probe(port).await;

        assert_eq!(outcome.state, ProbeState::Closed);
        assert_eq!(outcome.detail, "Connection refused.");
    }
}
