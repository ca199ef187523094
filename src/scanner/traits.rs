//! Probe and progress abstractions.
//!
//! Defines a common interface for the TCP and UDP probes so the dispatcher
//! can drive either, and so tests can substitute instrumented probes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Outcome state of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeState {
    /// A service accepted the connection or answered the datagram.
    Open,
    /// The host actively refused.
    Closed,
    /// No answer and no refusal (TCP).
    Filtered,
    /// No answer within the timeout (UDP): open and silent, or filtered.
    #[serde(rename = "open|filtered")]
    OpenFiltered,
    /// The probe itself failed.
    Error,
}

impl ProbeState {
    /// Whether outcomes in this state belong in the report.
    pub fn is_reportable(self) -> bool {
        matches!(self, Self::Open | Self::OpenFiltered)
    }
}

impl fmt::Display for ProbeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
            Self::Filtered => write!(f, "Filtered"),
            Self::OpenFiltered => write!(f, "Open|Filtered"),
            Self::Error => write!(f, "Error"),
        }
    }
}

/// Transport protocol used for a whole scan run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "TCP"),
            Self::Udp => write!(f, "UDP"),
        }
    }
}

/// Result of probing exactly one port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// The port number that was probed.
    pub port: u16,
    /// State determined by the probe.
    pub state: ProbeState,
    /// Banner, response preview or failure description. May be empty.
    pub detail: String,
    /// Protocol used.
    pub protocol: Protocol,
}

impl ProbeOutcome {
    pub fn new(
        port: u16,
        state: ProbeState,
        protocol: Protocol,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            port,
            state,
            detail: detail.into(),
            protocol,
        }
    }
}

/// Trait for per-port probe implementations.
///
/// A probe never fails: every socket problem is folded into the returned
/// outcome's state and detail. Each call owns its socket for the duration
/// of the call and releases it before returning.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Protocol this probe speaks.
    fn protocol(&self) -> Protocol;

    /// Target address.
    fn target(&self) -> IpAddr;

    /// Per-operation timeout.
    fn timeout(&self) -> Duration;

    /// Probe a single port.
    async fn probe(&self, port: u16) -> ProbeOutcome;
}

/// Receives progress events while a scan runs.
pub trait ProgressReporter: Send + Sync {
    /// Called after every completed probe with the running count.
    fn advance(&self, completed: usize, total: usize);

    /// Called once all probes have finished.
    fn finish(&self) {}
}

/// Discards progress events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn advance(&self, _completed: usize, _total: usize) {}
}

impl ProgressReporter for indicatif::ProgressBar {
    fn advance(&self, completed: usize, total: usize) {
        self.set_length(total as u64);
        self.set_position(completed as u64);
    }

    fn finish(&self) {
        self.finish_and_clear();
    }
}
