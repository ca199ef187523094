//! Error types for portprobe.
//!
//! Uses `thiserror` for ergonomic error definitions. Only specification,
//! resolution and configuration failures ever reach the caller; socket
//! failures are classified into a [`ProbeError`] and folded into the probe
//! outcome.

use crate::scanner::ProbeState;
use crate::types::{PortSpecError, TargetError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Structured classification of a failed socket operation.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Connection refused")]
    Refused,

    #[error("Timed out")]
    Timeout,

    #[error("Unreachable: {0}")]
    Unreachable(io::Error),

    #[error("{0}")]
    Other(io::Error),
}

impl ProbeError {
    /// Classify an I/O error raised by connect, send or receive.
    pub fn from_io(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused,
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => Self::Timeout,
            io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted => Self::Unreachable(err),
            _ => Self::Other(err),
        }
    }

    /// State reported by a TCP connect probe for this failure.
    pub fn tcp_state(&self) -> ProbeState {
        match self {
            Self::Refused => ProbeState::Closed,
            Self::Timeout | Self::Unreachable(_) => ProbeState::Filtered,
            Self::Other(_) => ProbeState::Error,
        }
    }

    /// State reported by a UDP probe for this failure.
    ///
    /// Silence is ambiguous for UDP, so a timeout maps to `OpenFiltered`.
    pub fn udp_state(&self) -> ProbeState {
        match self {
            Self::Refused => ProbeState::Closed,
            Self::Timeout => ProbeState::OpenFiltered,
            Self::Unreachable(_) | Self::Other(_) => ProbeState::Error,
        }
    }
}

impl From<io::Error> for ProbeError {
    fn from(err: io::Error) -> Self {
        Self::from_io(err)
    }
}

/// Errors loading application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid configuration format: {0}")]
    InvalidFormat(String),
}

/// Errors that terminate a run before or after scanning.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Ports(#[from] PortSpecError),

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for the command-line run path.
pub type CliResult<T> = Result<T, CliError>;
