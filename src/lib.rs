//! # portprobe - TCP/UDP Port Prober
//!
//! Probes one target across a set of ports with a bounded pool of
//! concurrent workers, collects service banners from open TCP ports, and
//! reports open ports annotated with well-known service names.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portprobe::report::ScanReport;
//! use portprobe::scanner::{run_scan, NoProgress, ScanConfig};
//! use portprobe::services::ServiceCatalog;
//! use portprobe::types::parse_ports;
//! use std::net::IpAddr;
//!
//! #[tokio::main]
//! async fn main() {
//!     let target: IpAddr = "192.168.1.1".parse().unwrap();
//!     let config = ScanConfig::new(target, parse_ports("20-25,80,443").unwrap());
//!
//!     let outcomes = run_scan(&config, &NoProgress).await;
//!     let report = ScanReport::from_outcomes(
//!         "192.168.1.1", "192.168.1.1", config.protocol, outcomes,
//!         ServiceCatalog::well_known(),
//!     );
//!
//!     for line in report.to_text_lines() {
//!         println!("{line}");
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Port specifications and target resolution
//! - [`scanner`] - TCP/UDP probes and the worker-pool dispatcher
//! - [`banner`] - Banner collection on open TCP connections
//! - [`services`] - Well-known port to service name catalog
//! - [`report`] - Filtering, ordering and annotation of outcomes
//! - [`output`] - Plain, JSON and CSV rendering plus report persistence
//! - [`config`] - Settings file handling
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod report;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ProbeError};
pub use report::{ReportEntry, ScanReport};
pub use scanner::{ProbeOutcome, ProbeState, Protocol, ScanConfig};
pub use types::{parse_ports, PortList, PortSpec};
