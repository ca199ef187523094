//! Result aggregation.
//!
//! Turns the raw, unordered probe outcomes of a run into the report handed
//! to the output layer: only open (and UDP open|filtered) ports, sorted by
//! port, each annotated with its well-known service name.

use crate::scanner::{ProbeOutcome, ProbeState, Protocol};
use crate::services::ServiceCatalog;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One retained port in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub port: u16,
    pub state: ProbeState,
    pub service: String,
    pub detail: String,
}

impl ReportEntry {
    /// The entry as persisted: a headline followed by its detail line.
    pub fn to_text(&self) -> String {
        format!(
            "[+] Port {} ({}) is {}\n    Banner: {}",
            self.port, self.service, self.state, self.detail
        )
    }
}

/// The ordered, annotated outcome of a scan run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Target as given by the operator.
    pub target: String,
    /// Resolved address.
    pub ip_address: String,
    pub protocol: Protocol,
    /// When the scan was started.
    pub started_at: DateTime<Utc>,
    /// Total scan duration in milliseconds.
    pub duration_ms: u64,
    /// Number of ports probed.
    pub ports_scanned: usize,
    /// Number of entries retained in the report.
    pub ports_reported: usize,
    pub closed_ports: usize,
    pub filtered_ports: usize,
    pub error_ports: usize,
    /// Retained entries, ascending by port.
    pub entries: Vec<ReportEntry>,
}

impl ScanReport {
    /// Build a report from every outcome of a run.
    pub fn from_outcomes(
        target: impl Into<String>,
        ip_address: impl Into<String>,
        protocol: Protocol,
        outcomes: Vec<ProbeOutcome>,
        catalog: &ServiceCatalog,
    ) -> Self {
        let ports_scanned = outcomes.len();
        let count = |state: ProbeState| outcomes.iter().filter(|o| o.state == state).count();
        let closed_ports = count(ProbeState::Closed);
        let filtered_ports = count(ProbeState::Filtered);
        let error_ports = count(ProbeState::Error);

        let mut entries: Vec<ReportEntry> = outcomes
            .into_iter()
            .filter(|o| o.state.is_reportable())
            .map(|o| ReportEntry {
                port: o.port,
                state: o.state,
                service: catalog.name(o.port).to_string(),
                detail: o.detail,
            })
            .collect();
        entries.sort_by_key(|e| e.port);

        Self {
            target: target.into(),
            ip_address: ip_address.into(),
            protocol,
            started_at: Utc::now(),
            duration_ms: 0,
            ports_scanned,
            ports_reported: entries.len(),
            closed_ports,
            filtered_ports,
            error_ports,
            entries,
        }
    }

    /// Record the scan start time and elapsed duration.
    pub fn with_timing(mut self, started_at: DateTime<Utc>, duration_ms: u64) -> Self {
        self.started_at = started_at;
        self.duration_ms = duration_ms;
        self
    }

    /// The report as plain text lines, one per retained port.
    pub fn to_text_lines(&self) -> Vec<String> {
        self.entries.iter().map(ReportEntry::to_text).collect()
    }

    /// Short one-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) {} - {} of {} ports shown [{:.2}s]",
            self.target,
            self.ip_address,
            self.protocol,
            self.ports_reported,
            self.ports_scanned,
            self.duration_ms as f64 / 1000.0
        )
    }
}
