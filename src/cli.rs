//! Command-line interface for portprobe.
//!
//! Uses `clap` derive macros for declarative argument parsing. Flags left
//! unset fall back to the settings file, then to built-in defaults.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output;
use crate::report::ScanReport;
use crate::scanner::{run_scan, Protocol, ScanConfig};
use crate::services::ServiceCatalog;
use crate::types::{resolve_target, PortList};
use chrono::Utc;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Probe a host's TCP or UDP ports and identify listening services.
#[derive(Parser, Debug)]
#[command(name = "portprobe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A fast TCP/UDP port prober", long_about = None)]
pub struct Args {
    /// Target IP address or hostname to scan
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Ports to scan (e.g., "80", "80,443", "1-1024", "all") [default: 1-1024]
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Number of concurrent probes [default: 50]
    #[arg(short, long, env = "PORTPROBE_WORKERS", value_parser = clap::value_parser!(u16).range(1..))]
    pub workers: Option<u16>,

    /// Per-probe timeout in milliseconds [default: 1000]
    #[arg(short, long, env = "PORTPROBE_TIMEOUT", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Use UDP instead of TCP
    #[arg(short, long)]
    pub udp: bool,

    /// Save the report as plain text to this file
    #[arg(short, long, value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Output format for results [default: plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Path to a settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the header and progress bar
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true)
            .map_err(|_| CliError::InvalidArgument(format!("unknown output format: {s}")))
    }
}

/// Scan parameters after merging flags with settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArgs {
    pub ports: String,
    pub workers: usize,
    pub timeout: Duration,
    pub protocol: Protocol,
    pub output: OutputFormat,
}

impl Args {
    /// Merge command-line flags over loaded settings.
    pub fn resolve(&self, settings: &AppSettings) -> CliResult<ResolvedArgs> {
        let output = match self.output {
            Some(format) => format,
            None => settings.default_output_format.parse()?,
        };

        let workers = self
            .workers
            .map(usize::from)
            .unwrap_or(settings.default_workers);
        if workers == 0 {
            return Err(CliError::InvalidArgument(
                "worker count must be at least 1".to_string(),
            ));
        }

        let timeout_ms = self.timeout.unwrap_or(settings.default_timeout_ms);
        if timeout_ms == 0 {
            return Err(CliError::InvalidArgument(
                "timeout must be at least 1 ms".to_string(),
            ));
        }

        Ok(ResolvedArgs {
            ports: self
                .ports
                .clone()
                .unwrap_or_else(|| settings.default_ports.clone()),
            workers,
            timeout: Duration::from_millis(timeout_ms),
            protocol: if self.udp { Protocol::Udp } else { Protocol::Tcp },
            output,
        })
    }

    /// Run a complete scan: validate input, probe, report, persist.
    pub async fn execute(&self) -> CliResult<()> {
        let settings = AppSettings::load(self.config.as_deref())?;
        let resolved = self.resolve(&settings)?;

        // Specification and resolution errors end the run before any probe.
        let ports: PortList = resolved.ports.parse()?;
        let target = resolve_target(&self.target).await?;

        let show_chrome = !self.quiet && resolved.output == OutputFormat::Plain;
        if show_chrome {
            output::print_scan_header(
                &target.original,
                &target.ip.to_string(),
                &resolved.protocol.to_string(),
                ports.len(),
            );
        }

        let config = ScanConfig::new(target.ip, ports)
            .with_protocol(resolved.protocol)
            .with_timeout(resolved.timeout)
            .with_workers(resolved.workers);

        let progress = output::scan_progress(config.ports.len(), !show_chrome);
        let started_at = Utc::now();
        let clock = Instant::now();
        let outcomes = run_scan(&config, &progress).await;
        let duration_ms = clock.elapsed().as_millis() as u64;

        let report = ScanReport::from_outcomes(
            &target.original,
            target.ip.to_string(),
            config.protocol,
            outcomes,
            ServiceCatalog::well_known(),
        )
        .with_timing(started_at, duration_ms);
        tracing::info!("{}", report.summary());

        output::print_results(&report, resolved.output)?;

        if let Some(path) = &self.save {
            output::save_report(path, &report)?;
            if !self.quiet {
                output::print_success(&format!("Results saved to {}", path.display()));
            }
        }

        Ok(())
    }
}
