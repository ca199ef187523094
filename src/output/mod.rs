//! Output formatting module.
//!
//! Renders scan reports as plain text, JSON or CSV, persists them to disk,
//! and builds the progress bar shown while scanning.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::{print_csv, write_csv};
pub use json_format::print_json;
pub use plain::{print_error, print_plain, print_scan_header, print_success, write_plain};

use crate::cli::OutputFormat;
use crate::error::CliResult;
use crate::report::ScanReport;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

/// Format and print the report according to the specified format.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Plain => print_plain(report)?,
        OutputFormat::Json => print_json(report)?,
        OutputFormat::Csv => print_csv(report)?,
    }
    Ok(())
}

/// Write the report's text lines to `path`, replacing any existing file.
pub fn save_report(path: &Path, report: &ScanReport) -> CliResult<()> {
    fs::write(path, report.to_text_lines().join("\n"))?;
    tracing::debug!(path = %path.display(), entries = report.entries.len(), "report saved");
    Ok(())
}

/// Progress bar for a scan of `total` ports, or a hidden one when quiet.
pub fn scan_progress(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ProbeOutcome, ProbeState, Protocol};
    use crate::services::ServiceCatalog;

    #[test]
    fn test_save_report_writes_text_lines() {
        let report = ScanReport::from_outcomes(
            "localhost",
            "127.0.0.1",
            Protocol::Tcp,
            vec![
                ProbeOutcome::new(80, ProbeState::Open, Protocol::Tcp, "HTTP/1.1 200 OK"),
                ProbeOutcome::new(22, ProbeState::Open, Protocol::Tcp, "No banner received."),
                ProbeOutcome::new(23, ProbeState::Closed, Protocol::Tcp, ""),
            ],
            ServiceCatalog::well_known(),
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");
        save_report(&path, &report).unwrap();

        let saved = fs::read_to_string(&path).unwrap();
        assert_eq!(
            saved,
            "[+] Port 22 (SSH) is Open\n    Banner: No banner received.\n\
             [+] Port 80 (HTTP) is Open\n    Banner: HTTP/1.1 200 OK"
        );
    }

    #[test]
    fn test_quiet_progress_is_hidden() {
        assert!(scan_progress(10, true).is_hidden());
    }
}
