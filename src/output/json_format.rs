//! JSON output formatting.

use crate::report::ScanReport;
use std::io::{self, Write};

/// Print the report as pretty-printed JSON.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, report).map_err(io::Error::other)?;
    writeln!(out)
}
