//! CSV output formatting.

use crate::report::ScanReport;
use std::io::{self, Write};

/// Print the retained entries in CSV format.
pub fn print_csv(report: &ScanReport) -> csv::Result<()> {
    write_csv(io::stdout().lock(), report)
}

/// Write the retained entries as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, report: &ScanReport) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(["port", "state", "service", "detail"])?;

    for entry in &report.entries {
        wtr.write_record([
            entry.port.to_string().as_str(),
            entry.state.to_string().as_str(),
            entry.service.as_str(),
            entry.detail.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
