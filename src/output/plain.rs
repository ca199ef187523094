//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::report::ScanReport;
use crate::scanner::ProbeState;
use console::{style, Style};
use std::io::{self, Write};

const RULE: &str = "═══════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Print the report to stdout.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plain(&mut out, report)
}

/// Render the report: header, port table, summary.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(
        out,
        "                   {} Scan Results",
        style("portprobe").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target)?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address)?;
    writeln!(out, "  {} {}", style("Protocol:").bold(), report.protocol)?;
    writeln!(
        out,
        "  {} {}",
        style("Started:").bold(),
        report.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(out)?;

    if report.entries.is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(THIN_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:^14}  {}",
            style("PORT").bold(),
            style("STATE").bold(),
            style("SERVICE").bold()
        )?;
        writeln!(out, "  {}", style(THIN_RULE).dim())?;

        for entry in &report.entries {
            let state_style = match entry.state {
                ProbeState::Open => Style::new().green().bold(),
                ProbeState::OpenFiltered => Style::new().yellow().bold(),
                ProbeState::Closed | ProbeState::Error => Style::new().red(),
                ProbeState::Filtered => Style::new().yellow(),
            };

            writeln!(
                out,
                "  {:>6}  {:^14}  {}",
                entry.port,
                state_style.apply_to(entry.state.to_string()),
                entry.service
            )?;
            if !entry.detail.is_empty() {
                writeln!(out, "          {}", style(&entry.detail).dim())?;
            }
        }

        writeln!(out, "  {}", style(THIN_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "  {}", style("Scan Summary").bold())?;
    writeln!(out, "  Total ports scanned: {}", report.ports_scanned)?;
    writeln!(
        out,
        "  Ports shown (Open / Open|Filtered): {}",
        style(report.ports_reported).green().bold()
    )?;
    for entry in &report.entries {
        writeln!(
            out,
            "   - Port {} ({}): {}, Banner: {}",
            entry.port, entry.service, entry.state, entry.detail
        )?;
    }
    writeln!(
        out,
        "  {} closed, {} filtered, {} errors in {:.2}s",
        style(report.closed_ports).red(),
        style(report.filtered_ports).yellow(),
        report.error_ports,
        report.duration_ms as f64 / 1000.0
    )?;
    writeln!(out)?;
    writeln!(out, "{}", style(RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ip: &str, protocol: &str, ports: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portprobe").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{} Protocol: {}", style("•").dim(), style(protocol).yellow());
    println!(
        "{} Target: {} ({})",
        style("•").dim(),
        style(target).white().bold(),
        ip
    );
    println!(
        "{} Scanning {} ports...",
        style("•").dim(),
        style(ports).white().bold()
    );
    println!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{ProbeOutcome, Protocol};
    use crate::services::ServiceCatalog;

    fn render(outcomes: Vec<ProbeOutcome>) -> String {
        let report = ScanReport::from_outcomes(
            "localhost",
            "127.0.0.1",
            Protocol::Tcp,
            outcomes,
            ServiceCatalog::well_known(),
        );
        let mut buf = Vec::new();
        write_plain(&mut buf, &report).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_plain_lists_entries_and_summary() {
        let text = render(vec![
            ProbeOutcome::new(22, ProbeState::Open, Protocol::Tcp, "SSH-2.0-OpenSSH_9.6"),
            ProbeOutcome::new(23, ProbeState::Closed, Protocol::Tcp, ""),
        ]);

        assert!(text.contains("SSH-2.0-OpenSSH_9.6"));
        assert!(text.contains("Total ports scanned: 2"));
        assert!(text.contains("Ports shown (Open / Open|Filtered): "));
        assert!(!text.contains("Telnet"));
    }

    #[test]
    fn test_summary_recaps_each_entry() {
        let text = render(vec![
            ProbeOutcome::new(80, ProbeState::Open, Protocol::Tcp, "HTTP/1.1 200 OK"),
            ProbeOutcome::new(22, ProbeState::Open, Protocol::Tcp, "SSH-2.0-OpenSSH_9.6"),
            ProbeOutcome::new(23, ProbeState::Closed, Protocol::Tcp, ""),
        ]);

        let summary = &text[text.find("Scan Summary").unwrap()..];
        let ssh = summary
            .find(" - Port 22 (SSH): Open, Banner: SSH-2.0-OpenSSH_9.6")
            .unwrap();
        let http = summary
            .find(" - Port 80 (HTTP): Open, Banner: HTTP/1.1 200 OK")
            .unwrap();
        assert!(ssh < http);
        assert!(!summary.contains("Port 23"));
    }

    #[test]
    fn test_plain_without_entries() {
        let text = render(vec![ProbeOutcome::new(
            23,
            ProbeState::Closed,
            Protocol::Tcp,
            "",
        )]);
        assert!(text.contains("No open ports found."));
    }
}
