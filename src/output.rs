//! Terminal output formatting.
//!
//! Stateless helpers that decorate scan output with ANSI colors. The output
//! is meant for people; it has no stable, parseable schema.

use crate::scanner::{PortResult, PortStatus, ScanSummary};
use crate::types::ScanTarget;
use console::style;
use std::io::{self, Write};
use std::time::Duration;

/// One line for an open port.
pub fn format_open(result: &PortResult) -> String {
    format!(
        "Port: {}\tRunning: {}\tProtocol: {}\tStatus: {}",
        style(result.port).magenta().bold(),
        style(&result.service).cyan().bold(),
        result.protocol,
        style(result.status).green().bold()
    )
}

/// One line for a closed or filtered port, shown in verbose mode.
pub fn format_not_open(result: &PortResult) -> String {
    let status = match result.status {
        PortStatus::Closed => style(result.status).red(),
        _ => style(result.status).yellow(),
    };
    let detail = result.detail.as_deref().unwrap_or_default();

    format!(
        "Port: {}\tRunning: {}\tProtocol: {}\tStatus: {} {}",
        style(result.port).dim(),
        style(&result.service).dim(),
        result.protocol,
        status,
        style(detail).dim()
    )
}

/// Line announcing what is about to be scanned.
pub fn print_scan_header(target: &ScanTarget, ports: &str) {
    let line = if target.hostname.is_empty() || target.hostname == target.original {
        format!(
            "[*] Starting the scanning of ports {} of host {} ({})",
            ports, target.original, target.ip
        )
    } else {
        format!(
            "[*] Starting the scanning of ports {} of host {} ({})",
            ports, target.original, target.hostname
        )
    };
    println!();
    println!("{}", style(line).yellow().bold());
    println!();
}

/// Closing lines: the no-open notice when nothing was open, then the
/// wall-clock duration of the whole scan.
pub fn write_footer<W: Write>(
    sink: &mut W,
    summary: &ScanSummary,
    host: &str,
    elapsed: Duration,
) -> io::Result<()> {
    if !summary.found_open() {
        writeln!(sink, "{}", style("[!] No open ports").red().bold())?;
    }
    writeln!(sink)?;
    writeln!(
        sink,
        "{}",
        style(format!(
            "[*] Scan complete: {} scanned in {:.3} seconds",
            host,
            elapsed.as_secs_f64()
        ))
        .yellow()
        .bold()
    )?;
    sink.flush()
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("[!]").red().bold(), style(msg).red());
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("[!]").yellow().bold(), msg);
}

/// Examples appended to `--help`.
pub const USAGE_EXAMPLES: &str = "\
EXAMPLES:
  portscout --host www.example.com --ports 21-23,80,443
  portscout --host www.example.com --udp --ports 21-23,53
  portscout --host www.example.com --tcp --udp --top200 --timeout 5s --threads 900
  portscout --host www.example.com --top20 --threads 900 --verb

Use at most one of the presets: --top20 or --top200.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Protocol;
    use crate::types::Port;

    fn plain(s: String) -> String {
        console::strip_ansi_codes(&s).into_owned()
    }

    #[test]
    fn test_format_open() {
        let result = PortResult::new(Port::new(22).unwrap(), Protocol::Tcp, PortStatus::Open, "ssh");
        assert_eq!(
            plain(format_open(&result)),
            "Port: 22\tRunning: ssh\tProtocol: tcp\tStatus: Open"
        );
    }

    #[test]
    fn test_format_not_open_includes_detail() {
        let result = PortResult::new(Port::new(23).unwrap(), Protocol::Tcp, PortStatus::Closed, "telnet")
            .with_detail("connection refused");
        let line = plain(format_not_open(&result));
        assert!(line.starts_with("Port: 23\tRunning: telnet"));
        assert!(line.ends_with("Status: Closed connection refused"));
    }

    fn footer(summary: ScanSummary) -> String {
        let mut sink = Vec::new();
        write_footer(&mut sink, &summary, "localhost", Duration::from_millis(1500)).unwrap();
        plain(String::from_utf8(sink).unwrap())
    }

    #[test]
    fn test_footer_without_open_ports() {
        let out = footer(ScanSummary { results: 3, open: 0 });
        assert!(out.starts_with("[!] No open ports\n"));
        assert!(out.ends_with("[*] Scan complete: localhost scanned in 1.500 seconds\n"));
    }

    #[test]
    fn test_footer_with_open_port() {
        let out = footer(ScanSummary { results: 3, open: 1 });
        assert!(!out.contains("No open ports"));
        assert!(out.contains("[*] Scan complete: localhost scanned in 1.500 seconds"));
    }
}
