//! Command-line interface definitions.
//!
//! Flags are parsed with `clap` derive macros and then resolved, together
//! with the settings file, into an immutable [`ScanPlan`].

mod scan;

pub use scan::execute;

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::USAGE_EXAMPLES;
use crate::scanner::Protocol;
use crate::types::{TOP200_TCP, TOP200_UDP, TOP20};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// A concurrent TCP/UDP port reachability scanner.
#[derive(Parser, Debug)]
#[command(name = "portscout")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP/UDP port reachability scanner", long_about = None)]
#[command(after_help = USAGE_EXAMPLES)]
pub struct Cli {
    /// Host or IP address to scan
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Ports to scan (e.g. "80", "80,443", "1-1000", "22,80,8000-9000")
    #[arg(short, long, default_value = "1-65535")]
    pub ports: String,

    /// Scan the 20 most commonly scanned TCP ports instead of --ports
    #[arg(long)]
    pub top20: bool,

    /// Scan the 200 most commonly scanned ports (separate TCP and UDP lists)
    #[arg(long)]
    pub top200: bool,

    /// Scan over TCP (the default when neither --tcp nor --udp is given)
    #[arg(long)]
    pub tcp: bool,

    /// Scan over UDP; without --tcp this disables TCP scanning
    #[arg(long)]
    pub udp: bool,

    /// Number of concurrent workers [default: 900]
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Connection timeout, e.g. "500ms", "1s", "2m" or bare seconds [default: 1s]
    #[arg(long, value_parser = parse_timeout)]
    pub timeout: Option<Duration>,

    /// Verbose mode: also show closed and filtered ports
    #[arg(short, long = "verb", alias = "verbose")]
    pub verbose: bool,

    /// Path to a settings file
    #[arg(long, env = "PORTSCOUT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// One protocol pass over a port specification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanJob {
    pub protocol: Protocol,
    pub ports: String,
}

/// Everything a scan needs, fixed before it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPlan {
    pub host: String,
    /// What the banner calls the port selection.
    pub display_ports: String,
    pub jobs: Vec<ScanJob>,
    pub threads: usize,
    pub timeout: Duration,
    pub verbose: bool,
}

impl Cli {
    /// Protocols to scan, in order.
    ///
    /// `--udp` alone turns TCP off; both flags scan TCP first, then UDP.
    pub fn protocols(&self) -> Vec<Protocol> {
        match (self.tcp, self.udp) {
            (_, false) => vec![Protocol::Tcp],
            (false, true) => vec![Protocol::Udp],
            (true, true) => vec![Protocol::Tcp, Protocol::Udp],
        }
    }

    /// Port specification for `protocol`, with presets overriding `--ports`.
    fn ports_for(&self, protocol: Protocol) -> String {
        if self.top20 {
            TOP20.to_string()
        } else if self.top200 {
            match protocol {
                Protocol::Tcp => TOP200_TCP.to_string(),
                Protocol::Udp => TOP200_UDP.to_string(),
            }
        } else {
            self.ports.clone()
        }
    }

    /// Validate the flags and merge them with `settings`.
    pub fn plan(&self, settings: &AppSettings) -> CliResult<ScanPlan> {
        if self.host.trim().is_empty() {
            return Err(CliError::MissingInput("hosts"));
        }
        if self.top20 && self.top200 {
            return Err(CliError::ConflictingPresets);
        }
        let preset = self.top20 || self.top200;
        if !preset && self.ports.trim().is_empty() {
            return Err(CliError::MissingInput("ports"));
        }

        let threads = self.threads.unwrap_or(settings.default_threads);
        if threads == 0 {
            return Err(CliError::InvalidThreads);
        }
        let timeout = self.timeout.unwrap_or_else(|| settings.default_timeout());
        if timeout.is_zero() {
            return Err(CliError::InvalidTimeout);
        }

        let display_ports = if self.top20 {
            "top20".to_string()
        } else if self.top200 {
            "top200".to_string()
        } else {
            self.ports.clone()
        };

        let jobs = self
            .protocols()
            .into_iter()
            .map(|protocol| ScanJob {
                protocol,
                ports: self.ports_for(protocol),
            })
            .collect();

        Ok(ScanPlan {
            host: self.host.trim().to_string(),
            display_ports,
            jobs,
            threads,
            timeout,
            verbose: self.verbose || settings.verbose,
        })
    }
}

/// Parse a timeout such as `250ms`, `1s`, `1.5s`, `2m` or `3` (seconds).
pub fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    let (number, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1.0)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1_000.0)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60_000.0)
    } else {
        (s, 1_000.0)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid duration: {s}"))?;
    let millis = (value * unit_ms).round();
    if !millis.is_finite() || millis < 1.0 {
        return Err(format!("duration must be at least 1ms: {s}"));
    }

    Ok(Duration::from_millis(millis as u64))
}
