//! Scanner module - the expansion, probing and aggregation pipeline.
//!
//! ```text
//! expand_ports ──▶ spawn_workers (W × Prober) ──▶ aggregate
//! ```
//!
//! Each stage runs on its own task(s) and talks to the next through a
//! channel of capacity one. A shared `CancellationToken` lets every stage
//! abandon a blocked send or receive.

pub mod aggregator;
pub mod expander;
pub mod scheduler;
pub mod tcp;
pub mod traits;
pub mod udp;

use std::io::{self, Write};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use aggregator::{aggregate, ScanSummary};
pub use expander::expand_ports;
pub use scheduler::{spawn_workers, DEFAULT_WORKERS};
pub use tcp::TcpConnectProbe;
pub use traits::{PortResult, PortStatus, Prober, Protocol, ScanConfig};
pub use udp::UdpProbe;

/// Build the probe for `protocol`.
pub fn create_probe(protocol: Protocol, config: &ScanConfig) -> Arc<dyn Prober> {
    match protocol {
        Protocol::Tcp => Arc::new(TcpConnectProbe::new(config)),
        Protocol::Udp => Arc::new(UdpProbe::new(config)),
    }
}

/// Run one full pipeline over `spec` and stream its output into `sink`.
pub async fn run_scan<W: Write>(
    spec: &str,
    probe: Arc<dyn Prober>,
    workers: usize,
    verbose: bool,
    cancel: CancellationToken,
    sink: &mut W,
) -> io::Result<ScanSummary> {
    let ports = expand_ports(spec, cancel.clone());
    let results = spawn_workers(ports, probe, workers, cancel);
    aggregate(results, verbose, sink).await
}
