//! Prober trait abstraction.
//!
//! Defines the common interface for the TCP and UDP probes so the scheduler
//! can drive either one, or a test double, through a trait object.

use crate::types::Port;
use async_trait::async_trait;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Status of a probed port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    /// A connection was established (TCP) or a reply arrived (UDP).
    Open,
    /// The target actively refused.
    Closed,
    /// No answer within the timeout, or the route is unreachable.
    Filtered,
    /// UDP only: silence, which is either an open service or a filter.
    OpenFiltered,
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::Closed => write!(f, "Closed"),
            Self::Filtered => write!(f, "Filtered"),
            Self::OpenFiltered => write!(f, "Open|Filtered"),
        }
    }
}

/// Transport protocol of a probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => write!(f, "tcp"),
            Self::Udp => write!(f, "udp"),
        }
    }
}

/// Outcome of probing a single port. Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortResult {
    pub port: Port,
    pub protocol: Protocol,
    pub status: PortStatus,
    /// Service label; empty when the port is not well-known.
    pub service: String,
    /// Error text explaining a non-open status.
    pub detail: Option<String>,
}

impl PortResult {
    pub fn new(
        port: Port,
        protocol: Protocol,
        status: PortStatus,
        service: impl Into<String>,
    ) -> Self {
        Self {
            port,
            protocol,
            status,
            service: service.into(),
            detail: None,
        }
    }

    /// Attach the error text that led to this status.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Only a confirmed connection or reply counts as open.
    pub fn is_open(&self) -> bool {
        self.status == PortStatus::Open
    }
}

/// Immutable settings shared by every probe of one scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Address to dial.
    pub target: IpAddr,
    /// Bound on connection establishment (TCP) or reply wait (UDP).
    pub timeout: Duration,
}

impl ScanConfig {
    pub fn new(target: IpAddr) -> Self {
        Self {
            target,
            timeout: Duration::from_secs(1),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One timed reachability check per call.
///
/// Implementations must not panic on network failures: every failure is
/// folded into the returned `PortResult`.
#[async_trait]
pub trait Prober: Send + Sync {
    fn protocol(&self) -> Protocol;

    fn target(&self) -> IpAddr;

    fn timeout(&self) -> Duration;

    async fn probe(&self, port: Port) -> PortResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_status_display() {
        assert_eq!(PortStatus::Open.to_string(), "Open");
        assert_eq!(PortStatus::Closed.to_string(), "Closed");
        assert_eq!(PortStatus::OpenFiltered.to_string(), "Open|Filtered");
    }

    #[test]
    fn test_only_open_is_open() {
        let port = Port::new(53).unwrap();
        assert!(PortResult::new(port, Protocol::Tcp, PortStatus::Open, "dns").is_open());
        assert!(!PortResult::new(port, Protocol::Udp, PortStatus::OpenFiltered, "dns").is_open());

        let closed = PortResult::new(port, Protocol::Tcp, PortStatus::Closed, "")
            .with_detail("connection refused");
        assert!(!closed.is_open());
        assert_eq!(closed.detail.as_deref(), Some("connection refused"));
    }
}
