//! TCP connect probe.
//!
//! Completes the full handshake through the operating system's socket API
//! and closes the connection straight away. Needs no privileges.

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{PortResult, PortStatus, Prober, Protocol, ScanConfig};
use crate::services::service_label;
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

pub struct TcpConnectProbe {
    target: IpAddr,
    timeout: Duration,
}

impl TcpConnectProbe {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            target: config.target,
            timeout: config.timeout,
        }
    }

    /// The timeout covers connection establishment only.
    async fn attempt_connect(&self, addr: SocketAddr) -> ScanResult<TcpStream> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ScanError::from_io(e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[async_trait]
impl Prober for TcpConnectProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    fn target(&self) -> IpAddr {
        self.target
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn probe(&self, port: Port) -> PortResult {
        let addr = SocketAddr::new(self.target, port.as_u16());
        let service = service_label(port.as_u16());

        match self.attempt_connect(addr).await {
            Ok(stream) => {
                drop(stream);
                trace!(%addr, "open");
                PortResult::new(port, Protocol::Tcp, PortStatus::Open, service)
            }
            Err(e) => {
                let status = match e {
                    ScanError::Timeout
                    | ScanError::HostUnreachable
                    | ScanError::NetworkUnreachable(_) => PortStatus::Filtered,
                    _ => PortStatus::Closed,
                };
                trace!(%addr, %status, error = %e, "not open");
                PortResult::new(port, Protocol::Tcp, status, service).with_detail(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use tokio::net::TcpListener;

    fn localhost(timeout: Duration) -> TcpConnectProbe {
        TcpConnectProbe::new(
            &ScanConfig::new(IpAddr::V4(Ipv4Addr::LOCALHOST)).with_timeout(timeout),
        )
    }

    #[test]
    fn test_probe_creation() {
        let probe = localhost(Duration::from_secs(1));
        assert_eq!(probe.target(), IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(probe.protocol(), Protocol::Tcp);
        assert_eq!(probe.timeout(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_probe_open_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();

        let result = localhost(Duration::from_millis(500)).probe(port).await;

        assert_eq!(result.status, PortStatus::Open);
        assert_eq!(result.protocol, Protocol::Tcp);
        assert!(result.detail.is_none());
    }

    #[tokio::test]
    async fn test_probe_refused_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);

        let result = localhost(Duration::from_millis(500)).probe(port).await;

        assert!(!result.is_open());
        assert!(matches!(
            result.status,
            PortStatus::Closed | PortStatus::Filtered
        ));
        assert!(result.detail.is_some());
    }
}
