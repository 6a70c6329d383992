//! UDP probe.
//!
//! Sends one datagram on a connected UDP socket and waits for any answer.
//!
//! # Detection
//!
//! 1. **Reply**: any data back means the port is open
//! 2. **ICMP port unreachable**: surfaces as a refused `recv`, so the port is closed
//! 3. **Silence**: open or filtered, which UDP cannot tell apart

use crate::error::{ScanError, ScanResult};
use crate::scanner::traits::{PortResult, PortStatus, Prober, Protocol, ScanConfig};
use crate::services::service_label;
use crate::types::Port;
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::trace;

struct UdpPayload {
    port: u16,
    payload: &'static [u8],
}

/// Payloads that make common services answer.
const UDP_PAYLOADS: &[UdpPayload] = &[
    // DNS: empty standard query
    UdpPayload {
        port: 53,
        payload: b"\x00\x00\x10\x00\x00\x00\x00\x00\x00\x00\x00\x00",
    },
    // NTP client request
    UdpPayload {
        port: 123,
        payload: b"\xe3\x00\x04\xfa\x00\x01\x00\x00\x00\x01\x00\x00",
    },
    // NetBIOS name query
    UdpPayload {
        port: 137,
        payload: b"\x80\xf0\x00\x10\x00\x01\x00\x00\x00\x00\x00\x00\x20CKAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\x00\x00\x21\x00\x01",
    },
    // SNMP get-request, community "public"
    UdpPayload {
        port: 161,
        payload: b"\x30\x26\x02\x01\x01\x04\x06public\xa0\x19\x02\x04",
    },
];

const DEFAULT_PAYLOAD: &[u8] = b"\x00";

pub struct UdpProbe {
    target: IpAddr,
    timeout: Duration,
}

impl UdpProbe {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            target: config.target,
            timeout: config.timeout,
        }
    }

    async fn connect(&self, addr: SocketAddr) -> ScanResult<UdpSocket> {
        let local = if self.target.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        };

        let socket = UdpSocket::bind(local).await?;
        socket.connect(addr).await?;
        Ok(socket)
    }

    /// Exactly one send and one bounded wait. No retries.
    async fn exchange(&self, socket: &UdpSocket, port: u16) -> ScanResult<PortStatus> {
        socket.send(payload_for_port(port)).await?;

        let mut buf = [0u8; 512];
        match timeout(self.timeout, socket.recv(&mut buf)).await {
            Ok(Ok(_)) => Ok(PortStatus::Open),
            Ok(Err(e)) => match ScanError::from_io(e) {
                ScanError::ConnectionRefused
                | ScanError::HostUnreachable
                | ScanError::NetworkUnreachable(_) => Ok(PortStatus::Closed),
                other => Err(other),
            },
            Err(_) => Ok(PortStatus::OpenFiltered),
        }
    }
}

#[async_trait]
impl Prober for UdpProbe {
    fn protocol(&self) -> Protocol {
        Protocol::Udp
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

        let outcome = match self.connect(addr).await {
            Ok(socket) => self.exchange(&socket, port.as_u16()).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(status) => {
                trace!(%addr, %status, "udp probe");
                let result = PortResult::new(port, Protocol::Udp, status, service);
                match status {
                    PortStatus::Closed => result.with_detail(ScanError::ConnectionRefused.to_string()),
                    PortStatus::OpenFiltered => result.with_detail(ScanError::Timeout.to_string()),
                    _ => result,
                }
            }
            Err(e) => {
                trace!(%addr, error = %e, "udp probe failed");
                PortResult::new(port, Protocol::Udp, PortStatus::Filtered, service)
                    .with_detail(e.to_string())
            }
        }
    }
}

fn payload_for_port(port: u16) -> &'static [u8] {
    UDP_PAYLOADS
        .iter()
        .find(|p| p.port == port)
        .map(|p| p.payload)
        .unwrap_or(DEFAULT_PAYLOAD)
}
