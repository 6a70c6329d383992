//! Core type definitions using newtype patterns for type safety.

mod port;
mod target;

pub use port::{Port, PortError, PortRange, PortSpec, TOP200_TCP, TOP200_UDP, TOP20};
pub use target::{looks_like_ipv4, resolve_target, ScanTarget, TargetError};
