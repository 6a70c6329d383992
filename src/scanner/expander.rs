//! Port stream generation.
//!
//! Turns a port specification into a lazily produced, cancellable stream of
//! ports that the worker pool drains.

use crate::types::{Port, PortSpec};
use async_channel::{Receiver, Sender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Parse `spec` and start emitting its ports on a background task.
///
/// Malformed blocks are logged and skipped. Ports arrive in spec order,
/// ascending within each range. The stream closes once every port has been
/// sent, when `cancel` fires, or when all receivers are gone.
pub fn expand_ports(spec: &str, cancel: CancellationToken) -> Receiver<Port> {
    let (spec, errors) = PortSpec::parse_lenient(spec);
    for error in &errors {
        warn!("[!] {error}, skipping it");
    }

    let (tx, rx) = async_channel::bounded(1);
    tokio::spawn(generate(spec, tx, cancel));
    rx
}

async fn generate(spec: PortSpec, tx: Sender<Port>, cancel: CancellationToken) {
    let mut sent = 0usize;

    for port in spec.iter() {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(sent, "port generator cancelled");
                return;
            }
            res = tx.send(port) => {
                if res.is_err() {
                    debug!(sent, "port stream has no receivers left");
                    return;
                }
                sent += 1;
            }
        }
    }

    debug!(sent, "port generator finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect(rx: Receiver<Port>) -> Vec<u16> {
        let mut ports = Vec::new();
        while let Ok(port) = rx.recv().await {
            ports.push(port.as_u16());
        }
        ports
    }

    #[tokio::test]
    async fn test_expands_in_spec_order() {
        let rx = expand_ports("80,443,1000-1002", CancellationToken::new());
        assert_eq!(collect(rx).await, vec![80, 443, 1000, 1001, 1002]);
    }

    #[tokio::test]
    async fn test_skips_bad_blocks() {
        let rx = expand_ports("abc,50-10,22", CancellationToken::new());
        assert_eq!(collect(rx).await, vec![22]);
    }

    #[tokio::test]
    async fn test_all_blocks_bad_yields_empty_stream() {
        let rx = expand_ports("abc,50-10", CancellationToken::new());
        assert!(collect(rx).await.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_closes_stream() {
        let cancel = CancellationToken::new();
        let rx = expand_ports("1-65535", cancel.clone());

        let first = rx.recv().await.unwrap();
        assert_eq!(first.as_u16(), 1);

        cancel.cancel();
        let rest = collect(rx).await;

        // At most the one item already buffered in the channel survives.
        assert!(rest.len() <= 1);
    }
}
