//! Bounded worker pool.
//!
//! A fixed number of workers compete for ports on the shared input stream,
//! probe them one at a time and forward each result. The worker count is the
//! only admission control: it caps in-flight probes and open sockets.
//!
//! Results come out in completion order, not port order. Workers race for
//! ports and probes finish at different speeds, so callers must not assume
//! any ordering.

use crate::scanner::traits::{PortResult, Prober};
use crate::types::Port;
use async_channel::Receiver;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Default worker-pool size.
pub const DEFAULT_WORKERS: usize = 900;

/// Start `workers` probe workers draining `ports`.
///
/// The returned stream yields exactly one result per port received and
/// closes after the last worker exits. Its capacity of one is what
/// throttles the workers to the consumer's pace.
pub fn spawn_workers(
    ports: Receiver<Port>,
    probe: Arc<dyn Prober>,
    workers: usize,
    cancel: CancellationToken,
) -> mpsc::Receiver<PortResult> {
    let workers = workers.max(1);
    let (tx, rx) = mpsc::channel(1);

    let mut pool = JoinSet::new();
    for id in 0..workers {
        pool.spawn(worker(
            id,
            ports.clone(),
            Arc::clone(&probe),
            tx.clone(),
            cancel.clone(),
        ));
    }
    // Only workers hold senders now, so the stream closes with the last one.
    drop(tx);

    tokio::spawn(coordinate(pool));
    rx
}

async fn worker(
    id: usize,
    ports: Receiver<Port>,
    probe: Arc<dyn Prober>,
    out: mpsc::Sender<PortResult>,
    cancel: CancellationToken,
) -> usize {
    let mut probed = 0usize;

    loop {
        let port = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = ports.recv() => match next {
                Ok(port) => port,
                Err(_) => break,
            },
        };

        let result = probe.probe(port).await;
        probed += 1;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            sent = out.send(result) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }

    debug!(worker = id, probed, "worker exiting");
    probed
}

async fn coordinate(mut pool: JoinSet<usize>) {
    let mut total = 0usize;
    while let Some(joined) = pool.join_next().await {
        match joined {
            Ok(probed) => total += probed,
            Err(e) => error!(error = %e, "scan worker failed"),
        }
    }
    debug!(total, "all workers finished");
}
