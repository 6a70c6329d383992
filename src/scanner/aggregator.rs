//! Streaming result consumer.
//!
//! Prints each open port the moment its result arrives. Nothing is buffered
//! or sorted, so this loop is what paces the whole pipeline.

use crate::output;
use crate::scanner::traits::PortResult;
use std::io::{self, Write};
use tokio::sync::mpsc;

/// Counts gathered while draining one result stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub results: usize,
    pub open: usize,
}

impl ScanSummary {
    pub fn found_open(&self) -> bool {
        self.open > 0
    }

    /// Combine the summaries of several protocol runs.
    pub fn merge(self, other: Self) -> Self {
        Self {
            results: self.results + other.results,
            open: self.open + other.open,
        }
    }
}

/// Drain `results` until the scheduler closes it, writing lines to `sink`.
///
/// Open ports are always written. Other results are written only when
/// `verbose` is set.
pub async fn aggregate<W: Write>(
    mut results: mpsc::Receiver<PortResult>,
    verbose: bool,
    sink: &mut W,
) -> io::Result<ScanSummary> {
    let mut summary = ScanSummary::default();

    while let Some(result) = results.recv().await {
        summary.results += 1;

        if result.is_open() {
            summary.open += 1;
            writeln!(sink, "{}", output::format_open(&result))?;
        } else if verbose {
            writeln!(sink, "{}", output::format_not_open(&result))?;
        } else {
            continue;
        }
        sink.flush()?;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::traits::{PortStatus, Protocol};
    use crate::types::Port;

    fn result(port: u16, status: PortStatus) -> PortResult {
        PortResult::new(Port::new(port).unwrap(), Protocol::Tcp, status, "ssh")
            .with_detail("connection refused")
    }

    async fn feed(items: Vec<PortResult>, verbose: bool) -> (ScanSummary, String) {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            for item in items {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });

        let mut sink = Vec::new();
        let summary = aggregate(rx, verbose, &mut sink).await.unwrap();
        (summary, console::strip_ansi_codes(&String::from_utf8(sink).unwrap()).into_owned())
    }

    #[tokio::test]
    async fn test_prints_only_open_by_default() {
        let (summary, out) = feed(
            vec![result(23, PortStatus::Closed), result(22, PortStatus::Open)],
            false,
        )
        .await;

        assert_eq!(summary, ScanSummary { results: 2, open: 1 });
        assert_eq!(out.lines().count(), 1);
        assert!(out.contains("Port: 22"));
        assert!(out.contains("Open"));
        assert!(!out.contains("23"));
    }

    #[tokio::test]
    async fn test_verbose_shows_closed_with_detail() {
        let (summary, out) = feed(
            vec![result(22, PortStatus::Open), result(23, PortStatus::Closed)],
            true,
        )
        .await;

        assert!(summary.found_open());
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Port: 23"));
        assert!(out.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_no_open_ports() {
        let (summary, out) = feed(vec![result(23, PortStatus::Filtered)], false).await;
        assert!(!summary.found_open());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let (summary, _) = feed(Vec::new(), true).await;
        assert_eq!(summary, ScanSummary::default());
    }

    /// Counts flushes so line-at-a-time delivery can be checked.
    #[derive(Default)]
    struct FlushCounter {
        bytes: Vec<u8>,
        flushes: usize,
    }

    impl Write for FlushCounter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.bytes.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_every_written_line_is_flushed() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(result(22, PortStatus::Open)).await.unwrap();
        tx.send(result(23, PortStatus::Closed)).await.unwrap();
        tx.send(result(24, PortStatus::Filtered)).await.unwrap();
        drop(tx);

        let mut sink = FlushCounter::default();
        aggregate(rx, true, &mut sink).await.unwrap();
        assert_eq!(sink.flushes, 3);
        assert_eq!(String::from_utf8(sink.bytes).unwrap().lines().count(), 3);
    }

    #[tokio::test]
    async fn test_quiet_mode_skips_flush_for_hidden_lines() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(result(23, PortStatus::Closed)).await.unwrap();
        tx.send(result(22, PortStatus::Open)).await.unwrap();
        drop(tx);

        let mut sink = FlushCounter::default();
        aggregate(rx, false, &mut sink).await.unwrap();
        assert_eq!(sink.flushes, 1);
    }

    #[test]
    fn test_merge() {
        let a = ScanSummary { results: 3, open: 0 };
        let b = ScanSummary { results: 2, open: 1 };
        assert_eq!(a.merge(b), ScanSummary { results: 5, open: 1 });
    }
}
