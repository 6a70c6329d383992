//! # portscout - a concurrent port reachability scanner
//!
//! portscout checks which ports of a host accept connections within a
//! timeout and labels them with a well-known service name.
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portscout::scanner::{create_probe, run_scan, Protocol, ScanConfig};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let config = ScanConfig::new("192.168.1.1".parse().unwrap())
//!         .with_timeout(Duration::from_millis(500));
//!     let probe = create_probe(Protocol::Tcp, &config);
//!
//!     let summary = run_scan(
//!         "22,80,443,8000-8100",
//!         probe,
//!         200,
//!         false,
//!         CancellationToken::new(),
//!         &mut std::io::stdout(),
//!     )
//!     .await?;
//!
//!     println!("{} of {} ports open", summary.open, summary.results);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - ports, port specifications and target resolution
//! - [`scanner`] - the expand → probe → aggregate pipeline
//! - [`services`] - static port to service name table
//! - [`config`] - settings file
//! - [`cli`] - flag parsing and the scan command
//! - [`output`] - colored terminal formatting
//! - [`error`] - error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

pub use error::{CliError, ScanError};
pub use scanner::{PortResult, PortStatus, Prober, Protocol, ScanConfig};
pub use types::{Port, PortSpec, ScanTarget};
