//! Error types for portscout.
//!
//! Uses `thiserror` for ergonomic error definitions.

use crate::types::TargetError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single probe did not find the port open.
///
/// These never abort a scan; probes turn them into a port status.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("i/o timeout")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("host unreachable")]
    HostUnreachable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScanError {
    /// Classify a socket error by its kind, falling back to its message.
    pub fn from_io(e: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match e.kind() {
            ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            ErrorKind::TimedOut => Self::Timeout,
            _ => {
                let text = e.to_string().to_lowercase();
                if text.contains("refused") {
                    Self::ConnectionRefused
                } else if text.contains("host") && text.contains("unreachable") {
                    Self::HostUnreachable
                } else if text.contains("unreachable") {
                    Self::NetworkUnreachable(e.to_string())
                } else {
                    Self::ConnectionFailed(e.to_string())
                }
            }
        }
    }
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors loading the settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fatal, user-facing errors. Each one ends the process before or instead of a scan.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("please select just one of the options top20 or top200")]
    ConflictingPresets,

    #[error("no {0} to scan were given")]
    MissingInput(&'static str),

    #[error("the number of threads must be at least 1")]
    InvalidThreads,

    #[error("the timeout must be at least 1ms")]
    InvalidTimeout,

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_classify_by_kind() {
        let e = ScanError::from_io(Error::from(ErrorKind::ConnectionRefused));
        assert!(matches!(e, ScanError::ConnectionRefused));

        let e = ScanError::from_io(Error::from(ErrorKind::TimedOut));
        assert!(matches!(e, ScanError::Timeout));
    }

    #[test]
    fn test_classify_by_message() {
        let e = ScanError::from_io(Error::new(ErrorKind::Other, "No route to host: host unreachable"));
        assert!(matches!(e, ScanError::HostUnreachable));

        let e = ScanError::from_io(Error::new(ErrorKind::Other, "Network is unreachable"));
        assert!(matches!(e, ScanError::NetworkUnreachable(_)));

        let e = ScanError::from_io(Error::new(ErrorKind::Other, "something odd"));
        assert!(matches!(e, ScanError::ConnectionFailed(_)));
    }

    #[test]
    fn test_cli_errors_exit_with_one() {
        assert_eq!(CliError::ConflictingPresets.exit_code(), 1);
        assert_eq!(CliError::MissingInput("ports").exit_code(), 1);
        assert_eq!(CliError::InvalidTimeout.exit_code(), 1);
    }
}
