//! Target resolution.
//!
//! A target is either an IP literal, which is reverse-resolved for display
//! only, or a hostname, which must forward-resolve to an address. Names that
//! merely contain a dotted quad, such as `10.0.0.1.nip.io`, are hostnames.

use regex::Regex;
use std::fmt;
use std::net::IpAddr;
use std::sync::LazyLock;
use tracing::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

static IPV4_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}\.){3}\d{1,3}").expect("static pattern is valid")
});

/// A scan target resolved to a concrete address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The address probes dial.
    pub ip: IpAddr,
    /// Display hostname; empty when reverse lookup found nothing.
    pub hostname: String,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr, hostname: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            ip,
            hostname: hostname.into(),
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            if self.hostname.is_empty() {
                write!(f, "{}", self.ip)
            } else {
                write!(f, "{} ({})", self.ip, self.hostname)
            }
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("unable to resolve host '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for host '{0}'")]
    NoAddressesFound(String),
}

/// Cheap check for a dotted IPv4 literal. Not a full validation.
pub fn looks_like_ipv4(host: &str) -> bool {
    IPV4_LIKE.is_match(host)
}

/// Resolve the user-supplied host into a target.
pub async fn resolve_target(host: &str) -> Result<ScanTarget, TargetError> {
    let host = host.trim();
    let resolver = TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());

    if let Ok(ip) = host.parse::<IpAddr>() {
        let hostname = if looks_like_ipv4(host) {
            reverse_lookup(&resolver, ip).await.unwrap_or_default()
        } else {
            String::new()
        };
        return Ok(ScanTarget::new(host, ip, hostname));
    }

    let response = resolver
        .lookup_ip(host)
        .await
        .map_err(|e| TargetError::DnsResolutionFailed(host.to_string(), e.to_string()))?;

    let ip = response
        .iter()
        .next()
        .ok_or_else(|| TargetError::NoAddressesFound(host.to_string()))?;

    Ok(ScanTarget::new(host, ip, host))
}

async fn reverse_lookup(resolver: &TokioAsyncResolver, ip: IpAddr) -> Option<String> {
    match resolver.reverse_lookup(ip).await {
        Ok(names) => names
            .iter()
            .next()
            .map(|name| name.to_string().trim_end_matches('.').to_string()),
        Err(e) => {
            debug!(%ip, error = %e, "reverse lookup failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_looks_like_ipv4() {
        assert!(looks_like_ipv4("192.168.1.1"));
        assert!(looks_like_ipv4("10.0.0.256"));
        assert!(looks_like_ipv4("host-1.2.3.4.example"));
        assert!(!looks_like_ipv4("example.com"));
        assert!(!looks_like_ipv4("::1"));
        assert!(!looks_like_ipv4("1.2.3"));
    }

    fn is_lookup_failure(err: &TargetError) -> bool {
        matches!(
            err,
            TargetError::DnsResolutionFailed(..) | TargetError::NoAddressesFound(_)
        )
    }

    #[tokio::test]
    async fn test_dotted_quad_hostname_goes_to_dns() {
        let err = tokio_test::assert_err!(resolve_target("10.0.0.1.portscout.invalid").await);
        assert!(is_lookup_failure(&err), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_malformed_literal_goes_to_dns() {
        let err = tokio_test::assert_err!(resolve_target("999.1.1.1").await);
        assert!(is_lookup_failure(&err), "unexpected error: {err:?}");
    }

    #[tokio::test]
    async fn test_unresolvable_host_is_fatal() {
        let err = tokio_test::assert_err!(resolve_target("no-such-host.invalid").await);
        assert!(is_lookup_failure(&err), "unexpected error: {err:?}");
        assert_eq!(crate::error::CliError::from(err).exit_code(), 1);
    }

    #[tokio::test]
    async fn test_localhost_resolves() {
        let target = tokio_test::assert_ok!(resolve_target("localhost").await);
        assert!(target.ip.is_loopback());
        assert_eq!(target.hostname, "localhost");
    }

    #[tokio::test]
    async fn test_ipv6_literal_skips_dns() {
        let target = tokio_test::assert_ok!(resolve_target("::1").await);
        assert!(target.ip.is_loopback());
        assert!(target.hostname.is_empty());
    }

    #[test]
    fn test_display() {
        let ip = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert_eq!(ScanTarget::new("127.0.0.1", ip, "").to_string(), "127.0.0.1");
        assert_eq!(
            ScanTarget::new("127.0.0.1", ip, "localhost").to_string(),
            "127.0.0.1 (localhost)"
        );
        assert_eq!(
            ScanTarget::new("localhost", ip, "localhost").to_string(),
            "localhost (127.0.0.1)"
        );
    }
}
