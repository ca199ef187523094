//! Scan target resolution.
//!
//! Accepts a literal IPv4/IPv6 address or a hostname. Hostnames are looked
//! up through the system resolver configuration, preferring IPv4 results.

use serde::Serialize;
use std::fmt;
use std::net::IpAddr;
use trust_dns_resolver::TokioAsyncResolver;

/// A single scan target that has been resolved to an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScanTarget {
    /// The original input (hostname or IP string).
    pub original: String,
    /// The resolved IP address.
    pub ip: IpAddr,
}

impl ScanTarget {
    pub fn new(original: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            original: original.into(),
            ip,
        }
    }
}

impl fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.original == self.ip.to_string() {
            write!(f, "{}", self.ip)
        } else {
            write!(f, "{} ({})", self.original, self.ip)
        }
    }
}

/// Error type for target resolution.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TargetError {
    #[error("empty target")]
    Empty,
    #[error("could not resolve hostname '{0}': {1}")]
    DnsResolutionFailed(String, String),
    #[error("no IP addresses found for hostname '{0}'")]
    NoAddressesFound(String),
}

/// Resolve a hostname or IP address string to a scan target.
pub async fn resolve_target(target: &str) -> Result<ScanTarget, TargetError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(TargetError::Empty);
    }

    if let Some(ip) = parse_literal(target) {
        return Ok(ScanTarget::new(target, ip));
    }

    let resolver = TokioAsyncResolver::tokio_from_system_conf()
        .map_err(|e| TargetError::DnsResolutionFailed(target.to_string(), e.to_string()))?;

    let response = resolver
        .lookup_ip(target)
        .await
        .map_err(|e| TargetError::DnsResolutionFailed(target.to_string(), e.to_string()))?;

    let addrs: Vec<IpAddr> = response.iter().collect();
    let ip = addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| TargetError::NoAddressesFound(target.to_string()))?;

    tracing::debug!(hostname = target, %ip, "resolved target");
    Ok(ScanTarget::new(target, ip))
}

/// Parse a literal address, accepting bracketed IPv6 ("[::1]").
fn parse_literal(s: &str) -> Option<IpAddr> {
    let s = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(s);
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[tokio::test]
    async fn test_resolve_ipv4_literal() {
        let target = resolve_target("192.168.1.1").await.unwrap();
        assert_eq!(target.ip, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)));
        assert_eq!(target.to_string(), "192.168.1.1");
    }

    #[tokio::test]
    async fn test_resolve_bracketed_ipv6() {
        let target = resolve_target("[::1]").await.unwrap();
        assert_eq!(target.ip, IpAddr::V6(Ipv6Addr::LOCALHOST));
    }

    #[tokio::test]
    async fn test_empty_target_rejected() {
        assert!(matches!(resolve_target("  ").await, Err(TargetError::Empty)));
    }

    #[test]
    fn test_display_with_hostname() {
        let target = ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST));
        assert_eq!(target.to_string(), "localhost (127.0.0.1)");
    }
}
