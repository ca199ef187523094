//! Port specification parsing and the resolved port list.
//!
//! A `PortSpec` is the operator's textual request ("1-1024", "80,443",
//! "all"). Resolving it yields a `PortList`: strictly increasing, free of
//! duplicates, ready to hand to the dispatcher.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Highest port number on the wire.
pub const MAX_PORT: u16 = 65535;

/// Error type for port specification parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortSpecError {
    #[error("invalid port number: '{0}'")]
    InvalidNumber(String),
    #[error("invalid port range: '{0}'")]
    InvalidFormat(String),
    #[error("invalid port range: start ({0}) > end ({1})")]
    InvalidRange(u16, u16),
    #[error("empty port specification")]
    Empty,
}

/// An inclusive range of ports. A single port is a range of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a new port range.
    pub fn new(start: u16, end: u16) -> Result<Self, PortSpecError> {
        if start > end {
            Err(PortSpecError::InvalidRange(start, end))
        } else {
            Ok(Self { start, end })
        }
    }

    /// Create a range containing a single port.
    pub const fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    /// Iterate over all ports in this range.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A parsed port specification.
///
/// Supports:
/// - Every port: "all" (any case)
/// - Single port: "80"
/// - Comma-separated: "80,443,8080"
/// - Range: "1-1000"
/// - Mixed: "22,80,443,8000-9000"
///
/// Values are not checked against 1-65535 here; port 0 is carried through
/// and fails when probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSpec {
    All,
    Ranges(Vec<PortRange>),
}

impl PortSpec {
    /// Expand into the sorted, deduplicated list of ports to probe.
    pub fn resolve(&self) -> PortList {
        match self {
            Self::All => PortList((1..=MAX_PORT).collect()),
            Self::Ranges(ranges) => {
                let unique: BTreeSet<u16> = ranges.iter().flat_map(PortRange::iter).collect();
                PortList(unique.into_iter().collect())
            }
        }
    }
}

impl FromStr for PortSpec {
    type Err = PortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PortSpecError::Empty);
        }
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            match part.split_once('-') {
                Some((start, end)) => {
                    if end.contains('-') {
                        return Err(PortSpecError::InvalidFormat(part.to_string()));
                    }
                    let start = parse_port(start)?;
                    let end = parse_port(end)?;
                    ranges.push(PortRange::new(start, end)?);
                }
                None => ranges.push(PortRange::single(parse_port(part)?)),
            }
        }

        Ok(Self::Ranges(ranges))
    }
}

impl fmt::Display for PortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Ranges(ranges) => {
                let parts: Vec<String> = ranges.iter().map(|r| r.to_string()).collect();
                write!(f, "{}", parts.join(","))
            }
        }
    }
}

fn parse_port(s: &str) -> Result<u16, PortSpecError> {
    let s = s.trim();
    s.parse()
        .map_err(|_| PortSpecError::InvalidNumber(s.to_string()))
}

/// Resolved ports, strictly increasing with no duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PortList(Vec<u16>);

impl PortList {
    /// Build a list from arbitrary ports, sorting and deduplicating them.
    pub fn from_ports(ports: impl IntoIterator<Item = u16>) -> Self {
        let unique: BTreeSet<u16> = ports.into_iter().collect();
        Self(unique.into_iter().collect())
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.0
    }
}

impl Deref for PortList {
    type Target = [u16];

    fn deref(&self) -> &[u16] {
        &self.0
    }
}

impl FromStr for PortList {
    type Err = PortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<PortSpec>()?.resolve())
    }
}

/// Parse a port specification string straight into a `PortList`.
pub fn parse_ports(spec: &str) -> Result<PortList, PortSpecError> {
    spec.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated() {
        assert_eq!(parse_ports("80,443").unwrap().to_vec(), vec![80, 443]);
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_ports("20-22").unwrap().to_vec(), vec![20, 21, 22]);
    }

    #[test]
    fn test_parse_overlap_deduplicates() {
        assert_eq!(
            parse_ports("20-22,21,80").unwrap().to_vec(),
            vec![20, 21, 22, 80]
        );
        assert_eq!(parse_ports("80,80,443,80").unwrap().len(), 2);
    }

    #[test]
    fn test_parse_unordered_input_is_sorted() {
        assert_eq!(
            parse_ports("443, 22 ,100-102, 80").unwrap().to_vec(),
            vec![22, 80, 100, 101, 102, 443]
        );
    }

    #[test]
    fn test_parse_all() {
        let ports = parse_ports("all").unwrap();
        assert_eq!(ports.len(), 65535);
        assert_eq!(ports.first(), Some(&1));
        assert_eq!(ports.last(), Some(&65535));
        assert!(ports.windows(2).all(|w| w[0] < w[1]));

        assert_eq!(parse_ports("ALL").unwrap().len(), 65535);
    }

    #[test]
    fn test_whitespace_around_range_bounds() {
        assert_eq!(parse_ports(" 1 - 3 ").unwrap().to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_reversed_range_fails() {
        assert_eq!(
            parse_ports("50-10"),
            Err(PortSpecError::InvalidRange(50, 10))
        );
    }

    #[test]
    fn test_invalid_numbers_fail() {
        assert!(matches!(
            parse_ports("abc"),
            Err(PortSpecError::InvalidNumber(_))
        ));
        assert!(parse_ports("80-").is_err());
        assert!(parse_ports("80,").is_err());
        assert!(parse_ports("1-2-3").is_err());
        assert!(parse_ports("70000").is_err());
        assert_eq!(parse_ports("   "), Err(PortSpecError::Empty));
    }

    #[test]
    fn test_port_zero_passes_through() {
        assert_eq!(parse_ports("0,1").unwrap().to_vec(), vec![0, 1]);
    }

    #[test]
    fn test_spec_display() {
        let spec: PortSpec = "22,80-90".parse().unwrap();
        assert_eq!(spec.to_string(), "22,80-90");
        assert_eq!(PortSpec::All.to_string(), "all");
    }

    #[test]
    fn test_from_ports_sorts() {
        let list = PortList::from_ports([443, 22, 443, 80]);
        assert_eq!(list.to_vec(), vec![22, 80, 443]);
    }
}
