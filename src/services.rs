//! Service annotation based on well-known port numbers.
//!
//! The catalog is constant data built once on first use.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Name reported for ports with no known mapping.
pub const UNKNOWN_SERVICE: &str = "Unknown";

static WELL_KNOWN: LazyLock<ServiceCatalog> = LazyLock::new(|| {
    ServiceCatalog::from_entries([
        (20, "FTP-Data"),
        (21, "FTP"),
        (22, "SSH"),
        (23, "Telnet"),
        (25, "SMTP"),
        (53, "DNS"),
        (67, "DHCP"),
        (69, "TFTP"),
        (80, "HTTP"),
        (110, "POP3"),
        (111, "RPCBind"),
        (123, "NTP"),
        (135, "MSRPC"),
        (137, "NetBIOS-NS"),
        (139, "NetBIOS-SSN"),
        (143, "IMAP"),
        (161, "SNMP"),
        (389, "LDAP"),
        (443, "HTTPS"),
        (445, "SMB"),
        (465, "SMTPS"),
        (514, "Syslog"),
        (587, "Submission"),
        (636, "LDAPS"),
        (993, "IMAPS"),
        (995, "POP3S"),
        (1433, "MSSQL"),
        (1521, "Oracle"),
        (1883, "MQTT"),
        (2049, "NFS"),
        (3306, "MySQL"),
        (3389, "RDP"),
        (5060, "SIP"),
        (5432, "PostgreSQL"),
        (5672, "AMQP"),
        (5900, "VNC"),
        (6379, "Redis"),
        (8080, "HTTP-Proxy"),
        (8443, "HTTPS-Alt"),
        (9200, "Elasticsearch"),
        (11211, "Memcached"),
        (27017, "MongoDB"),
    ])
});

/// Mapping from port numbers to human-readable service names.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    entries: HashMap<u16, &'static str>,
}

impl ServiceCatalog {
    /// The process-wide catalog of well-known ports.
    pub fn well_known() -> &'static ServiceCatalog {
        &WELL_KNOWN
    }

    /// Build a catalog from explicit entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (u16, &'static str)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Look up the service name for a port, if known.
    pub fn get(&self, port: u16) -> Option<&'static str> {
        self.entries.get(&port).copied()
    }

    /// Service name for a port, or "Unknown".
    pub fn name(&self, port: u16) -> &'static str {
        self.get(port).unwrap_or(UNKNOWN_SERVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        let catalog = ServiceCatalog::well_known();
        assert_eq!(catalog.get(22), Some("SSH"));
        assert_eq!(catalog.get(80), Some("HTTP"));
        assert_eq!(catalog.get(443), Some("HTTPS"));
        assert_eq!(catalog.get(3306), Some("MySQL"));
        assert_eq!(catalog.get(3389), Some("RDP"));
    }

    #[test]
    fn test_unknown_port() {
        let catalog = ServiceCatalog::well_known();
        assert_eq!(catalog.get(12345), None);
        assert_eq!(catalog.name(12345), "Unknown");
    }

    #[test]
    fn test_custom_catalog() {
        let catalog = ServiceCatalog::from_entries([(7, "Echo")]);
        assert_eq!(catalog.name(7), "Echo");
        assert_eq!(catalog.name(22), UNKNOWN_SERVICE);
    }
}
