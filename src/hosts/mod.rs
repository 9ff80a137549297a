//! Hosts-file records.

use std::fmt;
use std::net::IpAddr;

use crate::probe::ProbeResult;

/// The winning address for one domain.
///
/// Displays as a hosts-file line: `<ip> <hostname>`.
#[derive(Debug, Clone, PartialEq)]
pub struct HostsRecord {
    pub ip: IpAddr,
    pub hostname: String,
    /// Probe outcome of the winning candidate
    pub probe: ProbeResult,
}

impl fmt::Display for HostsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ip, self.hostname)
    }
}
