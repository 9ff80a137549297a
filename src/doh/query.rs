//! DoH query description.

use std::fmt;

use crate::config::{DNS_TYPE_A, DOH_JSON_CONTENT_TYPE};

/// DNS record types the resolver can ask for. Only IPv4 hosts entries are
/// produced, so A is the only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    A,
}

impl RecordType {
    /// Mnemonic sent in the `type` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
        }
    }

    /// Numeric type used in the `type` field of JSON answers.
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => DNS_TYPE_A,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single DNS-over-HTTPS query.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    name: String,
    record_type: RecordType,
    endpoint: String,
    dnssec: bool,
    insecure: bool,
}

impl DnsQuery {
    /// Creates a query for `name` against `endpoint`.
    ///
    /// * `dnssec` - Ask the resolver for DNSSEC data (`do` parameter)
    /// * `insecure` - Disable DNSSEC checking on the resolver (`cd` parameter)
    pub fn new(
        name: impl Into<String>,
        record_type: RecordType,
        endpoint: impl Into<String>,
        dnssec: bool,
        insecure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            endpoint: endpoint.into(),
            dnssec,
            insecure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn dnssec(&self) -> bool {
        self.dnssec
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    /// Query-string parameters, in the order the endpoint documents them.
    pub fn params(&self) -> [(&'static str, String); 5] {
        [
            ("ct", DOH_JSON_CONTENT_TYPE.to_string()),
            ("name", self.name.clone()),
            ("type", self.record_type.as_str().to_string()),
            ("do", self.dnssec.to_string()),
            ("cd", self.insecure.to_string()),
        ]
    }
}
