//! DoH JSON response model.

use serde::Deserialize;

use crate::doh::RecordType;

/// A decoded `application/dns-json` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DnsResponse {
    /// DNS response code (0 = NOERROR, 2 = SERVFAIL, 3 = NXDOMAIN)
    #[serde(rename = "Status")]
    pub status: u16,
    #[serde(rename = "TC", default)]
    pub truncated: bool,
    #[serde(rename = "RD", default)]
    pub recursion_desired: bool,
    #[serde(rename = "RA", default)]
    pub recursion_available: bool,
    /// Set by the resolver when every record in the answer was DNSSEC-verified
    #[serde(rename = "AD", default)]
    pub dnssec_verified: bool,
    /// Echo of the `cd` request flag
    #[serde(rename = "CD", default)]
    pub dnssec_checking_disabled: bool,
    #[serde(rename = "Question", default)]
    pub question: Vec<DnsQuestion>,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DnsAnswer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsQuestion {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DnsAnswer {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    pub data: String,
}

impl DnsResponse {
    /// Answers of the given record type, in response order.
    ///
    /// CNAME and other records in the chain are skipped.
    pub fn answers_of(&self, record_type: RecordType) -> impl Iterator<Item = &DnsAnswer> {
        let code = record_type.code();
        self.answer.iter().filter(move |a| a.record_type == code)
    }
}
