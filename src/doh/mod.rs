//! DNS-over-HTTPS resolution.
//!
//! This module queries a DoH JSON endpoint (Cloudflare's `application/dns-json`
//! API by default):
//! - `DnsQuery` - Immutable description of one query
//! - `DnsResponse` - Decoded JSON answer
//! - `DohResolver` - HTTP round-trip with bounded retry
//!
//! The resolver never inspects the DNSSEC flags of a response; enforcing
//! `dnssec`/`insecure` is the caller's job.

mod query;
mod resolver;
mod response;

// Re-export public API
pub use query::{DnsQuery, RecordType};
pub use resolver::DohResolver;
pub use response::{DnsAnswer, DnsQuestion, DnsResponse};
