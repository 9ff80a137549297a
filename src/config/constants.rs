//! Configuration constants.
//!
//! This module defines the defaults used throughout the application: the DoH
//! endpoint, retry budget, worker pool size, and probe timings.

// DNS-over-HTTPS
/// Default DNS-over-HTTPS endpoint (Cloudflare JSON API)
pub const DEFAULT_DOH_ENDPOINT: &str = "https://1.1.1.1/dns-query";
/// Content type requested from the DoH endpoint (`ct` parameter and `Accept` header)
pub const DOH_JSON_CONTENT_TYPE: &str = "application/dns-json";
/// User-Agent sent with every DoH request
pub const DEFAULT_USER_AGENT: &str = "mkhosts";
/// HTTP client timeout for a single DoH round-trip, in seconds
pub const DOH_TIMEOUT_SECS: u64 = 10;

// Retry strategy
/// Maximum number of DoH attempts (initial attempt included)
pub const QUERY_RETRY_ATTEMPTS: usize = 5;
/// Base delay in milliseconds for the exponential backoff between DoH attempts.
/// Delays grow as `base * 2^n` (200ms, 400ms, 800ms, ... for the default).
pub const RETRY_BASE_DELAY_MS: u64 = 100;
/// Upper bound for a single backoff delay, in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;

// Worker pool
/// Maximum number of domains resolved concurrently
pub const POOL_MAX_SIZE: usize = 10;
/// Interval between progress log lines while a batch runs, in seconds
pub const LOGGING_INTERVAL_SECS: u64 = 5;

// Reachability probing
/// Per-attempt TCP connect timeout in milliseconds
pub const PROBE_TIMEOUT_MS: u64 = 2000;
/// Number of connect attempts per port
pub const PROBE_COUNT: u32 = 2;
/// Pause between two connect attempts on the same port, in milliseconds
pub const PROBE_INTERVAL_MS: u64 = 100;
/// Ports tried in order; the first port with a successful attempt wins
pub const PROBE_PORTS: [u16; 2] = [80, 443];
/// Port used by the TLS handshake probe
pub const TLS_PORT: u16 = 443;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

// DNS record type
/// Numeric type of an A record in DoH JSON answers
pub const DNS_TYPE_A: u16 = 1;
