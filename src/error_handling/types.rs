//! Error type definitions.
//!
//! This module defines the per-domain failure taxonomy, the DoH transport
//! errors, and the fatal configuration/initialization errors.

use log::SetLoggerError;
use reqwest::StatusCode;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// Error building the TLS client configuration used by the handshake probe.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),

    /// The supplied configuration was rejected.
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

/// Fatal configuration errors, detected before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The probe strategy name is not one of the built-in strategies.
    #[error("Unknown probe strategy '{0}' (expected one of: tcp, ssl)")]
    UnknownStrategy(String),

    /// The DoH endpoint is not a usable http(s) URL.
    #[error("Invalid DoH endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The worker pool was configured with no slots.
    #[error("max_concurrency must be at least 1")]
    ZeroConcurrency,

    /// The DoH retry budget was configured with no attempts.
    #[error("retry_attempts must be at least 1")]
    ZeroRetryAttempts,

    /// The probe would make no connect attempts.
    #[error("probe count must be at least 1")]
    ZeroProbeCount,

    /// The probe has no port to connect to.
    #[error("at least one probe port is required")]
    NoProbePorts,

    /// Nothing to resolve.
    #[error("No hostname specified")]
    NoDomains,
}

/// Errors returned by a single DoH query.
#[derive(Error, Debug)]
pub enum DohError {
    /// Connection, read, or timeout failure of the HTTP round-trip.
    #[error("DoH request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("DoH endpoint returned HTTP {0}")]
    Status(StatusCode),

    /// The response body was not the expected JSON document.
    #[error("Malformed DoH response: {0}")]
    Decode(#[source] serde_json::Error),
}

impl DohError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, 5xx and 429 are retried. Other statuses and decode
    /// failures are final.
    pub fn is_retriable(&self) -> bool {
        match self {
            DohError::Transport(_) => true,
            DohError::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            DohError::Decode(_) => false,
        }
    }
}

/// Per-domain failure reasons.
///
/// Every variant carries the domain so that its `Display` output is a complete,
/// human-readable line for the batch failure list.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The domain failed syntactic validation; no network call was made.
    #[error("{domain}: Invalid domain name format")]
    InvalidFormat { domain: String },

    /// The DoH query failed after exhausting retries.
    #[error("{domain}: {source}")]
    Transport {
        domain: String,
        #[source]
        source: DohError,
    },

    /// The DoH response could not be decoded.
    #[error("{domain}: {source}")]
    Decode {
        domain: String,
        #[source]
        source: DohError,
    },

    /// DNSSEC was required and the resolver did not mark the answer verified.
    #[error("{domain}: DNSSEC Verify Failed")]
    DnssecFailed { domain: String },

    /// Resolution succeeded but no candidate passed the reachability probe.
    #[error("{domain}: No available IPs ({candidates} candidate(s) probed)")]
    NoReachableAddress { domain: String, candidates: usize },
}

impl ResolveError {
    /// Wraps a DoH failure, separating decode failures from transport failures.
    pub fn from_doh(domain: &str, source: DohError) -> Self {
        let domain = domain.to_string();
        match source {
            DohError::Decode(_) => ResolveError::Decode { domain, source },
            _ => ResolveError::Transport { domain, source },
        }
    }

    /// The category of this failure, for statistics.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ResolveError::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            ResolveError::Transport { .. } => ErrorKind::Transport,
            ResolveError::Decode { .. } => ErrorKind::Decode,
            ResolveError::DnssecFailed { .. } => ErrorKind::DnssecFailed,
            ResolveError::NoReachableAddress { .. } => ErrorKind::NoReachableAddress,
        }
    }

    /// The domain this failure belongs to.
    pub fn domain(&self) -> &str {
        match self {
            ResolveError::InvalidFormat { domain }
            | ResolveError::Transport { domain, .. }
            | ResolveError::Decode { domain, .. }
            | ResolveError::DnssecFailed { domain }
            | ResolveError::NoReachableAddress { domain, .. } => domain,
        }
    }
}

/// Categories of per-domain failures, counted by [`super::FailureStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    InvalidFormat,
    Transport,
    Decode,
    DnssecFailed,
    NoReachableAddress,
    /// The spawned task panicked before producing an outcome.
    TaskPanicked,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "Invalid domain name format",
            ErrorKind::Transport => "DoH transport error",
            ErrorKind::Decode => "DoH decode error",
            ErrorKind::DnssecFailed => "DNSSEC verification failed",
            ErrorKind::NoReachableAddress => "No reachable address",
            ErrorKind::TaskPanicked => "Task panicked",
        }
    }
}
