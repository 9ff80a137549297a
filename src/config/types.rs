//! Configuration types.
//!
//! This module defines the library configuration struct and the enums shared
//! between the library and the command-line front end.

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    DEFAULT_DOH_ENDPOINT, DEFAULT_USER_AGENT, DOH_TIMEOUT_SECS, POOL_MAX_SIZE,
    QUERY_RETRY_ATTEMPTS, RETRY_BASE_DELAY_MS,
};
use crate::error_handling::ConfigError;
use crate::probe::{ProbeConfig, ProbeKind};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Everything a [`crate::BatchResolver`] needs to run: where to send DoH
/// queries, whether DNSSEC is enforced, which probe strategy to use, and how
/// many domains may be in flight at once.
///
/// # Examples
///
/// ```no_run
/// use mkhosts::{Config, ProbeKind};
///
/// let config = Config {
///     dnssec: true,
///     strategy: ProbeKind::Tls,
///     max_concurrency: 20,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// DNS-over-HTTPS endpoint URL
    pub endpoint: String,

    /// Require DNSSEC validation (`do=true`)
    pub dnssec: bool,

    /// Accept answers whose DNSSEC validation failed (`cd=true`)
    pub insecure: bool,

    /// Suppress per-domain informational output
    pub quiet: bool,

    /// Reachability probe strategy
    pub strategy: ProbeKind,

    /// Maximum number of domains resolved concurrently
    pub max_concurrency: usize,

    /// Per-request DoH timeout in seconds
    pub timeout_seconds: u64,

    /// Total DoH attempts per domain (initial attempt included)
    pub retry_attempts: usize,

    /// Base delay for the exponential backoff between DoH attempts
    pub retry_base_delay_ms: u64,

    /// HTTP User-Agent header value
    pub user_agent: String,

    /// Probe timings and ports
    pub probe: ProbeConfig,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            dnssec: false,
            insecure: false,
            quiet: false,
            strategy: ProbeKind::Tcp,
            max_concurrency: POOL_MAX_SIZE,
            timeout_seconds: DOH_TIMEOUT_SECS,
            retry_attempts: QUERY_RETRY_ATTEMPTS,
            retry_base_delay_ms: RETRY_BASE_DELAY_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            probe: ProbeConfig::default(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Checks the settings that would otherwise only fail once tasks are running.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the endpoint is not an absolute http(s) URL,
    /// if the concurrency or retry budget is zero, or if the probe settings
    /// allow no connect attempt at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.endpoint).map_err(|source| {
            ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: source.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::ZeroRetryAttempts);
        }
        if self.probe.count == 0 {
            return Err(ConfigError::ZeroProbeCount);
        }
        if self.probe.ports.is_empty() {
            return Err(ConfigError::NoProbePorts);
        }
        Ok(())
    }

    /// DoH request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}
