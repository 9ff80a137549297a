//! Command-line options.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::constants::{
    DEFAULT_DOH_ENDPOINT, DOH_TIMEOUT_SECS, POOL_MAX_SIZE, PROBE_COUNT, PROBE_TIMEOUT_MS,
    QUERY_RETRY_ATTEMPTS,
};
use crate::config::types::{Config, LogFormat, LogLevel};
use crate::probe::{ProbeConfig, ProbeKind};

/// Command-line options for the `mkhosts` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mkhosts",
    version,
    about = "Resolve domains over DNS-over-HTTPS and print the fastest reachable address as hosts entries",
    after_help = "Examples:\n  mkhosts www.pixiv.net\n  mkhosts www.pixiv.net www.github.com -s\n  mkhosts -f domains.txt -q > hosts"
)]
pub struct Opt {
    /// Domains to resolve
    pub domains: Vec<String>,

    /// Read domains from a domain list file (repeatable)
    #[arg(short = 'f', long = "file", value_name = "DOMAINLIST")]
    pub files: Vec<PathBuf>,

    /// Require DNSSEC validation
    #[arg(short = 's', long)]
    pub dnssec: bool,

    /// Accept answers with incorrect DNSSEC signatures
    #[arg(short = 'i', long)]
    pub insecure: bool,

    /// Print hosts lines only, without progress or collected errors
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// DNS-over-HTTPS endpoint
    #[arg(short = 'e', long, default_value = DEFAULT_DOH_ENDPOINT)]
    pub endpoint: String,

    /// Reachability probe strategy
    #[arg(long, value_enum, default_value_t = ProbeKind::Tcp)]
    pub strategy: ProbeKind,

    /// Maximum number of domains resolved concurrently
    #[arg(long, default_value_t = POOL_MAX_SIZE)]
    pub max_concurrency: usize,

    /// Total DoH attempts per domain
    #[arg(long, default_value_t = QUERY_RETRY_ATTEMPTS)]
    pub retry_attempts: usize,

    /// DoH request timeout in seconds
    #[arg(long, default_value_t = DOH_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Per-attempt TCP connect timeout in milliseconds
    #[arg(long, default_value_t = PROBE_TIMEOUT_MS)]
    pub probe_timeout_ms: u64,

    /// Connect attempts per probed port
    #[arg(long, default_value_t = PROBE_COUNT)]
    pub probe_count: u32,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Converts parsed options into the library configuration.
    ///
    /// Domains and list files are not part of [`Config`]; the caller reads them
    /// separately and hands them to [`crate::BatchResolver::resolve_all`].
    pub fn into_config(self) -> Config {
        let probe = ProbeConfig {
            timeout: Duration::from_millis(self.probe_timeout_ms),
            count: self.probe_count,
            ..ProbeConfig::default()
        };
        Config {
            endpoint: self.endpoint,
            dnssec: self.dnssec,
            insecure: self.insecure,
            quiet: self.quiet,
            strategy: self.strategy,
            max_concurrency: self.max_concurrency,
            timeout_seconds: self.timeout_seconds,
            retry_attempts: self.retry_attempts,
            probe,
            log_level: self.log_level,
            log_format: self.log_format,
            ..Config::default()
        }
    }
}
