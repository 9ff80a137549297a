//! Reachability and latency probing.
//!
//! This module actively checks whether a candidate IP is usable for a domain:
//! - `TcpProbe` - Repeated TCP connects over a list of ports
//! - `TlsProbe` - A `TcpProbe` followed by a full TLS handshake with the domain as SNI
//! - `ProbeStrategy` - Runtime-selected strategy, built from a [`ProbeKind`]
//!
//! Probes always target the candidate IP; the hostname is used only as the TLS
//! server name.

mod tcp;
mod tls;

use std::fmt;
use std::future::Future;
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use strum_macros::EnumIter;

use crate::config::{
    PROBE_COUNT, PROBE_INTERVAL_MS, PROBE_PORTS, PROBE_TIMEOUT_MS, TLS_HANDSHAKE_TIMEOUT_SECS,
    TLS_PORT,
};
use crate::error_handling::ConfigError;

pub use tcp::TcpProbe;
pub use tls::TlsProbe;

/// Outcome of probing one candidate IP.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// Whether the candidate is considered reachable
    pub success: bool,
    /// Mean round-trip time of the successful attempts
    pub latency: Duration,
    /// Successful attempts divided by attempts, in `0.0..=1.0`
    pub success_rate: f64,
}

impl ProbeResult {
    /// A result for a candidate that never answered.
    pub fn unreachable() -> Self {
        Self {
            success: false,
            latency: Duration::ZERO,
            success_rate: 0.0,
        }
    }
}

/// A reachability probing strategy.
///
/// Implementations hold configuration only and must be safe to call
/// concurrently against different targets.
pub trait ReachabilityProbe: Send + Sync + 'static {
    /// Probes `ip` on behalf of `hostname`.
    ///
    /// `quiet` moves per-candidate output from info to debug level.
    fn probe(
        &self,
        ip: IpAddr,
        hostname: &str,
        quiet: bool,
    ) -> impl Future<Output = ProbeResult> + Send;
}

/// Probe timings and ports.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Per-attempt TCP connect timeout
    pub timeout: Duration,
    /// Connect attempts per port
    pub count: u32,
    /// Pause between two attempts on the same port
    pub interval: Duration,
    /// Ports tried in order until one answers
    pub ports: Vec<u16>,
    /// Port used for the TLS handshake
    pub tls_port: u16,
    /// TLS handshake timeout (the TCP connect before it uses `timeout`)
    pub tls_handshake_timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(PROBE_TIMEOUT_MS),
            count: PROBE_COUNT,
            interval: Duration::from_millis(PROBE_INTERVAL_MS),
            ports: PROBE_PORTS.to_vec(),
            tls_port: TLS_PORT,
            tls_handshake_timeout: Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        }
    }
}

/// Names of the built-in probe strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, EnumIter)]
pub enum ProbeKind {
    /// TCP connect to ports 80/443
    #[value(name = "tcp", alias = "tcping")]
    Tcp,
    /// TCP connect followed by a TLS handshake on port 443
    #[value(name = "ssl", alias = "tls")]
    Tls,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::Tcp => "tcp",
            ProbeKind::Tls => "ssl",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tcp" | "tcping" => Ok(ProbeKind::Tcp),
            "ssl" | "tls" => Ok(ProbeKind::Tls),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// The probe strategy selected for a run.
#[derive(Debug, Clone)]
pub enum ProbeStrategy {
    Tcp(TcpProbe),
    Tls(TlsProbe),
}

impl ProbeStrategy {
    /// Builds the strategy named by `kind`.
    ///
    /// `tls_config` is only used by the TLS strategy.
    pub fn new(
        kind: ProbeKind,
        config: &ProbeConfig,
        tls_config: Arc<rustls::ClientConfig>,
    ) -> Self {
        let tcp = TcpProbe::new(config.clone());
        match kind {
            ProbeKind::Tcp => ProbeStrategy::Tcp(tcp),
            ProbeKind::Tls => ProbeStrategy::Tls(TlsProbe::new(
                tcp,
                tls_config,
                config.tls_port,
                config.tls_handshake_timeout,
            )),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        match self {
            ProbeStrategy::Tcp(_) => ProbeKind::Tcp,
            ProbeStrategy::Tls(_) => ProbeKind::Tls,
        }
    }
}

impl ReachabilityProbe for ProbeStrategy {
    async fn probe(&self, ip: IpAddr, hostname: &str, quiet: bool) -> ProbeResult {
        match self {
            ProbeStrategy::Tcp(probe) => probe.probe(ip, hostname, quiet).await,
            ProbeStrategy::Tls(probe) => probe.probe(ip, hostname, quiet).await,
        }
    }
}
