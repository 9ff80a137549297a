//! TCP connect probing.

use std::net::{IpAddr, SocketAddr};
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::net::TcpStream;

use super::{ProbeConfig, ProbeResult, ReachabilityProbe};

/// Connects to each configured port in turn, `count` times per port.
///
/// The first port with at least one successful connect decides the result:
/// `success_rate` is successes over attempts on that port and `latency` the
/// mean connect time of the successful attempts. Later ports are not tried.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    config: ProbeConfig,
}

/// Connect statistics for one port.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PortStats {
    attempts: u32,
    successes: u32,
    total_rtt: Duration,
}

impl PortStats {
    fn into_result(self) -> Option<ProbeResult> {
        if self.successes == 0 {
            return None;
        }
        Some(ProbeResult {
            success: true,
            latency: self.total_rtt / self.successes,
            success_rate: f64::from(self.successes) / f64::from(self.attempts),
        })
    }
}

impl TcpProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs the connect attempts against a single port.
    async fn probe_port(&self, addr: SocketAddr) -> PortStats {
        let mut stats = PortStats {
            attempts: 0,
            successes: 0,
            total_rtt: Duration::ZERO,
        };

        for attempt in 0..self.config.count {
            if attempt > 0 && !self.config.interval.is_zero() {
                tokio::time::sleep(self.config.interval).await;
            }
            stats.attempts += 1;

            let start = Instant::now();
            match tokio::time::timeout(self.config.timeout, TcpStream::connect(addr)).await {
                Ok(Ok(stream)) => {
                    let rtt = start.elapsed();
                    drop(stream);
                    stats.successes += 1;
                    stats.total_rtt += rtt;
                    debug!("Connected to {addr} in {:.2}ms", rtt.as_secs_f64() * 1000.0);
                }
                Ok(Err(e)) => {
                    debug!("Failed to connect to {addr}: {e}");
                }
                Err(_) => {
                    debug!(
                        "TCP connect timeout for {addr} ({}ms)",
                        self.config.timeout.as_millis()
                    );
                }
            }
        }

        stats
    }
}

impl ReachabilityProbe for TcpProbe {
    async fn probe(&self, ip: IpAddr, hostname: &str, quiet: bool) -> ProbeResult {
        for &port in &self.config.ports {
            let addr = SocketAddr::new(ip, port);
            let stats = self.probe_port(addr).await;
            if let Some(result) = stats.into_result() {
                let line = format!(
                    "{hostname}: {addr} reachable ({}/{} connects, avg {:.2}ms)",
                    stats.successes,
                    stats.attempts,
                    result.latency.as_secs_f64() * 1000.0
                );
                if quiet {
                    debug!("{line}");
                } else {
                    info!("{line}");
                }
                return result;
            }
        }

        debug!("{hostname}: {ip} unreachable on ports {:?}", self.config.ports);
        ProbeResult::unreachable()
    }
}
