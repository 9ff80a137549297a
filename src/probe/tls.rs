//! TLS handshake probing.
//!
//! Uses `tokio-rustls` for the handshake, verified against the webpki root
//! store built by [`crate::initialization::init_tls_config`].

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use super::{ProbeResult, ReachabilityProbe, TcpProbe};

/// Runs a [`TcpProbe`], then completes a TLS handshake with the candidate.
///
/// A candidate that is reachable over TCP but fails the handshake (refused
/// connect, invalid server name, certificate rejected, timeout) is reported as
/// unsuccessful; its TCP latency and success rate are kept.
#[derive(Debug, Clone)]
pub struct TlsProbe {
    tcp: TcpProbe,
    tls_config: Arc<rustls::ClientConfig>,
    port: u16,
    handshake_timeout: Duration,
}

impl TlsProbe {
    pub fn new(
        tcp: TcpProbe,
        tls_config: Arc<rustls::ClientConfig>,
        port: u16,
        handshake_timeout: Duration,
    ) -> Self {
        Self {
            tcp,
            tls_config,
            port,
            handshake_timeout,
        }
    }

    /// Connects to `ip` and performs a full handshake with `hostname` as SNI.
    async fn handshake(&self, ip: IpAddr, hostname: &str) -> Result<(), String> {
        let server_name = ServerName::try_from(hostname.to_string())
            .map_err(|e| format!("invalid server name: {e}"))?;

        let addr = SocketAddr::new(ip, self.port);
        let sock = match tokio::time::timeout(self.tcp.config().timeout, TcpStream::connect(addr))
            .await
        {
            Ok(Ok(sock)) => sock,
            Ok(Err(e)) => return Err(format!("failed to connect to {addr}: {e}")),
            Err(_) => {
                return Err(format!(
                    "TCP connection timeout for {addr} ({}ms)",
                    self.tcp.config().timeout.as_millis()
                ))
            }
        };

        let connector = TlsConnector::from(Arc::clone(&self.tls_config));
        match tokio::time::timeout(self.handshake_timeout, connector.connect(server_name, sock)).await {
            Ok(Ok(stream)) => {
                let version = stream
                    .get_ref()
                    .1
                    .protocol_version()
                    .map(|v| format!("{v:?}"))
                    .unwrap_or_else(|| "Unknown".to_string());
                debug!("TLS handshake with {addr} for {hostname} succeeded ({version})");
                Ok(())
            }
            Ok(Err(e)) => Err(format!("TLS handshake failed: {e}")),
            Err(_) => Err(format!(
                "TLS handshake timeout ({}s)",
                self.handshake_timeout.as_secs()
            )),
        }
    }
}

impl ReachabilityProbe for TlsProbe {
    async fn probe(&self, ip: IpAddr, hostname: &str, quiet: bool) -> ProbeResult {
        let mut result = self.tcp.probe(ip, hostname, quiet).await;
        if !result.success {
            return result;
        }

        if let Err(reason) = self.handshake(ip, hostname).await {
            let line = format!("{hostname}: {ip} rejected by TLS probe: {reason}");
            if quiet {
                debug!("{line}");
            } else {
                info!("{line}");
            }
            result.success = false;
        }
        result
    }
}
