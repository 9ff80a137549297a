//! Per-domain resolution.
//!
//! `resolve_domain()` is the unit of work the batch runs once per domain:
//! validate, query the DoH endpoint, enforce DNSSEC if asked to, probe every
//! returned address, and keep the best reachable one.

use std::collections::HashSet;
use std::net::IpAddr;

use futures::future::join_all;
use log::{debug, warn};

use crate::config::Config;
use crate::doh::{DnsQuery, DohResolver, RecordType};
use crate::domain::DomainName;
use crate::error_handling::ResolveError;
use crate::hosts::HostsRecord;
use crate::probe::ReachabilityProbe;
use crate::selector::{select_best, Candidate};

/// Per-query settings shared by every task of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// DoH endpoint URL
    pub endpoint: String,
    /// Require a DNSSEC-verified answer
    pub dnssec: bool,
    /// Accept answers that failed DNSSEC validation
    pub insecure: bool,
    /// Log per-candidate results at debug instead of info
    pub quiet: bool,
}

impl From<&Config> for ResolveOptions {
    fn from(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            dnssec: config.dnssec,
            insecure: config.insecure,
            quiet: config.quiet,
        }
    }
}

/// Resolves one domain to its best reachable address.
///
/// Every distinct IPv4 address among the A answers is probed once; probes run
/// concurrently and keep answer order, so selection ties go to the address the
/// resolver listed first. Nothing after a failing step runs.
///
/// # Errors
///
/// - `InvalidFormat` if `domain` is not a valid name (no request is sent)
/// - `Transport` / `Decode` if the DoH query fails
/// - `DnssecFailed` if DNSSEC is required, `insecure` is off, and the answer
///   is not marked verified
/// - `NoReachableAddress` if no candidate passes the probe
pub async fn resolve_domain<P: ReachabilityProbe>(
    domain: &str,
    options: &ResolveOptions,
    resolver: &DohResolver,
    probe: &P,
) -> Result<HostsRecord, ResolveError> {
    let name: DomainName = domain
        .parse()
        .map_err(|_| ResolveError::InvalidFormat {
            domain: domain.to_string(),
        })?;
    let domain = name.as_str();

    let query = DnsQuery::new(
        domain,
        RecordType::A,
        options.endpoint.as_str(),
        options.dnssec,
        options.insecure,
    );
    let response = resolver
        .resolve(&query)
        .await
        .map_err(|e| ResolveError::from_doh(domain, e))?;

    if options.dnssec && !options.insecure && !response.dnssec_verified {
        return Err(ResolveError::DnssecFailed {
            domain: domain.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let ips: Vec<IpAddr> = response
        .answers_of(query.record_type())
        .filter_map(|answer| match answer.data.parse::<IpAddr>() {
            Ok(ip @ IpAddr::V4(_)) => Some(ip),
            Ok(ip) => {
                warn!("{domain}: skipping non-IPv4 A record data {ip}");
                None
            }
            Err(_) => {
                warn!("{domain}: skipping unparseable A record data {:?}", answer.data);
                None
            }
        })
        .filter(|ip| seen.insert(*ip))
        .collect();
    debug!("{domain}: {} candidate(s) from DoH (status {})", ips.len(), response.status);

    let results = join_all(ips.iter().map(|&ip| probe.probe(ip, domain, options.quiet))).await;

    let reachable: Vec<Candidate> = ips
        .iter()
        .zip(results)
        .filter(|(_, result)| result.success)
        .map(|(&ip, result)| Candidate { ip, result })
        .collect();

    let Some(best) = select_best(&reachable) else {
        return Err(ResolveError::NoReachableAddress {
            domain: domain.to_string(),
            candidates: ips.len(),
        });
    };
    let winner = reachable[best];

    Ok(HostsRecord {
        ip: winner.ip,
        hostname: name.into_inner(),
        probe: winner.result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ErrorKind;
    use crate::probe::ProbeResult;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Answers from a fixed table; unknown addresses are unreachable.
    struct TableProbe(HashMap<IpAddr, ProbeResult>);

    impl ReachabilityProbe for TableProbe {
        async fn probe(&self, ip: IpAddr, _hostname: &str, _quiet: bool) -> ProbeResult {
            self.0
                .get(&ip)
                .copied()
                .unwrap_or_else(ProbeResult::unreachable)
        }
    }

    /// Records every address it is asked about; all are reachable.
    #[derive(Default)]
    struct RecordingProbe(Mutex<Vec<IpAddr>>, AtomicUsize);

    impl ReachabilityProbe for RecordingProbe {
        async fn probe(&self, ip: IpAddr, _hostname: &str, _quiet: bool) -> ProbeResult {
            self.0.lock().unwrap().push(ip);
            let n = self.1.fetch_add(1, Ordering::SeqCst) as u64;
            reachable(1.0, 10 + n)
        }
    }

    fn reachable(success_rate: f64, latency_ms: u64) -> ProbeResult {
        ProbeResult {
            success: true,
            latency: Duration::from_millis(latency_ms),
            success_rate,
        }
    }

    fn doh_body(ad: bool, ips: &[&str]) -> serde_json::Value {
        let answers: Vec<_> = ips
            .iter()
            .map(|ip| serde_json::json!({"name": "example.com", "type": 1, "TTL": 300, "data": ip}))
            .collect();
        serde_json::json!({
            "Status": 0, "TC": false, "RD": true, "RA": true, "AD": ad, "CD": false,
            "Question": [{"name": "example.com", "type": 1}],
            "Answer": answers,
        })
    }

    fn resolver() -> DohResolver {
        DohResolver::new(Arc::new(reqwest::Client::new()), 2, 1)
    }

    fn options(server: &MockServer, dnssec: bool, insecure: bool) -> ResolveOptions {
        ResolveOptions {
            endpoint: format!("{}/dns-query", server.uri()),
            dnssec,
            insecure,
            quiet: true,
        }
    }

    async fn mount_answer(server: &MockServer, ad: bool, ips: &[&str]) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doh_body(ad, ips)))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_invalid_domain_sends_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let probe = TableProbe(HashMap::new());
        let err = resolve_domain(
            "nonexistent-tld-xyz",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[tokio::test]
    async fn test_picks_best_reachable_candidate() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["10.0.0.1", "10.0.0.2", "10.0.0.3"]).await;

        let probe = TableProbe(HashMap::from([
            ("10.0.0.1".parse().unwrap(), reachable(0.5, 100)),
            ("10.0.0.2".parse().unwrap(), reachable(0.5, 50)),
            ("10.0.0.3".parse().unwrap(), ProbeResult::unreachable()),
        ]));
        let record = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap();
        assert_eq!(record.to_string(), "10.0.0.2 example.com");
        assert_eq!(record.probe, reachable(0.5, 50));
    }

    #[tokio::test]
    async fn test_sends_dnssec_flags() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("name", "example.com"))
            .and(query_param("type", "A"))
            .and(query_param("do", "true"))
            .and(query_param("cd", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(doh_body(false, &["10.0.0.1"])))
            .expect(1)
            .mount(&server)
            .await;

        let probe = TableProbe(HashMap::from([(
            "10.0.0.1".parse().unwrap(),
            reachable(1.0, 10),
        )]));
        let record = resolve_domain(
            "example.com",
            &options(&server, true, true),
            &resolver(),
            &probe,
        )
        .await;
        assert!(record.is_ok());
    }

    #[tokio::test]
    async fn test_unverified_answer_fails_when_dnssec_required() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["10.0.0.1"]).await;

        let probe = TableProbe(HashMap::from([(
            "10.0.0.1".parse().unwrap(),
            reachable(1.0, 10),
        )]));
        let err = resolve_domain(
            "example.com",
            &options(&server, true, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DnssecFailed);
        assert_eq!(err.to_string(), "example.com: DNSSEC Verify Failed");
    }

    #[tokio::test]
    async fn test_verified_answer_passes_when_dnssec_required() {
        let server = MockServer::start().await;
        mount_answer(&server, true, &["10.0.0.1"]).await;

        let probe = TableProbe(HashMap::from([(
            "10.0.0.1".parse().unwrap(),
            reachable(1.0, 10),
        )]));
        let record = resolve_domain(
            "example.com",
            &options(&server, true, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap();
        assert_eq!(record.ip, "10.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_no_reachable_candidate() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["10.0.0.1", "not-an-ip", "10.0.0.2"]).await;

        let probe = TableProbe(HashMap::new());
        let err = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NoReachableAddress { candidates: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_answer_is_no_reachable_address() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"Status": 3})))
            .mount(&server)
            .await;

        let probe = TableProbe(HashMap::new());
        let err = resolve_domain(
            "missing.example",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoReachableAddress);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .expect(1)
            .mount(&server)
            .await;

        let probe = TableProbe(HashMap::new());
        let err = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_server_error_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .expect(2)
            .mount(&server)
            .await;

        let probe = TableProbe(HashMap::new());
        let err = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.to_string().starts_with("example.com: "), "{err}");
    }

    #[tokio::test]
    async fn test_duplicate_answers_are_probed_once() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["10.0.0.1", "10.0.0.2", "10.0.0.1"]).await;

        let probe = RecordingProbe::default();
        let record = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap();
        let probed = probe.0.lock().unwrap().clone();
        assert_eq!(
            probed,
            vec![
                "10.0.0.1".parse::<IpAddr>().unwrap(),
                "10.0.0.2".parse::<IpAddr>().unwrap()
            ]
        );
        assert_eq!(record.ip, "10.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_ipv6_data_in_a_answer_is_ignored() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["2001:db8::1", "10.0.0.1"]).await;

        let probe = RecordingProbe::default();
        let record = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap();
        assert_eq!(
            *probe.0.lock().unwrap(),
            vec!["10.0.0.1".parse::<IpAddr>().unwrap()]
        );
        assert_eq!(record.to_string(), "10.0.0.1 example.com");
    }

    #[tokio::test]
    async fn test_only_ipv6_answers_is_no_reachable_address() {
        let server = MockServer::start().await;
        mount_answer(&server, false, &["2001:db8::1"]).await;

        let probe = RecordingProbe::default();
        let err = resolve_domain(
            "example.com",
            &options(&server, false, false),
            &resolver(),
            &probe,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::NoReachableAddress { candidates: 0, .. }
        ));
        assert!(probe.0.lock().unwrap().is_empty());
    }
}
