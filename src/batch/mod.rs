//! Bounded-concurrency batch resolution.
//!
//! `BatchResolver` runs one [`resolve_domain`] task per domain, admitted by a
//! semaphore, and gathers the outcomes into a [`BatchResult`]. A failing or
//! panicking task only affects its own domain.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, info, warn};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, print_error_statistics, shutdown_gracefully};
use crate::config::{Config, LOGGING_INTERVAL_SECS};
use crate::doh::DohResolver;
use crate::error_handling::{ConfigError, ErrorKind, FailureStats, InitializationError};
use crate::hosts::HostsRecord;
use crate::initialization::{init_client, init_semaphore, init_tls_config};
use crate::probe::{ProbeStrategy, ReachabilityProbe};
use crate::resolve::{resolve_domain, ResolveOptions};

/// Outcome of a batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// One record per successfully resolved domain, in completion order
    pub records: Vec<HostsRecord>,
    /// One message per failed domain, in completion order
    pub failures: Vec<String>,
    /// Failure counts per kind
    pub stats: Arc<FailureStats>,
}

/// Resolves many domains concurrently.
///
/// Generic over the probe so that tests can substitute their own; the default
/// [`ProbeStrategy`] is built from `Config::strategy` by [`BatchResolver::new`].
///
/// # Examples
///
/// ```no_run
/// use mkhosts::{BatchResolver, Config};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let batch = BatchResolver::new(Config::default())?;
/// let result = batch.resolve_all(["www.pixiv.net", "www.github.com"]).await?;
/// for record in &result.records {
///     println!("{record}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct BatchResolver<P: ReachabilityProbe = ProbeStrategy> {
    config: Config,
    resolver: DohResolver,
    probe: Arc<P>,
}

impl BatchResolver<ProbeStrategy> {
    /// Creates a resolver using the probe strategy named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the configuration is invalid or the
    /// HTTP client or TLS configuration cannot be built.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        config.validate()?;
        let tls_config = init_tls_config()?;
        let probe = ProbeStrategy::new(config.strategy, &config.probe, tls_config);
        Self::with_probe(config, probe)
    }
}

impl<P: ReachabilityProbe> BatchResolver<P> {
    /// Creates a resolver with an explicit probe.
    ///
    /// `config.strategy` and `config.probe` are ignored.
    ///
    /// # Errors
    ///
    /// Returns an `InitializationError` if the configuration is invalid or the
    /// HTTP client cannot be built.
    pub fn with_probe(config: Config, probe: P) -> Result<Self, InitializationError> {
        config.validate()?;
        let client = init_client(&config)?;
        let resolver = DohResolver::new(client, config.retry_attempts, config.retry_base_delay_ms);
        Ok(Self {
            config,
            resolver,
            probe: Arc::new(probe),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolves every domain and waits for all of them to finish.
    ///
    /// Inputs are trimmed and lowercased, and duplicates are dropped (first
    /// occurrence wins). At most `max_concurrency` domains are in flight.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoDomains` before any network activity if no
    /// domain is left after normalization. Per-domain failures are reported in
    /// [`BatchResult::failures`], never as an error.
    pub async fn resolve_all<I, S>(&self, domains: I) -> Result<BatchResult, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = normalize_domains(domains);
        if domains.is_empty() {
            return Err(ConfigError::NoDomains);
        }
        let total = domains.len();
        info!(
            "Resolving {} domain(s) via {} ({} probe, concurrency {})",
            total, self.config.endpoint, self.config.strategy, self.config.max_concurrency
        );

        let semaphore = init_semaphore(self.config.max_concurrency);
        let options = Arc::new(ResolveOptions::from(&self.config));
        let records = Arc::new(Mutex::new(Vec::with_capacity(total)));
        let failures = Arc::new(Mutex::new(Vec::new()));
        let stats = Arc::new(FailureStats::new());
        let completed = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));
        let start_time = Instant::now();

        let cancel = CancellationToken::new();
        let cancel_logging = cancel.child_token();
        let completed_for_logging = Arc::clone(&completed);
        let failed_for_logging = Arc::clone(&failed);
        let logging_task = tokio::task::spawn(async move {
            let period = Duration::from_secs(LOGGING_INTERVAL_SECS);
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        log_progress(start_time, &completed_for_logging, &failed_for_logging, total);
                    }
                    _ = cancel_logging.cancelled() => {
                        break;
                    }
                }
            }
        });

        let mut tasks = FuturesUnordered::new();

        for domain in domains {
            // The semaphore is local to this call and never closed.
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("batch semaphore should never be closed");

            let options = Arc::clone(&options);
            let resolver = self.resolver.clone();
            let probe = Arc::clone(&self.probe);
            let records = Arc::clone(&records);
            let failures = Arc::clone(&failures);
            let stats = Arc::clone(&stats);
            let completed = Arc::clone(&completed);
            let failed = Arc::clone(&failed);
            let task_domain = domain.clone();

            let handle = tokio::spawn(async move {
                let _permit = permit;

                match resolve_domain(&task_domain, &options, &resolver, probe.as_ref()).await {
                    Ok(record) => {
                        let line = format!(
                            "{record} (success rate {:.0}%, {:.2}ms)",
                            record.probe.success_rate * 100.0,
                            record.probe.latency.as_secs_f64() * 1000.0
                        );
                        if options.quiet {
                            debug!("{line}");
                        } else {
                            info!("{line}");
                        }
                        records.lock().await.push(record);
                    }
                    Err(e) => {
                        debug!("Failed to resolve {task_domain}: {e}");
                        stats.increment(e.kind());
                        failed.fetch_add(1, Ordering::SeqCst);
                        failures.lock().await.push(e.to_string());
                    }
                }
                completed.fetch_add(1, Ordering::SeqCst);
            });
            tasks.push(async move { (domain, handle.await) });
        }

        while let Some((domain, joined)) = tasks.next().await {
            if let Err(join_error) = joined {
                warn!("Task for {domain} panicked: {join_error:?}");
                stats.increment(ErrorKind::TaskPanicked);
                failed.fetch_add(1, Ordering::SeqCst);
                completed.fetch_add(1, Ordering::SeqCst);
                failures
                    .lock()
                    .await
                    .push(format!("{domain}: {}", ErrorKind::TaskPanicked));
            }
        }

        shutdown_gracefully(cancel, Some(logging_task)).await;
        log_progress(start_time, &completed, &failed, total);
        print_error_statistics(&stats);

        let records = std::mem::take(&mut *records.lock().await);
        let failures = std::mem::take(&mut *failures.lock().await);
        Ok(BatchResult {
            records,
            failures,
            stats,
        })
    }
}

/// Trims, lowercases, and deduplicates the input, keeping first occurrences.
fn normalize_domains<I, S>(domains: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    domains
        .into_iter()
        .map(|d| d.as_ref().trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .filter(|d| seen.insert(d.clone()))
        .collect()
}
