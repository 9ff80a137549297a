//! DoH HTTP round-trip with bounded retry.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use reqwest::header::ACCEPT;
use tokio_retry::RetryIf;

use crate::config::DOH_JSON_CONTENT_TYPE;
use crate::doh::{DnsQuery, DnsResponse};
use crate::error_handling::{get_retry_strategy, DohError};

/// Sends DNS-over-HTTPS queries with a fixed retry budget.
///
/// Cheap to clone; the underlying `reqwest::Client` is shared. The client is
/// expected to carry the request timeout and the `mkhosts` User-Agent (see
/// [`crate::initialization::init_client`]).
#[derive(Debug, Clone)]
pub struct DohResolver {
    client: Arc<reqwest::Client>,
    attempts: usize,
    base_delay_ms: u64,
}

impl DohResolver {
    /// Creates a resolver.
    ///
    /// * `attempts` - Total attempts per query, initial attempt included
    /// * `base_delay_ms` - Base of the exponential backoff between attempts
    pub fn new(client: Arc<reqwest::Client>, attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            client,
            attempts,
            base_delay_ms,
        }
    }

    /// Runs `query` and decodes the JSON answer.
    ///
    /// Transport failures (connect, read, timeout, 5xx, 429) are retried until
    /// the attempt budget is spent; the error of the last attempt is returned.
    /// A response that arrives intact is never retried, whatever its DNS status.
    ///
    /// # Errors
    ///
    /// - `DohError::Transport` / `DohError::Status` once retries are exhausted,
    ///   or immediately for non-retriable HTTP statuses
    /// - `DohError::Decode` if the body is not a valid DoH JSON document
    pub async fn resolve(&self, query: &DnsQuery) -> Result<DnsResponse, DohError> {
        let attempt_count = AtomicUsize::new(0);
        debug!(
            "Querying {} {} (do={}, cd={})",
            query.name(),
            query.record_type(),
            query.dnssec(),
            query.insecure()
        );

        let body = RetryIf::spawn(
            get_retry_strategy(self.attempts, self.base_delay_ms),
            || {
                let attempt = attempt_count.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    let result = self.fetch(query).await;
                    if let Err(ref e) = result {
                        debug!(
                            "DoH attempt {}/{} for {} failed: {e}",
                            attempt,
                            self.attempts,
                            query.name()
                        );
                    }
                    result
                }
            },
            DohError::is_retriable,
        )
        .await
        .inspect_err(|e| {
            warn!(
                "DoH query for {} failed after {} attempt(s): {e}",
                query.name(),
                attempt_count.load(Ordering::SeqCst)
            );
        })?;

        serde_json::from_slice(&body).map_err(DohError::Decode)
    }

    async fn fetch(&self, query: &DnsQuery) -> Result<Vec<u8>, DohError> {
        let response = self
            .client
            .get(query.endpoint())
            .query(&query.params())
            .header(ACCEPT, DOH_JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(DohError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(DohError::Status(status));
        }

        let body = response.bytes().await.map_err(DohError::Transport)?;
        Ok(body.to_vec())
    }
}
