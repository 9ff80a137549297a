//! Retry strategy for DoH queries.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

/// Creates the backoff schedule used between DoH attempts.
///
/// `tokio_retry` makes the initial attempt without consulting the strategy, so
/// the iterator yields `attempts - 1` delays: with `attempts = 5` the query is
/// sent at most five times. Delays grow as `base_delay_ms * 2^n`, capped at
/// `RETRY_MAX_DELAY_SECS`.
pub fn get_retry_strategy(attempts: usize, base_delay_ms: u64) -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(2)
        .factor(base_delay_ms)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(attempts.saturating_sub(1))
}
