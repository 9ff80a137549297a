//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::Config;
use crate::error_handling::InitializationError;

/// Initializes the HTTP client used for DoH queries.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the configuration (`mkhosts` by default)
/// - Per-request timeout from the configuration
/// - Rustls TLS backend (no native TLS)
///
/// Certificate verification of the DoH endpoint is always on; the `insecure`
/// flag only affects the DNSSEC `cd` parameter.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, InitializationError> {
    let client = ClientBuilder::new()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .pool_max_idle_per_host(config.max_concurrency)
        .build()?;
    Ok(Arc::new(client))
}
