//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP client for DoH queries (timeout and User-Agent)
//! - TLS client configuration for the handshake probe
//! - Concurrency semaphore
//! - Logger
//!
//! All initialization functions return proper error types for error handling.

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::ring::default_provider;
use rustls::{ClientConfig, RootCertStore};
use tokio::sync::Semaphore;

use crate::error_handling::InitializationError;

// Re-export public API
pub use client::init_client;
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// Creates a new semaphore with the specified permit count. This semaphore is used
/// to limit the number of domains resolved at the same time.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count))
}

/// Builds the `rustls` client configuration used by the TLS probe.
///
/// Trusts the Mozilla root set from `webpki-roots` and uses the `ring` provider
/// explicitly, so no process-wide default provider has to be installed.
///
/// # Errors
///
/// Returns `InitializationError::TlsConfigError` if the provider rejects the
/// default protocol versions.
pub fn init_tls_config() -> Result<Arc<ClientConfig>, InitializationError> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_semaphore_permits() {
        let semaphore = init_semaphore(3);
        assert_eq!(semaphore.available_permits(), 3);
    }

    #[test]
    fn test_init_tls_config_is_repeatable() {
        // No global provider is installed, so building twice must work
        assert!(init_tls_config().is_ok());
        assert!(init_tls_config().is_ok());
    }
}
