//! Error handling and failure statistics.
//!
//! This module provides:
//! - Error type definitions (per-domain failures, DoH errors, fatal configuration errors)
//! - Failure statistics tracking per error kind
//! - Retry strategy configuration for DoH queries

mod retry;
mod stats;
mod types;

// Re-export public API
pub use retry::get_retry_strategy;
pub use stats::FailureStats;
pub use types::{ConfigError, DohError, ErrorKind, InitializationError, ResolveError};
