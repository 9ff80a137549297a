//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (endpoint, retry budget, probe timings, etc.)
//! - The library `Config` struct
//! - CLI option parsing

mod constants;
mod opt;
mod types;

// Re-export all constants
pub use constants::*;
pub use opt::Opt;
pub use types::{Config, LogFormat, LogLevel};
