//! mkhosts library: resolve domains to their fastest reachable address
//!
//! Each domain is resolved over DNS-over-HTTPS (optionally requiring DNSSEC),
//! every returned address is probed for reachability and latency, and the best
//! candidate is returned as a hosts-file record. Many domains are resolved
//! concurrently under a fixed cap; one domain failing never affects another.
//!
//! # Example
//!
//! ```no_run
//! use mkhosts::{BatchResolver, Config, ProbeKind};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     strategy: ProbeKind::Tls,
//!     dnssec: true,
//!     ..Default::default()
//! };
//!
//! let result = BatchResolver::new(config)?
//!     .resolve_all(["www.pixiv.net", "www.github.com"])
//!     .await?;
//! for record in &result.records {
//!     println!("{record}");
//! }
//! for failure in &result.failures {
//!     eprintln!("{failure}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

mod app;
mod batch;
pub mod config;
pub mod doh;
mod domain;
mod error_handling;
mod hosts;
pub mod initialization;
pub mod probe;
mod resolve;
mod selector;

// Re-export public API
pub use app::read_domain_list;
pub use batch::{BatchResolver, BatchResult};
pub use config::{Config, LogFormat, LogLevel, Opt};
pub use domain::{find_domain, is_valid_domain, DomainName, InvalidDomain};
pub use error_handling::{
    ConfigError, DohError, ErrorKind, FailureStats, InitializationError, ResolveError,
};
pub use hosts::HostsRecord;
pub use probe::{ProbeConfig, ProbeKind, ProbeResult, ProbeStrategy, ReachabilityProbe};
pub use resolve::{resolve_domain, ResolveOptions};
pub use selector::{select_best, Candidate};
