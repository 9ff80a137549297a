//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `mkhosts` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Reading domain list files
//! - User-facing output formatting
//!
//! Hosts lines go to stdout; collected errors and logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use mkhosts::initialization::init_logger_with;
use mkhosts::{read_domain_list, BatchResolver, Opt};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let mut domains = opt.domains.clone();
    let files = opt.files.clone();
    let config = opt.into_config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    // Unreadable lists are reported with the other errors; the run goes on
    let mut errors = Vec::new();
    for path in &files {
        match read_domain_list(path).await {
            Ok(list) => domains.extend(list),
            Err(e) => errors.push(format!("{}: {e}", path.display())),
        }
    }

    let quiet = config.quiet;
    let batch = match BatchResolver::new(config) {
        Ok(batch) => batch,
        Err(e) => {
            eprintln!("mkhosts error: {e}");
            process::exit(1);
        }
    };

    let result = match batch.resolve_all(&domains).await {
        Ok(result) => result,
        Err(e) => {
            for line in &errors {
                eprintln!("{line}");
            }
            eprintln!("mkhosts error: {e}");
            process::exit(1);
        }
    };
    errors.extend(result.failures);

    if !quiet && !errors.is_empty() {
        eprintln!("=========Collected Errors===========");
        for line in &errors {
            eprintln!("{line}");
        }
    }

    for record in &result.records {
        println!("{record}");
    }

    Ok(())
}
