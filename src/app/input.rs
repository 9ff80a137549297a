//! Domain-list input.

use std::path::Path;

use log::debug;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::domain::find_domain;

/// Reads a domain list file.
///
/// One entry per line. Blank lines and lines starting with `#` are skipped;
/// from every other line the first domain-looking token is taken, so hosts-file
/// style lines (`0.0.0.0 example.com`) and URLs work as input. Lines without
/// such a token are skipped.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be opened or read.
pub async fn read_domain_list(path: &Path) -> std::io::Result<Vec<String>> {
    let file = tokio::fs::File::open(path).await?;
    let mut lines = BufReader::new(file).lines();

    let mut domains = Vec::new();
    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match find_domain(trimmed) {
            Some(domain) => domains.push(domain.to_string()),
            None => debug!("No domain found in line {trimmed:?} of {}", path.display()),
        }
    }

    debug!("Read {} domain(s) from {}", domains.len(), path.display());
    Ok(domains)
}
