//! Domain name validation.
//!
//! This module decides whether a string looks like a syntactically valid DNS
//! name before any network call is made for it.
//!
//! Key items:
//! - `is_valid_domain()` - Pure predicate used by the resolution task
//! - `find_domain()` - Extracts the first domain-looking token from a text line
//! - `DomainName` - A string that has passed validation

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// Maximum length of a full domain name (RFC 1035, without the trailing dot),
/// in characters.
const MAX_DOMAIN_LENGTH: usize = 253;
/// Maximum length of a single label, in characters.
const MAX_LABEL_LENGTH: usize = 63;

/// One or more labels each followed by a dot, then a top-level label of at
/// least two characters that starts and ends with a letter. Label and total
/// lengths are checked outside the regex.
const DOMAIN_PATTERN: &str = r"(?:[\p{L}\p{N}](?:[\p{L}\p{N}-]*[\p{L}\p{N}])?\.)+\p{L}[\p{L}\p{N}-]*\p{L}";

static DOMAIN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{DOMAIN_PATTERN}$")).expect("domain pattern is a valid regex")
});

static DOMAIN_SEARCH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(DOMAIN_PATTERN).expect("domain pattern is a valid regex")
});

/// Returns `true` if `s` looks like a syntactically valid domain name.
///
/// Accepts Unicode letters and digits, hyphens inside labels, and dots between
/// labels. Requires at least two labels, with a final label of two or more
/// characters. Rejects empty strings, bare TLDs, whitespace, and anything with a
/// scheme (`https://example.com`), port, or path.
///
/// No I/O is performed.
pub fn is_valid_domain(s: &str) -> bool {
    has_valid_lengths(s) && DOMAIN_REGEX.is_match(s)
}

fn has_valid_lengths(s: &str) -> bool {
    !s.is_empty()
        && s.chars().count() <= MAX_DOMAIN_LENGTH
        && s
            .split('.')
            .all(|label| label.chars().count() <= MAX_LABEL_LENGTH)
}

/// Finds the first domain-looking token in a line of text.
///
/// Used when reading domain lists, whose lines may carry an IP prefix
/// (`0.0.0.0 example.com`), a URL, or trailing comments.
pub fn find_domain(line: &str) -> Option<&str> {
    DOMAIN_SEARCH_REGEX
        .find_iter(line)
        .map(|m| m.as_str())
        .find(|candidate| has_valid_lengths(candidate))
}

/// A domain name that has passed [`is_valid_domain`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

/// The string did not look like a domain name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid domain name format: {0:?}")]
pub struct InvalidDomain(pub String);

impl DomainName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for DomainName {
    type Err = InvalidDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_domain(s) {
            Ok(DomainName(s.to_string()))
        } else {
            Err(InvalidDomain(s.to_string()))
        }
    }
}

impl TryFrom<&str> for DomainName {
    type Error = InvalidDomain;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
