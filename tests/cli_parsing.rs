//! Tests for command-line parsing and conversion into the library Config.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use mkhosts::config::DEFAULT_DOH_ENDPOINT;
use mkhosts::{BatchResolver, Opt, ProbeKind};

#[test]
fn test_positional_domains_and_files() {
    let opt = Opt::try_parse_from([
        "mkhosts",
        "www.pixiv.net",
        "www.github.com",
        "--file",
        "lists/pixiv.txt",
    ])
    .unwrap();
    assert_eq!(opt.domains, vec!["www.pixiv.net", "www.github.com"]);
    assert_eq!(opt.files, vec![PathBuf::from("lists/pixiv.txt")]);
}

#[test]
fn test_no_arguments_parses() {
    // Whether anything is left to resolve is decided after the lists are read
    let opt = Opt::try_parse_from(["mkhosts"]).unwrap();
    assert!(opt.domains.is_empty());
    assert!(opt.files.is_empty());
}

#[test]
fn test_strategy_names_and_aliases() {
    for (name, kind) in [
        ("tcp", ProbeKind::Tcp),
        ("tcping", ProbeKind::Tcp),
        ("ssl", ProbeKind::Tls),
        ("tls", ProbeKind::Tls),
    ] {
        let opt = Opt::try_parse_from(["mkhosts", "example.com", "--strategy", name]).unwrap();
        assert_eq!(opt.strategy, kind, "strategy {name}");
    }
    assert!(Opt::try_parse_from(["mkhosts", "example.com", "--strategy", "icmp"]).is_err());
}

#[test]
fn test_into_config_carries_flags() {
    let opt = Opt::try_parse_from([
        "mkhosts",
        "example.com",
        "-s",
        "-i",
        "-q",
        "--strategy",
        "ssl",
        "--max-concurrency",
        "4",
        "--retry-attempts",
        "2",
        "--probe-timeout-ms",
        "750",
        "--probe-count",
        "3",
    ])
    .unwrap();
    let config = opt.into_config();

    assert!(config.dnssec);
    assert!(config.insecure);
    assert!(config.quiet);
    assert_eq!(config.endpoint, DEFAULT_DOH_ENDPOINT);
    assert_eq!(config.strategy, ProbeKind::Tls);
    assert_eq!(config.max_concurrency, 4);
    assert_eq!(config.retry_attempts, 2);
    assert_eq!(config.probe.timeout, Duration::from_millis(750));
    assert_eq!(config.probe.count, 3);
    assert!(config.validate().is_ok());
}

#[test]
fn test_bad_endpoint_is_rejected_before_running() {
    let opt = Opt::try_parse_from(["mkhosts", "example.com", "-e", "dns.example/query"]).unwrap();
    assert!(BatchResolver::new(opt.into_config()).is_err());
}
