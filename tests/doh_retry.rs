//! Integration tests for the DoH resolver retry behaviour
//!
//! The DoH endpoint is a local wiremock server; no test touches the internet.

use mkhosts::doh::{DnsQuery, DohResolver, RecordType};
use mkhosts::initialization::init_client;
use mkhosts::{Config, DohError};
use reqwest::StatusCode;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ANSWER: &str = r#"{"Status":0,"TC":false,"RD":true,"RA":true,"AD":false,"CD":false,
    "Question":[{"name":"example.com","type":1}],
    "Answer":[{"name":"example.com","type":1,"TTL":60,"data":"93.184.216.34"}]}"#;

fn resolver(attempts: usize) -> DohResolver {
    let client = init_client(&Config::default()).expect("client should build");
    DohResolver::new(client, attempts, 1)
}

fn query(endpoint: String) -> DnsQuery {
    DnsQuery::new("example.com", RecordType::A, endpoint, false, false)
}

#[tokio::test]
async fn test_transient_failure_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANSWER))
        .expect(1)
        .mount(&server)
        .await;

    let response = resolver(5)
        .resolve(&query(format!("{}/dns-query", server.uri())))
        .await
        .expect("second attempt should succeed");
    assert_eq!(response.answer.len(), 1);
    assert_eq!(response.answer[0].data, "93.184.216.34");
}

#[tokio::test]
async fn test_retries_exactly_up_to_the_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let err = resolver(3)
        .resolve(&query(format!("{}/dns-query", server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, DohError::Status(s) if s == StatusCode::INTERNAL_SERVER_ERROR));
}

#[tokio::test]
async fn test_rate_limited_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let err = resolver(2)
        .resolve(&query(format!("{}/dns-query", server.uri())))
        .await
        .unwrap_err();
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let err = resolver(5)
        .resolve(&query(format!("{}/dns-query", server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, DohError::Status(s) if s == StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn test_decode_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .expect(1)
        .mount(&server)
        .await;

    let err = resolver(5)
        .resolve(&query(format!("{}/dns-query", server.uri())))
        .await
        .unwrap_err();
    assert!(matches!(err, DohError::Decode(_)));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let err = resolver(2)
        .resolve(&query(format!("http://127.0.0.1:{closed_port}/dns-query")))
        .await
        .unwrap_err();
    assert!(matches!(err, DohError::Transport(_)));
}

#[tokio::test]
async fn test_request_carries_query_parameters_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dns-query"))
        .and(query_param("ct", "application/dns-json"))
        .and(query_param("name", "example.com"))
        .and(query_param("type", "A"))
        .and(query_param("do", "true"))
        .and(query_param("cd", "false"))
        .and(header("accept", "application/dns-json"))
        .and(header("user-agent", "mkhosts"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ANSWER))
        .expect(1)
        .mount(&server)
        .await;

    let query = DnsQuery::new(
        "example.com",
        RecordType::A,
        format!("{}/dns-query", server.uri()),
        true,
        false,
    );
    let response = resolver(1).resolve(&query).await.unwrap();
    assert_eq!(response.status, 0);
    assert!(!response.dnssec_verified);
}
