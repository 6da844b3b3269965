//! Fetcher tests against a mock HTTP server

use reqwest::Method;
use std::time::Duration;
use trendlens::config::NetworkConfig;
use trendlens::fetch::{build_http_client, FetchError, FetchOutcome, Fetcher, RetryConfig};
use trendlens::model::SessionArtifacts;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        status_backoff: Duration::from_millis(10),
        transport_backoff: Duration::from_millis(10),
        backoff_multiplier: 1.0,
        max_delay: Duration::from_millis(50),
        jitter: false,
    }
}

fn create_fetcher(max_attempts: u32) -> Fetcher {
    let client = build_http_client(&NetworkConfig::default()).unwrap();
    Fetcher::new(client, fast_retry(max_attempts))
}

#[tokio::test]
async fn test_404_is_empty_success_on_first_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(3);
    let outcome = fetcher
        .fetch(Method::GET, &format!("{}/missing", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Empty { status: 404 });
}

#[tokio::test]
async fn test_301_is_empty_success_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(3);
    let outcome = fetcher
        .fetch(Method::GET, &format!("{}/moved", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Empty { status: 301 });
}

#[tokio::test]
async fn test_500_retries_until_success() {
    let server = MockServer::start().await;

    // First two requests fail, then the transport recovers
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"recovered".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(5);
    let outcome = fetcher
        .fetch(Method::GET, &format!("{}/flaky", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Body(b"recovered".to_vec()));
}

#[tokio::test]
async fn test_429_retries_then_exhausts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/throttled"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3) // initial attempt + 2 retries
        .mount(&server)
        .await;

    let fetcher = create_fetcher(2);
    let result = fetcher
        .fetch(Method::GET, &format!("{}/throttled", server.uri()), None)
        .await;

    match result {
        Err(FetchError::RetriesExhausted { attempts, last_error, .. }) => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("429"));
        }
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }
}

#[tokio::test]
async fn test_session_cookies_and_agent_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/with-session"))
        .and(header("cookie", "NID=abc; AEC=xyz"))
        .and(header("user-agent", "SessionAgent/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let session = SessionArtifacts {
        cookies: vec![
            ("NID".to_string(), "abc".to_string()),
            ("AEC".to_string(), "xyz".to_string()),
        ],
        user_agent: "SessionAgent/2.0".to_string(),
    };

    let fetcher = create_fetcher(0);
    let outcome = fetcher
        .fetch(
            Method::GET,
            &format!("{}/with-session", server.uri()),
            Some(&session),
        )
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Body(b"ok".to_vec()));
}

#[tokio::test]
async fn test_2xx_body_returned_verbatim() {
    let server = MockServer::start().await;
    let body = b")]}'\n{\"widgets\":[]}".to_vec();
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(0);
    let outcome = fetcher
        .fetch(Method::POST, &format!("{}/api", server.uri()), None)
        .await
        .unwrap();

    assert_eq!(outcome.bytes(), body.as_slice());
}
