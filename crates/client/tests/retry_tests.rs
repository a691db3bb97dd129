//! Retry and token-refresh behavior tests.
//!
//! Invariants covered:
//! - 429 triggers retry with exponential backoff and eventually succeeds
//! - exhausting the transient budget yields MaxRetriesExceeded carrying the
//!   last underlying failure, never a partial success
//! - a 401 from a data endpoint triggers exactly one forced token refresh,
//!   outside the transient budget; a second 401 is surfaced as fatal
//! - other 4xx responses fail immediately without retry

mod common;

use common::*;
use verkada_client::{ClientError, TimeWindow};

fn window() -> TimeWindow {
    TimeWindow::new(1706900000, 1706901000).unwrap()
}

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_token_endpoint(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "message": "Rate limited"
        })))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "audit_logs": [{"event_type": "view_stream", "timestamp": 1706900100}]
        })))
        .with_priority(5)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server, &dir, 3);

    let start = std::time::Instant::now();
    let events = client.list_audit_logs(window()).await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_type, "view_stream");

    // Exponential backoff slept roughly 1s + 2s before the third attempt.
    // Timing assertions are kept generous to avoid flakiness.
    assert!(elapsed >= std::time::Duration::from_secs(2));
}

#[tokio::test]
async fn test_retry_budget_exhaustion_carries_last_error() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_token_endpoint(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
            "message": "Rate limited"
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server, &dir, 2);
    let err = client.list_audit_logs(window()).await.unwrap_err();

    // 2 retries + 1 initial attempt = 3 total.
    match err {
        ClientError::MaxRetriesExceeded(3, inner) => {
            assert!(matches!(*inner, ClientError::ApiError { status: 429, .. }));
        }
        other => panic!("expected MaxRetriesExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_failure_exhausts_budget() {
    // Nothing is listening on this port; every attempt fails at connect time.
    let dir = tempfile::tempdir().unwrap();
    let mut client = verkada_client::VerkadaClient::builder()
        .base_url("http://127.0.0.1:1".to_string())
        .api_key(secrecy::SecretString::new("test-api-key".to_string().into()))
        .max_retries(1)
        .timeout(std::time::Duration::from_secs(2))
        .credential_path(dir.path().join("credential.json"))
        .build()
        .unwrap();

    let err = client.list_audit_logs(window()).await.unwrap_err();
    match err {
        ClientError::MaxRetriesExceeded(2, inner) => {
            assert!(matches!(*inner, ClientError::HttpError(_)));
        }
        other => panic!("expected MaxRetriesExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn test_401_triggers_single_refresh_then_success() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // The token endpoint serves a stale token first, then a good one.
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "stale-token"
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "fresh-token"
        })))
        .with_priority(5)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .and(header("x-verkada-auth", "stale-token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "id": "0e2d",
            "message": "Token expired",
            "data": null
        })))
        .with_priority(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .and(header("x-verkada-auth", "fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "audit_logs": [{"event_type": "archive_footage"}]
        })))
        .with_priority(5)
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server, &dir, 3);
    let events = client.list_audit_logs(window()).await.unwrap();

    assert_eq!(events.len(), 1);
    // The expect() counts verify: token endpoint hit exactly twice (initial
    // acquisition + one forced refresh), data endpoint hit exactly twice.
}

#[tokio::test]
async fn test_second_consecutive_401_is_fatal() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token": "rejected-token"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "message": "Token expired"
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server, &dir, 3);
    let err = client.list_audit_logs(window()).await.unwrap_err();

    // Exactly one refresh happened (token endpoint expect(2)); the second
    // rejection propagates instead of looping.
    assert!(matches!(err, ClientError::TokenExpired { .. }));
}

#[tokio::test]
async fn test_non_retryable_status_fails_immediately() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    mount_token_endpoint(&mock_server, "tok").await;

    Mock::given(method("GET"))
        .and(path("/core/v1/audit_log"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "start_time must be before end_time"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server, &dir, 3);
    let err = client.list_audit_logs(window()).await.unwrap_err();

    match err {
        ClientError::ApiError { status, message, .. } => {
            assert_eq!(status, 400);
            assert!(message.contains("start_time"));
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}
