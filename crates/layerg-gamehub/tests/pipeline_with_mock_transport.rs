//! Session and pipeline behaviour against a scripted transport
//!
//! Each test queues exact answers per route and then asserts on the number
//! and shape of the requests the client actually sent.

mod common;

use assert_matches::assert_matches;
use common::{MockTransport, client_with};
use layerg_gamehub::{
    DomainError, Error, ErrorKind, GetByTokenIdInput, OperationResult, SessionState,
    TransportError,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_not_authenticated_until_login() {
    let transport = MockTransport::new();
    transport.login_ok("t1", 60_000, 600_000);
    let client = client_with(&transport, 1);

    assert!(!client.is_authenticated());
    assert_eq!(client.session_state(), SessionState::Unauthenticated);

    client.authenticate().await.unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.session_state(), SessionState::Fresh);
}

#[tokio::test]
async fn test_operation_before_login_makes_no_calls() {
    let transport = MockTransport::new();
    let client = client_with(&transport, 3);

    let result = client.collections().get_by_id("c1").await;
    let err = result.unwrap_err();
    assert_matches!(err, Error::NotAuthenticated);
    assert_eq!(err.kind(), Some(ErrorKind::Auth));
    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn test_fresh_session_uses_access_token_without_refresh() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 1_000_000, 100_000_000)
        .respond("GET", "/collection/c1", 200, json!({"id": "c1", "name": "x"}));
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    assert!(result.is_success());

    assert_eq!(transport.count("POST", "/auth/refresh"), 0);
    let resource = transport.resource_requests();
    assert_eq!(resource.len(), 1);
    assert_eq!(resource[0].get_header("Authorization"), Some("Bearer t1"));
}

#[tokio::test]
async fn test_success_body_is_returned_unchanged() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 60_000, 600_000)
        .respond("GET", "/custom/a1", 200, json!({"id": "a1", "name": "x"}));
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();

    let result: OperationResult<Value> = client
        .request::<_, ()>(http::Method::GET, "/custom/a1", None)
        .await
        .unwrap();
    assert_eq!(result, OperationResult::Success(json!({"id": "a1", "name": "x"})));
}

#[tokio::test]
async fn test_stale_access_token_triggers_refresh_not_login() -> anyhow::Result<()> {
    common::init_tracing();
    let transport = MockTransport::new();
    transport
        .login_ok("t1", -1, 600_000)
        .refresh_ok("t2", 60_000, 600_000)
        .respond("GET", "/collection/c1", 200, json!({"id": "c1"}));
    let client = client_with(&transport, 1);
    client.authenticate().await?;
    assert_eq!(client.session_state(), SessionState::Stale);

    let collection = client.collections().get_by_id("c1").await?.into_result()?;
    assert_eq!(collection.id, "c1");

    assert_eq!(transport.count("POST", "/auth/login"), 1);
    assert_eq!(transport.count("POST", "/auth/refresh"), 1);
    let refresh = &transport.sent()[1];
    let body: Value = serde_json::from_slice(refresh.body.as_deref().unwrap_or_default())?;
    assert_eq!(body, json!({"refreshToken": "refresh-t1"}));
    assert_eq!(
        transport.resource_requests()[0].get_header("Authorization"),
        Some("Bearer t2")
    );
    Ok(())
}

#[tokio::test]
async fn test_expired_refresh_token_runs_full_login() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", -10, -1)
        .login_ok("t2", 60_000, 600_000);
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();
    assert!(!client.is_authenticated());

    client.refresh_if_needed().await.unwrap();

    assert_eq!(transport.count("POST", "/auth/login"), 2);
    assert_eq!(transport.count("POST", "/auth/refresh"), 0);
    assert_eq!(client.session_state(), SessionState::Fresh);
}

#[tokio::test]
async fn test_failed_refresh_surfaces_auth_failure_without_resource_call() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", -1, 600_000)
        .respond("POST", "/auth/refresh", 401, json!({"message": "Invalid refresh token"}));
    let client = client_with(&transport, 3);
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(err.status(), Some(401));
    assert!(transport.resource_requests().is_empty());
    assert!(!client.is_authenticated());

    // Credentials were cleared, so the guard now rejects outright.
    assert_matches!(
        client.collections().get_by_id("c1").await,
        Err(Error::NotAuthenticated)
    );
}

#[tokio::test]
async fn test_failed_login_reports_auth_and_clears_session() {
    let transport = MockTransport::new();
    transport.respond("POST", "/auth/login", 403, json!({"message": "Invalid API key"}));
    let client = client_with(&transport, 3);

    let err = client.authenticate().await.unwrap_err();
    let domain = err.as_domain().unwrap();
    assert_eq!(domain.kind(), ErrorKind::Auth);
    assert_eq!(domain.status(), Some(403));
    assert_eq!(domain.message(), "Login failed: Invalid API key");
    assert_eq!(transport.count("POST", "/auth/login"), 1);
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_retryable_failure_uses_exactly_n_attempts() {
    let transport = MockTransport::new();
    transport.login_ok("t1", 60_000, 600_000);
    for _ in 0..4 {
        transport.respond("GET", "/collection/c1", 502, json!({}));
    }
    let client = client_with(&transport, 4);
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.status(), Some(502));
    assert_eq!(transport.count("GET", "/collection/c1"), 4);
}

#[tokio::test]
async fn test_network_failures_are_retried() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 60_000, 600_000)
        .fail("GET", "/collection/c1", TransportError::Connection("connection reset".into()))
        .fail("GET", "/collection/c1", TransportError::Timeout)
        .respond("GET", "/collection/c1", 200, json!({"id": "c1"}));
    let client = client_with(&transport, 3);
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    assert_eq!(result.data().map(|c| c.id.as_str()), Some("c1"));
    assert_eq!(transport.count("GET", "/collection/c1"), 3);
}

#[tokio::test]
async fn test_not_found_is_attempted_once() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 60_000, 600_000)
        .respond("GET", "/assets/c1/9", 404, json!({"message": "Asset not found"}));
    let client = client_with(&transport, 5);
    client.authenticate().await.unwrap();

    let result = client
        .assets()
        .get_by_token_id(&GetByTokenIdInput::new("c1", "9"))
        .await
        .unwrap();
    let err = result.error().unwrap();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "Asset not found");
    assert_eq!(transport.count("GET", "/assets/c1/9"), 1);
}

#[tokio::test]
async fn test_rate_limit_is_not_retried() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 60_000, 600_000)
        .respond("GET", "/collection/c1", 429, json!({"message": "Too many requests"}));
    let client = client_with(&transport, 3);
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    assert_eq!(result.error().map(DomainError::kind), Some(ErrorKind::RateLimit));
    assert_eq!(transport.count("GET", "/collection/c1"), 1);
}

#[tokio::test]
async fn test_two_server_errors_then_success_notifies_observer_twice() {
    let transport = MockTransport::new();
    transport
        .login_ok("t1", 60_000, 600_000)
        .respond("GET", "/collection/c1", 500, json!({}))
        .respond("GET", "/collection/c1", 500, json!({}))
        .respond("GET", "/collection/c1", 200, json!({"id": "c1"}));

    let notified = Arc::new(AtomicU32::new(0));
    let counter = notified.clone();
    let client = layerg_gamehub::Client::builder()
        .api_key("test-api-key")
        .api_key_id("test-api-key-id")
        .base_url(common::BASE_URL)
        .retry(3)
        .transport(Arc::new(transport.clone()))
        .retry_observer(move |_attempt: u32, err: &DomainError| {
            assert_eq!(err.kind(), ErrorKind::Server);
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();
    client.authenticate().await.unwrap();

    let result = client.collections().get_by_id("c1").await.unwrap();
    assert!(result.is_success());
    assert_eq!(transport.count("GET", "/collection/c1"), 3);
    assert_eq!(notified.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_stale_callers_share_one_refresh() {
    let transport = MockTransport::new().with_delay(Duration::from_millis(20));
    transport
        .login_ok("t1", -1, 600_000)
        .refresh_ok("t2", 60_000, 600_000);
    for _ in 0..5 {
        transport.respond("GET", "/collection/c1", 200, json!({"id": "c1"}));
    }
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();

    let calls = (0..5).map(|_| {
        let client = client.clone();
        tokio::spawn(async move { client.collections().get_by_id("c1").await })
    });
    for handle in calls.collect::<Vec<_>>() {
        let result = handle.await.unwrap().unwrap();
        assert!(result.is_success());
    }

    assert_eq!(transport.count("POST", "/auth/refresh"), 1);
    assert!(
        transport
            .resource_requests()
            .iter()
            .all(|req| req.get_header("Authorization") == Some("Bearer t2"))
    );
}

#[tokio::test]
async fn test_logout_blocks_further_operations() {
    let transport = MockTransport::new();
    transport.login_ok("t1", 60_000, 600_000);
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();

    client.logout();
    assert_matches!(
        client.collections().publish("c1").await,
        Err(Error::NotAuthenticated)
    );
    assert_eq!(transport.sent().len(), 1);
}

#[tokio::test]
async fn test_logout_during_refresh_keeps_session_cleared() {
    let transport = MockTransport::new().with_delay(Duration::from_millis(100));
    transport
        .login_ok("t1", -1, 600_000)
        .refresh_ok("t2", 60_000, 600_000)
        .respond("GET", "/collection/c1", 200, json!({"id": "c1"}))
        .login_ok("t3", 60_000, 600_000);
    let client = client_with(&transport, 1);
    client.authenticate().await.unwrap();
    assert_eq!(client.session_state(), SessionState::Stale);

    let pending = {
        let client = client.clone();
        tokio::spawn(async move { client.collections().get_by_id("c1").await })
    };
    tokio::time::sleep(Duration::from_millis(30)).await;
    client.logout();

    let result = pending.await.unwrap().unwrap();
    assert_eq!(result.error().map(DomainError::kind), Some(ErrorKind::Auth));
    assert_eq!(transport.count("POST", "/auth/refresh"), 1);
    assert!(transport.resource_requests().is_empty());
    assert!(!client.is_authenticated());
    assert_eq!(client.session_state(), SessionState::Unauthenticated);

    // A fresh login after logout is stored normally.
    client.authenticate().await.unwrap();
    assert_eq!(client.session_state(), SessionState::Fresh);
}
