//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use layerg_gamehub::{Client, Transport};
use layerg_transport::{HttpRequest, HttpResponse, Result as TransportResult, TransportError};
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Base URL every mock-backed client is built with.
pub const BASE_URL: &str = "http://gamehub.test/api";

/// Load a response fixture
pub fn load_response_fixture(name: &str) -> Value {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    });
    serde_json::from_str(&text).unwrap_or_else(|e| panic!("Fixture '{name}' is not JSON: {e}"))
}

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("layerg_gamehub=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Token response body expiring relative to now.
pub fn token_body(access_token: &str, access_in_ms: i64, refresh_in_ms: i64) -> Value {
    let now = chrono::Utc::now().timestamp_millis();
    json!({
        "accessToken": access_token,
        "refreshToken": format!("refresh-{access_token}"),
        "accessTokenExpire": now + access_in_ms,
        "refreshTokenExpire": now + refresh_in_ms,
    })
}

/// A transport that answers from per-route queues and records every request.
///
/// Routes are keyed by method and path relative to [`BASE_URL`]. A route
/// whose queue is empty answers with a `Connection` error so unexpected
/// calls fail loudly.
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, VecDeque<TransportResult<HttpResponse>>>>>,
    sent: Arc<Mutex<Vec<HttpRequest>>>,
    delay: Option<Duration>,
}

impl MockTransport {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every answer, to hold requests in flight.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a JSON response for `method path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) -> &Self {
        self.push(method, path, Ok(HttpResponse::json_body(status, &body)))
    }

    /// Queue a transport failure for `method path`.
    pub fn fail(&self, method: &str, path: &str, error: TransportError) -> &Self {
        self.push(method, path, Err(error))
    }

    /// Queue a successful login.
    pub fn login_ok(&self, access_token: &str, access_in_ms: i64, refresh_in_ms: i64) -> &Self {
        self.respond(
            "POST",
            "/auth/login",
            200,
            token_body(access_token, access_in_ms, refresh_in_ms),
        )
    }

    /// Queue a successful refresh.
    pub fn refresh_ok(&self, access_token: &str, access_in_ms: i64, refresh_in_ms: i64) -> &Self {
        self.respond(
            "POST",
            "/auth/refresh",
            200,
            token_body(access_token, access_in_ms, refresh_in_ms),
        )
    }

    fn push(&self, method: &str, path: &str, answer: TransportResult<HttpResponse>) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(route(method, path))
            .or_default()
            .push_back(answer);
        self
    }

    /// Every request sent so far.
    pub fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of requests sent to `method path`.
    pub fn count(&self, method: &str, path: &str) -> usize {
        let key = route(method, path);
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|req| route(&req.method, relative(&req.url)) == key)
            .count()
    }

    /// Requests sent to anything other than the auth endpoints.
    pub fn resource_requests(&self) -> Vec<HttpRequest> {
        self.sent()
            .into_iter()
            .filter(|req| !relative(&req.url).starts_with("/auth/"))
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send_http(&self, request: HttpRequest) -> TransportResult<HttpResponse> {
        let key = route(&request.method, relative(&request.url));
        self.sent.lock().unwrap().push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let answer = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        answer.unwrap_or_else(|| Err(TransportError::Connection(format!("no answer queued for {key}"))))
    }
}

fn route(method: &str, path: &str) -> String {
    format!("{} {}", method.to_uppercase(), path)
}

fn relative(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap_or(url)
}

/// Build a client over `transport` with `retry` attempts.
pub fn client_with(transport: &MockTransport, retry: u32) -> Client {
    Client::builder()
        .api_key("test-api-key")
        .api_key_id("test-api-key-id")
        .base_url(BASE_URL)
        .retry(retry)
        .transport(Arc::new(transport.clone()))
        .build()
        .expect("Failed to build client")
}
