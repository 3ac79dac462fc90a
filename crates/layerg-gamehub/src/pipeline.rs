//! Request pipeline
//!
//! The single path every resource operation takes:
//!
//! 1. Guard: not authenticated aborts with [`Error::NotAuthenticated`]
//! 2. Renew credentials if needed; a renewal failure becomes the result
//! 3. Attempt loop: send, classify failures, consult the retry policy
//!
//! Ordinary request failures come back as [`OperationResult::Failure`]. Only
//! the guard and local payload serialization produce `Err`.

use http::Method;
use layerg_transport::{HttpRequest, HttpResponse, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::classify::{classify_decode_error, classify_response, classify_transport_error};
use crate::config::ClientSettings;
use crate::error::{DomainError, Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use crate::result::OperationResult;
use crate::retry::{RetryDecision, RetryPolicy, SharedObserver};
use crate::session::SessionManager;

/// Composes session freshness, transport, classification and retry.
pub struct RequestPipeline {
    settings: Arc<ClientSettings>,
    session: Arc<SessionManager>,
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    observer: SharedObserver,
}

impl RequestPipeline {
    /// Create a pipeline with a policy derived from the settings.
    pub fn new(
        settings: Arc<ClientSettings>,
        session: Arc<SessionManager>,
        transport: Arc<dyn Transport>,
        observer: SharedObserver,
    ) -> Self {
        let policy = RetryPolicy::new(settings.retry());
        Self {
            settings,
            session,
            transport,
            policy,
            observer,
        }
    }

    /// Retry policy in effect.
    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Session manager shared with the client.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Run one operation to completion.
    ///
    /// `path` is relative to the base URL and must already be percent-encoded.
    /// A 2xx body is decoded into `T`; an empty body decodes as JSON `null`.
    ///
    /// # Errors
    ///
    /// - [`Error::NotAuthenticated`] if no usable session exists; no I/O is done
    /// - [`Error::Serialization`] if `payload` cannot be serialized
    pub async fn execute<T, B>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&B>,
    ) -> Result<OperationResult<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = payload.map(serde_json::to_vec).transpose()?;

        let mut meta = RequestMetadata::new(method.as_str(), path);
        if let Some(body) = &body {
            meta = meta.with_body_size(body.len());
        }

        let generation = self.session.generation();
        if !self.session.is_authenticated() {
            meta.log_rejected("not authenticated");
            return Err(Error::NotAuthenticated);
        }

        let timer = RequestTimer::start();

        if let Err(err) = self.session.renew_since(generation).await {
            ResponseMetadata::new(err.status(), timer.elapsed())
                .with_attempts(0)
                .log_failure(&meta, &err);
            return Ok(OperationResult::Failure(err));
        }

        let url = self.settings.endpoint(path);
        let mut attempt = 1;
        loop {
            meta.log_attempt(attempt);

            let mut request = HttpRequest::new(method.as_str(), url.as_str())
                .with_header("Authorization", self.session.auth_header())
                .with_header("Accept", "application/json")
                .with_timeout(self.settings.timeout());
            if let Some(body) = &body {
                request = request
                    .with_header("Content-Type", "application/json")
                    .with_body(body.clone());
            }

            let error = match self.transport.send_http(request).await {
                Ok(response) if response.is_success() => match decode::<T>(&response) {
                    Ok(data) => {
                        ResponseMetadata::new(Some(response.status), timer.elapsed())
                            .with_attempts(attempt)
                            .log_success(&meta);
                        return Ok(OperationResult::Success(data));
                    }
                    Err(err) => err,
                },
                Ok(response) => classify_response(&response),
                Err(err) => classify_transport_error(&err),
            };

            match self.policy.decide(&error, attempt) {
                RetryDecision::Retry => {
                    self.observer.notify(attempt, &error);
                    attempt += 1;
                }
                RetryDecision::Stop => {
                    ResponseMetadata::new(error.status(), timer.elapsed())
                        .with_attempts(attempt)
                        .log_failure(&meta, &error);
                    return Ok(OperationResult::Failure(error));
                }
            }
        }
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("base_url", &self.settings.base_url())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> std::result::Result<T, DomainError> {
    let body: &[u8] = if response.body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        &response.body
    };
    serde_json::from_slice(body).map_err(|e| classify_decode_error(response.status, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::error::ErrorKind;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use layerg_transport::TransportError;
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Scripted {
        responses: Mutex<Vec<layerg_transport::Result<HttpResponse>>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn new(mut responses: Vec<layerg_transport::Result<HttpResponse>>) -> Arc<Self> {
            responses.reverse();
            Arc::new(Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Scripted {
        async fn send_http(&self, request: HttpRequest) -> layerg_transport::Result<HttpResponse> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(TransportError::Other("script exhausted".into())))
        }
    }

    fn login() -> layerg_transport::Result<HttpResponse> {
        let now = chrono::Utc::now().timestamp_millis();
        Ok(HttpResponse::json_body(
            200,
            &json!({
                "accessToken": "t1",
                "refreshToken": "r1",
                "accessTokenExpire": now + 60_000,
                "refreshTokenExpire": now + 600_000,
            }),
        ))
    }

    fn pipeline(
        retry: u32,
        transport: Arc<Scripted>,
        observer: SharedObserver,
    ) -> RequestPipeline {
        let settings = Arc::new(
            ClientConfig::builder()
                .api_key("key")
                .api_key_id("key-id")
                .base_url("http://gamehub.test/api")
                .retry(retry)
                .build()
                .validate()
                .unwrap(),
        );
        let session = Arc::new(SessionManager::new(settings.clone(), transport.clone()));
        RequestPipeline::new(settings, session, transport, observer)
    }

    #[tokio::test]
    async fn test_guard_rejects_without_io() {
        let transport = Scripted::new(vec![]);
        let pipeline = pipeline(3, transport.clone(), SharedObserver::default());

        let result = pipeline
            .execute::<Value, ()>(Method::GET, "/collection/c1", None)
            .await;
        assert_matches!(result, Err(Error::NotAuthenticated));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_success_sends_bearer_and_body() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::json_body(200, &json!({"id": "a1", "name": "x"}))),
        ]);
        let pipeline = pipeline(1, transport.clone(), SharedObserver::default());
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Value> = pipeline
            .execute(Method::POST, "/assets/create", Some(&json!({"name": "x"})))
            .await
            .unwrap();
        assert_eq!(result.data(), Some(&json!({"id": "a1", "name": "x"})));

        let sent = &transport.requests()[1];
        assert_eq!(sent.method, "POST");
        assert_eq!(sent.url, "http://gamehub.test/api/assets/create");
        assert_eq!(sent.get_header("authorization"), Some("Bearer t1"));
        assert_eq!(sent.body.as_deref(), Some(br#"{"name":"x"}"#.as_slice()));
    }

    #[tokio::test]
    async fn test_retries_server_errors_and_notifies_observer() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::json_body(500, &json!({}))),
            Ok(HttpResponse::json_body(500, &json!({}))),
            Ok(HttpResponse::json_body(200, &json!({"ok": true}))),
        ]);
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let observer = SharedObserver::new(move |attempt: u32, err: &DomainError| {
            assert_eq!(err.kind(), ErrorKind::Server);
            assert_eq!(attempt, seen.fetch_add(1, Ordering::SeqCst) + 1);
        });
        let pipeline = pipeline(3, transport.clone(), observer);
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Value> = pipeline
            .execute::<_, ()>(Method::GET, "/collection/c1", None)
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(transport.requests().len(), 4);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::json_body(404, &json!({"message": "Collection not found"}))),
        ]);
        let pipeline = pipeline(5, transport.clone(), SharedObserver::default());
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Value> = pipeline
            .execute::<_, ()>(Method::GET, "/collection/missing", None)
            .await
            .unwrap();
        let err = result.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Collection not found");
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_last_error() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::json_body(503, &json!({}))),
            Err(TransportError::Timeout),
        ]);
        let pipeline = pipeline(2, transport.clone(), SharedObserver::default());
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Value> = pipeline
            .execute::<_, ()>(Method::GET, "/collection/c1", None)
            .await
            .unwrap();
        assert_eq!(result.error().map(DomainError::kind), Some(ErrorKind::Timeout));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_unknown() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::new(200, Default::default(), b"<html></html>".to_vec())),
        ]);
        let pipeline = pipeline(3, transport.clone(), SharedObserver::default());
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Value> = pipeline
            .execute::<_, ()>(Method::GET, "/collection/c1", None)
            .await
            .unwrap();
        let err = result.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.status(), Some(200));
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_body_decodes_as_null() {
        let transport = Scripted::new(vec![
            login(),
            Ok(HttpResponse::new(200, Default::default(), Vec::new())),
        ]);
        let pipeline = pipeline(1, transport, SharedObserver::default());
        pipeline.session().authenticate().await.unwrap();

        let result: OperationResult<Option<Value>> = pipeline
            .execute::<_, ()>(Method::POST, "/collection/public/c1", None)
            .await
            .unwrap();
        assert_eq!(result.into_result(), Ok(None));
    }
}
