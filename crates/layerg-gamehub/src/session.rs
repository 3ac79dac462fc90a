//! Session manager
//!
//! Owns the credential store and the login/refresh exchanges. Before each
//! outbound request the pipeline calls [`SessionManager::refresh_if_needed`],
//! which picks one of three steps based on the current instant:
//!
//! - refresh token expired (or none held): full login
//! - access token expired: lightweight refresh with the stored refresh token
//! - otherwise: nothing, no I/O
//!
//! Renewals are serialized by an async mutex. A caller that waited for the
//! lock re-reads the state, so concurrent callers that all saw a stale session
//! share the single renewal performed by whoever got the lock first.
//!
//! [`SessionManager::logout`] bumps a generation counter. A renewal that
//! started before the logout discards its tokens instead of storing them.

use chrono::{DateTime, Utc};
use layerg_transport::{HttpRequest, Transport};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;
use tokio::sync::Mutex;

use crate::classify::{classify_decode_error, classify_response, classify_transport_error};
use crate::config::ClientSettings;
use crate::credentials::{CredentialStore, SessionState};
use crate::error::{DomainError, ErrorKind};
use crate::types::AuthResponse;
use crate::types::auth::{LoginRequest, RefreshRequest};

pub(crate) const LOGIN_PATH: &str = "/auth/login";
pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Renewal {
    Login,
    Refresh,
    None,
}

fn renewal_for(state: SessionState) -> Renewal {
    match state {
        SessionState::Unauthenticated => Renewal::Login,
        SessionState::Stale => Renewal::Refresh,
        SessionState::Fresh => Renewal::None,
    }
}

fn logged_out() -> DomainError {
    DomainError::new(ErrorKind::Auth, "Session was logged out during renewal")
}

/// Authentication and renewal for one client.
pub struct SessionManager {
    settings: Arc<ClientSettings>,
    transport: Arc<dyn Transport>,
    store: RwLock<CredentialStore>,
    renewal: Mutex<()>,
    generation: AtomicU64,
}

impl SessionManager {
    /// Create a manager with an empty credential store.
    pub fn new(settings: Arc<ClientSettings>, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
            store: RwLock::new(CredentialStore::new()),
            renewal: Mutex::new(()),
            generation: AtomicU64::new(0),
        }
    }

    /// Log in with the configured key pair.
    ///
    /// On success the returned tokens are stored. On failure the store is
    /// cleared and the error is re-tagged as [`crate::ErrorKind::Auth`].
    /// Never retried internally.
    pub async fn authenticate(&self) -> Result<AuthResponse, DomainError> {
        let generation = self.generation();
        let _guard = self.renewal.lock().await;
        self.login(generation).await
    }

    /// Renew credentials if the current instant requires it.
    ///
    /// Calling this on an unauthenticated session performs a full login.
    pub async fn refresh_if_needed(&self) -> Result<(), DomainError> {
        self.renew_since(self.generation()).await
    }

    /// Logout counter, observed before a renewal starts.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// [`Self::refresh_if_needed`] for a caller that observed `generation`.
    ///
    /// Fails with an Auth error if the session was logged out since.
    pub(crate) async fn renew_since(&self, generation: u64) -> Result<(), DomainError> {
        if renewal_for(self.state()) == Renewal::None {
            return Ok(());
        }

        let _guard = self.renewal.lock().await;

        if self.generation() != generation {
            return Err(logged_out());
        }

        // Another caller may have renewed while we waited for the lock.
        match renewal_for(self.state_at(Utc::now())) {
            Renewal::None => {
                tracing::debug!("Session already renewed by a concurrent caller");
                Ok(())
            }
            Renewal::Login => {
                tracing::debug!("Refresh token unusable, logging in again");
                self.login(generation).await.map(|_| ())
            }
            Renewal::Refresh => self.refresh(generation).await,
        }
    }

    /// Whether a usable refresh token is held.
    pub fn is_authenticated(&self) -> bool {
        self.read_store().is_authenticated()
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    /// Session state at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        self.read_store().state_at(now)
    }

    /// `Authorization` header value for the current access token.
    pub fn auth_header(&self) -> String {
        self.read_store().auth_header()
    }

    /// Drop all stored credentials.
    ///
    /// A login or refresh still in flight will not store its tokens.
    pub fn logout(&self) {
        let mut store = self.write_store();
        self.generation.fetch_add(1, Ordering::SeqCst);
        store.set_credentials(None);
        drop(store);
        tracing::info!("Session cleared");
    }

    async fn login(&self, generation: u64) -> Result<AuthResponse, DomainError> {
        let body = LoginRequest {
            api_key: self.settings.api_key().expose_secret(),
            api_key_id: self.settings.api_key_id().expose_secret(),
        };

        match self.exchange(LOGIN_PATH, &body).await {
            Ok(auth) => {
                self.store_if_current(generation, &auth)
                    .map_err(|err| err.into_auth("Login failed"))?;
                tracing::info!(
                    access_token_expire = auth.access_token_expire,
                    refresh_token_expire = auth.refresh_token_expire,
                    "Authenticated"
                );
                Ok(auth)
            }
            Err(err) => {
                self.write_store().set_credentials(None);
                let err = err.into_auth("Login failed");
                tracing::error!(status = err.status(), error = %err.message(), "Login failed");
                Err(err)
            }
        }
    }

    async fn refresh(&self, generation: u64) -> Result<(), DomainError> {
        let stored = self.read_store().refresh_token();
        let Some(refresh_token) = stored else {
            return self.login(generation).await.map(|_| ());
        };
        let body = RefreshRequest {
            refresh_token: refresh_token.expose_secret(),
        };

        match self.exchange(REFRESH_PATH, &body).await {
            Ok(auth) => {
                self.store_if_current(generation, &auth)
                    .map_err(|err| err.into_auth("Token refresh failed"))?;
                tracing::debug!(
                    access_token_expire = auth.access_token_expire,
                    "Access token refreshed"
                );
                Ok(())
            }
            Err(err) => {
                self.write_store().set_credentials(None);
                let err = err.into_auth("Token refresh failed");
                tracing::error!(status = err.status(), error = %err.message(), "Token refresh failed");
                Err(err)
            }
        }
    }

    /// Store `auth` unless the session was logged out since `generation`.
    fn store_if_current(&self, generation: u64, auth: &AuthResponse) -> Result<(), DomainError> {
        let mut store = self.write_store();
        if self.generation() != generation {
            tracing::info!("Session logged out during renewal, discarding tokens");
            return Err(logged_out());
        }
        store.set_credentials(Some(auth));
        Ok(())
    }

    /// One unauthenticated POST to an auth endpoint.
    async fn exchange<B: Serialize>(&self, path: &str, body: &B) -> Result<AuthResponse, DomainError> {
        let request = HttpRequest::new("POST", self.settings.endpoint(path))
            .with_timeout(self.settings.timeout())
            .with_json_body(body)
            .map_err(|e| classify_transport_error(&e))?;

        let start = Instant::now();
        let response = self
            .transport
            .send_http(request)
            .await
            .map_err(|e| classify_transport_error(&e))?;

        tracing::debug!(
            path,
            status = response.status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Auth exchange completed"
        );

        if !response.is_success() {
            return Err(classify_response(&response));
        }

        serde_json::from_slice(&response.body)
            .map_err(|e| classify_decode_error(response.status, &e))
    }

    fn read_store(&self) -> std::sync::RwLockReadGuard<'_, CredentialStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_store(&self) -> std::sync::RwLockWriteGuard<'_, CredentialStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("base_url", &self.settings.base_url())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
