//! Credential store
//!
//! Pure state: the current token pair and its expiry instants. No I/O and no
//! clock reads beyond the convenience wrappers around the `*_at` methods,
//! which take the instant explicitly.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::types::AuthResponse;

/// Where a session stands relative to its token expiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No usable refresh token: never logged in, logged out, a renewal
    /// failed, or the refresh token expired.
    Unauthenticated,
    /// Access token still valid.
    Fresh,
    /// Access token expired but the refresh token is still valid.
    Stale,
}

impl SessionState {
    /// Stable lowercase name, used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Fresh => "fresh",
            SessionState::Stale => "stale",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored token pair.
#[derive(Clone)]
pub(crate) struct Credentials {
    access_token: SecretString,
    refresh_token: SecretString,
    access_expiry: DateTime<Utc>,
    refresh_expiry: DateTime<Utc>,
}

impl Credentials {
    fn from_response(response: &AuthResponse) -> Self {
        let refresh_expiry = instant_from_millis(response.refresh_token_expire);
        // Access expiry never outlives the refresh expiry.
        let access_expiry = instant_from_millis(response.access_token_expire).min(refresh_expiry);

        Self {
            access_token: SecretString::new(response.access_token.as_str().into()),
            refresh_token: SecretString::new(response.refresh_token.as_str().into()),
            access_expiry,
            refresh_expiry,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("access_expiry", &self.access_expiry)
            .field("refresh_expiry", &self.refresh_expiry)
            .finish()
    }
}

/// Holder of the current credentials, if any.
///
/// All mutation goes through [`CredentialStore::set_credentials`].
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    current: Option<Credentials>,
}

impl CredentialStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored credentials.
    ///
    /// `Some` stores the token pair from a login or refresh response; `None`
    /// clears everything.
    pub fn set_credentials(&mut self, response: Option<&AuthResponse>) {
        self.current = response.map(Credentials::from_response);
    }

    /// Whether a usable refresh token is held right now.
    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Whether a usable refresh token is held at `now`.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.current.as_ref().is_some_and(|creds| {
            !creds.refresh_token.expose_secret().is_empty() && now < creds.refresh_expiry
        })
    }

    /// Whether the access token has expired at `now`.
    ///
    /// An empty store counts as expired.
    pub fn access_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.current
            .as_ref()
            .is_none_or(|creds| now >= creds.access_expiry)
    }

    /// Session state at `now`.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if !self.is_authenticated_at(now) {
            SessionState::Unauthenticated
        } else if self.access_expired_at(now) {
            SessionState::Stale
        } else {
            SessionState::Fresh
        }
    }

    /// `Authorization` header value for the stored access token.
    ///
    /// Expiry is not checked here; callers renew first. An empty store yields
    /// `"Bearer "`.
    pub fn auth_header(&self) -> String {
        let token = self
            .current
            .as_ref()
            .map(|creds| creds.access_token.expose_secret())
            .unwrap_or_default();
        format!("Bearer {token}")
    }

    /// Stored refresh token, if any.
    pub(crate) fn refresh_token(&self) -> Option<SecretString> {
        self.current.as_ref().map(|creds| creds.refresh_token.clone())
    }

    /// Stored access expiry, if any.
    pub fn access_expiry(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|creds| creds.access_expiry)
    }

    /// Stored refresh expiry, if any.
    pub fn refresh_expiry(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(|creds| creds.refresh_expiry)
    }
}

fn instant_from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
