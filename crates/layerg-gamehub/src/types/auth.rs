//! Authentication exchange types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token pair returned by the login and refresh endpoints.
///
/// Expiry instants are milliseconds since the Unix epoch.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token for resource requests
    pub access_token: String,

    /// Token used to obtain a new access token
    pub refresh_token: String,

    /// Access token expiry, epoch milliseconds
    pub access_token_expire: i64,

    /// Refresh token expiry, epoch milliseconds
    pub refresh_token_expire: i64,
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("access_token_expire", &self.access_token_expire)
            .field("refresh_token_expire", &self.refresh_token_expire)
            .finish()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginRequest<'a> {
    pub api_key: &'a str,
    pub api_key_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
