//! Configuration for the Gamehub client

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Base URL of the development aggregator.
pub const DEV_BASE_URL: &str = "https://agg-dev.layerg.xyz/api";

/// Base URL of the production aggregator.
///
/// Production traffic is currently served by the same gateway as development.
pub const PROD_BASE_URL: &str = "https://agg-dev.layerg.xyz/api";

/// Default number of attempts per request (no retries).
pub const DEFAULT_RETRY: u32 = 1;

/// Default per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Target deployment of the Gamehub API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development gateway.
    #[default]
    Dev,
    /// Production gateway.
    Prod,
}

impl Environment {
    /// Base URL from the fixed environment table.
    pub fn base_url(self) -> &'static str {
        match self {
            Environment::Dev => DEV_BASE_URL,
            Environment::Prod => PROD_BASE_URL,
        }
    }

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" | "sandbox" => Ok(Environment::Dev),
            "prod" | "production" => Ok(Environment::Prod),
            other => Err(Error::InvalidConfig(format!(
                "unknown environment '{other}', expected 'dev' or 'prod'"
            ))),
        }
    }
}

/// Request behaviour options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOptions {
    /// Maximum attempts per request, including the first. Must be at least 1.
    pub retry: u32,

    /// Per-attempt timeout. Must be non-zero.
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            retry: DEFAULT_RETRY,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Configuration for the Gamehub client.
///
/// Holds raw, unvalidated input. [`ClientConfig::validate`] turns it into the
/// immutable [`ClientSettings`] the client runs on.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API key issued for the project
    pub api_key: Option<SecretString>,

    /// Identifier of the API key
    pub api_key_id: Option<SecretString>,

    /// Target environment
    pub environment: Environment,

    /// Explicit base URL, overriding the environment table
    pub base_url: Option<String>,

    /// Retry and timeout options
    pub options: ClientOptions,
}

impl ClientConfig {
    /// Create a configuration with the given key pair and defaults elsewhere.
    pub fn new(api_key: impl Into<String>, api_key_id: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into().into_boxed_str())),
            api_key_id: Some(SecretString::new(api_key_id.into().into_boxed_str())),
            ..Default::default()
        }
    }

    /// Start building a configuration.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    /// This will look for:
    /// - `LAYERG_API_KEY` and `LAYERG_API_KEY_ID` for authentication
    /// - `LAYERG_ENVIRONMENT` (`dev` or `prod`)
    /// - `LAYERG_BASE_URL` for a base URL override
    /// - `LAYERG_RETRY` for maximum attempts per request
    /// - `LAYERG_TIMEOUT_MS` for the per-attempt timeout in milliseconds
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a variable is present but malformed.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        use std::env;

        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(api_key) = env::var("LAYERG_API_KEY") {
            config.api_key = Some(SecretString::new(api_key.into_boxed_str()));
        }
        if let Ok(api_key_id) = env::var("LAYERG_API_KEY_ID") {
            config.api_key_id = Some(SecretString::new(api_key_id.into_boxed_str()));
        }

        if let Ok(environment) = env::var("LAYERG_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }

        if let Ok(base_url) = env::var("LAYERG_BASE_URL")
            && !base_url.trim().is_empty()
        {
            config.base_url = Some(base_url);
        }

        if let Ok(retry) = env::var("LAYERG_RETRY") {
            config.options.retry = retry.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!("LAYERG_RETRY must be a positive integer, got '{retry}'"))
            })?;
        }

        if let Ok(timeout) = env::var("LAYERG_TIMEOUT_MS") {
            let millis: u64 = timeout.trim().parse().map_err(|_| {
                Error::InvalidConfig(format!(
                    "LAYERG_TIMEOUT_MS must be a number of milliseconds, got '{timeout}'"
                ))
            })?;
            config.options.timeout = Duration::from_millis(millis);
        }

        Ok(config)
    }

    /// Check construction rules and produce immutable settings.
    ///
    /// No I/O happens here.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfig`] if either key is missing or blank, `retry`
    ///   is zero, or `timeout` is zero
    /// - [`Error::InvalidUrl`] if the base URL is not an absolute http(s) URL
    pub fn validate(&self) -> Result<ClientSettings> {
        let api_key = non_blank(self.api_key.as_ref(), "apiKey")?;
        let api_key_id = non_blank(self.api_key_id.as_ref(), "apiKeyId")?;

        if self.options.retry < 1 {
            return Err(Error::InvalidConfig(
                "retry must be at least 1".to_string(),
            ));
        }
        if self.options.timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let raw_base = self
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url());
        let base_url = normalize_base_url(raw_base)?;

        Ok(ClientSettings {
            api_key,
            api_key_id,
            environment: self.environment,
            base_url,
            retry: self.options.retry,
            timeout: self.options.timeout,
        })
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the API key identifier.
    pub fn api_key_id(mut self, api_key_id: impl Into<String>) -> Self {
        self.config.api_key_id = Some(SecretString::new(api_key_id.into().into_boxed_str()));
        self
    }

    /// Set the target environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Override the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set maximum attempts per request.
    pub fn retry(mut self, retry: u32) -> Self {
        self.config.options.retry = retry;
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.options.timeout = timeout;
        self
    }

    /// Replace all request options at once.
    pub fn options(mut self, options: ClientOptions) -> Self {
        self.config.options = options;
        self
    }

    /// Finish building. Validation happens when the client is created.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Validated, immutable client settings.
///
/// Shared by reference across the session manager, pipeline and resources.
#[derive(Clone)]
pub struct ClientSettings {
    api_key: SecretString,
    api_key_id: SecretString,
    environment: Environment,
    base_url: String,
    retry: u32,
    timeout: Duration,
}

impl ClientSettings {
    pub(crate) fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub(crate) fn api_key_id(&self) -> &SecretString {
        &self.api_key_id
    }

    /// Environment the settings were resolved for.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Maximum attempts per request.
    pub fn retry(&self) -> u32 {
        self.retry
    }

    /// Per-attempt timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL for an API path.
    ///
    /// Paths are appended to the base URL verbatim, so a base such as
    /// `https://host/api` keeps its `/api` prefix.
    pub fn endpoint(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &"[REDACTED]")
            .field("api_key_id", &"[REDACTED]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_blank(value: Option<&SecretString>, name: &str) -> Result<SecretString> {
    match value {
        Some(secret) if !secret.expose_secret().trim().is_empty() => {
            Ok(SecretString::new(secret.expose_secret().trim().into()))
        }
        _ => Err(Error::InvalidConfig(format!("{name} must not be empty"))),
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = url::Url::parse(trimmed)
        .map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(Error::InvalidUrl(format!(
                "{trimmed}: unsupported scheme '{scheme}'"
            )));
        }
    }
    if parsed.host_str().is_none() {
        return Err(Error::InvalidUrl(format!("{trimmed}: missing host")));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(Error::InvalidUrl(format!(
            "{trimmed}: query and fragment are not allowed"
        )));
    }

    Ok(trimmed.to_string())
}
