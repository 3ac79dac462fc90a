//! Main client implementation for the LayerG Gamehub API

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use layerg_transport::{HttpTransport, HttpTransportConfig, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{
    config::{ClientConfig, ClientSettings, Environment},
    credentials::SessionState,
    error::Result,
    pipeline::RequestPipeline,
    resources::{Assets, Collections},
    result::OperationResult,
    retry::{RetryObserver, SharedObserver},
    session::SessionManager,
    types::AuthResponse,
};

/// Main client for interacting with the Gamehub API.
///
/// Cheap to clone; clones share one session and one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use layerg_gamehub::{Client, Environment};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Client::new("api-key", "api-key-id", Environment::Dev)?;
/// client.authenticate().await?;
///
/// let collection = client.collections().get_by_id("collection-id").await?;
/// if let Some(err) = collection.error() {
///     eprintln!("{} ({:?})", err.message(), err.status());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    settings: Arc<ClientSettings>,
    session: Arc<SessionManager>,
    pipeline: Arc<RequestPipeline>,

    assets: OnceLock<Assets>,
    collections: OnceLock<Collections>,
}

impl Client {
    /// Create a client for `environment` with default options.
    ///
    /// No I/O happens until [`Client::authenticate`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfig`] if either key is blank, or
    /// [`crate::Error::Transport`] if the HTTP client cannot be initialised.
    pub fn new(
        api_key: impl Into<String>,
        api_key_id: impl Into<String>,
        environment: Environment,
    ) -> Result<Self> {
        Self::builder()
            .api_key(api_key)
            .api_key_id(api_key_id)
            .environment(environment)
            .build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client from a configuration object.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        ClientBuilder {
            config,
            ..Default::default()
        }
        .build()
    }

    /// Create a client from `LAYERG_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or validation fails.
    #[cfg(feature = "env")]
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    fn assemble(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
        observer: SharedObserver,
    ) -> Self {
        let settings = Arc::new(settings);
        let session = Arc::new(SessionManager::new(settings.clone(), transport.clone()));
        let pipeline = Arc::new(RequestPipeline::new(
            settings.clone(),
            session.clone(),
            transport,
            observer,
        ));

        tracing::debug!(
            environment = %settings.environment(),
            base_url = %settings.base_url(),
            retry = settings.retry(),
            timeout_ms = settings.timeout().as_millis() as u64,
            "Client created"
        );

        Self {
            inner: Arc::new(ClientInner {
                settings,
                session,
                pipeline,
                assets: OnceLock::new(),
                collections: OnceLock::new(),
            }),
        }
    }

    /// Log in with the configured key pair.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Api`] with an [`crate::ErrorKind::Auth`] error if the
    /// exchange fails for any reason; stored credentials are cleared.
    pub async fn authenticate(&self) -> Result<AuthResponse> {
        Ok(self.inner.session.authenticate().await?)
    }

    /// Renew credentials now if they are stale or expired.
    ///
    /// Performs a full login when no usable refresh token is held, so this
    /// also recovers a session whose refresh token lapsed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Api`] with an Auth-category error if renewal fails.
    pub async fn refresh_if_needed(&self) -> Result<()> {
        Ok(self.inner.session.refresh_if_needed().await?)
    }

    /// Whether a usable session exists.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.inner.session.state()
    }

    /// Clear stored credentials.
    pub fn logout(&self) {
        self.inner.session.logout();
    }

    /// Access the Assets API endpoint.
    pub fn assets(&self) -> &Assets {
        self.inner
            .assets
            .get_or_init(|| Assets::new(self.inner.pipeline.clone()))
    }

    /// Access the Collections API endpoint.
    pub fn collections(&self) -> &Collections {
        self.inner
            .collections
            .get_or_init(|| Collections::new(self.inner.pipeline.clone()))
    }

    /// Send a request to an endpoint without a typed wrapper.
    ///
    /// `path` is relative to the base URL and is used verbatim.
    ///
    /// # Errors
    ///
    /// Same as the typed operations: only the not-authenticated guard and
    /// payload serialization abort.
    pub async fn request<T, B>(
        &self,
        method: http::Method,
        path: &str,
        payload: Option<&B>,
    ) -> Result<OperationResult<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.inner.pipeline.execute(method, path, payload).await
    }

    /// Validated settings the client runs on.
    pub fn settings(&self) -> &ClientSettings {
        &self.inner.settings
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("settings", &self.inner.settings)
            .field("session_state", &self.session_state())
            .finish()
    }
}

/// Builder for creating a configured [`Client`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    observer: Option<SharedObserver>,
}

impl ClientBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(secrecy::SecretString::new(api_key.into().into_boxed_str()));
        self
    }

    /// Set the API key identifier.
    pub fn api_key_id(mut self, api_key_id: impl Into<String>) -> Self {
        self.config.api_key_id = Some(secrecy::SecretString::new(
            api_key_id.into().into_boxed_str(),
        ));
        self
    }

    /// Set the target environment.
    pub fn environment(mut self, environment: Environment) -> Self {
        self.config.environment = environment;
        self
    }

    /// Override the base URL (self-hosted gateways, tests).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = Some(base_url.into());
        self
    }

    /// Set maximum attempts per request, including the first.
    pub fn retry(mut self, retry: u32) -> Self {
        self.config.options.retry = retry;
        self
    }

    /// Set the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.options.timeout = timeout;
        self
    }

    /// Use a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Observe retries. Replaces the default tracing observer.
    pub fn retry_observer(mut self, observer: impl RetryObserver + 'static) -> Self {
        self.observer = Some(SharedObserver::new(observer));
        self
    }

    /// Validate the configuration and build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let settings = self.config.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::with_config(HttpTransportConfig {
                timeout: settings.timeout(),
                ..Default::default()
            })?),
        };

        Ok(Client::assemble(
            settings,
            transport,
            self.observer.unwrap_or_default(),
        ))
    }

    /// Build the client and log in.
    ///
    /// # Errors
    ///
    /// Returns construction errors, or [`crate::Error::Api`] if the login fails.
    pub async fn connect(self) -> Result<Client> {
        let client = self.build()?;
        client.authenticate().await?;
        Ok(client)
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}
