//! # LayerG Gamehub SDK
//!
//! Rust SDK for the LayerG Gamehub aggregator API supporting:
//! - Key-pair login with automatic token refresh
//! - Bounded retries for transient failures
//! - Normalized error categories for every failed request
//! - Typed asset and collection operations
//!
//! Every resource operation goes through one pipeline: session guard,
//! credential renewal, transport call, error classification and retry. Request
//! failures are returned as [`OperationResult::Failure`] values rather than
//! `Err`, so callers inspect the error kind instead of unwinding.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use layerg_gamehub::{Client, Environment, GetByTokenIdInput, OperationResult};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::builder()
//!         .api_key("your-api-key")
//!         .api_key_id("your-api-key-id")
//!         .environment(Environment::Dev)
//!         .retry(3)
//!         .connect()
//!         .await?;
//!
//!     match client
//!         .assets()
//!         .get_by_token_id(&GetByTokenIdInput::new("collection-id", "1"))
//!         .await?
//!     {
//!         OperationResult::Success(asset) => println!("{}", asset.name),
//!         OperationResult::Failure(err) => eprintln!("{}: {}", err.kind(), err.message()),
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Re-export commonly used types
pub use client::{Client, ClientBuilder};
pub use config::{ClientConfig, ClientOptions, ClientSettings, Environment};
pub use credentials::SessionState;
pub use error::{DomainError, Error, ErrorKind, Result};
pub use result::OperationResult;
pub use retry::{RetryDecision, RetryObserver, RetryPolicy, TracingRetryObserver};
pub use types::*;

// Module declarations
pub mod classify;
pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod observability;
pub mod pipeline;
pub mod resources;
pub mod result;
pub mod retry;
pub mod session;
pub mod types;

pub use layerg_transport::{HttpRequest, HttpResponse, Transport, TransportError};

/// Prelude module for convenient imports.
///
/// ```rust
/// use layerg_gamehub::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Client, ClientBuilder, DomainError, Environment, Error, ErrorKind, OperationResult, Result,
        SessionState,
        types::{
            Asset, Collection, CollectionData, CreateAssetInput, CreateCollectionInput,
            GetByTokenIdInput, UpdateAssetInput, UpdateCollectionInput,
        },
    };
}

/// SDK version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Base URL used when no environment or override is given.
pub const DEFAULT_BASE_URL: &str = config::DEV_BASE_URL;
