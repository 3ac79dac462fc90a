//! HTTP transport abstraction layer for the LayerG Gamehub SDK
//!
//! Provides a trait-based transport abstraction so the SDK's request pipeline
//! and session manager never talk to `reqwest` directly. Swapping the
//! transport (for a scripted mock in tests, or a proxy-aware client) only
//! requires implementing [`Transport`].
//!
//! # Architecture
//!
//! - **Transport trait**: one request in, one response (any status) out
//! - **HTTP transport**: REST client via reqwest with per-request timeouts
//! - **Error handling**: transport failures never carry an HTTP status; a
//!   response with a non-2xx status is still an `Ok(HttpResponse)`
//!
//! # Usage
//!
//! ```ignore
//! use layerg_transport::{HttpRequest, HttpTransport, Transport};
//!
//! let transport = HttpTransport::new()?;
//! let request = HttpRequest::new("GET", "https://agg-dev.layerg.xyz/api/collection/c1")
//!     .with_header("Authorization", "Bearer token");
//! let response = transport.send_http(request).await?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig};
pub use traits::{HttpRequest, HttpResponse, Transport};
