//! HTTP transport implementation
//!
//! Provides an HTTP client that implements the Transport trait.

pub mod client;

pub use client::{HttpTransport, HttpTransportConfig};
