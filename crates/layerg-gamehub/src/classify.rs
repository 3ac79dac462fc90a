//! Error classification
//!
//! Maps every way a transport attempt can fail onto a [`DomainError`]. The
//! mapping is total: whatever the transport produced, a domain error comes
//! back and nothing unclassified leaks to callers.
//!
//! Message precedence is the server-provided `message` field of a JSON body,
//! then the transport-level message, then [`FALLBACK_MESSAGE`].

use layerg_transport::{HttpResponse, TransportError};

use crate::error::{DomainError, ErrorKind};

/// Message used when neither the server nor the transport said anything useful.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred";

/// Longest raw body kept as a cause.
const MAX_CAUSE_LEN: usize = 512;

/// Category for a received HTTP status.
pub fn kind_for_status(status: u16) -> ErrorKind {
    match status {
        400 => ErrorKind::BadRequest,
        401 | 403 => ErrorKind::Auth,
        404 => ErrorKind::NotFound,
        429 => ErrorKind::RateLimit,
        500..=599 => ErrorKind::Server,
        _ => ErrorKind::Unknown,
    }
}

/// Classify a response that arrived with a non-success status.
pub fn classify_response(response: &HttpResponse) -> DomainError {
    let status = response.status;
    let kind = kind_for_status(status);

    let message = server_message(&response.body)
        .unwrap_or_else(|| format!("Request failed with status code {status}"));

    let mut error = DomainError::new(kind, message).with_status(status);
    if let Some(cause) = body_excerpt(&response.body) {
        error = error.with_cause(cause);
    }
    error
}

/// Classify a failure where no response was received.
pub fn classify_transport_error(error: &TransportError) -> DomainError {
    let kind = match error {
        TransportError::Timeout => ErrorKind::Timeout,
        TransportError::Connection(_) | TransportError::Io(_) => ErrorKind::Network,
        TransportError::Http(_) | TransportError::Serialization(_) | TransportError::Other(_) => {
            ErrorKind::Unknown
        }
    };

    let transport_message = error.to_string();
    let message = if transport_message.trim().is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        transport_message.clone()
    };

    DomainError::new(kind, message).with_cause(transport_message)
}

/// Classify a success response whose body did not match the expected shape.
pub fn classify_decode_error(status: u16, error: &serde_json::Error) -> DomainError {
    DomainError::new(ErrorKind::Unknown, "Failed to decode response body")
        .with_status(status)
        .with_cause(error.to_string())
}

/// Extract the server's `message` field.
///
/// Accepts both a plain string and a list of strings (validation pipelines
/// commonly return one message per rejected field).
fn server_message(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        serde_json::Value::String(msg) if !msg.trim().is_empty() => Some(msg.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|msg| !msg.trim().is_empty())
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

fn body_excerpt(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.chars().take(MAX_CAUSE_LEN).collect())
}
