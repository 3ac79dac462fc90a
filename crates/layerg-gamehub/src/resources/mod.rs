//! API resource endpoints
//!
//! Each resource is a thin typed wrapper: it builds the path, picks the
//! method and hands the payload to the shared [`RequestPipeline`](crate::pipeline::RequestPipeline).

pub mod assets;
pub mod collections;

pub use assets::Assets;
pub use collections::Collections;

use std::borrow::Cow;

/// Percent-encode a caller-supplied path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}
