//! Phone REST backend client.
//!
//! # Architecture
//!
//! - Plain JSON over HTTP via `reqwest`
//! - One method per endpoint, single-shot requests (no retries)
//! - The backend is the source of truth; caching lives in [`crate::query`]
//!
//! # Endpoints
//!
//! ```text
//! GET    /phone        - List all phones
//! GET    /phone/{id}   - Fetch one phone
//! POST   /phone        - Create a phone (body without id)
//! PUT    /phone/{id}   - Replace a phone's fields (body without id)
//! DELETE /phone/{id}   - Remove a phone
//! ```

mod client;

pub use client::PhoneApiClient;

use thiserror::Error;

/// Errors that can occur when talking to the phone backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, TLS...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        message: String,
    },

    /// The requested phone does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this error means the resource is gone.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
