//! Error types for the session module.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when using the session API or the session store.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An update was requested before any user was loaded.
    ///
    /// This is a usage error in the caller and is raised without issuing a
    /// network request.
    #[error("current user has not been loaded yet, so it cannot be updated")]
    NotLoaded,

    /// Network or connection failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {body_preview}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Leading part of the response body, for diagnostics only.
        body_preview: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client configuration is invalid (bad base URL, TLS setup, ...).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Returns `true` when the backend rejected the session credentials.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}
