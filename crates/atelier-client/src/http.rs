//! Shared helpers for the HTTP service clients.

use atelier_core::EditorError;
use serde::Deserialize;

/// Error envelope some backend responses carry; falls back to the raw body.
#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a transport-level failure (nothing reached the client) to the
/// editor taxonomy. Timeouts are distinct from unreachable networks.
pub(crate) fn transport_error(err: reqwest::Error) -> EditorError {
    if err.is_timeout() {
        EditorError::RequestTimedOut
    } else {
        EditorError::NetworkUnavailable(err.to_string())
    }
}

/// Extracts a human-readable message from an error response body.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
