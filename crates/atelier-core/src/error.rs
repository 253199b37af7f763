//! Error types for the Atelier editing stack.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every Atelier component.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait. Every variant that can be
/// surfaced to the person editing carries a user-safe rendering through
/// [`EditorError::user_message`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorError {
    /// The instruction had neither text nor attachments. Local validation,
    /// never reaches the network.
    #[error("Instruction is empty")]
    EmptyInstruction,

    /// The mutation request exceeded its deadline and the client-side call
    /// was abandoned.
    #[error("Mutation request timed out")]
    RequestTimedOut,

    /// No response reached the client at all (DNS, connect, TLS failures).
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// The service rejected the request with 429.
    #[error("Rate limited by the mutation service")]
    RateLimited,

    /// The server no longer recognizes this session (401).
    #[error("Session expired")]
    SessionExpired,

    /// Generic non-success response from the mutation service.
    #[error("Mutation failed (status {status}): {message}")]
    MutationFailed { status: u16, message: String },

    /// Server-side failure (5xx) from any endpoint.
    #[error("Service error (status {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// Another writer persisted a newer version (409 on save).
    #[error("Version conflict: a newer version was saved elsewhere")]
    VersionConflict,

    /// The requested slug is already taken (409 on publish).
    #[error("Slug conflict: '{0}' is already in use")]
    SlugConflict(String),

    /// The slug failed client-side validation. Never sent to the server.
    #[error("Invalid slug: {0}")]
    SlugValidation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EditorError {
    /// Creates a MutationFailed error
    pub fn mutation_failed(status: u16, message: impl Into<String>) -> Self {
        Self::MutationFailed {
            status,
            message: message.into(),
        }
    }

    /// Creates a ServiceError
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::ServiceError {
            status,
            message: message.into(),
        }
    }

    /// Creates a SlugValidation error
    pub fn slug_validation(message: impl Into<String>) -> Self {
        Self::SlugValidation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimedOut)
    }

    /// Check if this is a conflict reported by the backing store (version or
    /// slug).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict | Self::SlugConflict(_))
    }

    /// Check if this error is local validation that never touched the network
    pub fn is_local_validation(&self) -> bool {
        matches!(self, Self::EmptyInstruction | Self::SlugValidation(_))
    }

    /// True when retrying the same operation may succeed.
    ///
    /// Every mutation-pipeline failure is recoverable; the session stays
    /// usable and the user may simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RequestTimedOut
                | Self::NetworkUnavailable(_)
                | Self::RateLimited
                | Self::MutationFailed { .. }
                | Self::ServiceError { .. }
        )
    }

    /// A user-safe message suitable for an assistant turn or a notification.
    ///
    /// These never leak status codes or transport detail; the structured
    /// variant is still available to callers that need it.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInstruction => {
                "Please describe the change you'd like to make.".to_string()
            }
            Self::RequestTimedOut => {
                "That took longer than expected and was cancelled. Your page is unchanged - please try again.".to_string()
            }
            Self::NetworkUnavailable(_) => {
                "I couldn't reach the editing service. Check your connection and try again.".to_string()
            }
            Self::RateLimited => {
                "The editing service is busy right now. Wait a moment and try again.".to_string()
            }
            Self::SessionExpired => {
                "Your session has expired. Please sign in again to keep editing.".to_string()
            }
            Self::MutationFailed { .. } | Self::ServiceError { .. } => {
                "Something went wrong while applying that change. Your page is unchanged - please try again.".to_string()
            }
            Self::VersionConflict => {
                "This page was saved from somewhere else. Reload to pick up the latest version, or save again to overwrite it.".to_string()
            }
            Self::SlugConflict(slug) => {
                format!("The address '{slug}' is already taken. Pick a different one and publish again.")
            }
            Self::SlugValidation(reason) => reason.clone(),
            Self::Config(_) | Self::Internal(_) => {
                "Something unexpected went wrong. Please try again.".to_string()
            }
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON: {err}"))
    }
}

impl From<toml::de::Error> for EditorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for EditorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, EditorError>`.
pub type Result<T> = std::result::Result<T, EditorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_covers_the_pipeline_failures() {
        assert!(EditorError::RequestTimedOut.is_retryable());
        assert!(EditorError::NetworkUnavailable("dns".into()).is_retryable());
        assert!(EditorError::RateLimited.is_retryable());
        assert!(EditorError::mutation_failed(400, "bad request").is_retryable());
        assert!(!EditorError::EmptyInstruction.is_retryable());
        assert!(!EditorError::VersionConflict.is_retryable());
    }

    #[test]
    fn user_messages_do_not_leak_status_codes() {
        let err = EditorError::service(503, "upstream exploded");
        assert!(!err.user_message().contains("503"));
        assert!(!err.user_message().contains("upstream"));
    }

    #[test]
    fn timeout_message_is_retry_oriented() {
        let message = EditorError::RequestTimedOut.user_message();
        assert!(message.contains("try again"));
        assert!(message.contains("unchanged"));
    }
}
