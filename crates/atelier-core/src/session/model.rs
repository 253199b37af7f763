//! Session domain model.
//!
//! This module contains the core Session entity: one editing lifetime for a
//! single document, from open to close.

use super::turn::Turn;
use serde::{Deserialize, Serialize};

/// Persistence state of a session's document.
///
/// The machine is `Draft -> Saving -> Draft` for an ordinary save (success or
/// failure both return to `Draft`) and `Draft -> Saving -> Published` via
/// publish. `Published` is sticky: later saves pass through `Saving` and
/// return to `Published` unless the server says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Edits exist only client-side or in the draft record.
    Draft,
    /// A save request is in flight.
    Saving,
    /// The document is reachable at its published URL.
    Published,
}

/// Represents one editing session in the domain layer.
///
/// A session owns:
/// - The current document body (HTML text)
/// - A user-editable title
/// - The persistence status and a monotonic version counter
/// - The ordered conversation log with the mutation service
///
/// The session is mutated only through `EditorSession` operations and is
/// discarded when the editing surface closes; no server-side lifecycle is
/// implied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable document title
    pub title: String,
    /// The HTML document being edited
    pub document_body: String,
    /// Current persistence status
    pub status: SessionStatus,
    /// Monotonic counter, incremented on every accepted mutation, undo or
    /// redo. Used for optimistic-concurrency checks on save.
    pub version: u64,
    /// Ordered conversation log (append-only)
    #[serde(default)]
    pub conversation: Vec<Turn>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl Session {
    /// Creates a fresh draft session around an existing document.
    pub fn new(title: impl Into<String>, document_body: impl Into<String>) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            document_body: document_body.into(),
            status: SessionStatus::Draft,
            version: 0,
            conversation: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Marks the session as touched now.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_as_draft_at_version_zero() {
        let session = Session::new("Landing page", "<p>hi</p>");
        assert_eq!(session.status, SessionStatus::Draft);
        assert_eq!(session.version, 0);
        assert!(session.conversation.is_empty());
        assert!(!session.id.is_empty());
    }

    #[test]
    fn sessions_get_unique_ids() {
        let a = Session::new("a", "");
        let b = Session::new("b", "");
        assert_ne!(a.id, b.id);
    }
}
