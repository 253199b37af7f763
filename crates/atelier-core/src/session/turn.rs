//! Conversation turn types.
//!
//! A turn is one message (user or assistant) in a session's conversation
//! log. Turns are append-only and never mutated after creation.

use serde::{Deserialize, Serialize};

/// Represents the author of a turn in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// Message from the user.
    User,
    /// Message from the AI mutation service.
    Assistant,
}

/// An image reference attached to a user turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier of the uploaded image.
    pub id: String,
    /// Resolvable URL of the image.
    pub url: String,
    /// MIME type if known (e.g. "image/png").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One clarifying-question choice offered by the assistant.
///
/// Selecting an option is equivalent to sending its label as a new
/// instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifyingOption {
    /// Stable identifier for the choice.
    pub id: String,
    /// Human-readable label, also the pre-filled instruction text.
    pub label: String,
}

/// A single message in a session's conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored this turn.
    pub role: TurnRole,
    /// The message text.
    pub content: String,
    /// Timestamp when the turn was created (ISO 8601 format).
    pub timestamp: String,
    /// Image references attached by the user.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// How long the assistant spent before answering, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking_duration_seconds: Option<f64>,
    /// Short description of the edits applied by this turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_summary: Option<String>,
    /// Clarifying-question choices offered alongside the answer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggested_options: Vec<ClarifyingOption>,
}

impl Turn {
    /// Creates a user turn with the current timestamp.
    pub fn user(content: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            attachments,
            thinking_duration_seconds: None,
            edit_summary: None,
            suggested_options: Vec::new(),
        }
    }

    /// Creates an assistant turn with the current timestamp.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            attachments: Vec::new(),
            thinking_duration_seconds: None,
            edit_summary: None,
            suggested_options: Vec::new(),
        }
    }
}
