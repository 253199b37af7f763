//! Client for the AI mutation service.
//!
//! One request carries the user's instruction plus the current document and
//! conversation context; the response may or may not contain an updated
//! document (the AI can answer without editing). The service's response shape
//! has drifted across versions, so all accepted spellings are normalized into
//! one canonical [`MutationOutcome`] at this boundary - nothing downstream
//! sees the wire shape.

use crate::http::{error_message, transport_error};
use async_trait::async_trait;
use atelier_core::config::EditorConfig;
use atelier_core::error::{EditorError, Result};
use atelier_core::session::{Attachment, ClarifyingOption, Turn, TurnRole};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// One mutation request: the instruction plus the context it applies to.
///
/// Borrows everything; the pipeline never retains document state between
/// calls.
#[derive(Debug)]
pub struct MutationRequest<'a> {
    pub session_id: &'a str,
    pub document_context: &'a str,
    pub instruction: &'a str,
    pub conversation_history: &'a [Turn],
    pub attachments: &'a [Attachment],
}

/// Canonical result of a successful mutation request.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// What the assistant said about the change (or the answer itself).
    pub explanation: String,
    /// The full replacement document, absent when the AI answered without
    /// editing.
    pub updated_document: Option<String>,
    /// Replacement list of suggested next actions; `None` means the response
    /// omitted one and the previous list should stand.
    pub suggested_next_actions: Option<Vec<String>>,
    /// Clarifying-question choices to offer the user.
    pub clarifying_options: Vec<ClarifyingOption>,
    /// How many discrete edits the service reports having applied.
    pub edit_count: u32,
}

/// Contract the session manager requires from the mutation service.
#[async_trait]
pub trait MutationService: Send + Sync {
    /// Sends one instruction and returns the normalized outcome.
    ///
    /// # Errors
    ///
    /// - [`EditorError::RequestTimedOut`] on deadline expiry or cancellation
    /// - [`EditorError::NetworkUnavailable`] when no response reached us
    /// - [`EditorError::SessionExpired`], [`EditorError::RateLimited`],
    ///   [`EditorError::ServiceError`] or [`EditorError::MutationFailed`]
    ///   for non-success responses
    async fn request_mutation(
        &self,
        request: MutationRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome>;
}

/// HTTP implementation of [`MutationService`].
#[derive(Clone)]
pub struct HttpMutationService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpMutationService {
    /// Creates a client for the given endpoint with an explicit deadline.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Creates a client from editor configuration.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(
            config.mutation_endpoint.clone(),
            Duration::from_secs(config.mutation_timeout_secs),
        )
    }
}

#[async_trait]
impl MutationService for HttpMutationService {
    async fn request_mutation(
        &self,
        request: MutationRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<MutationOutcome> {
        let body = MutationRequestBody::from(&request);

        let call = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(&body)
            .send();

        // The deadline is enforced by the request timeout; the token lets the
        // session abandon the client-visible response early. Server-side work
        // already dispatched is not assumed to be interrupted either way.
        let response = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(session_id = request.session_id, "mutation request cancelled");
                return Err(EditorError::RequestTimedOut);
            }
            result = call => result.map_err(transport_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read mutation error body".to_string());
            return Err(classify_mutation_status(status, error_message(&body_text)));
        }

        let raw: RawMutationResponse = response
            .json()
            .await
            .map_err(|err| EditorError::internal(format!("Failed to parse mutation response: {err}")))?;

        Ok(raw.normalize())
    }
}

/// Maps a non-success mutation response to the editor taxonomy.
fn classify_mutation_status(status: StatusCode, message: String) -> EditorError {
    match status {
        StatusCode::UNAUTHORIZED => EditorError::SessionExpired,
        StatusCode::TOO_MANY_REQUESTS => EditorError::RateLimited,
        s if s.is_server_error() => EditorError::service(s.as_u16(), message),
        s => EditorError::mutation_failed(s.as_u16(), message),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MutationRequestBody<'a> {
    session_id: &'a str,
    document_context: &'a str,
    instruction: &'a str,
    conversation_history: Vec<WireTurn<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<WireAttachment<'a>>,
}

impl<'a> From<&MutationRequest<'a>> for MutationRequestBody<'a> {
    fn from(request: &MutationRequest<'a>) -> Self {
        Self {
            session_id: request.session_id,
            document_context: request.document_context,
            instruction: request.instruction,
            conversation_history: request
                .conversation_history
                .iter()
                .map(WireTurn::from)
                .collect(),
            attachments: request.attachments.iter().map(WireAttachment::from).collect(),
        }
    }
}

#[derive(Serialize)]
struct WireTurn<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a Turn> for WireTurn<'a> {
    fn from(turn: &'a Turn) -> Self {
        Self {
            role: match turn.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "assistant",
            },
            content: &turn.content,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireAttachment<'a> {
    id: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<&'a str>,
}

impl<'a> From<&'a Attachment> for WireAttachment<'a> {
    fn from(attachment: &'a Attachment) -> Self {
        Self {
            id: &attachment.id,
            url: &attachment.url,
            mime_type: attachment.mime_type.as_deref(),
        }
    }
}

/// Raw wire shape: every field optional, both accepted spellings present.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMutationResponse {
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    updated_document: Option<String>,
    #[serde(default)]
    edits_applied: Option<u32>,
    #[serde(default)]
    suggested_options: Option<Vec<RawClarifyingOption>>,
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawClarifyingOption {
    #[serde(default)]
    id: Option<String>,
    label: String,
}

impl RawMutationResponse {
    /// Collapses the accepted field spellings into the canonical shape.
    ///
    /// Fallback chain for the explanation: `explanation`, then `response`,
    /// then a fixed acknowledgment so a shape-drifted success never fails the
    /// turn.
    fn normalize(self) -> MutationOutcome {
        let explanation = self
            .explanation
            .filter(|s| !s.trim().is_empty())
            .or(self.response)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Done.".to_string());

        let clarifying_options = self
            .suggested_options
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| ClarifyingOption {
                id: raw.id.unwrap_or_else(|| format!("option-{index}")),
                label: raw.label,
            })
            .collect();

        MutationOutcome {
            explanation,
            updated_document: self.updated_document,
            suggested_next_actions: self.suggestions,
            clarifying_options,
            edit_count: self.edits_applied.unwrap_or(0),
        }
    }
}
