//! The editor session manager.
//!
//! `EditorSession` owns the document, title, status, version counter,
//! conversation log and undo history for one editing surface, and
//! coordinates the mutation pipeline, debounced persistence and the publish
//! transition. It is the only component with cross-cutting invariants:
//!
//! - at most one mutation request in flight (later instructions are ignored)
//! - at most one save in flight (single-writer lock, autosave suppressed)
//! - history pushes happen only after an accepted mutation, undo or redo
//! - the version counter is monotonic; undo/redo are new versions, not
//!   rollbacks
//!
//! One instance exists per editing surface, created when it opens and
//! discarded when it closes; gating state is never shared across sessions.

use crate::autosave::AutosaveTimer;
use crate::gate::MutationGate;
use atelier_client::mutation::{MutationOutcome, MutationRequest, MutationService};
use atelier_client::persistence::{PersistenceService, SaveRequest};
use atelier_core::config::EditorConfig;
use atelier_core::error::{EditorError, Result};
use atelier_core::history::HistoryBuffer;
use atelier_core::session::{Attachment, Session, SessionStatus, Turn};
use atelier_core::slug::validate_slug;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// Result of handling one user instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionOutcome {
    /// Ignored: another mutation was already in flight.
    NoOp,
    /// The service replied and replaced the document.
    DocumentUpdated {
        /// Number of discrete edits the service reports.
        edit_count: u32,
    },
    /// The service answered without editing; the document is unchanged.
    Replied,
    /// The pipeline failed; an explanatory turn was recorded and the
    /// document is unchanged. The user may retry.
    Failed(EditorError),
}

/// The last successfully persisted state, for dirty tracking.
#[derive(Debug, Clone)]
struct PersistedMark {
    title: String,
    document_body: String,
    version: u64,
}

/// Manages one editing session. See the module docs for the invariants.
pub struct EditorSession {
    session: RwLock<Session>,
    history: Mutex<HistoryBuffer>,
    suggested_next_actions: RwLock<Vec<String>>,
    last_saved: RwLock<PersistedMark>,
    mutation_gate: MutationGate,
    /// The single-writer save lock. Held for the duration of one persistence
    /// attempt; `try_lock` failing is the "save in flight" signal.
    save_lock: Mutex<()>,
    autosave: AutosaveTimer,
    mutation_service: Arc<dyn MutationService>,
    persistence: Arc<dyn PersistenceService>,
}

impl EditorSession {
    /// Opens an editing session around an existing document.
    ///
    /// The initial document becomes the first history snapshot (the floor
    /// undo returns to) and the initial saved mark (a freshly opened session
    /// has no unsaved changes).
    pub fn open(
        session: Session,
        mutation_service: Arc<dyn MutationService>,
        persistence: Arc<dyn PersistenceService>,
        config: &EditorConfig,
    ) -> Arc<Self> {
        let mut history = HistoryBuffer::with_budget(config.history_budget_bytes);
        history.push(&session.document_body);
        let mark = PersistedMark {
            title: session.title.clone(),
            document_body: session.document_body.clone(),
            version: session.version,
        };
        tracing::debug!(session_id = %session.id, "editor session opened");
        Arc::new(Self {
            session: RwLock::new(session),
            history: Mutex::new(history),
            suggested_next_actions: RwLock::new(Vec::new()),
            last_saved: RwLock::new(mark),
            mutation_gate: MutationGate::new(),
            save_lock: Mutex::new(()),
            autosave: AutosaveTimer::new(std::time::Duration::from_millis(
                config.autosave_debounce_ms,
            )),
            mutation_service,
            persistence,
        })
    }

    /// Sends a user instruction through the mutation pipeline.
    ///
    /// The user turn is appended optimistically before the round trip. On
    /// success the assistant turn, document update, history push and version
    /// bump are applied together; on failure an explanatory assistant turn
    /// is appended and the document is left untouched.
    ///
    /// While a mutation is already in flight the call is a silent no-op
    /// ([`InstructionOutcome::NoOp`]): no turn is appended and no request is
    /// issued.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::EmptyInstruction`] when both the text and the
    /// attachments are empty. Pipeline failures are not errors of this
    /// method; they surface as [`InstructionOutcome::Failed`].
    pub async fn send_instruction(
        self: &Arc<Self>,
        text: &str,
        attachments: Vec<Attachment>,
    ) -> Result<InstructionOutcome> {
        if text.trim().is_empty() && attachments.is_empty() {
            return Err(EditorError::EmptyInstruction);
        }
        let Some(cancel) = self.mutation_gate.try_begin().await else {
            tracing::debug!("instruction ignored: a mutation is already in flight");
            return Ok(InstructionOutcome::NoOp);
        };

        {
            let mut session = self.session.write().await;
            session.conversation.push(Turn::user(text, attachments.clone()));
            session.touch();
        }

        // Copies for the duration of this one operation; the session lock is
        // never held across network I/O.
        let (session_id, document, conversation) = {
            let session = self.session.read().await;
            (
                session.id.clone(),
                session.document_body.clone(),
                session.conversation.clone(),
            )
        };

        let started = Instant::now();
        let result = self
            .mutation_service
            .request_mutation(
                MutationRequest {
                    session_id: &session_id,
                    document_context: &document,
                    instruction: text,
                    conversation_history: &conversation,
                    attachments: &attachments,
                },
                &cancel,
            )
            .await;
        self.mutation_gate.settle().await;

        match result {
            Ok(outcome) => {
                let applied = self.apply_outcome(outcome, started).await;
                if matches!(applied, InstructionOutcome::DocumentUpdated { .. }) {
                    self.schedule_autosave().await;
                }
                Ok(applied)
            }
            Err(err) => {
                tracing::warn!("mutation request failed: {err}");
                let mut session = self.session.write().await;
                session.conversation.push(Turn::assistant(err.user_message()));
                session.touch();
                Ok(InstructionOutcome::Failed(err))
            }
        }
    }

    /// Records a successful mutation outcome against the session.
    async fn apply_outcome(&self, outcome: MutationOutcome, started: Instant) -> InstructionOutcome {
        let MutationOutcome {
            explanation,
            updated_document,
            suggested_next_actions,
            clarifying_options,
            edit_count,
        } = outcome;

        let updated = updated_document.is_some();
        {
            let mut session = self.session.write().await;
            let mut turn = Turn::assistant(explanation);
            turn.thinking_duration_seconds = Some(started.elapsed().as_secs_f64());
            turn.suggested_options = clarifying_options;
            if updated {
                turn.edit_summary = Some(edit_summary(edit_count));
            }
            session.conversation.push(turn);

            if let Some(document) = updated_document {
                session.document_body = document;
                session.version += 1;
                self.history.lock().await.push(&session.document_body);
                tracing::debug!(version = session.version, edit_count, "document updated");
            }
            session.touch();
        }

        // A response may omit the suggestions entirely; the previous list
        // then stands.
        if let Some(actions) = suggested_next_actions {
            *self.suggested_next_actions.write().await = actions;
        }

        if updated {
            InstructionOutcome::DocumentUpdated { edit_count }
        } else {
            InstructionOutcome::Replied
        }
    }

    /// Sends a clarifying-question choice as a pre-filled instruction.
    pub async fn select_clarifying_option(
        self: &Arc<Self>,
        option_id: &str,
        label: &str,
    ) -> Result<InstructionOutcome> {
        tracing::debug!(option_id, "clarifying option selected");
        self.send_instruction(label, Vec::new()).await
    }

    /// Steps the document back to the previous snapshot.
    ///
    /// Returns `false` (a no-op, no version bump) when the history cursor is
    /// already at position 0. Undo is itself a versioned mutation: the
    /// version counter increments so optimistic-concurrency checks stay
    /// monotonic.
    pub async fn undo(self: &Arc<Self>) -> Result<bool> {
        {
            let mut session = self.session.write().await;
            let mut history = self.history.lock().await;
            let Some(snapshot) = history.undo() else {
                return Ok(false);
            };
            session.document_body = snapshot.to_string();
            session.version += 1;
            session.touch();
            tracing::debug!(version = session.version, "undo applied");
        }
        self.schedule_autosave().await;
        Ok(true)
    }

    /// Steps the document forward along the not-yet-overwritten redo tail.
    ///
    /// Versioned exactly like [`EditorSession::undo`].
    pub async fn redo(self: &Arc<Self>) -> Result<bool> {
        {
            let mut session = self.session.write().await;
            let mut history = self.history.lock().await;
            let Some(snapshot) = history.redo() else {
                return Ok(false);
            };
            session.document_body = snapshot.to_string();
            session.version += 1;
            session.touch();
            tracing::debug!(version = session.version, "redo applied");
        }
        self.schedule_autosave().await;
        Ok(true)
    }

    /// Renames the document. Schedules an autosave like any other change.
    pub async fn set_title(self: &Arc<Self>, title: impl Into<String>) {
        {
            let mut session = self.session.write().await;
            session.title = title.into();
            session.touch();
        }
        self.schedule_autosave().await;
    }

    /// Persists the draft.
    ///
    /// A call while another save is in flight is a silent no-op; callers
    /// must not queue additional saves. On success the accepted state is
    /// recorded for dirty tracking; on failure the in-memory document is
    /// untouched and the caller decides between reloading and overwriting.
    pub async fn save(&self) -> Result<()> {
        let Ok(_writer) = self.save_lock.try_lock() else {
            tracing::debug!("save ignored: another save is in flight");
            return Ok(());
        };
        self.save_holding_lock().await
    }

    /// Performs one persistence attempt. The caller holds `save_lock`.
    async fn save_holding_lock(&self) -> Result<()> {
        // An explicit save supersedes any pending debounce.
        self.autosave.disarm().await;

        let (title, document_body, version, prior_status) = {
            let mut session = self.session.write().await;
            let prior = session.status;
            session.status = SessionStatus::Saving;
            (
                session.title.clone(),
                session.document_body.clone(),
                session.version,
                prior,
            )
        };

        let result = self
            .persistence
            .save(SaveRequest {
                title: &title,
                document_body: &document_body,
                version,
            })
            .await;

        // Saving always returns to the prior status; `Published` is sticky
        // across later saves unless the server says otherwise.
        let mut session = self.session.write().await;
        session.status = prior_status;
        match &result {
            Ok(()) => {
                session.touch();
                *self.last_saved.write().await = PersistedMark {
                    title,
                    document_body,
                    version,
                };
                tracing::debug!(version, "draft saved");
            }
            Err(err) => {
                tracing::warn!("save failed: {err}");
            }
        }
        result
    }

    /// Publishes the document at the given slug.
    ///
    /// The slug is validated locally first and never sent when invalid. Any
    /// in-flight save is drained, then the latest edits are persisted;
    /// publishing a stale document is disallowed, so a failed save aborts
    /// the publish before the endpoint is contacted. On a slug conflict the
    /// session stays in `Draft`.
    ///
    /// Returns the externally reachable URL on success.
    pub async fn publish(&self, slug: Option<&str>) -> Result<String> {
        if let Some(slug) = slug {
            validate_slug(slug)?;
        }

        let _writer = self.save_lock.lock().await;
        self.save_holding_lock().await?;

        let receipt = self.persistence.publish(slug).await?;

        let mut session = self.session.write().await;
        session.status = SessionStatus::Published;
        session.touch();
        tracing::info!(url = %receipt.published_url, "document published");
        Ok(receipt.published_url)
    }

    /// Cancels pending background work. Call when the editing surface
    /// unmounts; the session is discarded afterwards.
    pub async fn close(&self) {
        self.autosave.disarm().await;
        self.mutation_gate.cancel().await;
        tracing::debug!("editor session closed");
    }

    /// Arms the debounced autosave unless a mutation or save is in flight.
    async fn schedule_autosave(self: &Arc<Self>) {
        if self.mutation_gate.is_pending().await || self.save_in_flight() {
            tracing::debug!("autosave suppressed: request in flight");
            return;
        }
        let token = self.autosave.arm().await;
        let delay = self.autosave.debounce();
        let session = Arc::clone(self);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Err(err) = session.save().await {
                        tracing::warn!("autosave failed: {err}");
                    }
                }
            }
        });
    }

    fn save_in_flight(&self) -> bool {
        self.save_lock.try_lock().is_err()
    }

    /// A point-in-time copy of the session state, for rendering.
    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Current document body.
    pub async fn document_body(&self) -> String {
        self.session.read().await.document_body.clone()
    }

    /// Current version counter.
    pub async fn version(&self) -> u64 {
        self.session.read().await.version
    }

    /// Current persistence status.
    pub async fn status(&self) -> SessionStatus {
        self.session.read().await.status
    }

    /// Number of turns in the conversation log.
    pub async fn turn_count(&self) -> usize {
        self.session.read().await.conversation.len()
    }

    /// The current suggested next actions.
    pub async fn suggested_next_actions(&self) -> Vec<String> {
        self.suggested_next_actions.read().await.clone()
    }

    /// Number of retained history snapshots.
    pub async fn history_len(&self) -> usize {
        self.history.lock().await.len()
    }

    /// True when an older snapshot is available.
    pub async fn can_undo(&self) -> bool {
        self.history.lock().await.can_undo()
    }

    /// True when a redo tail is available.
    pub async fn can_redo(&self) -> bool {
        self.history.lock().await.can_redo()
    }

    /// True while a mutation request is outstanding.
    pub async fn is_mutating(&self) -> bool {
        self.mutation_gate.is_pending().await
    }

    /// True while a save is outstanding.
    pub fn is_saving(&self) -> bool {
        self.save_in_flight()
    }

    /// True when the in-memory document or title differs from the last
    /// successfully saved one. Backs the close/navigate-away guard.
    pub async fn has_unsaved_changes(&self) -> bool {
        let session = self.session.read().await;
        let saved = self.last_saved.read().await;
        session.title != saved.title || session.document_body != saved.document_body
    }

    /// The version accepted by the last successful save.
    pub async fn last_saved_version(&self) -> u64 {
        self.last_saved.read().await.version
    }
}

fn edit_summary(edit_count: u32) -> String {
    if edit_count == 1 {
        "1 edit applied".to_string()
    } else {
        format!("{edit_count} edits applied")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_summary_pluralizes() {
        assert_eq!(edit_summary(1), "1 edit applied");
        assert_eq!(edit_summary(3), "3 edits applied");
    }
}
