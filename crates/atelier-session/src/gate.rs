//! In-flight mutation gating.
//!
//! The session permits at most one outstanding mutation request. The gate
//! models that as a discriminated state rather than a boolean so cancellation
//! races stay well-defined: a request is `Idle`, `Pending` with its
//! cancellation token, or `Settled`.

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
enum RequestState {
    /// No request has been issued yet.
    Idle,
    /// A request is outstanding; cancelling the token abandons it.
    Pending(CancellationToken),
    /// The last request completed (successfully or not).
    Settled,
}

/// Single-writer gate for mutation requests.
#[derive(Debug)]
pub(crate) struct MutationGate {
    state: Mutex<RequestState>,
}

impl MutationGate {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(RequestState::Idle),
        }
    }

    /// Claims the gate. Returns the cancellation token for the new request,
    /// or `None` when another request is already pending.
    pub async fn try_begin(&self) -> Option<CancellationToken> {
        let mut state = self.state.lock().await;
        if matches!(*state, RequestState::Pending(_)) {
            return None;
        }
        let token = CancellationToken::new();
        *state = RequestState::Pending(token.clone());
        Some(token)
    }

    /// Marks the pending request as finished, reopening the gate.
    pub async fn settle(&self) {
        *self.state.lock().await = RequestState::Settled;
    }

    /// True while a request is outstanding.
    pub async fn is_pending(&self) -> bool {
        matches!(*self.state.lock().await, RequestState::Pending(_))
    }

    /// Cancels any pending request and settles the gate.
    pub async fn cancel(&self) {
        let mut state = self.state.lock().await;
        if let RequestState::Pending(token) = &*state {
            token.cancel();
        }
        *state = RequestState::Settled;
    }
}
