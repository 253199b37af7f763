//! Debounced autosave timer.
//!
//! Every document or title change arms the timer; arming cancels the
//! previously armed token, so rapid edits collapse into a single save once
//! the quiescence window elapses.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub(crate) struct AutosaveTimer {
    debounce: Duration,
    armed: Mutex<Option<CancellationToken>>,
}

impl AutosaveTimer {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            armed: Mutex::new(None),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Cancels the previously armed token and returns a fresh one.
    pub async fn arm(&self) -> CancellationToken {
        let mut armed = self.armed.lock().await;
        if let Some(previous) = armed.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        *armed = Some(token.clone());
        token
    }

    /// Cancels any armed token without re-arming.
    pub async fn disarm(&self) {
        if let Some(token) = self.armed.lock().await.take() {
            token.cancel();
        }
    }
}
