//! Session struct and lifecycle transitions.

use chrono::{DateTime, Utc};
use parley_common::ConversationId;
use tracing::{debug, info};

use super::types::SessionState;

/// Lifecycle state of the chat with the backend.
#[derive(Debug, Clone)]
pub struct Session {
    pub(super) active: bool,
    pub(super) conversation_id: ConversationId,
    pub(super) retry_count: u32,
    /// Reply fragments of the current turn.
    pub(super) message_buffer: Vec<String>,
    pub(super) state: SessionState,
    pub(super) started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            active: false,
            conversation_id: ConversationId::FIRST,
            retry_count: 0,
            message_buffer: Vec::new(),
            state: SessionState::Idle,
            started_at: None,
        }
    }

    /// Open a new conversation under a fresh conversation id.
    pub fn start_session(&mut self) {
        self.conversation_id = self.conversation_id.next();
        self.active = true;
        self.retry_count = 0;
        self.message_buffer.clear();
        self.state = SessionState::Processing;
        self.started_at = Some(Utc::now());
        info!(
            conversation_id = %self.conversation_id,
            sender_id = %self.sender_id(),
            "Session started"
        );
    }

    /// Re-activate the current conversation without changing its id, so
    /// the backend picks up where the dialog left off.
    pub fn resume_session(&mut self) {
        self.active = true;
        self.retry_count = 0;
        self.message_buffer.clear();
        self.state = SessionState::AwaitingInput;
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        info!(conversation_id = %self.conversation_id, "Session resumed");
    }

    /// Mark the session inactive. Calling it again is a no-op.
    pub fn stop_session(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        self.state = SessionState::Terminated;
        info!(conversation_id = %self.conversation_id, "Session stopped");
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn conversation_id(&self) -> ConversationId {
        self.conversation_id
    }

    /// Sender id the backend keys this conversation on.
    pub fn sender_id(&self) -> String {
        self.conversation_id.sender_id()
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn message_buffer(&self) -> &[String] {
        &self.message_buffer
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// When the current (or last) conversation was opened.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        if self.active {
            self.state = state;
        }
    }

    /// Count one empty utterance and return the new retry count.
    pub(crate) fn record_empty_utterance(&mut self) -> u32 {
        self.retry_count = self.retry_count.saturating_add(1);
        debug!(retry_count = self.retry_count, "Empty utterance");
        self.retry_count
    }

    pub(crate) fn reset_retries(&mut self) {
        self.retry_count = 0;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
