//! Conversation counters for one driver.

/// Running totals across every conversation a driver has handled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationStats {
    conversations: u64,
    backend_calls: u64,
    backend_failures: u64,
    empty_utterances: u64,
    completed_turns: u64,
}

impl ConversationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a started (not resumed) conversation.
    pub fn record_conversation(&mut self) {
        self.conversations = self.conversations.saturating_add(1);
    }

    /// Record one backend request, successful or not.
    pub fn record_backend_call(&mut self, succeeded: bool) {
        self.backend_calls = self.backend_calls.saturating_add(1);
        if succeeded {
            self.completed_turns = self.completed_turns.saturating_add(1);
        } else {
            self.backend_failures = self.backend_failures.saturating_add(1);
        }
    }

    pub fn record_empty_utterance(&mut self) {
        self.empty_utterances = self.empty_utterances.saturating_add(1);
    }

    pub fn conversations(&self) -> u64 {
        self.conversations
    }

    pub fn backend_calls(&self) -> u64 {
        self.backend_calls
    }

    pub fn backend_failures(&self) -> u64 {
        self.backend_failures
    }

    pub fn empty_utterances(&self) -> u64 {
        self.empty_utterances
    }

    /// Backend round trips that returned a usable reply.
    pub fn completed_turns(&self) -> u64 {
        self.completed_turns
    }
}
