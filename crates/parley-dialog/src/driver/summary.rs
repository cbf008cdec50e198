//! Outcome of one run of the turn loop.

use std::fmt;

use chrono::{DateTime, Utc};
use parley_common::ConversationId;

/// Why a conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A stop phrase was heard or `stop_chat` was called.
    StopTrigger,
    /// The backend sent a `stop` command.
    BackendStop,
    /// Too many empty utterances in a row.
    RetriesExhausted,
    /// The backend could not be reached or answered garbage.
    BackendFailure,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EndReason::StopTrigger => "stop_trigger",
            EndReason::BackendStop => "backend_stop",
            EndReason::RetriesExhausted => "retries_exhausted",
            EndReason::BackendFailure => "backend_failure",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub conversation_id: ConversationId,
    /// User utterances forwarded to the backend (the greeting is not one).
    pub turns: u32,
    pub end_reason: EndReason,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: DateTime<Utc>,
}

impl ConversationSummary {
    /// Wall-clock length of the conversation, when its start is known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.started_at.map(|start| self.ended_at - start)
    }
}
