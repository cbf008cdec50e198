use serde::{Deserialize, Serialize};
use std::fmt;

/// Short hex id used to correlate the log lines of one conversation turn.
pub fn new_turn_id() -> String {
    let uuid = uuid::Uuid::new_v4();
    let bytes = uuid.as_bytes();
    format!(
        "{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3]
    )
}

/// Monotonic conversation counter. The backend keys its dialog state on
/// the sender id derived from it, so every new conversation gets a fresh
/// backend tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(u64);

impl ConversationId {
    pub const FIRST: ConversationId = ConversationId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Sender id sent to the backend, e.g. `user2`.
    pub fn sender_id(self) -> String {
        format!("user{}", self.0)
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
