//! Conversation wording and retry policy.

use serde::{Deserialize, Serialize};

/// Turn-loop policy settings.
///
/// Empty `farewell` or `failure_notice` strings mean "say nothing".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Message sent to the backend when a chat starts.
    pub greeting: String,
    /// Spoken once when a conversation ends.
    pub farewell: String,
    /// Spoken when the backend cannot be reached or answers garbage.
    pub failure_notice: String,
    /// Consecutive empty utterances tolerated before the chat ends (1-10).
    pub max_retries: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            greeting: "hello".into(),
            farewell: "Goodbye.".into(),
            failure_notice: "Sorry, I can't reach the assistant right now.".into(),
            max_retries: 3,
        }
    }
}
