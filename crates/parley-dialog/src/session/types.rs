//! Session state machine and normalized reply types.

use std::fmt;

/// Spoken when the backend answered without any text fragment.
pub const NO_RESPONSE_SENTINEL: &str = "no response from backend";

/// Where the session is in the turn loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No conversation has been started yet.
    #[default]
    Idle,
    /// Waiting for the user to say something.
    AwaitingInput,
    /// A backend round trip is in progress.
    Processing,
    /// The last conversation ended; behaves like `Idle` for a new start.
    Terminated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::AwaitingInput => "awaiting_input",
            SessionState::Processing => "processing",
            SessionState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// A backend reply folded into one speakable string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    /// Space-joined message buffer; never empty.
    pub spoken_text: String,
    /// The backend sent a `stop` command.
    pub stop_requested: bool,
    /// At least one text fragment was present (false means `spoken_text`
    /// is the sentinel).
    pub has_text: bool,
}
