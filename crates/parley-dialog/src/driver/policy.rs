//! Static behavior of the turn loop.

/// Greeting, farewell and retry budget used by the turn driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnPolicy {
    /// First message sent to the backend when a chat starts.
    pub greeting: String,
    /// Spoken when the loop exits. `None` ends silently.
    pub farewell: Option<String>,
    /// Spoken when the backend cannot be reached. `None` skips it.
    pub failure_notice: Option<String>,
    /// Consecutive empty utterances that end the session.
    pub max_retries: u32,
}

impl Default for TurnPolicy {
    fn default() -> Self {
        Self {
            greeting: "hello".into(),
            farewell: Some("Goodbye.".into()),
            failure_notice: Some("Sorry, I can't reach the assistant right now.".into()),
            max_retries: 3,
        }
    }
}

impl TurnPolicy {
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    /// Blank text disables the farewell.
    pub fn with_farewell(mut self, farewell: impl Into<String>) -> Self {
        self.farewell = non_blank(farewell.into());
        self
    }

    /// Blank text disables the failure notice.
    pub fn with_failure_notice(mut self, notice: impl Into<String>) -> Self {
        self.failure_notice = non_blank(notice.into());
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
