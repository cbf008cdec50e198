//! Dialog engine for Parley.
//!
//! Relays user utterances to a REST dialog backend and turns its reply
//! fragments into speakable text:
//! - REST webhook client (`{message, sender_id}` in, fragment list out)
//! - Session lifecycle (conversation id, retry budget, message buffer)
//! - Turn driver running the listen / send / speak loop
//! - Prosody markup wrapping and trigger-phrase intents

pub mod driver;
pub mod intent;
pub mod markup;
pub mod rest;
pub mod session;
pub mod speech;
pub mod stats;

use async_trait::async_trait;

pub use driver::{ConversationSummary, EndReason, TurnDriver, TurnPolicy};
pub use intent::{Intent, IntentMatcher};
pub use markup::SpeechMarkup;
pub use rest::{RestClient, RestConfig};
pub use session::{NormalizedReply, Session, SessionState, NO_RESPONSE_SENTINEL};
pub use speech::{SpeechInput, SpeechOutput};
pub use stats::ConversationStats;

/// Ordered reply fragments returned by one backend call.
pub type BackendTurnResponse = Vec<ReplyFragment>;

/// A conversational backend reachable with one request per user turn.
#[async_trait]
pub trait DialogBackend: Send + Sync {
    async fn send(
        &self,
        message: &str,
        sender_id: &str,
    ) -> Result<BackendTurnResponse, DialogError>;
}

/// One element of the backend's reply array.
///
/// A fragment carries a `text` to speak, a `custom` payload with control
/// commands, or both. Other keys (`recipient_id`, `buttons`, ...) are ignored.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReplyFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

impl ReplyFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            custom: None,
        }
    }

    pub fn command(command: impl Into<String>) -> Self {
        Self {
            text: None,
            custom: Some(serde_json::json!({ "commands": command.into() })),
        }
    }

    /// The `custom.commands` string, if the payload has one.
    pub fn custom_command(&self) -> Option<&str> {
        self.custom.as_ref()?.get("commands")?.as_str()
    }

    /// Whether this fragment asks the client to end the conversation.
    pub fn is_stop_command(&self) -> bool {
        self.custom_command()
            .is_some_and(|c| c.trim().eq_ignore_ascii_case("stop"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("backend unreachable: {0}")]
    BackendUnreachable(String),
    #[error("backend returned HTTP {status}: {body}")]
    BackendStatus { status: u16, body: String },
    #[error("malformed backend response: {0}")]
    BackendMalformedResponse(String),
    #[error("backend request timed out")]
    Timeout,
    #[error("speech error: {0}")]
    Speech(String),
}

impl DialogError {
    /// True for every failure of the backend round trip, as opposed to
    /// failures of the local speech collaborators.
    pub fn is_backend_failure(&self) -> bool {
        !matches!(self, DialogError::Speech(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_parses_text_and_ignores_extra_keys() {
        let json = r#"{"recipient_id": "user2", "text": "hi there"}"#;
        let fragment: ReplyFragment = serde_json::from_str(json).unwrap();
        assert_eq!(fragment.text.as_deref(), Some("hi there"));
        assert!(fragment.custom.is_none());
        assert!(!fragment.is_stop_command());
    }

    #[test]
    fn fragment_parses_stop_command() {
        let json = r#"{"custom": {"commands": "stop"}}"#;
        let fragment: ReplyFragment = serde_json::from_str(json).unwrap();
        assert!(fragment.text.is_none());
        assert_eq!(fragment.custom_command(), Some("stop"));
        assert!(fragment.is_stop_command());
    }

    #[test]
    fn stop_command_is_trimmed_and_case_insensitive() {
        assert!(ReplyFragment::command(" STOP ").is_stop_command());
        assert!(!ReplyFragment::command("pause").is_stop_command());
    }

    #[test]
    fn custom_without_string_command_is_not_a_command() {
        let json = r#"{"custom": {"commands": ["stop"]}}"#;
        let fragment: ReplyFragment = serde_json::from_str(json).unwrap();
        assert_eq!(fragment.custom_command(), None);

        let json = r#"{"custom": "stop"}"#;
        let fragment: ReplyFragment = serde_json::from_str(json).unwrap();
        assert!(!fragment.is_stop_command());
    }

    #[test]
    fn null_text_is_absent() {
        let fragment: ReplyFragment = serde_json::from_str(r#"{"text": null}"#).unwrap();
        assert!(fragment.text.is_none());
    }

    #[test]
    fn error_display() {
        let err = DialogError::BackendStatus {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "backend returned HTTP 500: boom");
        assert_eq!(DialogError::Timeout.to_string(), "backend request timed out");
    }

    #[test]
    fn speech_errors_are_not_backend_failures() {
        assert!(DialogError::Timeout.is_backend_failure());
        assert!(DialogError::BackendUnreachable("refused".into()).is_backend_failure());
        assert!(!DialogError::Speech("mic".into()).is_backend_failure());
    }
}
