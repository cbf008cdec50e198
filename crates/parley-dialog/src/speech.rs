//! Speech collaborator traits.
//!
//! The turn driver never touches audio itself: it asks a `SpeechInput` for
//! the next utterance and hands replies to a `SpeechOutput`.

use async_trait::async_trait;

use crate::DialogError;

/// Source of user utterances.
#[async_trait]
pub trait SpeechInput: Send {
    /// Speak `prompt` (when given) and wait for the user's answer.
    ///
    /// Returns `Ok(None)` on silence or listening timeout. `retries` is the
    /// number of extra listening attempts the implementation may make on
    /// its own before giving up.
    async fn get_utterance(
        &mut self,
        prompt: Option<&str>,
        retries: u32,
    ) -> Result<Option<String>, DialogError>;
}

/// Sink for text to be spoken.
#[async_trait]
pub trait SpeechOutput: Send {
    async fn speak(&mut self, text: &str) -> Result<(), DialogError>;
}
