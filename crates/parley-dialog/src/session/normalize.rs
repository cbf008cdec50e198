//! Folding backend reply fragments into the message buffer.

use crate::markup::SpeechMarkup;
use crate::ReplyFragment;

use super::manager::Session;
use super::types::{NormalizedReply, NO_RESPONSE_SENTINEL};

impl Session {
    /// Replace the message buffer with the text fragments of `response`.
    ///
    /// Every text fragment resets the retry counter. Blank texts are
    /// skipped, and a reply without text leaves the sentinel in the buffer
    /// so there is always something to say.
    pub fn absorb_response(
        &mut self,
        response: &[ReplyFragment],
        markup: &SpeechMarkup,
    ) -> NormalizedReply {
        self.message_buffer.clear();
        let mut stop_requested = false;

        for fragment in response {
            if let Some(text) = fragment.text.as_deref().filter(|t| !t.trim().is_empty()) {
                self.message_buffer.push(markup.wrap(text));
                self.retry_count = 0;
            }
            if fragment.is_stop_command() {
                stop_requested = true;
            }
        }

        let has_text = !self.message_buffer.is_empty();
        if !has_text {
            self.message_buffer.push(NO_RESPONSE_SENTINEL.to_string());
        }

        NormalizedReply {
            spoken_text: self.message_buffer.join(" "),
            stop_requested,
            has_text,
        }
    }
}
