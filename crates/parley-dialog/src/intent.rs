//! Trigger-phrase intents.
//!
//! Phrases match on whole words after normalization, so "please stop chat
//! now" triggers `StopChat` while "stop chatting" does not.

use std::fmt;

use parley_common::normalize_phrase;

/// Chat intents reachable by voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    StartChat,
    StopChat,
    ResumeChat,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Intent::StartChat => write!(f, "start_chat"),
            Intent::StopChat => write!(f, "stop_chat"),
            Intent::ResumeChat => write!(f, "resume_chat"),
        }
    }
}

/// Maps utterances to intents through configured phrase sets.
#[derive(Debug, Clone, Default)]
pub struct IntentMatcher {
    /// (intent, normalized phrase) pairs.
    phrases: Vec<(Intent, String)>,
}

impl IntentMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `phrases` to `intent`. Blank phrases are ignored.
    pub fn with_phrases<I, S>(mut self, intent: Intent, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for phrase in phrases {
            let normalized = normalize_phrase(phrase.as_ref());
            if !normalized.is_empty() {
                self.phrases.push((intent, normalized));
            }
        }
        self
    }

    /// Best intent for `utterance`. The longest matching phrase wins, so
    /// "resume chat" beats a shorter "chat" bound elsewhere.
    pub fn match_intent(&self, utterance: &str) -> Option<Intent> {
        let text = normalize_phrase(utterance);
        if text.is_empty() {
            return None;
        }
        self.phrases
            .iter()
            .filter(|(_, phrase)| contains_words(&text, phrase))
            .max_by_key(|(_, phrase)| phrase.len())
            .map(|(intent, _)| *intent)
    }

    /// Whether any phrase bound to `intent` occurs in `utterance`.
    pub fn matches(&self, intent: Intent, utterance: &str) -> bool {
        let text = normalize_phrase(utterance);
        self.phrases
            .iter()
            .any(|(i, phrase)| *i == intent && contains_words(&text, phrase))
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}

fn contains_words(text: &str, phrase: &str) -> bool {
    format!(" {text} ").contains(&format!(" {phrase} "))
}
