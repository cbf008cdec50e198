//! Speech input/output settings.

use serde::{Deserialize, Serialize};

/// Where spoken replies go.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum SpeechOutputMode {
    /// Print replies to stdout only.
    #[default]
    Console,
    /// Print replies and pipe them to an external TTS program.
    Command,
}

/// Speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// Prosody rate applied to reply fragments (e.g. "slow", "80%").
    /// Empty disables markup wrapping.
    pub rate: String,
    /// How long to wait for an utterance before counting it as empty (1-120).
    pub listen_timeout_secs: u32,
    pub output: SpeechOutputMode,
    /// TTS program used in `command` mode; receives the text as its last argument.
    pub command: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: String::new(),
            listen_timeout_secs: 8,
            output: SpeechOutputMode::Console,
            command: "say".into(),
        }
    }
}
