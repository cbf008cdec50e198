//! Trigger phrases for the chat intents.

use serde::{Deserialize, Serialize};

/// Phrase sets bound to the start, stop and resume intents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    pub start: Vec<String>,
    pub stop: Vec<String>,
    pub resume: Vec<String>,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            start: vec![
                "start chat".into(),
                "chat with rasa".into(),
                "talk to rasa".into(),
            ],
            stop: vec!["stop chat".into(), "end chat".into(), "stop the chat".into()],
            resume: vec!["resume chat".into()],
        }
    }
}
