//! Builds the dialog engine pieces from the loaded config.

use std::time::Duration;

use parley_config::schema::{SpeechOutputMode, TriggerConfig};
use parley_config::ParleyConfig;
use parley_dialog::{Intent, IntentMatcher, RestConfig, SpeechMarkup, TurnPolicy};

use crate::console::TtsCommand;

pub fn rest_config(config: &ParleyConfig) -> RestConfig {
    RestConfig::new(config.backend.endpoint.clone())
        .with_timeout(Duration::from_secs(config.backend.timeout_secs.into()))
        .with_connect_timeout(Duration::from_secs(
            config.backend.connect_timeout_secs.into(),
        ))
}

pub fn turn_policy(config: &ParleyConfig) -> TurnPolicy {
    TurnPolicy::default()
        .with_greeting(config.dialog.greeting.clone())
        .with_farewell(config.dialog.farewell.clone())
        .with_failure_notice(config.dialog.failure_notice.clone())
        .with_max_retries(config.dialog.max_retries)
}

pub fn speech_markup(config: &ParleyConfig) -> SpeechMarkup {
    SpeechMarkup::with_rate(config.speech.rate.clone())
}

pub fn intent_matcher(triggers: &TriggerConfig) -> IntentMatcher {
    IntentMatcher::new()
        .with_phrases(Intent::StartChat, &triggers.start)
        .with_phrases(Intent::StopChat, &triggers.stop)
        .with_phrases(Intent::ResumeChat, &triggers.resume)
}

pub fn listen_timeout(config: &ParleyConfig) -> Duration {
    Duration::from_secs(config.speech.listen_timeout_secs.into())
}

/// The TTS program to run, if speech output goes through one.
pub fn tts_command(config: &ParleyConfig) -> Option<TtsCommand> {
    match config.speech.output {
        SpeechOutputMode::Console => None,
        SpeechOutputMode::Command => TtsCommand::parse(&config.speech.command),
    }
}
