//! Speech settings validation.

use std::sync::OnceLock;

use regex::Regex;

use crate::schema::{ParleyConfig, SpeechOutputMode};

use super::helpers::{validate_not_blank, validate_range};

/// Rates end up inside an SSML attribute, so only keyword or percentage
/// forms are accepted ("slow", "x-fast", "80%", "+10%").
fn rate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[a-z]+(?:-[a-z]+)?|[+-]?\d{1,3}(?:\.\d+)?%)$")
            .expect("rate pattern is valid")
    })
}

pub(crate) fn validate_speech(errors: &mut Vec<String>, config: &ParleyConfig) {
    let rate = config.speech.rate.trim();
    if !rate.is_empty() && !rate_pattern().is_match(rate) {
        errors.push(format!(
            "speech.rate = {rate:?} is not a keyword (e.g. \"slow\") or percentage (e.g. \"80%\")"
        ));
    }
    validate_range(
        errors,
        "speech.listen_timeout_secs",
        config.speech.listen_timeout_secs,
        1,
        120,
    );
    if config.speech.output == SpeechOutputMode::Command {
        validate_not_blank(errors, "speech.command", &config.speech.command);
    }
}
