//! Turn loop tests with scripted backend and speech collaborators.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::*;
use crate::{
    BackendTurnResponse, DialogBackend, DialogError, Intent, IntentMatcher, ReplyFragment,
    SessionState, SpeechInput, SpeechMarkup, SpeechOutput, NO_RESPONSE_SENTINEL,
};

/// Replays canned responses and records every request.
#[derive(Default)]
struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<BackendTurnResponse, DialogError>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedBackend {
    fn new(responses: Vec<Result<BackendTurnResponse, DialogError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DialogBackend for ScriptedBackend {
    async fn send(
        &self,
        message: &str,
        sender_id: &str,
    ) -> Result<BackendTurnResponse, DialogError> {
        self.requests
            .lock()
            .unwrap()
            .push((message.to_string(), sender_id.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(vec![ReplyFragment::text("ok")]))
    }
}

/// Hands out scripted utterances (silence once exhausted) and records
/// prompts and spoken text.
#[derive(Default)]
struct ScriptedSpeech {
    utterances: VecDeque<Option<String>>,
    prompts: Vec<Option<String>>,
    spoken: Vec<String>,
    fail_listen: bool,
}

impl ScriptedSpeech {
    fn new(utterances: &[Option<&str>]) -> Self {
        Self {
            utterances: utterances.iter().map(|u| u.map(String::from)).collect(),
            ..Self::default()
        }
    }
}

#[async_trait]
impl SpeechInput for ScriptedSpeech {
    async fn get_utterance(
        &mut self,
        prompt: Option<&str>,
        retries: u32,
    ) -> Result<Option<String>, DialogError> {
        assert_eq!(retries, 0);
        self.prompts.push(prompt.map(String::from));
        if self.fail_listen {
            return Err(DialogError::Speech("microphone unavailable".into()));
        }
        Ok(self.utterances.pop_front().flatten())
    }
}

#[async_trait]
impl SpeechOutput for ScriptedSpeech {
    async fn speak(&mut self, text: &str) -> Result<(), DialogError> {
        self.spoken.push(text.to_string());
        Ok(())
    }
}

fn text(t: &str) -> Result<BackendTurnResponse, DialogError> {
    Ok(vec![ReplyFragment::text(t)])
}

fn driver(
    responses: Vec<Result<BackendTurnResponse, DialogError>>,
    utterances: &[Option<&str>],
) -> TurnDriver<ScriptedBackend, ScriptedSpeech> {
    TurnDriver::new(
        ScriptedBackend::new(responses),
        ScriptedSpeech::new(utterances),
    )
}

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(m, s)| (m.to_string(), s.to_string()))
        .collect()
}

#[tokio::test]
async fn greeting_reply_becomes_first_prompt() {
    let mut driver = driver(
        vec![text("hi there"), text("nice to meet you")],
        &[Some("hallo")],
    );

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(
        driver.backend().requests(),
        pairs(&[("hello", "user2"), ("hallo", "user2")])
    );
    assert_eq!(driver.speech().prompts[0].as_deref(), Some("hi there"));
    assert_eq!(driver.speech().prompts[1].as_deref(), Some("nice to meet you"));
    assert_eq!(summary.turns, 1);
    assert_eq!(summary.conversation_id.value(), 2);
}

#[tokio::test]
async fn retries_exhausted_after_second_empty_utterance() {
    let mut driver = driver(vec![text("hi there")], &[None, None, Some("too late")])
        .with_policy(TurnPolicy::default().with_max_retries(2));

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::RetriesExhausted);
    assert_eq!(summary.turns, 0);
    assert_eq!(driver.backend().requests().len(), 1);
    assert_eq!(
        driver.speech().prompts,
        vec![Some("hi there".to_string()), None]
    );
    assert_eq!(driver.speech().spoken, vec!["Goodbye.".to_string()]);
    assert!(!driver.session().is_active());
    assert_eq!(driver.session().state(), SessionState::Terminated);
    assert_eq!(driver.stats().empty_utterances(), 2);
}

#[tokio::test]
async fn utterance_resets_retry_budget() {
    let mut driver = driver(vec![text("hi"), text("sure")], &[None, Some("yes"), None, None])
        .with_policy(TurnPolicy::default().with_max_retries(2));

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::RetriesExhausted);
    assert_eq!(summary.turns, 1);
    assert_eq!(driver.speech().prompts.len(), 4);
}

#[tokio::test]
async fn whitespace_utterance_counts_as_empty() {
    let mut driver = driver(vec![text("hi")], &[Some("   ")])
        .with_policy(TurnPolicy::default().with_max_retries(1));

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::RetriesExhausted);
    assert_eq!(driver.backend().requests().len(), 1);
}

#[tokio::test]
async fn backend_stop_command_ends_loop() {
    let mut driver = driver(
        vec![
            text("hi there"),
            Ok(vec![ReplyFragment::text("Bye!"), ReplyFragment::command("stop")]),
        ],
        &[Some("goodbye"), Some("never asked")],
    );

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::BackendStop);
    assert_eq!(driver.speech().prompts.len(), 1);
    assert_eq!(
        driver.speech().spoken,
        vec!["Bye!".to_string(), "Goodbye.".to_string()]
    );
    assert!(!driver.session().is_active());
}

#[tokio::test]
async fn stop_without_text_skips_sentinel() {
    let mut driver = driver(
        vec![text("hi"), Ok(vec![ReplyFragment::command("stop")])],
        &[Some("bye")],
    );

    driver.start_chat().await.unwrap();

    assert_eq!(driver.speech().spoken, vec!["Goodbye.".to_string()]);
}

#[tokio::test]
async fn reply_without_text_prompts_with_sentinel() {
    let mut driver = driver(vec![Ok(vec![])], &[])
        .with_policy(TurnPolicy::default().with_max_retries(1));

    driver.start_chat().await.unwrap();

    assert_eq!(
        driver.speech().prompts[0].as_deref(),
        Some(NO_RESPONSE_SENTINEL)
    );
}

#[tokio::test]
async fn greeting_failure_speaks_notice_then_farewell() {
    let mut driver = driver(vec![Err(DialogError::Timeout)], &[Some("unused")]);

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::BackendFailure);
    assert!(driver.speech().prompts.is_empty());
    assert_eq!(
        driver.speech().spoken,
        vec![
            "Sorry, I can't reach the assistant right now.".to_string(),
            "Goodbye.".to_string(),
        ]
    );
    assert_eq!(driver.stats().backend_failures(), 1);
    assert!(!driver.session().is_active());
}

#[tokio::test]
async fn mid_conversation_failure_ends_session() {
    let mut driver = driver(
        vec![
            text("hi"),
            Err(DialogError::BackendStatus {
                status: 500,
                body: "boom".into(),
            }),
        ],
        &[Some("hello?"), Some("anyone?")],
    )
    .with_policy(TurnPolicy::default().with_failure_notice("").with_farewell(""));

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::BackendFailure);
    assert_eq!(summary.turns, 1);
    assert_eq!(driver.backend().requests().len(), 2);
    assert!(driver.speech().spoken.is_empty());
    assert_eq!(driver.stats().backend_calls(), 2);
    assert_eq!(driver.stats().completed_turns(), 1);
}

#[tokio::test]
async fn stop_phrase_ends_session_locally() {
    let intents = IntentMatcher::new().with_phrases(Intent::StopChat, ["stop chat"]);
    let mut driver =
        driver(vec![text("hi")], &[Some("OK, stop chat please")]).with_intents(intents);

    let summary = driver.start_chat().await.unwrap();

    assert_eq!(summary.end_reason, EndReason::StopTrigger);
    assert_eq!(driver.backend().requests().len(), 1);
    assert_eq!(driver.speech().spoken, vec!["Goodbye.".to_string()]);
}

#[tokio::test]
async fn stop_chat_when_idle_only_says_goodbye() {
    let mut driver = driver(vec![], &[]);

    driver.stop_chat().await.unwrap();
    driver.stop_chat().await.unwrap();

    assert_eq!(driver.session().state(), SessionState::Idle);
    assert_eq!(driver.session().conversation_id().value(), 1);
    assert!(driver.backend().requests().is_empty());
    assert_eq!(driver.speech().spoken.len(), 2);
}

#[tokio::test]
async fn each_start_uses_a_new_sender_id() {
    let mut driver = driver(vec![], &[]).with_policy(TurnPolicy::default().with_max_retries(1));

    driver.start_chat().await.unwrap();
    driver.start_chat().await.unwrap();

    assert_eq!(
        driver.backend().requests(),
        pairs(&[("hello", "user2"), ("hello", "user3")])
    );
    assert_eq!(driver.stats().conversations(), 2);
}

#[tokio::test]
async fn resume_keeps_sender_id_and_skips_greeting() {
    let mut driver = driver(
        vec![text("hi"), text("welcome back")],
        &[None, Some("where were we")],
    )
    .with_policy(TurnPolicy::default().with_max_retries(1));

    driver.start_chat().await.unwrap();
    let summary = driver.resume_chat().await.unwrap();

    assert_eq!(
        driver.backend().requests(),
        pairs(&[("hello", "user2"), ("where were we", "user2")])
    );
    assert_eq!(driver.speech().prompts[1], None);
    assert_eq!(summary.conversation_id.value(), 2);
    assert_eq!(summary.turns, 1);
    assert_eq!(driver.stats().conversations(), 1);
}

#[tokio::test]
async fn resume_without_history_starts_chat() {
    let mut driver = driver(vec![text("hi")], &[])
        .with_policy(TurnPolicy::default().with_max_retries(1));

    driver.resume_chat().await.unwrap();

    assert_eq!(driver.backend().requests(), pairs(&[("hello", "user2")]));
}

#[tokio::test]
async fn speech_failure_propagates_and_stops_session() {
    let mut driver = driver(vec![text("hi")], &[]);
    driver.speech_mut().fail_listen = true;

    let err = driver.start_chat().await.unwrap_err();

    assert!(matches!(err, DialogError::Speech(_)));
    assert!(!driver.session().is_active());
    assert!(driver.speech().spoken.is_empty());
}

#[tokio::test]
async fn replies_are_wrapped_with_configured_rate() {
    let mut driver = driver(vec![text("hi there")], &[])
        .with_markup(SpeechMarkup::with_rate("slow"))
        .with_policy(TurnPolicy::default().with_max_retries(1));

    driver.start_chat().await.unwrap();

    assert_eq!(
        driver.speech().prompts[0].as_deref(),
        Some("<prosody rate='slow'>hi there</prosody>")
    );
}

#[tokio::test]
async fn normalize_response_clears_previous_turn() {
    let mut driver = driver(vec![], &[]);
    driver.normalize_response(&[ReplyFragment::text("one")]);
    let reply = driver.normalize_response(&[ReplyFragment::text("two")]);
    assert_eq!(reply.spoken_text, "two");
    assert_eq!(driver.session().message_buffer(), ["two".to_string()]);
}

#[tokio::test]
async fn send_to_backend_uses_session_sender_id() {
    let mut driver = driver(vec![text("pong")], &[]);
    let response = driver.send_to_backend("ping").await.unwrap();
    assert_eq!(response, vec![ReplyFragment::text("pong")]);
    assert_eq!(driver.backend().requests(), pairs(&[("ping", "user1")]));
}
