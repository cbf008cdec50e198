//! The turn loop and its chat handlers.

use chrono::Utc;
use parley_common::new_turn_id;
use tracing::{debug, error, info, warn};

use crate::intent::{Intent, IntentMatcher};
use crate::markup::SpeechMarkup;
use crate::session::{NormalizedReply, Session, SessionState};
use crate::speech::{SpeechInput, SpeechOutput};
use crate::stats::ConversationStats;
use crate::{BackendTurnResponse, DialogBackend, DialogError, ReplyFragment};

use super::policy::TurnPolicy;
use super::summary::{ConversationSummary, EndReason};

/// Extra listening attempts requested from the speech input per prompt.
/// Empty input is handled by the session's retry budget instead.
const LISTEN_RETRIES: u32 = 0;

/// Drives one conversation at a time between a speech collaborator and a
/// dialog backend.
///
/// Every step is awaited in order; the session is only ever touched from
/// the task running the driver.
pub struct TurnDriver<B, S> {
    backend: B,
    speech: S,
    session: Session,
    policy: TurnPolicy,
    markup: SpeechMarkup,
    intents: IntentMatcher,
    stats: ConversationStats,
    /// Utterances forwarded in the current run.
    turns: u32,
    end_reason: Option<EndReason>,
}

impl<B, S> TurnDriver<B, S>
where
    B: DialogBackend,
    S: SpeechInput + SpeechOutput,
{
    pub fn new(backend: B, speech: S) -> Self {
        Self {
            backend,
            speech,
            session: Session::new(),
            policy: TurnPolicy::default(),
            markup: SpeechMarkup::none(),
            intents: IntentMatcher::new(),
            stats: ConversationStats::new(),
            turns: 0,
            end_reason: None,
        }
    }

    pub fn with_policy(mut self, policy: TurnPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_markup(mut self, markup: SpeechMarkup) -> Self {
        self.markup = markup;
        self
    }

    /// Phrases bound to `Intent::StopChat` end the session when heard
    /// inside the loop.
    pub fn with_intents(mut self, intents: IntentMatcher) -> Self {
        self.intents = intents;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stats(&self) -> &ConversationStats {
        &self.stats
    }

    pub fn policy(&self) -> &TurnPolicy {
        &self.policy
    }

    pub fn intents(&self) -> &IntentMatcher {
        &self.intents
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn speech_mut(&mut self) -> &mut S {
        &mut self.speech
    }

    /// Post `message` to the backend under the session's sender id.
    pub async fn send_to_backend(
        &mut self,
        message: &str,
    ) -> Result<BackendTurnResponse, DialogError> {
        let sender_id = self.session.sender_id();
        let turn_id = new_turn_id();
        debug!(%turn_id, %sender_id, message, "Sending message to backend");

        let result = self.backend.send(message, &sender_id).await;
        self.stats.record_backend_call(result.is_ok());

        match &result {
            Ok(response) => {
                debug!(%turn_id, fragments = response.len(), "Backend replied");
            }
            Err(e) => {
                error!(%turn_id, %sender_id, error = %e, "Backend request failed");
            }
        }
        result
    }

    /// Fold a backend reply into the session's message buffer.
    pub fn normalize_response(&mut self, response: &[ReplyFragment]) -> NormalizedReply {
        self.session.absorb_response(response, &self.markup)
    }

    /// Open a new conversation: greet the backend, then run the loop with
    /// its reply as the first prompt.
    pub async fn start_chat(&mut self) -> Result<ConversationSummary, DialogError> {
        self.session.start_session();
        self.stats.record_conversation();
        self.begin_run();

        let greeting = self.policy.greeting.clone();
        let seed = match self.exchange(&greeting).await {
            Ok(seed) => seed,
            Err(e) => {
                self.session.stop_session();
                return Err(e);
            }
        };
        self.run_turns(seed).await
    }

    /// End the conversation and say goodbye. Safe to call when no
    /// conversation is active.
    pub async fn stop_chat(&mut self) -> Result<(), DialogError> {
        if self.session.is_active() {
            self.finish(EndReason::StopTrigger);
        }
        self.speak_farewell().await
    }

    /// Continue the last conversation under the same sender id, so the
    /// backend keeps its dialog state. Starts a new chat if there is
    /// nothing to resume.
    pub async fn resume_chat(&mut self) -> Result<ConversationSummary, DialogError> {
        if self.stats.conversations() == 0 {
            debug!("Nothing to resume, starting a new chat");
            return self.start_chat().await;
        }
        self.session.resume_session();
        self.begin_run();
        self.run_turns(None).await
    }

    /// Run the turn loop until the session stops.
    ///
    /// `prompt_seed` is spoken as the prompt of the first listen. A speech
    /// failure stops the session and is returned to the caller.
    pub async fn run_turns(
        &mut self,
        prompt_seed: Option<String>,
    ) -> Result<ConversationSummary, DialogError> {
        if let Err(e) = self.turn_loop(prompt_seed).await {
            error!(
                conversation_id = %self.session.conversation_id(),
                error = %e,
                "Speech failure, ending conversation"
            );
            self.session.stop_session();
            return Err(e);
        }

        let summary = self.summary();
        info!(
            conversation_id = %summary.conversation_id,
            turns = summary.turns,
            end_reason = %summary.end_reason,
            "Conversation ended"
        );
        Ok(summary)
    }

    async fn turn_loop(&mut self, mut seed: Option<String>) -> Result<(), DialogError> {
        loop {
            if !self.session.is_active() {
                return self.speak_farewell().await;
            }

            self.session.set_state(SessionState::AwaitingInput);
            let utterance = self
                .speech
                .get_utterance(seed.as_deref(), LISTEN_RETRIES)
                .await?
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty());

            let Some(utterance) = utterance else {
                self.stats.record_empty_utterance();
                let retries = self.session.record_empty_utterance();
                if retries >= self.policy.max_retries {
                    warn!(retries, "No input heard, ending conversation");
                    self.finish(EndReason::RetriesExhausted);
                } else {
                    debug!(retries, max = self.policy.max_retries, "No input heard, listening again");
                }
                seed = None;
                continue;
            };

            if self.intents.matches(Intent::StopChat, &utterance) {
                info!(%utterance, "Stop phrase heard");
                self.finish(EndReason::StopTrigger);
                continue;
            }

            self.session.reset_retries();
            self.turns = self.turns.saturating_add(1);
            seed = self.exchange(&utterance).await?;
        }
    }

    /// One backend round trip.
    ///
    /// Returns the reply to use as the next prompt, or `None` when the
    /// session has stopped (backend `stop` command or backend failure). A
    /// final reply is spoken here since no prompt will carry it.
    async fn exchange(&mut self, message: &str) -> Result<Option<String>, DialogError> {
        self.session.set_state(SessionState::Processing);

        let response = match self.send_to_backend(message).await {
            Ok(response) => response,
            Err(e) => {
                self.finish(EndReason::BackendFailure);
                if let Some(notice) = self.policy.failure_notice.clone() {
                    warn!(error = %e, "Telling the user the backend is unavailable");
                    self.speech.speak(&notice).await?;
                }
                return Ok(None);
            }
        };

        let reply = self.normalize_response(&response);
        if reply.stop_requested {
            info!(
                conversation_id = %self.session.conversation_id(),
                "Backend requested stop"
            );
            self.finish(EndReason::BackendStop);
            if reply.has_text {
                self.speech.speak(&reply.spoken_text).await?;
            }
            return Ok(None);
        }

        Ok(Some(reply.spoken_text))
    }

    async fn speak_farewell(&mut self) -> Result<(), DialogError> {
        match self.policy.farewell.clone() {
            Some(farewell) => self.speech.speak(&farewell).await,
            None => Ok(()),
        }
    }

    fn begin_run(&mut self) {
        self.turns = 0;
        self.end_reason = None;
    }

    /// Stop the session, keeping the first reason recorded for this run.
    fn finish(&mut self, reason: EndReason) {
        self.end_reason.get_or_insert(reason);
        self.session.stop_session();
    }

    fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            conversation_id: self.session.conversation_id(),
            turns: self.turns,
            end_reason: self.end_reason.unwrap_or(EndReason::StopTrigger),
            started_at: self.session.started_at(),
            ended_at: Utc::now(),
        }
    }
}
