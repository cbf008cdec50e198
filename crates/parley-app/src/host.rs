//! Console host: waits for trigger phrases and dispatches chat intents.

use parley_dialog::{ConversationSummary, DialogBackend, DialogError, Intent, TurnDriver};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

use crate::console::ConsoleSpeech;

pub type ConsoleDriver<B, R, W> = TurnDriver<B, ConsoleSpeech<R, W>>;

/// Read trigger lines until end of input, running a chat for each start
/// or resume phrase. With `once`, run a single chat immediately instead.
pub async fn run<B, R, W>(driver: &mut ConsoleDriver<B, R, W>, once: bool) -> Result<(), DialogError>
where
    B: DialogBackend,
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    if once {
        let summary = driver.start_chat().await?;
        log_summary(&summary);
        return Ok(());
    }

    driver
        .speech_mut()
        .note("say \"start chat\" to talk to the assistant")
        .await?;

    while let Some(line) = driver.speech_mut().read_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match driver.intents().match_intent(line) {
            Some(Intent::StartChat) => {
                let summary = driver.start_chat().await?;
                log_summary(&summary);
            }
            Some(Intent::ResumeChat) => {
                let summary = driver.resume_chat().await?;
                log_summary(&summary);
            }
            Some(Intent::StopChat) => driver.stop_chat().await?,
            None => {
                debug!(input = line, "No trigger phrase");
                driver.speech_mut().note("no chat running").await?;
            }
        }
    }

    let stats = driver.stats();
    info!(
        conversations = stats.conversations(),
        backend_calls = stats.backend_calls(),
        backend_failures = stats.backend_failures(),
        empty_utterances = stats.empty_utterances(),
        "Input closed"
    );
    Ok(())
}

fn log_summary(summary: &ConversationSummary) {
    info!(
        conversation_id = %summary.conversation_id,
        turns = summary.turns,
        end_reason = %summary.end_reason,
        duration_ms = summary.duration().map(|d| d.num_milliseconds()),
        "Chat finished"
    );
}
