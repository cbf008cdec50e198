//! Console speech: utterances are stdin lines, replies are `parley>` lines.
//!
//! In command mode every reply is also handed to an external TTS program
//! (`say`, `espeak`, ...) as its last argument.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use parley_dialog::markup::strip_markup;
use parley_dialog::{DialogError, SpeechInput, SpeechOutput};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};
use tokio::process::Command;
use tracing::{debug, warn};

const REPLY_PREFIX: &str = "parley> ";
const NOTE_PREFIX: &str = "-- ";

/// External text-to-speech program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsCommand {
    program: String,
    args: Vec<String>,
}

impl TtsCommand {
    /// Split a command line such as `espeak -s 140` on whitespace.
    /// Returns `None` for a blank command.
    pub fn parse(command: &str) -> Option<Self> {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    async fn say(&self, text: &str) {
        let result = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .output()
            .await;
        match result {
            Ok(output) if output.status.success() => {}
            Ok(output) => {
                warn!(program = %self.program, status = %output.status, "TTS command failed");
            }
            Err(e) => {
                warn!(program = %self.program, error = %e, "Failed to run TTS command");
            }
        }
    }
}

pub struct ConsoleSpeech<R, W> {
    lines: Lines<R>,
    out: W,
    listen_timeout: Duration,
    tts: Option<TtsCommand>,
}

impl ConsoleSpeech<BufReader<Stdin>, Stdout> {
    pub fn stdio(listen_timeout: Duration) -> Self {
        Self::new(
            BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            listen_timeout,
        )
    }
}

impl<R, W> ConsoleSpeech<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, out: W, listen_timeout: Duration) -> Self {
        Self {
            lines: reader.lines(),
            out,
            listen_timeout,
            tts: None,
        }
    }

    pub fn with_tts(mut self, tts: Option<TtsCommand>) -> Self {
        self.tts = tts;
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Next input line without a listening timeout. `None` at end of input.
    pub async fn read_line(&mut self) -> Result<Option<String>, DialogError> {
        self.lines.next_line().await.map_err(input_error)
    }

    /// Print a hint that is not part of the conversation.
    pub async fn note(&mut self, text: &str) -> Result<(), DialogError> {
        self.write_line(NOTE_PREFIX, text).await
    }

    async fn write_line(&mut self, prefix: &str, text: &str) -> Result<(), DialogError> {
        let line = format!("{prefix}{text}\n");
        self.out
            .write_all(line.as_bytes())
            .await
            .map_err(output_error)?;
        self.out.flush().await.map_err(output_error)
    }
}

#[async_trait]
impl<R, W> SpeechInput for ConsoleSpeech<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn get_utterance(
        &mut self,
        prompt: Option<&str>,
        _retries: u32,
    ) -> Result<Option<String>, DialogError> {
        if let Some(prompt) = prompt {
            self.speak(prompt).await?;
        }

        match tokio::time::timeout(self.listen_timeout, self.lines.next_line()).await {
            Ok(line) => {
                let line = line.map_err(input_error)?;
                Ok(line.filter(|l| !l.trim().is_empty()))
            }
            Err(_) => {
                debug!(timeout = ?self.listen_timeout, "Listening timed out");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<R, W> SpeechOutput for ConsoleSpeech<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn speak(&mut self, text: &str) -> Result<(), DialogError> {
        let plain = strip_markup(text);
        self.write_line(REPLY_PREFIX, &plain).await?;
        if let Some(tts) = &self.tts {
            tts.say(&plain).await;
        }
        Ok(())
    }
}

fn input_error(e: std::io::Error) -> DialogError {
    DialogError::Speech(format!("failed to read input: {e}"))
}

fn output_error(e: std::io::Error) -> DialogError {
    DialogError::Speech(format!("failed to write output: {e}"))
}
