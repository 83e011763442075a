use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::error::SpeechError;

/// Destination for spoken announcements. Implementations must not block on
/// playback; an utterance is handed off and the call returns.
pub trait SpeechSink: Send + Sync {
    fn speak(&self, text: &str) -> Result<(), SpeechError>;
}

/// Writes utterances to the log instead of speaking them.
pub struct LogSpeechSink;

impl SpeechSink for LogSpeechSink {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        info!(utterance = text, "announce");
        Ok(())
    }
}

pub struct UnsupportedSpeechSink;

impl SpeechSink for UnsupportedSpeechSink {
    fn speak(&self, _text: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }
}

/// Hands each utterance to an external text-to-speech program such as
/// `espeak` or `say`, passing the text as the last argument.
#[derive(Debug, Clone)]
pub struct CommandSpeechSink {
    program: String,
    voice: Option<String>,
}

impl CommandSpeechSink {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: Option<String>) -> Self {
        self.voice = voice;
        self
    }

    fn args<'a>(&'a self, text: &'a str) -> Vec<&'a str> {
        let mut args = Vec::with_capacity(3);
        if let Some(voice) = &self.voice {
            args.push("-v");
            args.push(voice.as_str());
        }
        args.push(text);
        args
    }
}

impl SpeechSink for CommandSpeechSink {
    fn speak(&self, text: &str) -> Result<(), SpeechError> {
        // Needs a tokio runtime with the process driver; the child is reaped
        // by tokio once dropped.
        Command::new(&self.program)
            .args(self.args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        Ok(())
    }
}
