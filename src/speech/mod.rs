//! Text-to-speech and speech-to-text through external programs.
//!
//! Synthesis spawns `tts_command -v <voice> <text>` (espeak-ng style) and
//! keeps the child so it can be killed. Recognition runs `stt_command` and
//! takes its trimmed stdout as the transcript.

use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result, bail};

pub const DEFAULT_TTS_COMMAND: &str = "espeak-ng";
/// Speech language used when the request language is `auto`
pub const FALLBACK_LANGUAGE: &str = "en-US";

pub const VOICE_ERROR_MESSAGE: &str = "❌ Voice recognition error.";

/// Language to speak in for a request language
pub fn speech_language(language: &str) -> &str {
    if language.is_empty() || language == "auto" { FALLBACK_LANGUAGE } else { language }
}

/// Arguments for the synthesis command: a chosen voice beats the language
pub fn tts_args(voice: Option<&str>, language: &str, text: &str) -> Vec<String> {
    let voice = voice.filter(|v| !v.is_empty()).unwrap_or_else(|| speech_language(language));
    vec!["-v".to_string(), voice.to_string(), text.to_string()]
}

/// Split a configured command line into program and arguments
fn split_command(command: &str) -> Result<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next().context("Speech command is empty")?;
    Ok((program, parts.collect()))
}

pub struct Speaker {
    command: String,
    voice: Option<String>,
    child: Option<Child>,
}

impl Speaker {
    pub fn new(command: impl Into<String>, voice: Option<String>) -> Self {
        Self { command: command.into(), voice, child: None }
    }

    pub fn voice(&self) -> Option<&str> {
        self.voice.as_deref()
    }

    pub fn set_voice(&mut self, voice: Option<String>) {
        self.voice = voice;
    }

    /// Start reading `text` aloud, interrupting anything already playing
    pub fn speak(&mut self, text: &str, language: &str) -> Result<()> {
        if text.trim().is_empty() {
            bail!("Nothing to speak");
        }
        self.stop();

        let (program, mut args) = split_command(&self.command)?;
        let extra = tts_args(self.voice.as_deref(), language, text);
        args.extend(extra.iter().map(String::as_str));

        let child = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start {program}"))?;
        tracing::info!(program, chars = text.chars().count(), "Speaking summary");
        self.child = Some(child);
        Ok(())
    }

    /// Kill the running synthesis. Returns true if something was playing.
    pub fn stop(&mut self) -> bool {
        let Some(mut child) = self.child.take() else {
            return false;
        };
        let running = matches!(child.try_wait(), Ok(None));
        if running {
            if let Err(e) = child.kill() {
                tracing::warn!(error = %e, "Failed to stop speech synthesis");
            }
            let _ = child.wait();
        }
        running
    }
}

impl Drop for Speaker {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Run the recognition command and return what it heard
pub async fn recognize(command: &str) -> Result<String> {
    let (program, args) = split_command(command)?;
    let output = tokio::process::Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .with_context(|| format!("Failed to run {program}"))?;

    if !output.status.success() {
        bail!("{program} exited with {}", output.status);
    }
    let heard = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if heard.is_empty() {
        bail!("Nothing was recognized");
    }
    Ok(heard)
}
