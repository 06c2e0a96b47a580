// Narration backends
//
// CommandNarrator drives a system TTS program (espeak-ng by default) as a
// child process. Only one utterance plays at a time: speaking again kills
// the previous child first.

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard};

use super::SpeechNormalizer;
use crate::classify::Language;

/// Something that can read text aloud
pub trait Narrator: Send + Sync {
    /// Stop any current narration and start reading `text`
    ///
    /// Failures are never fatal to the caller; implementations log and skip.
    fn speak(&self, text: &str, language: Language) -> Result<()>;

    /// Stop the current narration, if any
    fn stop(&self);

    /// Whether narration can actually be produced
    fn is_available(&self) -> bool;
}

/// Voice and prosody for one utterance
///
/// Rate, volume and pitch are relative to the engine default (1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub voice: Option<String>,
    pub rate: f32,
    pub volume: f32,
    pub pitch: f32,
}

impl Utterance {
    /// Slightly slower, softer and warmer than the engine default
    pub fn preferred(language: Language) -> Self {
        Self {
            voice: Some(language.code().to_string()),
            rate: 0.85,
            volume: 0.9,
            pitch: 0.95,
        }
    }

    /// Used when the preferred voice is not installed
    pub fn fallback() -> Self {
        Self {
            voice: None,
            rate: 0.9,
            volume: 0.8,
            pitch: 1.0,
        }
    }

    /// espeak-ng arguments: words per minute (175), amplitude (100), pitch (50)
    pub fn espeak_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("-s".to_string());
        args.push(((175.0 * self.rate).round() as u32).to_string());
        args.push("-a".to_string());
        args.push(((100.0 * self.volume).round() as u32).to_string());
        args.push("-p".to_string());
        args.push(((50.0 * self.pitch).round() as u32).to_string());
        args
    }
}

/// Narrator backed by an external TTS command that reads text on stdin
pub struct CommandNarrator {
    command: String,
    current: Mutex<Option<Child>>,
    available: OnceCell<bool>,
    voices: Mutex<HashMap<Language, bool>>,
}

impl CommandNarrator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            current: Mutex::new(None),
            available: OnceCell::new(),
            voices: Mutex::new(HashMap::new()),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Block until the current utterance finishes
    pub fn wait(&self) {
        if let Some(mut child) = self.current().take() {
            if let Err(e) = child.wait() {
                tracing::debug!("Failed to wait for narration: {}", e);
            }
        }
    }

    fn current(&self) -> MutexGuard<'_, Option<Child>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ask the engine whether a voice for `language` is installed
    fn has_voice(&self, language: Language) -> bool {
        let mut voices = self.voices.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *voices.entry(language).or_insert_with(|| {
            let output = Command::new(&self.command)
                .arg(format!("--voices={}", language.code()))
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .output();

            match output {
                // First line is the column header
                Ok(out) if out.status.success() => {
                    String::from_utf8_lossy(&out.stdout).lines().skip(1).any(|l| !l.trim().is_empty())
                }
                _ => false,
            }
        })
    }

    fn spawn(&self, text: &str, utterance: &Utterance) -> std::io::Result<Child> {
        let mut child = Command::new(&self.command)
            .args(utterance.espeak_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        Ok(child)
    }
}

impl Narrator for CommandNarrator {
    fn speak(&self, text: &str, language: Language) -> Result<()> {
        self.stop();

        if !self.is_available() {
            tracing::warn!("Narration unavailable: '{}' not found", self.command);
            return Ok(());
        }

        let spoken = SpeechNormalizer::new(language).normalize(text);

        let utterance = if self.has_voice(language) {
            Utterance::preferred(language)
        } else {
            tracing::warn!("No {} voice installed, using default voice", language.locale());
            Utterance::fallback()
        };

        let child = match self.spawn(&spoken, &utterance) {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("Narration unavailable: {}", e);
                return Ok(());
            }
            Err(e) => {
                tracing::error!("Narration error: {}", e);
                self.spawn(&spoken, &Utterance::fallback())
                    .with_context(|| format!("Failed to start {}", self.command))?
            }
        };

        tracing::debug!(
            chars = spoken.chars().count(),
            pid = child.id(),
            "Narration started"
        );
        *self.current() = Some(child);
        Ok(())
    }

    fn stop(&self) {
        if let Some(mut child) = self.current().take() {
            if let Ok(None) = child.try_wait() {
                if let Err(e) = child.kill() {
                    tracing::debug!("Failed to stop narration: {}", e);
                }
            }
            let _ = child.wait();
        }
    }

    fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            Command::new(&self.command)
                .arg("--version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
                .map(|status| status.success())
                .unwrap_or(false)
        })
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Narrator that does nothing (narration disabled in config)
#[derive(Debug, Default)]
pub struct SilentNarrator;

impl Narrator for SilentNarrator {
    fn speak(&self, text: &str, _language: Language) -> Result<()> {
        tracing::debug!(chars = text.chars().count(), "Narration disabled, skipping");
        Ok(())
    }

    fn stop(&self) {}

    fn is_available(&self) -> bool {
        false
    }
}
