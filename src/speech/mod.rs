// Speech output: text normalization and narration backends

mod narrator;
mod normalizer;

pub use narrator::{CommandNarrator, Narrator, SilentNarrator, Utterance};
pub use normalizer::{SpeechNormalizer, MAX_SPEECH_CHARS};
