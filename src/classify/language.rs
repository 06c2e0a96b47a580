// Keyword-scored language detection (Indonesian / English)

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Conversation language
///
/// Indonesian is the default assumption about the user base, so it also wins
/// every tie during detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Short code ("id" / "en")
    pub fn code(&self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
        }
    }

    /// BCP 47 tag used for narration voices
    pub fn locale(&self) -> &'static str {
        match self {
            Language::Indonesian => "id-ID",
            Language::English => "en-US",
        }
    }

    /// Parse a short code or locale ("id", "id-ID", "en_US.UTF-8", ...)
    pub fn from_code(code: &str) -> Option<Self> {
        let lower = code.trim().to_lowercase();
        if lower.starts_with("id") || lower.starts_with("in") {
            Some(Language::Indonesian)
        } else if lower.starts_with("en") {
            Some(Language::English)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

const EXACT_MATCH_WEIGHT: u32 = 2;
const MARKER_BONUS: u32 = 5;

static INDONESIAN_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Basic words
        "saya", "aku", "kamu", "anda", "ini", "itu", "dan", "atau", "dengan", "untuk",
        "dari", "ke", "di", "pada", "yang", "adalah", "akan", "sudah", "sedang",
        "halo", "hai", "selamat", "terima", "kasih", "maaf", "bagaimana", "kenapa",
        "dimana", "kapan", "siapa", "apa", "bisa", "tidak", "ya", "baik", "buruk",
        "ingin", "mau", "harus", "perlu", "belum", "juga", "lagi",
        // Colloquial
        "tolong", "bantu", "gimana", "kayak", "sama", "jadi", "punya", "ada", "gak",
        "nggak", "engga", "enggak", "dong", "sih", "kok", "tapi", "kalau", "kalo",
        "bikin", "udah", "udh", "lg", "gw", "gue", "lo", "lu", "mereka", "kita",
        "kami", "dia", "beliau", "bapak", "ibu", "mas", "mbak", "pak", "bu",
        // Feelings
        "senang", "sedih", "marah", "takut", "cemas", "bahagia", "kecewa", "lelah",
        "capek", "stress", "bingung", "gelisah", "khawatir", "panik", "depresi",
    ]
    .into_iter()
    .collect()
});

static ENGLISH_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Basic words
        "i", "you", "the", "and", "or", "with", "for", "from", "to", "in", "on",
        "that", "is", "will", "have", "has", "hello", "hi", "thank", "sorry",
        "how", "why", "where", "when", "who", "what", "can", "not", "yes", "good", "bad",
        "want", "need", "should", "would", "could", "must", "may", "might",
        // Conversational
        "help", "please", "thanks", "okay", "well", "just", "like", "know", "think",
        "feel", "make", "get", "go", "come", "see", "look", "take", "give", "work",
        "time", "way", "day", "man", "woman", "people", "life", "world", "hand",
        // Feelings
        "happy", "sad", "angry", "scared", "anxious", "worried", "tired", "stressed",
        "confused", "nervous", "panic", "depressed", "upset", "frustrated",
    ]
    .into_iter()
    .collect()
});

/// Colloquial particles that only show up in Indonesian chat
const INDONESIAN_MARKERS: &[&str] = &["gak", "nggak", "enggak", "gimana", "kayak", "dong", "sih", "kok"];

/// English contractions
const ENGLISH_MARKERS: &[&str] = &["i'm", "don't", "can't", "won't", "it's", "that's"];

static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^[:word:]\s]").expect("valid punctuation regex"));

/// Detect whether a message is written in Indonesian or English
pub fn detect_language(text: &str) -> Language {
    let (indonesian, english) = language_scores(text);
    if indonesian >= english {
        Language::Indonesian
    } else {
        Language::English
    }
}

/// Raw (indonesian, english) scores, exposed for diagnostics
pub fn language_scores(text: &str) -> (u32, u32) {
    let lower = text.to_lowercase();
    let stripped = NON_WORD.replace_all(&lower, " ");

    let mut indonesian = 0;
    let mut english = 0;

    // Single letters ("i", "a", "d") carry no signal
    for token in stripped.split_whitespace().filter(|t| t.chars().count() > 1) {
        if INDONESIAN_WORDS.contains(token) {
            indonesian += EXACT_MATCH_WEIGHT;
        }
        if ENGLISH_WORDS.contains(token) {
            english += EXACT_MATCH_WEIGHT;
        }
    }

    if INDONESIAN_MARKERS.iter().any(|m| lower.contains(m)) {
        indonesian += MARKER_BONUS;
    }
    if ENGLISH_MARKERS.iter().any(|m| lower.contains(m)) {
        english += MARKER_BONUS;
    }

    (indonesian, english)
}
