// Topic relevance classification
//
// Substring counting against fixed keyword lists. The result is stored as
// message metadata; it does not gate the model call.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopicRelevance {
    Psychology,
    General,
    OffTopic,
}

impl fmt::Display for TopicRelevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TopicRelevance::Psychology => "psychology",
            TopicRelevance::General => "general",
            TopicRelevance::OffTopic => "off-topic",
        };
        f.write_str(name)
    }
}

const PSYCHOLOGY_KEYWORDS: &[&str] = &[
    // Indonesian: emotions and feelings
    "sedih", "bahagia", "marah", "takut", "cemas", "khawatir", "gelisah", "panik",
    "depresi", "stress", "tertekan", "frustasi", "kecewa", "putus asa", "hopeless",
    "kesepian", "sendiri", "terisolasi", "minder", "insecure", "percaya diri",
    "emosi", "emosional", "tidak stabil", "tidak tenang", "linglung",
    "lelah mental", "tidak bergairah", "terbebani", "hampa", "kosong", "capek", "lelah",
    // Indonesian: conditions
    "gangguan kecemasan", "bipolar", "skizofrenia", "ocd", "ptsd", "trauma",
    "fobia", "insomnia", "sulit tidur", "mimpi buruk", "halusinasi", "psikosis",
    "kesehatan jiwa", "kesehatan mental", "mental breakdown", "gangguan mental",
    // Indonesian: relationships
    "hubungan", "keluarga", "orang tua", "pernikahan", "perceraian", "putus",
    "teman", "pertemanan", "bullying", "konflik", "komunikasi", "toxic",
    "perselisihan", "dihindari", "diabaikan", "diacuhkan", "dijauhi",
    // Indonesian: behaviours
    "kebiasaan buruk", "kecanduan", "adiksi", "merokok", "alkohol", "narkoba",
    "gambling", "game online", "media sosial", "self harm", "melukai diri",
    "menyakiti diri", "mengisolasi diri", "menarik diri",
    // Indonesian: life
    "tujuan hidup", "makna hidup", "eksistensial", "identitas", "harga diri",
    "motivasi", "procrastination", "menunda", "perfectionist", "workaholic",
    "burnout", "quarter life crisis", "mid life crisis", "overwhelm",
    "overthinking", "pikiran negatif", "bingung", "tidak fokus",
    // Indonesian: therapy
    "psikologi", "psikiater", "psikolog", "terapi", "konseling",
    "mindfulness", "meditasi", "self care", "coping mechanism",
    // English
    "sad", "happy", "angry", "fear", "anxiety", "worried", "nervous", "panic",
    "depression", "stressed", "frustrated", "disappointed",
    "lonely", "isolated", "confidence", "self-esteem",
    "emotional", "unstable", "numb", "empty", "mentally tired", "burned out",
    "anxiety disorder", "schizophrenia", "phobia", "nightmare", "hallucination",
    "psychosis", "mental illness", "mental health", "breakdown", "relationship",
    "family", "parents", "marriage", "divorce", "breakup", "friends",
    "conflict", "communication", "ignored", "abandoned", "neglected",
    "addiction", "cutting", "withdrawing", "isolation",
    "life purpose", "meaning", "existential", "identity", "self-worth",
    "motivation", "overwhelmed", "psychology", "psychiatrist", "psychologist", "therapy",
    "counseling", "meditation", "coping", "feeling useless",
];

const OFF_TOPIC_KEYWORDS: &[&str] = &[
    "code", "programming", "javascript", "python", "html", "css", "database",
    "software", "hardware", "computer", "laptop", "smartphone", "aplikasi",
    "website", "internet", "wifi", "bluetooth", "coding", "debug",
    "matematika", "fisika", "kimia", "biologi", "calculus", "algebra",
    "business", "marketing", "sales", "profit", "investment", "trading",
    "football", "basketball", "soccer", "game", "movie", "music", "netflix",
    "recipe", "cooking", "food", "restaurant", "travel", "vacation", "hotel",
];

/// Generic help-seeking phrases that keep a message in scope
const GENERAL_KEYWORDS: &[&str] = &[
    "masalah", "problem", "bingung", "confused", "help", "bantuan",
    "advice", "saran", "solusi", "solution", "bagaimana", "how to", "mau bercerita", "cerita",
    "masukan", "bantu aku",
];

fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| text.contains(*k)).count()
}

/// Classify whether a message concerns mental-health subject matter
pub fn classify_topic(text: &str) -> TopicRelevance {
    let lower = text.to_lowercase();

    let psychology = count_matches(&lower, PSYCHOLOGY_KEYWORDS);
    let off_topic = count_matches(&lower, OFF_TOPIC_KEYWORDS);

    if off_topic > psychology && off_topic > 0 {
        TopicRelevance::OffTopic
    } else if psychology > 0 {
        TopicRelevance::Psychology
    } else if GENERAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TopicRelevance::General
    } else {
        TopicRelevance::OffTopic
    }
}
