// Crisis risk assessor
//
// Phrase lists are evaluated in strict priority order (critical, high,
// medium). A critical phrase must never be downgraded by a lower-severity
// phrase elsewhere in the same text.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Ordered severity of self-harm / crisis indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskKeywords {
    pub critical: Vec<String>,
    pub high: Vec<String>,
    pub medium: Vec<String>,
}

impl Default for RiskKeywords {
    fn default() -> Self {
        Self {
            critical: to_owned(DEFAULT_CRITICAL),
            high: to_owned(DEFAULT_HIGH),
            medium: to_owned(DEFAULT_MEDIUM),
        }
    }
}

fn to_owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const DEFAULT_CRITICAL: &[&str] = &[
    // Suicidal ideation
    "bunuh diri", "suicide", "mengakhiri hidup", "end my life", "ending my life",
    "tidak ingin hidup", "want to die", "ingin mati", "lebih baik mati",
    "better off dead", "kill myself", "membunuh diri", "take my own life",
    "mengambil nyawa sendiri", "tidak ada gunanya hidup", "life is meaningless",
    "hidup tidak ada artinya", "mau mati", "pengen mati", "wish i was dead", "kill my self",
    // Self-harm
    "melukai diri", "self harm", "menyakiti diri", "hurt myself", "cutting myself",
    "memotong diri", "menyayat", "melukai tubuh", "harm myself", "injure myself",
    "self injury", "self mutilation", "burning myself", "membakar diri",
    // Immediate danger
    "akan bunuh diri", "going to kill myself", "planning to die", "ready to die",
    "siap mati", "mau mengakhiri semuanya", "end it all", "tidak tahan lagi",
    "can't go on", "tidak bisa lanjut", "sudah tidak kuat", "give up on life",
    "menyerah pada hidup", "tired of living", "capek hidup",
];

const DEFAULT_HIGH: &[&str] = &[
    "depresi berat", "severe depression", "sangat tertekan", "extremely depressed",
    "putus asa total", "completely hopeless", "tidak ada harapan", "no hope left",
    "tidak berguna sama sekali", "completely worthless", "gagal total",
    "complete failure", "menyerah", "giving up", "tidak kuat lagi",
    "can't take it anymore", "sudah tidak sanggup", "overwhelmed completely",
    "kewalahan total", "breakdown", "mental breakdown", "collapse",
    "runtuh", "hancur", "destroyed", "devastated", "terpuruk",
    "rock bottom", "titik terendah", "desperate", "putus asa",
    "helpless", "tidak berdaya", "powerless", "trapped", "terjebak",
    "capek banget sama hidup ini", "sangat capek", "sangat lelah", "sangat putus asa",
];

const DEFAULT_MEDIUM: &[&str] = &[
    "sedih banget", "very sad", "sangat sedih", "extremely sad",
    "stress berat", "severe stress", "cemas berlebihan", "excessive anxiety",
    "takut sekali", "very afraid", "khawatir berlebihan", "overthinking",
    "tidak bisa tidur", "can't sleep", "insomnia", "mimpi buruk",
    "nightmares", "panic attack", "serangan panik", "anxiety attack",
    "lelah mental", "mentally exhausted", "burnout", "kewalahan",
    "overwhelmed", "tertekan", "under pressure", "bingung sekali",
    "very confused", "lost", "kehilangan arah", "tidak tahu harus apa",
];

#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    keywords: RiskKeywords,
}

impl RiskAssessor {
    pub fn new(keywords: RiskKeywords) -> Self {
        Self { keywords }
    }

    /// Load risk phrase lists from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read risk keywords file: {}", path.display()))?;

        let keywords: RiskKeywords =
            serde_json::from_str(&contents).context("Failed to parse risk keywords JSON")?;

        Ok(Self { keywords })
    }

    /// Use the file at `path` when given, built-in lists otherwise
    pub fn from_optional_file(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Assess the crisis risk of a message
    pub fn assess(&self, text: &str) -> RiskLevel {
        let text_lower = text.to_lowercase();

        if let Some(phrase) = first_match(&text_lower, &self.keywords.critical) {
            tracing::warn!("Critical risk detected: phrase '{}'", phrase);
            return RiskLevel::Critical;
        }

        if let Some(phrase) = first_match(&text_lower, &self.keywords.high) {
            tracing::warn!("High risk detected: phrase '{}'", phrase);
            return RiskLevel::High;
        }

        if let Some(phrase) = first_match(&text_lower, &self.keywords.medium) {
            tracing::debug!("Medium risk detected: phrase '{}'", phrase);
            return RiskLevel::Medium;
        }

        RiskLevel::Low
    }
}

fn first_match<'a>(text_lower: &str, phrases: &'a [String]) -> Option<&'a str> {
    phrases
        .iter()
        .find(|phrase| text_lower.contains(&phrase.to_lowercase()))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_assessor() -> RiskAssessor {
        let keywords = RiskKeywords {
            critical: vec!["kill myself".to_string(), "Mau Mati".to_string()],
            high: vec!["hopeless".to_string()],
            medium: vec!["can't sleep".to_string()],
        };
        RiskAssessor::new(keywords)
    }

    #[test]
    fn test_priority_order() {
        let assessor = create_test_assessor();

        assert_eq!(assessor.assess("I can't sleep and I want to kill myself"), RiskLevel::Critical);
        assert_eq!(assessor.assess("hopeless and I can't sleep"), RiskLevel::High);
        assert_eq!(assessor.assess("I can't sleep"), RiskLevel::Medium);
        assert_eq!(assessor.assess("What is the meaning of life?"), RiskLevel::Low);
    }

    #[test]
    fn test_case_insensitive() {
        let assessor = create_test_assessor();

        assert_eq!(assessor.assess("aku MAU MATI"), RiskLevel::Critical);
        assert_eq!(assessor.assess("HOPELESS"), RiskLevel::High);
    }

    #[test]
    fn test_default_lists() {
        let assessor = RiskAssessor::default();

        assert_eq!(assessor.assess("aku mau mati"), RiskLevel::Critical);
        assert_eq!(assessor.assess("I wish I was dead"), RiskLevel::Critical);
        assert_eq!(assessor.assess("aku merasa putus asa"), RiskLevel::High);
        assert_eq!(assessor.assess("aku sedih banget hari ini"), RiskLevel::Medium);
        assert_eq!(assessor.assess("halo, apa kabar?"), RiskLevel::Low);
    }

    #[test]
    fn test_critical_not_downgraded_by_medium_phrase() {
        let assessor = RiskAssessor::default();
        let text = "I'm overwhelmed, can't sleep, and I want to end my life";
        assert_eq!(assessor.assess(text), RiskLevel::Critical);
    }

    #[test]
    fn test_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("risk_keywords.json");
        std::fs::write(
            &path,
            r#"{"critical": ["bye forever"], "high": [], "medium": ["tired"]}"#,
        )
        .unwrap();

        let assessor = RiskAssessor::load_from_file(&path).unwrap();
        assert_eq!(assessor.assess("so tired, bye forever"), RiskLevel::Critical);
        assert_eq!(assessor.assess("so tired"), RiskLevel::Medium);
        assert_eq!(assessor.assess("aku mau mati"), RiskLevel::Low);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let result = RiskAssessor::load_from_file(Path::new("/nonexistent/risk.json"));
        assert!(result.is_err());
    }
}
