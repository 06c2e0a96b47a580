// Text normalization for narration
//
// Rewrites formatted model output (markdown, emoji, symbols, acronyms,
// numbers) into plain text a TTS engine reads naturally. Rules are applied
// in a fixed order; later steps rely on the characters earlier steps leave.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashMap;

use crate::classify::Language;

/// Narration is cut off past this many characters
pub const MAX_SPEECH_CHARS: usize = 1000;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Failed to compile speech normalization regex")
}

// Step 1: markup
static HORIZONTAL_RULE: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*[-*_]{3,}[ \t]*$"));
static TABLE_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| compile(r"(?m)^[ \t]*\|?[ \t]*:?-{3,}[-:| \t]*$"));
static FENCED_CODE: Lazy<Regex> = Lazy::new(|| compile(r"(?s)```.*?```"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| compile(r"`([^`]+)`"));
static IMAGE: Lazy<Regex> = Lazy::new(|| compile(r"!\[([^\]]*)\]\([^)]+\)"));
static LINK: Lazy<Regex> = Lazy::new(|| compile(r"\[([^\]]+)\]\([^)]+\)"));
static HEADING: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*#{1,6}[ \t]+"));
static BLOCKQUOTE: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*>[ \t]?"));
static BULLET: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*[-*+][ \t]+"));
static NUMBERED: Lazy<Regex> = Lazy::new(|| compile(r"(?m)^[ \t]*\d+\.[ \t]+"));
static BOLD_STARS: Lazy<Regex> = Lazy::new(|| compile(r"\*\*(.*?)\*\*"));
static BOLD_UNDERSCORES: Lazy<Regex> = Lazy::new(|| compile(r"__(.*?)__"));
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| compile(r"\*(.*?)\*"));
static ITALIC_UNDERSCORE: Lazy<Regex> = Lazy::new(|| compile(r"_(.*?)_"));
static STRIKETHROUGH: Lazy<Regex> = Lazy::new(|| compile(r"~~(.*?)~~"));

// Step 2: symbols
static DOLLAR_AMOUNT: Lazy<Regex> = Lazy::new(|| compile(r"\$(\d+)"));
static EURO_AMOUNT: Lazy<Regex> = Lazy::new(|| compile(r"€(\d+)"));
static POUND_AMOUNT: Lazy<Regex> = Lazy::new(|| compile(r"£(\d+)"));
static PERCENTAGE: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)%"));
static UNSPEAKABLE: Lazy<Regex> = Lazy::new(|| compile(r"[^[:word:]\s.,!?;:()\-/]"));
static REPEATED_DOTS: Lazy<Regex> = Lazy::new(|| compile(r"\.{2,}"));
static REPEATED_BANGS: Lazy<Regex> = Lazy::new(|| compile(r"!{2,}"));
static REPEATED_QUESTIONS: Lazy<Regex> = Lazy::new(|| compile(r"\?{2,}"));
static REPEATED_COMMAS: Lazy<Regex> = Lazy::new(|| compile(r",{2,}"));

// Step 3: abbreviations
static ABBREVIATION: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<&str> = ACRONYMS
        .iter()
        .map(|(abbr, _)| *abbr)
        .chain(["etc", "vs", "aka"])
        .collect();
    compile(&format!(r"(?i)\b({})\b", alternatives.join("|")))
});

// Step 4: numbers
static RUPIAH_AMOUNT: Lazy<Regex> = Lazy::new(|| compile(r"Rp\s?(\d+(?:\.\d{3})*)"));
static DECIMAL_COMMA: Lazy<Regex> = Lazy::new(|| compile(r"(\d+),(\d+)"));
static THOUSANDS_COMMA: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,3}),(\d{3})\b"));
static SLASH_DATE: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,2})/(\d{1,2})/(\d{4})"));
static DASH_DATE: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,2})-(\d{1,2})-(\d{4})"));
static CLOCK_TIME: Lazy<Regex> = Lazy::new(|| compile(r"(\d{1,2}):(\d{2})"));

// Steps 5 and 6: layout and punctuation
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| compile(r"[\r\n]+"));
static DOUBLED_BREAK: Lazy<Regex> = Lazy::new(|| compile(r"([.!?:;,])(\s*\.)+"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| compile(r"\s+"));
static LEADING_BREAKS: Lazy<Regex> = Lazy::new(|| compile(r"^[.\s]+"));
static SPACE_BEFORE_MARK: Lazy<Regex> = Lazy::new(|| compile(r"\s+([.,!?;:])"));
static SENTENCE_GAP: Lazy<Regex> = Lazy::new(|| compile(r"([.!?])\s*([A-Z])"));
static CLAUSE_GAP: Lazy<Regex> = Lazy::new(|| compile(r"([,;:])\s*"));
static TRAILING_CLAUSE_MARKS: Lazy<Regex> = Lazy::new(|| compile(r"[\s,;:]+$"));
static TERMINAL_RUN: Lazy<Regex> = Lazy::new(|| compile(r"([.!?])[.!?]*$"));

/// Acronyms spelled out letter by letter
const ACRONYMS: &[(&str, &str)] = &[
    ("AI", "A I"),
    ("TTS", "T T S"),
    ("API", "A P I"),
    ("URL", "U R L"),
    ("HTML", "H T M L"),
    ("CSS", "C S S"),
    ("JS", "J S"),
    ("FAQ", "F A Q"),
    ("CEO", "C E O"),
    ("HR", "H R"),
    ("IT", "I T"),
    ("UI", "U I"),
    ("UX", "U X"),
    ("GPS", "G P S"),
    ("SMS", "S M S"),
    ("WIFI", "Wi Fi"),
    ("USB", "U S B"),
    ("PDF", "P D F"),
    ("JPG", "J P G"),
    ("PNG", "P N G"),
    ("MP3", "M P 3"),
    ("MP4", "M P 4"),
    ("DVD", "D V D"),
    ("TV", "T V"),
    ("PC", "P C"),
    ("OS", "O S"),
    ("RAM", "R A M"),
    ("SSD", "S S D"),
    ("CPU", "C P U"),
    ("GPU", "G P U"),
    ("OCD", "O C D"),
    ("PTSD", "P T S D"),
    ("ADHD", "A D H D"),
    ("CBT", "C B T"),
    ("DBT", "D B T"),
    ("DSM", "D S M"),
    ("ICD", "I C D"),
    ("FYI", "F Y I"),
    ("ASAP", "A S A P"),
    ("DIY", "D I Y"),
    ("LOL", "L O L"),
    ("OMG", "O M G"),
    ("WTF", "W T F"),
    ("YOLO", "Y O L O"),
    ("AM", "A M"),
    ("PM", "P M"),
    ("GMT", "G M T"),
    ("UTC", "U T C"),
    ("USD", "U S D"),
    ("EUR", "E U R"),
    ("GBP", "G B P"),
    ("JPY", "J P Y"),
    ("IDR", "I D R"),
    ("SGD", "S G D"),
    ("MYR", "M Y R"),
    ("USA", "U S A"),
    ("UK", "U K"),
    ("UAE", "U A E"),
    ("EU", "E U"),
    ("UN", "U N"),
    ("WHO", "W H O"),
    ("NASA", "N A S A"),
    ("FBI", "F B I"),
    ("CIA", "C I A"),
    ("NATO", "N A T O"),
];

static ACRONYM_TABLE: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ACRONYMS.iter().copied().collect());

/// Per-language vocabulary used by the pipeline
struct Vocabulary {
    emoji: &'static [(&'static str, &'static str)],
    symbols: &'static [(char, &'static str)],
    etc: &'static str,
    aka: &'static str,
    percent: &'static str,
    decimal: Option<&'static str>,
    date_slash: &'static str,
    date_dash: &'static str,
    time_separator: &'static str,
    placeholder: &'static str,
}

static INDONESIAN: Vocabulary = Vocabulary {
    emoji: &[
        ("🚨", "peringatan"),
        ("💙", "hati biru"),
        ("❤️", "hati merah"),
        ("❤", "hati merah"),
        ("😊", "senyum"),
        ("😢", "sedih"),
        ("😔", "kecewa"),
        ("🤗", "peluk"),
        ("💪", "kuat"),
        ("🌟", "bintang"),
        ("✨", "berkilau"),
    ],
    symbols: &[
        ('&', "dan"),
        ('@', "at"),
        ('#', "hashtag"),
        ('$', "dollar"),
        ('%', "persen"),
        ('+', "plus"),
        ('=', "sama dengan"),
        ('<', "kurang dari"),
        ('>', "lebih dari"),
    ],
    etc: "dan lain-lain",
    aka: "alias",
    percent: "persen",
    decimal: Some("koma"),
    date_slash: "slash",
    date_dash: "strip",
    time_separator: " titik dua ",
    placeholder: "Teks kosong",
};

static ENGLISH: Vocabulary = Vocabulary {
    emoji: &[
        ("🚨", "alert"),
        ("💙", "blue heart"),
        ("❤️", "red heart"),
        ("❤", "red heart"),
        ("😊", "smile"),
        ("😢", "sad"),
        ("😔", "disappointed"),
        ("🤗", "hug"),
        ("💪", "strong"),
        ("🌟", "star"),
        ("✨", "sparkles"),
    ],
    symbols: &[
        ('&', "and"),
        ('@', "at"),
        ('#', "hashtag"),
        ('$', "dollar"),
        ('%', "percent"),
        ('+', "plus"),
        ('=', "equals"),
        ('<', "less than"),
        ('>', "greater than"),
    ],
    etc: "et cetera",
    aka: "also known as",
    percent: "percent",
    decimal: None,
    date_slash: "slash",
    date_dash: "dash",
    time_separator: " ",
    placeholder: "Empty text",
};

/// Prepares response text for narration
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeechNormalizer {
    language: Language,
}

impl SpeechNormalizer {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Run the full pipeline
    ///
    /// Never returns an empty string and never exceeds [`MAX_SPEECH_CHARS`].
    pub fn normalize(&self, text: &str) -> String {
        let vocab = self.vocabulary();

        let text = strip_markup(text);
        let text = replace_symbols(&text, vocab);
        let text = expand_abbreviations(&text, vocab);
        let text = normalize_numbers(&text, vocab);
        let text = collapse_layout(&text);
        let text = fix_punctuation(&text);

        finalize(text, vocab)
    }

    fn vocabulary(&self) -> &'static Vocabulary {
        match self.language {
            Language::Indonesian => &INDONESIAN,
            Language::English => &ENGLISH,
        }
    }
}

fn strip_markup(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "");
    let text = HORIZONTAL_RULE.replace_all(&text, "");
    let text = TABLE_SEPARATOR.replace_all(&text, "");
    let text = INLINE_CODE.replace_all(&text, "${1}");
    let text = IMAGE.replace_all(&text, "${1}");
    let text = LINK.replace_all(&text, "${1}");
    let text = HEADING.replace_all(&text, "");
    let text = BLOCKQUOTE.replace_all(&text, "");
    let text = BULLET.replace_all(&text, "");
    let text = NUMBERED.replace_all(&text, "");
    let text = BOLD_STARS.replace_all(&text, "${1}");
    let text = BOLD_UNDERSCORES.replace_all(&text, "${1}");
    let text = ITALIC_STAR.replace_all(&text, "${1}");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "${1}");
    let text = STRIKETHROUGH.replace_all(&text, "${1}");

    text.replace('|', " ")
}

fn replace_symbols(text: &str, vocab: &Vocabulary) -> String {
    let mut text = text.to_string();
    for (emoji, word) in vocab.emoji {
        if text.contains(emoji) {
            text = text.replace(emoji, &format!(" {word} "));
        }
    }

    // Amounts keep their digits ahead of the unit
    let text = DOLLAR_AMOUNT.replace_all(&text, "${1} dollar");
    let text = EURO_AMOUNT.replace_all(&text, "${1} euro");
    let text = POUND_AMOUNT.replace_all(&text, "${1} pound");
    let text = PERCENTAGE.replace_all(&text, format!("${{1}} {}", vocab.percent).as_str());

    let mut spoken = String::with_capacity(text.len());
    for c in text.chars() {
        match vocab.symbols.iter().find(|(symbol, _)| *symbol == c) {
            Some((_, word)) => {
                spoken.push(' ');
                spoken.push_str(word);
                spoken.push(' ');
            }
            None => spoken.push(c),
        }
    }

    let text = UNSPEAKABLE.replace_all(&spoken, " ");
    let text = REPEATED_DOTS.replace_all(&text, ".");
    let text = REPEATED_BANGS.replace_all(&text, "!");
    let text = REPEATED_QUESTIONS.replace_all(&text, "?");
    REPEATED_COMMAS.replace_all(&text, ",").into_owned()
}

fn expand_abbreviations(text: &str, vocab: &Vocabulary) -> String {
    ABBREVIATION
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            let key = matched.to_uppercase();

            match key.as_str() {
                "ETC" => vocab.etc.to_string(),
                "VS" => "versus".to_string(),
                "AKA" => vocab.aka.to_string(),
                _ => ACRONYM_TABLE
                    .get(key.as_str())
                    .map(|expansion| expansion.to_string())
                    .unwrap_or_else(|| matched.to_string()),
            }
        })
        .into_owned()
}

fn normalize_numbers(text: &str, vocab: &Vocabulary) -> String {
    let text = RUPIAH_AMOUNT.replace_all(text, |caps: &Captures| {
        format!("{} rupiah", caps[1].replace('.', ""))
    });

    let mut text = text.into_owned();
    match vocab.decimal {
        Some(word) => {
            text = DECIMAL_COMMA
                .replace_all(&text, format!("${{1}} {word} ${{2}}").as_str())
                .into_owned();
        }
        None => {
            // Each pass removes one separator per group, so 1,000,000 needs two
            while THOUSANDS_COMMA.is_match(&text) {
                text = THOUSANDS_COMMA.replace_all(&text, "${1}${2}").into_owned();
            }
        }
    }

    let slash = format!("${{1}} {0} ${{2}} {0} ${{3}}", vocab.date_slash);
    let dash = format!("${{1}} {0} ${{2}} {0} ${{3}}", vocab.date_dash);
    let time = format!("${{1}}{}${{2}}", vocab.time_separator);

    let text = SLASH_DATE.replace_all(&text, slash.as_str());
    let text = DASH_DATE.replace_all(&text, dash.as_str());
    let text = CLOCK_TIME.replace_all(&text, time.as_str());

    text.replace('/', " ")
}

fn collapse_layout(text: &str) -> String {
    let text = LINE_BREAKS.replace_all(text, ". ");
    let text = DOUBLED_BREAK.replace_all(&text, "${1}");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = LEADING_BREAKS.replace_all(text.trim(), "");
    text.trim().to_string()
}

fn fix_punctuation(text: &str) -> String {
    let text = SPACE_BEFORE_MARK.replace_all(text, "${1}");
    let text = SENTENCE_GAP.replace_all(&text, "${1} ${2}");
    let text = CLAUSE_GAP.replace_all(&text, "${1} ");
    let text = TRAILING_CLAUSE_MARKS.replace_all(&text, "");
    let text = TERMINAL_RUN.replace_all(text.trim(), "${1}");

    let mut text = text.trim().to_string();
    if !text.is_empty() && !text.ends_with(['.', '!', '?']) {
        text.push('.');
    }
    text
}

fn finalize(text: String, vocab: &Vocabulary) -> String {
    if text.is_empty() {
        return vocab.placeholder.to_string();
    }

    if text.chars().count() > MAX_SPEECH_CHARS {
        let mut truncated: String = text.chars().take(MAX_SPEECH_CHARS - 3).collect();
        truncated.push_str("...");
        return truncated;
    }

    text
}
