// Text Processing Service
// Whitespace normalization, word tokenization and sentence splitting for the scorer

use regex::Regex;
use std::sync::OnceLock;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static SENTENCE_END_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn sentence_end_re() -> &'static Regex {
    SENTENCE_END_RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence pattern is valid"))
}

/// Collapse every whitespace run (Unicode-aware) to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    whitespace_re().replace_all(text, " ").trim().to_string()
}

/// Split normalized text into word tokens.
/// Tokens are whitespace-delimited; punctuation stays attached and case is preserved,
/// so word count, type-token ratio and trigrams all see the same sequence.
pub fn tokenize_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Split text on runs of `.`, `!`, `?`, dropping fragments that are empty after trimming
pub fn split_sentences(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![];
    }
    sentence_end_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalized text plus the token and sentence views derived from it
#[derive(Debug, Clone)]
pub struct PreparedText {
    normalized: String,
}

impl PreparedText {
    pub fn new(raw: &str) -> Self {
        Self {
            normalized: normalize_whitespace(raw),
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn words(&self) -> Vec<&str> {
        tokenize_words(&self.normalized)
    }

    pub fn sentences(&self) -> Vec<&str> {
        split_sentences(&self.normalized)
    }
}
