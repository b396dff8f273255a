// Sentiment Lexicon Service
// Lexicon-based polarity scoring: word polarities, intensifiers and negation.
// The lexicon is loaded once at startup and handed to the scorer by reference.

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

const EMBEDDED_LEXICON: &str = include_str!("../../data/sentiment_lexicon.json");

/// Negations reach this many tokens back
const NEGATION_WINDOW: usize = 3;
/// Negated assessments flip sign and lose half their strength
const NEGATION_FACTOR: f64 = -0.5;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse lexicon: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Polarity for '{word}' is {value}, expected a value in [-1, 1]")]
    PolarityOutOfRange { word: String, value: f64 },
    #[error("Intensifier '{word}' has multiplier {value}, expected a positive value")]
    InvalidIntensifier { word: String, value: f64 },
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    version: String,
    words: HashMap<String, f64>,
    #[serde(default)]
    intensifiers: HashMap<String, f64>,
    #[serde(default)]
    negations: Vec<String>,
}

/// Read-only polarity oracle
#[derive(Debug, Clone)]
pub struct SentimentLexicon {
    version: String,
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl SentimentLexicon {
    /// The English lexicon bundled with the crate
    pub fn embedded() -> Result<Self, LexiconError> {
        Self::from_json(EMBEDDED_LEXICON)
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(content)?;

        for (word, &value) in &file.words {
            if !value.is_finite() || !(-1.0..=1.0).contains(&value) {
                return Err(LexiconError::PolarityOutOfRange {
                    word: word.clone(),
                    value,
                });
            }
        }
        for (word, &value) in &file.intensifiers {
            if !value.is_finite() || value <= 0.0 {
                return Err(LexiconError::InvalidIntensifier {
                    word: word.clone(),
                    value,
                });
            }
        }

        Ok(Self {
            version: file.version,
            words: lowercase_keys(file.words),
            intensifiers: lowercase_keys(file.intensifiers),
            negations: file.negations.into_iter().map(|w| w.to_lowercase()).collect(),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn is_negation(&self, token: &str) -> bool {
        self.negations.contains(token) || token.ends_with("n't")
    }

    /// Polarity of one sentence in [-1, 1]; 0 when no lexicon word occurs.
    ///
    /// Each lexicon word yields one assessment. An intensifier directly before the
    /// word scales it, and a negation within the preceding three tokens flips it
    /// at half strength. The result is the mean of all assessments.
    pub fn polarity(&self, sentence: &str) -> f64 {
        let tokens = sentiment_tokens(sentence);
        let mut assessments: Vec<f64> = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.words.get(token.as_str()) else {
                continue;
            };

            let mut score = base;
            if i > 0 {
                if let Some(&multiplier) = self.intensifiers.get(tokens[i - 1].as_str()) {
                    score *= multiplier;
                }
            }

            let negated = (1..=NEGATION_WINDOW).any(|k| i >= k && self.is_negation(&tokens[i - k]));
            if negated {
                score *= NEGATION_FACTOR;
            }

            assessments.push(score.clamp(-1.0, 1.0));
        }

        if assessments.is_empty() {
            return 0.0;
        }
        let mean = assessments.iter().sum::<f64>() / assessments.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

fn lowercase_keys(map: HashMap<String, f64>) -> HashMap<String, f64> {
    map.into_iter().map(|(k, v)| (k.to_lowercase(), v)).collect()
}

/// Lowercased alphabetic tokens; apostrophes are kept so contractions survive
fn sentiment_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphabetic() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
