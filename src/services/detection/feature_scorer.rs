// Feature Scorer
// Maps raw text to five heuristic metrics and a weighted AI probability.
// Pure and reentrant: the only shared input is the read-only sentiment lexicon.

use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{AnalysisResult, MetricSet, MAX_WORDS};
use crate::services::sentiment::SentimentLexicon;
use crate::services::text_processor::PreparedText;

use super::aggregation::weighted_probability;

/// Words per sentence treated as a typical human sentence
const BASELINE_SENTENCE_WORDS: f64 = 15.0;
/// Characters per word treated as a typical word
const BASELINE_WORD_CHARS: f64 = 7.0;
const PHRASE_LENGTH: usize = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    #[error("Text exceeds {limit} words limit")]
    LengthExceeded { word_count: usize, limit: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct FeatureScorer<'a> {
    lexicon: &'a SentimentLexicon,
}

impl<'a> FeatureScorer<'a> {
    pub fn new(lexicon: &'a SentimentLexicon) -> Self {
        Self { lexicon }
    }

    /// Score `text`, or reject it when it has more than [`MAX_WORDS`] words.
    ///
    /// Total for every other input, including the empty string.
    pub fn analyze(&self, text: &str) -> Result<AnalysisResult, ScoringError> {
        let prepared = PreparedText::new(text);
        let words = prepared.words();
        let word_count = words.len();

        if word_count > MAX_WORDS {
            info!(word_count, limit = MAX_WORDS, "scorer.length_exceeded");
            return Err(ScoringError::LengthExceeded {
                word_count,
                limit: MAX_WORDS,
            });
        }

        let sentences = prepared.sentences();
        let polarities: Vec<f64> = sentences.iter().map(|s| self.lexicon.polarity(s)).collect();

        let metrics = MetricSet {
            sentence_length_score: sentence_length_score(word_count, sentences.len()),
            vocabulary_diversity: vocabulary_diversity(&words),
            word_complexity: word_complexity(&words),
            sentiment_consistency: sentiment_consistency(&polarities),
            repetition_patterns: repetition_patterns(&words),
        };
        let ai_probability = weighted_probability(&metrics);

        debug!(
            word_count,
            sentence_count = sentences.len(),
            sentence_length_score = metrics.sentence_length_score,
            vocabulary_diversity = metrics.vocabulary_diversity,
            word_complexity = metrics.word_complexity,
            sentiment_consistency = metrics.sentiment_consistency,
            repetition_patterns = metrics.repetition_patterns,
            ai_probability,
            "scorer.analyzed"
        );

        Ok(AnalysisResult {
            metrics,
            ai_probability,
            word_count,
        })
    }
}

fn sentence_length_score(word_count: usize, sentence_count: usize) -> f64 {
    let avg_sentence_len = word_count as f64 / sentence_count.max(1) as f64;
    ((avg_sentence_len / BASELINE_SENTENCE_WORDS) * 100.0).min(100.0)
}

/// Type-token ratio as a percentage; case-sensitive
fn vocabulary_diversity(words: &[&str]) -> f64 {
    let unique: HashSet<&str> = words.iter().copied().collect();
    (unique.len() as f64 / words.len().max(1) as f64) * 100.0
}

fn word_complexity(words: &[&str]) -> f64 {
    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_len = total_chars as f64 / words.len().max(1) as f64;
    ((avg_word_len / BASELINE_WORD_CHARS) * 100.0).min(100.0)
}

fn sentiment_consistency(polarities: &[f64]) -> f64 {
    ((1.0 - population_variance(polarities)) * 100.0).min(100.0)
}

/// Divides by N; 0 for an empty slice
fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}

fn repetition_patterns(words: &[&str]) -> f64 {
    (1.0 - repeated_trigram_ratio(words)) * 100.0
}

/// Distinct trigrams seen more than once, over the total trigram count
fn repeated_trigram_ratio(words: &[&str]) -> f64 {
    if words.len() < PHRASE_LENGTH {
        return 0.0;
    }
    let mut counts: HashMap<&[&str], usize> = HashMap::new();
    let mut total = 0usize;
    for phrase in words.windows(PHRASE_LENGTH) {
        *counts.entry(phrase).or_insert(0) += 1;
        total += 1;
    }
    let repeated = counts.values().filter(|&&c| c > 1).count();
    repeated as f64 / total.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> SentimentLexicon {
        SentimentLexicon::embedded().unwrap()
    }

    fn words_text(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_trigram_ratio_counts_distinct_repeats() {
        let words: Vec<&str> = "the cat sat the cat sat the cat sat".split(' ').collect();
        assert!((repeated_trigram_ratio(&words) - 3.0 / 7.0).abs() < 1e-12);
        assert_eq!(repeated_trigram_ratio(&["a", "b"]), 0.0);
        assert_eq!(repeated_trigram_ratio(&["a", "b", "c"]), 0.0);
    }

    #[test]
    fn test_population_variance() {
        assert_eq!(population_variance(&[]), 0.0);
        assert_eq!(population_variance(&[0.4]), 0.0);
        assert!((population_variance(&[1.0, -1.0]) - 1.0).abs() < 1e-12);
        assert!((population_variance(&[0.0, 0.5, 1.0]) - (0.5 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_sentence_length_caps_at_hundred() {
        assert_eq!(sentence_length_score(15, 1), 100.0);
        assert_eq!(sentence_length_score(60, 1), 100.0);
        assert!((sentence_length_score(30, 4) - 50.0).abs() < 1e-9);
        assert_eq!(sentence_length_score(0, 0), 0.0);
    }

    #[test]
    fn test_word_complexity_uses_char_count() {
        // Multi-byte characters count once each
        let words = ["héllo", "wörld"];
        assert!((word_complexity(&words) - (5.0 / 7.0) * 100.0).abs() < 1e-9);
        assert_eq!(word_complexity(&["extraordinarily"]), 100.0);
    }

    #[test]
    fn test_repetition_example() {
        let lex = lexicon();
        let result = FeatureScorer::new(&lex)
            .analyze("the cat sat the cat sat the cat sat")
            .unwrap();
        assert_eq!(result.word_count, 9);
        assert!((result.metrics.repetition_patterns - 400.0 / 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_is_total() {
        let lex = lexicon();
        let result = FeatureScorer::new(&lex).analyze("").unwrap();
        assert_eq!(result.word_count, 0);
        assert_eq!(result.metrics.sentence_length_score, 0.0);
        assert_eq!(result.metrics.vocabulary_diversity, 0.0);
        assert_eq!(result.metrics.word_complexity, 0.0);
        assert_eq!(result.metrics.sentiment_consistency, 100.0);
        assert_eq!(result.metrics.repetition_patterns, 100.0);
        assert!((result.ai_probability - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_length_guard_boundary() {
        let lex = lexicon();
        let scorer = FeatureScorer::new(&lex);
        assert_eq!(scorer.analyze(&words_text(1000)).unwrap().word_count, 1000);
        assert_eq!(
            scorer.analyze(&words_text(1001)).unwrap_err(),
            ScoringError::LengthExceeded {
                word_count: 1001,
                limit: 1000
            }
        );
    }

    #[test]
    fn test_error_message() {
        let err = ScoringError::LengthExceeded {
            word_count: 1200,
            limit: MAX_WORDS,
        };
        assert_eq!(err.to_string(), "Text exceeds 1000 words limit");
    }

    #[test]
    fn test_mixed_sentiment_lowers_consistency() {
        let lex = lexicon();
        let scorer = FeatureScorer::new(&lex);
        let steady = scorer.analyze("The plan is good. The team is good.").unwrap();
        let swings = scorer.analyze("The plan is excellent. The team is terrible.").unwrap();
        assert_eq!(steady.metrics.sentiment_consistency, 100.0);
        assert!(swings.metrics.sentiment_consistency < steady.metrics.sentiment_consistency);
        assert!(swings.metrics.sentiment_consistency >= 0.0);
    }
}
