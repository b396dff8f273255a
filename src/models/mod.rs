// AI Text Detector Data Models
// Metric keys, weights and the analysis result shapes shared by the scorer and the shell

use serde::{Deserialize, Serialize};

/// Hard cap on the number of words a single analysis accepts
pub const MAX_WORDS: usize = 1000;

// ============ Metrics ============

/// The five heuristic sub-metrics, in aggregation order
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Metric {
    SentenceLength,
    VocabularyDiversity,
    WordComplexity,
    SentimentConsistency,
    RepetitionPatterns,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::SentenceLength,
        Metric::VocabularyDiversity,
        Metric::WordComplexity,
        Metric::SentimentConsistency,
        Metric::RepetitionPatterns,
    ];

    /// Serialized key of the metric
    pub fn key(self) -> &'static str {
        match self {
            Metric::SentenceLength => "sentence_length_score",
            Metric::VocabularyDiversity => "vocabulary_diversity",
            Metric::WordComplexity => "word_complexity",
            Metric::SentimentConsistency => "sentiment_consistency",
            Metric::RepetitionPatterns => "repetition_patterns",
        }
    }

    /// Fixed contribution to the overall probability; the five weights sum to 1.0
    pub fn weight(self) -> f64 {
        match self {
            Metric::SentenceLength => 0.20,
            Metric::VocabularyDiversity => 0.25,
            Metric::WordComplexity => 0.20,
            Metric::SentimentConsistency => 0.15,
            Metric::RepetitionPatterns => 0.20,
        }
    }

    /// Human-readable label, e.g. "Sentence Length Score"
    pub fn label(self) -> String {
        self.key()
            .split('_')
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Per-metric scores, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MetricSet {
    pub sentence_length_score: f64,
    pub vocabulary_diversity: f64,
    pub word_complexity: f64,
    pub sentiment_consistency: f64,
    pub repetition_patterns: f64,
}

impl MetricSet {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SentenceLength => self.sentence_length_score,
            Metric::VocabularyDiversity => self.vocabulary_diversity,
            Metric::WordComplexity => self.word_complexity,
            Metric::SentimentConsistency => self.sentiment_consistency,
            Metric::RepetitionPatterns => self.repetition_patterns,
        }
    }

    /// Iterate (metric, score) pairs in aggregation order
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

// ============ Analysis Result ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub metrics: MetricSet,
    pub ai_probability: f64,
    pub word_count: usize,
}

/// Wire shape of one analysis: either the scored result or `{"error": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisReport {
    Scored(AnalysisResult),
    Rejected { error: String },
}

impl AnalysisReport {
    pub fn is_scored(&self) -> bool {
        matches!(self, AnalysisReport::Scored(_))
    }
}

impl<E: std::fmt::Display> From<Result<AnalysisResult, E>> for AnalysisReport {
    fn from(result: Result<AnalysisResult, E>) -> Self {
        match result {
            Ok(analysis) => AnalysisReport::Scored(analysis),
            Err(e) => AnalysisReport::Rejected { error: e.to_string() },
        }
    }
}

/// One analyzed input in a batch, labelled by its source (file path or "<stdin>")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcedReport {
    pub source: String,
    #[serde(flatten)]
    pub report: AnalysisReport,
}
