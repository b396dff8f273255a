// Detection Module
// AI text detection core logic organized into specialized submodules:
// - feature_scorer: Extracts the five heuristic metrics from text
// - aggregation: Weights metric scores into the overall probability

pub mod feature_scorer;
pub mod aggregation;

// Re-export commonly used items
pub use feature_scorer::{FeatureScorer, ScoringError};
pub use aggregation::{contributions, weighted_probability};
