// AI Text Detector Core Services

pub mod text_processor;
pub mod sentiment;
pub mod config_store;
pub mod file_loader;
pub mod report_formatter;
pub mod detection;

pub use text_processor::*;
pub use sentiment::{LexiconError, SentimentLexicon};
pub use config_store::*;
pub use file_loader::{load_text_file, FileLoadError};
pub use report_formatter::{render_report, ReportStyle};

// Re-export detection module items
pub use detection::{
    contributions,
    weighted_probability,
    FeatureScorer,
    ScoringError,
};
