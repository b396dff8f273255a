// Command Layer
// Entry points the front end calls: validate input, run the scorer, shape the report

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::{AnalysisReport, SourcedReport};
use crate::services::detection::FeatureScorer;
use crate::services::file_loader::load_text_file;
use crate::services::sentiment::SentimentLexicon;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze";

/// Where one submission's text comes from
#[derive(Debug, Clone)]
pub enum InputSource {
    Inline { label: String, text: String },
    File(PathBuf),
}

impl InputSource {
    pub fn label(&self) -> String {
        match self {
            InputSource::Inline { label, .. } => label.clone(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}

/// Load the sentiment lexicon once at startup: a custom file when given, else the bundled one
pub fn load_lexicon(path: Option<&Path>) -> Result<SentimentLexicon, String> {
    let lexicon = match path {
        Some(p) => SentimentLexicon::from_path(p),
        None => SentimentLexicon::embedded(),
    }
    .map_err(|e| e.to_string())?;

    info!(
        version = lexicon.version(),
        words = lexicon.len(),
        custom = path.is_some(),
        "lexicon.loaded"
    );
    Ok(lexicon)
}

/// Analyze one submission. Empty input is refused here and never reaches the scorer;
/// the word limit comes back as a rejected report.
pub fn detect_text(scorer: &FeatureScorer<'_>, text: &str) -> Result<AnalysisReport, String> {
    if text.trim().is_empty() {
        return Err(EMPTY_INPUT_MESSAGE.to_string());
    }
    Ok(scorer.analyze(text).into())
}

fn analyze_source(lexicon: &SentimentLexicon, source: &InputSource) -> AnalysisReport {
    let loaded;
    let text = match source {
        InputSource::Inline { text, .. } => text.as_str(),
        InputSource::File(path) => match load_text_file(path) {
            Ok(t) => {
                loaded = t;
                loaded.as_str()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "input.load_failed");
                return AnalysisReport::Rejected { error: e.to_string() };
            }
        },
    };

    let scorer = FeatureScorer::new(lexicon);
    detect_text(&scorer, text).unwrap_or_else(|error| AnalysisReport::Rejected { error })
}

/// Analyze every source on its own blocking task; reports come back in input order
pub async fn analyze_sources(
    lexicon: Arc<SentimentLexicon>,
    sources: Vec<InputSource>,
) -> Vec<SourcedReport> {
    let started = Instant::now();
    let total = sources.len();

    let handles: Vec<_> = sources
        .into_iter()
        .map(|source| {
            let lexicon = Arc::clone(&lexicon);
            let label = source.label();
            let handle = tokio::task::spawn_blocking(move || analyze_source(&lexicon, &source));
            (label, handle)
        })
        .collect();

    let reports = join_reports(handles).await;

    let scored = reports.iter().filter(|r| r.report.is_scored()).count();
    info!(
        total,
        scored,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch.completed"
    );
    reports
}

/// Await labelled tasks in order; a task that panicked still reports under its source
async fn join_reports(handles: Vec<(String, JoinHandle<AnalysisReport>)>) -> Vec<SourcedReport> {
    let mut reports = Vec::with_capacity(handles.len());
    for (source, handle) in handles {
        let report = match handle.await {
            Ok(report) => report,
            Err(e) => {
                warn!(source = %source, error = %e, "analysis task failed");
                AnalysisReport::Rejected {
                    error: format!("analysis task failed: {}", e),
                }
            }
        };
        reports.push(SourcedReport { source, report });
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn inline(text: &str) -> InputSource {
        InputSource::Inline {
            label: "<stdin>".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_detect_text_rejects_empty() {
        let lexicon = load_lexicon(None).unwrap();
        let scorer = FeatureScorer::new(&lexicon);
        assert_eq!(detect_text(&scorer, "").unwrap_err(), EMPTY_INPUT_MESSAGE);
        assert_eq!(detect_text(&scorer, " \n\t").unwrap_err(), EMPTY_INPUT_MESSAGE);
    }

    #[test]
    fn test_detect_text_reports_length_limit() {
        let lexicon = load_lexicon(None).unwrap();
        let scorer = FeatureScorer::new(&lexicon);
        let text = "word ".repeat(1001);
        let report = detect_text(&scorer, &text).unwrap();
        assert_eq!(
            report,
            AnalysisReport::Rejected {
                error: "Text exceeds 1000 words limit".to_string()
            }
        );
    }

    #[test]
    fn test_load_lexicon_error_is_reported() {
        let err = load_lexicon(Some(Path::new("/nonexistent/lexicon.json"))).unwrap_err();
        assert!(err.contains("/nonexistent/lexicon.json"));
    }

    #[tokio::test]
    async fn test_analyze_sources_keeps_order() {
        let lexicon = Arc::new(load_lexicon(None).unwrap());

        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"A short file. It has two sentences.").unwrap();

        let sources = vec![
            inline("The first input is fine."),
            InputSource::File(file.path().to_path_buf()),
            inline("   "),
            InputSource::File(PathBuf::from("/nonexistent/missing.txt")),
        ];
        let reports = analyze_sources(lexicon, sources).await;

        assert_eq!(reports.len(), 4);
        assert_eq!(reports[0].source, "<stdin>");
        assert!(reports[0].report.is_scored());
        assert_eq!(reports[1].source, file.path().display().to_string());
        match &reports[1].report {
            AnalysisReport::Scored(r) => assert_eq!(r.word_count, 7),
            other => panic!("expected scored report, got {:?}", other),
        }
        assert_eq!(
            reports[2].report,
            AnalysisReport::Rejected {
                error: EMPTY_INPUT_MESSAGE.to_string()
            }
        );
        assert!(!reports[3].report.is_scored());
    }

    #[tokio::test]
    async fn test_panicked_task_keeps_its_source() {
        let handles = vec![
            (
                "good.txt".to_string(),
                tokio::task::spawn_blocking(|| AnalysisReport::Rejected {
                    error: "fine".to_string(),
                }),
            ),
            (
                "broken.pdf".to_string(),
                tokio::task::spawn_blocking(|| -> AnalysisReport { panic!("malformed pdf") }),
            ),
        ];
        let reports = join_reports(handles).await;

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].source, "good.txt");
        assert_eq!(reports[1].source, "broken.pdf");
        match &reports[1].report {
            AnalysisReport::Rejected { error } => assert!(error.starts_with("analysis task failed")),
            other => panic!("expected rejected report, got {:?}", other),
        }
    }
}
