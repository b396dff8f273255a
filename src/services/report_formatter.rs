// Report Formatter
// Renders an analysis report as terminal text

use std::fmt::Write;

use crate::models::AnalysisReport;
use crate::services::detection::contributions;

const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, Copy)]
pub struct ReportStyle {
    pub show_bars: bool,
    pub bar_width: usize,
    /// Append each metric's weight and weighted contribution
    pub show_weights: bool,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            show_bars: true,
            bar_width: 20,
            show_weights: false,
        }
    }
}

fn progress_bar(value: f64, width: usize) -> String {
    let filled = ((value / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Render one report; values are percentages with two decimals
pub fn render_report(report: &AnalysisReport, style: &ReportStyle) -> String {
    let analysis = match report {
        AnalysisReport::Scored(analysis) => analysis,
        AnalysisReport::Rejected { error } => return format!("Error: {}\n", error),
    };

    let mut out = String::new();
    let _ = writeln!(out, "AI Generation Probability: {:.2}%", analysis.ai_probability);
    let _ = writeln!(out, "Word Count: {}", analysis.word_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "Detailed Metrics");

    for (metric, contribution) in contributions(&analysis.metrics) {
        let value = analysis.metrics.get(metric);
        let mut line = format!("  {:<width$}", metric.label(), width = LABEL_WIDTH);
        if style.show_bars {
            let _ = write!(line, " {}", progress_bar(value, style.bar_width.max(1)));
        }
        let _ = write!(line, " {:>7.2}%", value);
        if style.show_weights {
            let _ = write!(line, "  (weight {:.2}, +{:.2})", metric.weight(), contribution);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
