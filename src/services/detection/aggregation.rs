// Aggregation Logic
// Combines the five metric scores into the overall AI probability

use crate::models::{Metric, MetricSet};

/// Weighted sum of the metric scores over the fixed weight table.
/// With every metric in [0, 100] and weights summing to 1 the result is in [0, 100].
pub fn weighted_probability(metrics: &MetricSet) -> f64 {
    metrics
        .iter()
        .map(|(metric, score)| score * metric.weight())
        .sum()
}

/// Each metric's weighted share of the overall probability
pub fn contributions(metrics: &MetricSet) -> [(Metric, f64); 5] {
    Metric::ALL.map(|metric| (metric, metrics.get(metric) * metric.weight()))
}
