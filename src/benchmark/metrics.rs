//! Correctness and cost metrics for one strategy run.
//!
//! | Metric | Formula | Degenerate case |
//! |--------|---------|-----------------|
//! | Precision | TP / (TP + FP) | 0 when nothing was reported |
//! | Recall | TP / (TP + FN) | 0 when the gold standard is empty |
//! | F-measure | 2PR / (P + R) | 0 when P = R = 0 |
//! | Efficiency | 1 − comparisons / C(N,2) | 0 when C(N,2) = 0 |
//! | Effectiveness | F-measure × efficiency | |
//!
//! Zero denominators are defined away, never reported as errors.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::distribution::Pair;

/// Confusion counts of candidates against gold pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCounts {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl PairCounts {
    /// Compare a candidate set with the gold pairs.
    pub fn compare(candidates: &HashSet<Pair>, gold: &HashSet<Pair>) -> Self {
        let true_positives = candidates.intersection(gold).count();
        Self {
            true_positives,
            false_positives: candidates.len() - true_positives,
            false_negatives: gold.len() - true_positives,
        }
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }
}

#[inline]
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Harmonic mean of precision and recall.
pub fn f_measure(precision: f64, recall: f64) -> f64 {
    if precision + recall <= 0.0 {
        return 0.0;
    }
    2.0 * precision * recall / (precision + recall)
}

/// Fraction of exhaustive work avoided, in `[0, 1]`.
pub fn efficiency(comparisons: usize, total_pairs: usize) -> f64 {
    if total_pairs == 0 {
        return 0.0;
    }
    (1.0 - comparisons as f64 / total_pairs as f64).clamp(0.0, 1.0)
}

/// Result of running one strategy on one corpus size. Write-once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRecord {
    /// Strategy name
    pub strategy: String,
    /// Documents in the corpus
    pub corpus_size: usize,
    /// Topics per document
    pub topic_count: usize,
    /// Similarity threshold
    pub min_score: f32,
    /// Wall-clock time of the strategy's `find`
    pub elapsed: Duration,
    /// Similarity evaluations performed
    pub comparisons: usize,
    /// C(N, 2)
    pub total_pairs: usize,
    pub counts: PairCounts,
    pub precision: f64,
    pub recall: f64,
    pub f_measure: f64,
    pub efficiency: f64,
    /// F-measure × efficiency
    pub effectiveness: f64,
    /// Clusters built (0 if not cluster-based)
    pub clusters: usize,
}

impl MetricsRecord {
    /// Derive all metrics from raw run data.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        strategy: impl Into<String>,
        corpus_size: usize,
        topic_count: usize,
        min_score: f32,
        elapsed: Duration,
        comparisons: usize,
        counts: PairCounts,
        clusters: usize,
    ) -> Self {
        let total_pairs = crate::distribution::total_pairs(corpus_size);
        let precision = counts.precision();
        let recall = counts.recall();
        let f_measure = f_measure(precision, recall);
        let efficiency = efficiency(comparisons, total_pairs);
        Self {
            strategy: strategy.into(),
            corpus_size,
            topic_count,
            min_score,
            elapsed,
            comparisons,
            total_pairs,
            counts,
            precision,
            recall,
            f_measure,
            efficiency,
            effectiveness: f_measure * efficiency,
            clusters,
        }
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{}[n={}]: p={:.3}, r={:.3}, f={:.3}, eff={:.3}, score={:.3}, pairs={}/{}, clusters={}, time={:.1}ms",
            self.strategy,
            self.corpus_size,
            self.precision,
            self.recall,
            self.f_measure,
            self.efficiency,
            self.effectiveness,
            self.comparisons,
            self.total_pairs,
            self.clusters,
            self.elapsed.as_secs_f64() * 1_000.0
        )
    }
}
