//! Entropy bucketing.
//!
//! Similar distributions have similar entropy (the converse does not hold), so
//! entropy is a cheap blocking key. The corpus entropy range is cut into
//! `buckets` equal-width slices; a document is compared with documents in its
//! own slice and in the next one up, which recovers pairs straddling a boundary.
//! More buckets than documents are clamped to the document count.

use tracing::debug;

use super::scorer::{equal_width_buckets, group_by_bucket};
use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::{entropy, SimilarityMetric};
use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Flat equal-width entropy buckets.
#[derive(Debug, Clone, Copy)]
pub struct EntropyBuckets {
    buckets: usize,
}

impl EntropyBuckets {
    pub fn new(buckets: usize) -> Result<Self> {
        if buckets == 0 {
            return Err(SimPairError::Configuration(
                "entropy bucket count must be at least 1".to_string(),
            ));
        }
        Ok(Self { buckets })
    }

    pub fn buckets(&self) -> usize {
        self.buckets
    }
}

/// Entropy (bits) of every document, by position.
pub(crate) fn entropies(corpus: &Corpus) -> Vec<f32> {
    corpus.iter().map(|d| entropy(d.weights())).collect()
}

impl Strategy for EntropyBuckets {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        // more buckets than documents only adds empty groups
        let buckets = self.buckets.min(corpus.len().max(1));
        let keys = entropies(corpus);
        let groups = group_by_bucket(&equal_width_buckets(&keys, buckets), buckets);

        let mut scorer = PairScorer::new(corpus, metric, min_score);
        for (b, group) in groups.iter().enumerate() {
            scorer.confirm_within(group);
            if let Some(next) = groups.get(b + 1) {
                scorer.confirm_across(group, next);
            }
        }

        debug!(
            buckets = self.buckets,
            effective_buckets = buckets,
            comparisons = scorer.comparisons(),
            "entropy bucketing finished"
        );
        Ok(scorer.into_outcome(0))
    }

    fn label(&self) -> String {
        format!("entropy-{}", self.buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::StrategyKind;

    #[test]
    fn single_bucket_is_exhaustive() {
        let corpus = Corpus::new(vec![vec![0.9, 0.1], vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
        let outcome = EntropyBuckets::new(1)
            .unwrap()
            .find(&corpus, 0.0, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome.comparisons, 3);
        assert_eq!(outcome.candidates.len(), 3);
    }

    #[test]
    fn distant_buckets_are_never_compared() {
        // entropies: 0, ~0.47, 1.0, 2.0 -> buckets of width 0.5: 0, 0, 2, 3
        let corpus = Corpus::new(vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.9, 0.1, 0.0, 0.0],
            vec![0.5, 0.5, 0.0, 0.0],
            vec![0.25, 0.25, 0.25, 0.25],
        ])
        .unwrap();
        let outcome = EntropyBuckets::new(4)
            .unwrap()
            .find(&corpus, 0.0, SimilarityMetric::Cosine)
            .unwrap();
        // within bucket 0: (0,1); bucket 2 -> 3: (2,3); bucket 0 -> 1 is empty
        assert_eq!(outcome.comparisons, 2);
    }

    #[test]
    fn more_buckets_never_cost_more_than_all_pairs() {
        let corpus = Corpus::new(vec![vec![0.7, 0.3]; 6]).unwrap();
        let outcome = EntropyBuckets::new(50)
            .unwrap()
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .unwrap();
        // identical entropies collapse into one bucket
        assert_eq!(outcome.comparisons, 15);
    }

    #[test]
    fn huge_bucket_count_is_clamped_to_corpus_size() {
        let corpus = Corpus::new(vec![vec![0.9, 0.1], vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
        let outcome = EntropyBuckets::new(usize::MAX / 16)
            .unwrap()
            .find(&corpus, 0.0, SimilarityMetric::Cosine)
            .unwrap();
        assert!(outcome.comparisons <= corpus.total_pairs());
        assert_eq!(
            StrategyKind::Entropy { buckets: usize::MAX }
                .build(0)
                .unwrap()
                .find(&corpus, 0.0, SimilarityMetric::Cosine)
                .unwrap()
                .comparisons,
            outcome.comparisons
        );
    }
}
