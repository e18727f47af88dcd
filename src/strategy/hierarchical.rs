//! Hierarchical entropy bucketing.
//!
//! Instead of fixed-width slices, the entropy order is bisected at its median,
//! then each half is bisected again, `levels` times. Each round halves the
//! candidate set of every document, and the leaves adapt to dense regions of the
//! entropy axis where flat buckets would overflow. Groups of two or fewer
//! documents are not split further.
//!
//! Final confirmation compares each leaf with itself, and across every split
//! point only the band of documents nearest to it: the upper half of the lower
//! leaf against the lower half of the upper leaf. Both the leaves and the bands
//! shrink with every level, so one level already skips the pairs far apart on
//! the entropy axis.

use std::cmp::Ordering;

use tracing::debug;

use super::entropy::entropies;
use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::SimilarityMetric;
use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Recursive median bisection over the entropy order.
#[derive(Debug, Clone, Copy)]
pub struct HierarchicalEntropy {
    levels: usize,
}

impl HierarchicalEntropy {
    pub fn new(levels: usize) -> Result<Self> {
        if levels == 0 {
            return Err(SimPairError::Configuration(
                "hierarchical entropy needs at least one level".to_string(),
            ));
        }
        Ok(Self { levels })
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Leaves of the bisection, in ascending entropy order.
    fn leaves<'a>(&self, sorted: &'a [usize]) -> Vec<&'a [usize]> {
        let mut frontier = vec![sorted];
        for _ in 0..self.levels {
            let mut next = Vec::with_capacity(frontier.len() * 2);
            let mut split_any = false;
            for group in frontier {
                if group.len() <= 2 {
                    next.push(group);
                } else {
                    let (left, right) = group.split_at(group.len() / 2);
                    next.push(left);
                    next.push(right);
                    split_any = true;
                }
            }
            frontier = next;
            if !split_any {
                break;
            }
        }
        frontier
    }
}

/// Documents nearest a split point: the upper half of `left` and the lower half of `right`.
fn boundary_band<'a>(left: &'a [usize], right: &'a [usize]) -> (&'a [usize], &'a [usize]) {
    let tail = &left[left.len() - left.len().div_ceil(2)..];
    let head = &right[..right.len().div_ceil(2)];
    (tail, head)
}

impl Strategy for HierarchicalEntropy {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let keys = entropies(corpus);
        let mut sorted: Vec<usize> = (0..corpus.len()).collect();
        sorted.sort_by(|&a, &b| {
            keys[a]
                .partial_cmp(&keys[b])
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.cmp(&b))
        });

        let leaves = self.leaves(&sorted);
        let mut scorer = PairScorer::new(corpus, metric, min_score);
        for (i, leaf) in leaves.iter().enumerate() {
            scorer.confirm_within(leaf);
            if let Some(next) = leaves.get(i + 1) {
                let (tail, head) = boundary_band(leaf, next);
                scorer.confirm_across(tail, head);
            }
        }

        debug!(
            levels = self.levels,
            leaves = leaves.len(),
            comparisons = scorer.comparisons(),
            "hierarchical entropy finished"
        );
        Ok(scorer.into_outcome(0))
    }

    fn label(&self) -> String {
        format!("hentropy-{}", self.levels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed_corpus(n: usize) -> Corpus {
        let vectors = (0..n)
            .map(|i| {
                let w = 0.5 + 0.5 * (i as f32 / n as f32);
                vec![w, 1.0 - w]
            })
            .collect();
        Corpus::new(vectors).unwrap()
    }

    #[test]
    fn leaves_halve_each_level() {
        let sorted: Vec<usize> = (0..16).collect();
        let strategy = HierarchicalEntropy::new(2).unwrap();
        let leaves = strategy.leaves(&sorted);
        assert_eq!(leaves.len(), 4);
        assert!(leaves.iter().all(|l| l.len() == 4));
    }

    #[test]
    fn small_groups_stop_splitting() {
        let sorted: Vec<usize> = (0..5).collect();
        let leaves = HierarchicalEntropy::new(10).unwrap().leaves(&sorted);
        let sizes: Vec<usize> = leaves.iter().map(|l| l.len()).collect();
        assert_eq!(sizes, vec![2, 1, 2]);
    }

    #[test]
    fn band_covers_the_halves_nearest_the_split() {
        let left = [0, 1, 2, 3, 4];
        let right = [5, 6, 7];
        assert_eq!(boundary_band(&left, &right), (&left[2..], &right[..2]));
        assert_eq!(boundary_band(&[0], &[1]), (&[0][..], &[1][..]));
    }

    #[test]
    fn one_level_already_prunes() {
        let corpus = skewed_corpus(64);
        let outcome = HierarchicalEntropy::new(1)
            .unwrap()
            .find(&corpus, 0.9, SimilarityMetric::Cosine)
            .unwrap();
        // two halves of 32: 2 * 496 within, 16 * 16 across the split
        assert_eq!(outcome.comparisons, 2 * 496 + 16 * 16);
        assert!(outcome.comparisons < corpus.total_pairs());
    }

    #[test]
    fn deeper_hierarchies_compare_less() {
        let corpus = skewed_corpus(64);
        let run = |levels| {
            HierarchicalEntropy::new(levels)
                .unwrap()
                .find(&corpus, 0.9, SimilarityMetric::Cosine)
                .unwrap()
                .comparisons
        };
        // three levels: 8 leaves of 8 -> 8 * 28 within + 7 * 4 * 4 across
        assert_eq!(run(3), 8 * 28 + 7 * 16);
        assert!(run(3) < run(2));
        assert!(run(2) < run(1));
    }

    #[test]
    fn one_level_prunes_a_synthetic_corpus() {
        let corpus = crate::benchmark::generate_topic_corpus(&crate::benchmark::TopicCorpusParams {
            documents: 400,
            topics: 20,
            ..Default::default()
        })
        .unwrap();
        let outcome = HierarchicalEntropy::new(1)
            .unwrap()
            .find(&corpus, 0.83, SimilarityMetric::Cosine)
            .unwrap();
        assert!(outcome.comparisons < corpus.total_pairs());
    }
}
