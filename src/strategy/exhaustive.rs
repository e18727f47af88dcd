//! Exhaustive scan: the reference strategy.

use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::SimilarityMetric;
use crate::distribution::Corpus;
use crate::Result;

/// Evaluates all `C(N, 2)` pairs. Perfect recall and precision, zero efficiency.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveScan;

impl Strategy for ExhaustiveScan {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let mut scorer = PairScorer::new(corpus, metric, min_score);
        for a in 0..corpus.len() {
            for b in (a + 1)..corpus.len() {
                scorer.confirm(a, b);
            }
        }
        Ok(scorer.into_outcome(0))
    }

    fn label(&self) -> String {
        "exhaustive".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_every_pair() {
        let corpus = Corpus::new(vec![vec![0.5, 0.5]; 5]).unwrap();
        let outcome = ExhaustiveScan
            .find(&corpus, 0.9, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome.comparisons, 10);
        assert_eq!(outcome.candidates.len(), 10);
        assert_eq!(outcome.clusters, 0);
    }

    #[test]
    fn empty_corpus_is_not_an_error() {
        let corpus = Corpus::new(Vec::new()).unwrap();
        let outcome = ExhaustiveScan
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome.comparisons, 0);
        assert!(outcome.candidates.is_empty());
    }
}
