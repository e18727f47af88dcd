//! Random pair sampling baseline.
//!
//! Draws `sample_size` distinct pairs uniformly from all `C(N, 2)` pairs and
//! evaluates only those, so `efficiency = 1 - sample_size / C(N, 2)` exactly.
//! Expected recall equals the sampled fraction, which makes this the floor any
//! structured strategy has to beat.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::debug;

use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::SimilarityMetric;
use crate::distribution::Corpus;
use crate::Result;

/// Uniform sample of pairs.
#[derive(Debug, Clone, Copy)]
pub struct RandomSampling {
    sample_size: usize,
    seed: u64,
}

impl RandomSampling {
    pub fn new(sample_size: usize) -> Self {
        Self {
            sample_size,
            seed: 0,
        }
    }

    /// Seed for the pair sampler.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

/// Map sorted linear pair indices to `(a, b)` positions with `a < b`.
///
/// Pairs are numbered row by row: `(0,1), (0,2), ..., (0,n-1), (1,2), ...`.
fn decode_sorted(sorted: &[usize], n: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(sorted.len());
    let mut row = 0;
    let mut row_start = 0;
    for &linear in sorted {
        while linear >= row_start + (n - 1 - row) {
            row_start += n - 1 - row;
            row += 1;
        }
        out.push((row, row + 1 + (linear - row_start)));
    }
    out
}

impl Strategy for RandomSampling {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let total = corpus.total_pairs();
        let amount = self.sample_size.min(total);

        let mut sampled = if amount == 0 {
            Vec::new()
        } else {
            let mut rng = StdRng::seed_from_u64(self.seed);
            index::sample(&mut rng, total, amount).into_vec()
        };
        sampled.sort_unstable();

        let mut scorer = PairScorer::new(corpus, metric, min_score);
        for (a, b) in decode_sorted(&sampled, corpus.len()) {
            scorer.confirm(a, b);
        }

        debug!(
            requested = self.sample_size,
            sampled = amount,
            "random sampling finished"
        );
        Ok(scorer.into_outcome(0))
    }

    fn label(&self) -> String {
        format!("random-{}", self.sample_size)
    }
}
