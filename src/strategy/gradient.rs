//! Gradient-pruned scan.
//!
//! Documents are ordered by a scalar projection, their dominant topic and then
//! the weight of that topic (descending), so documents that look alike sit next
//! to each other. Each anchor walks forward through the order:
//!
//! ```text
//! reach = 1
//! for each later document b:
//!     score(anchor, b)
//!     hit  -> reach = 1
//!     miss -> reach *= decay
//!     stop once reach < min_score
//! ```
//!
//! The tolerated run of consecutive misses is `log(min_score) / log(decay)`, so a
//! decay close to 1 walks far and one close to 0 stops at the first miss.
//! `decay = 1` never stops and degenerates to an exhaustive scan.

use std::cmp::Ordering;

use tracing::debug;

use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::{dominant_topic, SimilarityMetric};
use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Projection-ordered scan with a geometrically shrinking reach.
#[derive(Debug, Clone, Copy)]
pub struct GradientScan {
    decay: f32,
}

impl GradientScan {
    /// `decay` must lie in `(0, 1]`.
    pub fn new(decay: f32) -> Result<Self> {
        if !(decay > 0.0 && decay <= 1.0) {
            return Err(SimPairError::Configuration(format!(
                "gradient decay must be in (0, 1], got {decay}"
            )));
        }
        Ok(Self { decay })
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }
}

/// Positions sorted by (dominant topic, dominant weight descending, position).
pub(crate) fn projection_order(corpus: &Corpus) -> Vec<usize> {
    let keys: Vec<(usize, f32)> = (0..corpus.len())
        .map(|pos| dominant_topic(corpus.weights(pos)))
        .collect();
    let mut order: Vec<usize> = (0..corpus.len()).collect();
    order.sort_by(|&a, &b| {
        keys[a]
            .0
            .cmp(&keys[b].0)
            .then_with(|| keys[b].1.partial_cmp(&keys[a].1).unwrap_or(Ordering::Equal))
            .then_with(|| a.cmp(&b))
    });
    order
}

impl Strategy for GradientScan {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let order = projection_order(corpus);
        let mut scorer = PairScorer::new(corpus, metric, min_score);

        for (i, &anchor) in order.iter().enumerate() {
            let mut reach = 1.0f32;
            for &other in &order[i + 1..] {
                if scorer.confirm(anchor, other) >= min_score {
                    reach = 1.0;
                } else {
                    reach *= self.decay;
                    if reach < min_score {
                        break;
                    }
                }
            }
        }

        debug!(
            decay = self.decay,
            comparisons = scorer.comparisons(),
            "gradient scan finished"
        );
        Ok(scorer.into_outcome(0))
    }

    fn label(&self) -> String {
        format!("gradient-{}", self.decay)
    }
}
