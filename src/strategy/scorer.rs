//! Shared pruning primitives.
//!
//! [`PairScorer`] is the single place where strategies evaluate the similarity
//! function. It memoizes scores per unordered pair, so the comparison count is
//! the number of distinct pairs actually evaluated, however often a strategy
//! asks for the same pair.

use std::collections::{HashMap, HashSet};

use super::StrategyOutcome;
use crate::distance::SimilarityMetric;
use crate::distribution::{Corpus, DocId, Pair};

/// Counting, caching similarity evaluator bound to one corpus and threshold.
pub struct PairScorer<'a> {
    corpus: &'a Corpus,
    metric: SimilarityMetric,
    min_score: f32,
    scores: HashMap<(DocId, DocId), f32>,
    candidates: HashSet<Pair>,
}

impl<'a> PairScorer<'a> {
    pub fn new(corpus: &'a Corpus, metric: SimilarityMetric, min_score: f32) -> Self {
        Self {
            corpus,
            metric,
            min_score,
            scores: HashMap::new(),
            candidates: HashSet::new(),
        }
    }

    /// Similarity of two positions, evaluated at most once per pair.
    ///
    /// Does not record a candidate; use [`PairScorer::confirm`] for that.
    pub fn score(&mut self, a: usize, b: usize) -> f32 {
        // always (lo, hi) so floating-point summation order matches the gold standard
        let key = ordered(a as DocId, b as DocId);
        let corpus = self.corpus;
        let metric = self.metric;
        *self.scores.entry(key).or_insert_with(|| {
            metric.similarity(corpus.weights(key.0 as usize), corpus.weights(key.1 as usize))
        })
    }

    /// Score a pair and record it as a candidate if it passes the threshold.
    pub fn confirm(&mut self, a: usize, b: usize) -> f32 {
        let s = self.score(a, b);
        if s >= self.min_score {
            self.candidates.insert(Pair::new(a as DocId, b as DocId, s));
        }
        s
    }

    /// Confirm every pair inside a group of positions.
    pub fn confirm_within(&mut self, group: &[usize]) {
        for (i, &a) in group.iter().enumerate() {
            for &b in &group[i + 1..] {
                self.confirm(a, b);
            }
        }
    }

    /// Confirm every pair with one position in each group.
    ///
    /// The groups must be disjoint.
    pub fn confirm_across(&mut self, left: &[usize], right: &[usize]) {
        for &a in left {
            for &b in right {
                self.confirm(a, b);
            }
        }
    }

    /// Threshold the scorer confirms against.
    #[inline]
    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    /// Distinct pairs evaluated so far.
    #[inline]
    pub fn comparisons(&self) -> usize {
        self.scores.len()
    }

    /// Finish the run.
    pub fn into_outcome(self, clusters: usize) -> StrategyOutcome {
        StrategyOutcome {
            candidates: self.candidates,
            comparisons: self.scores.len(),
            clusters,
        }
    }
}

#[inline]
fn ordered(a: DocId, b: DocId) -> (DocId, DocId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Equal-width bucketing of scalar keys into `buckets` ranges over `[min, max]`.
///
/// Returns the bucket index of each key. A zero-width range puts everything in bucket 0.
pub fn equal_width_buckets(keys: &[f32], buckets: usize) -> Vec<usize> {
    if keys.is_empty() || buckets == 0 {
        return vec![0; keys.len()];
    }
    let lo = keys.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = keys.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let width = (hi - lo) / buckets as f32;
    if width <= 0.0 || !width.is_finite() {
        return vec![0; keys.len()];
    }
    keys.iter()
        .map(|&k| (((k - lo) / width) as usize).min(buckets - 1))
        .collect()
}

/// Group positions by bucket index (`groups[b]` lists positions in bucket `b`).
pub fn group_by_bucket(assignment: &[usize], buckets: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); buckets.max(1)];
    for (pos, &b) in assignment.iter().enumerate() {
        groups[b].push(pos);
    }
    groups
}
