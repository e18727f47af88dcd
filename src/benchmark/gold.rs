//! Ground-truth similarity relation.
//!
//! The gold standard is the exhaustive answer: every unordered pair is scored
//! with the run's [`SimilarityMetric`], and pairs at or above the threshold are
//! recorded in both directions. No pruning, no randomness, so a given corpus
//! and threshold always produce the same relation.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::distance::SimilarityMetric;
use crate::distribution::{Corpus, DocId, Pair};
use crate::strategy::check_threshold;
use crate::{Result, SimPairError};

/// Symmetric, irreflexive "is similar to" relation over a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct GoldStandard {
    similar: BTreeMap<DocId, BTreeSet<DocId>>,
    pairs: HashSet<Pair>,
    min_score: f32,
    metric: SimilarityMetric,
    corpus_size: usize,
}

impl GoldStandard {
    /// Score every pair of the corpus (`O(N² · D)`).
    pub fn build(corpus: &Corpus, min_score: f32, metric: SimilarityMetric) -> Result<Self> {
        check_threshold(min_score)?;
        let expected = corpus.dimension();
        for (index, doc) in corpus.iter().enumerate() {
            if doc.dimension() != expected {
                return Err(SimPairError::DimensionMismatch {
                    index,
                    expected,
                    found: doc.dimension(),
                });
            }
        }

        let mut similar: BTreeMap<DocId, BTreeSet<DocId>> =
            corpus.iter().map(|d| (d.id(), BTreeSet::new())).collect();
        let mut pairs = HashSet::new();

        let docs: Vec<_> = corpus.iter().collect();
        for (i, a) in docs.iter().enumerate() {
            for b in &docs[i + 1..] {
                let score = metric.similarity(a.weights(), b.weights());
                if score >= min_score {
                    similar.entry(a.id()).or_default().insert(b.id());
                    similar.entry(b.id()).or_default().insert(a.id());
                    pairs.insert(Pair::new(a.id(), b.id(), score));
                }
            }
        }

        debug!(
            documents = corpus.len(),
            similar_pairs = pairs.len(),
            min_score,
            metric = metric.name(),
            "gold standard built"
        );

        Ok(Self {
            similar,
            pairs,
            min_score,
            metric,
            corpus_size: corpus.len(),
        })
    }

    /// Documents similar to `id` (empty for unknown ids).
    pub fn similar_to(&self, id: DocId) -> impl Iterator<Item = DocId> + '_ {
        self.similar.get(&id).into_iter().flatten().copied()
    }

    /// Whether `a` and `b` are similar (order-independent).
    pub fn contains(&self, a: DocId, b: DocId) -> bool {
        self.similar.get(&a).is_some_and(|s| s.contains(&b))
    }

    /// The relation as a map from id to similar ids.
    pub fn relation(&self) -> &BTreeMap<DocId, BTreeSet<DocId>> {
        &self.similar
    }

    /// All similar pairs, each once.
    pub fn pairs(&self) -> &HashSet<Pair> {
        &self.pairs
    }

    /// Number of similar pairs.
    pub fn num_pairs(&self) -> usize {
        self.pairs.len()
    }

    pub fn min_score(&self) -> f32 {
        self.min_score
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    /// Number of documents the relation was built over.
    pub fn corpus_size(&self) -> usize {
        self.corpus_size
    }
}
