//! Centroid clustering (k-means on the simplex).
//!
//! Lloyd iterations with k-means++ seeding. The distance is Jensen-Shannon
//! divergence, and centroids are arithmetic means, which stay on the simplex.
//! Only within-cluster pairs are confirmed with the similarity function;
//! document-to-centroid distances are bookkeeping and are not counted as
//! comparisons.
//!
//! `k` larger than the corpus is clamped to `N`. If the assignment has not
//! settled after `max_iterations` rounds, the last assignment is used as is.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::{js_divergence, SimilarityMetric};
use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Lloyd iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// k-means clustering strategy.
#[derive(Debug, Clone)]
pub struct CentroidClustering {
    k: usize,
    max_iterations: usize,
    seed: u64,
}

/// Result of fitting k-means to a corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster index per document position.
    pub assignments: Vec<usize>,
    /// Final centroids (`effective k` rows).
    pub centroids: Vec<Vec<f32>>,
    /// Lloyd rounds run.
    pub iterations: usize,
    /// Whether the assignment settled before the cap.
    pub converged: bool,
}

impl KMeansFit {
    /// Positions grouped by cluster.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.centroids.len()];
        for (pos, &c) in self.assignments.iter().enumerate() {
            groups[c].push(pos);
        }
        groups
    }
}

impl CentroidClustering {
    /// Create k-means with `k` clusters.
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(SimPairError::Configuration(
                "cluster count must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: 0,
        })
    }

    /// Cap the number of Lloyd rounds.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Result<Self> {
        if max_iterations == 0 {
            return Err(SimPairError::Configuration(
                "k-means needs at least one iteration".to_string(),
            ));
        }
        self.max_iterations = max_iterations;
        Ok(self)
    }

    /// Seed for k-means++ initialization.
    ///
    /// Repeated `fit(...)` calls on the same corpus and seed produce identical results.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Cluster the corpus.
    pub fn fit(&self, corpus: &Corpus) -> KMeansFit {
        let n = corpus.len();
        let k = self.k.min(n);
        if k == 0 {
            return KMeansFit {
                assignments: Vec::new(),
                centroids: Vec::new(),
                iterations: 0,
                converged: true,
            };
        }

        let mut centroids = self.kmeans_plus_plus(corpus, k);
        let mut assignments = assign(corpus, &centroids);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            iterations += 1;
            centroids = update_centroids(corpus, &assignments, &centroids);
            let next = assign(corpus, &centroids);
            if next == assignments {
                converged = true;
                break;
            }
            assignments = next;
        }

        KMeansFit {
            assignments,
            centroids,
            iterations,
            converged,
        }
    }

    /// k-means++ initialization.
    fn kmeans_plus_plus(&self, corpus: &Corpus, k: usize) -> Vec<Vec<f32>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let n = corpus.len();

        // First centroid: random document
        let first = rng.random_range(0..n);
        let mut centroids = vec![corpus.weights(first).to_vec()];

        // Subsequent centroids: weighted by divergence to the nearest existing centroid
        while centroids.len() < k {
            let distances: Vec<f64> = (0..n)
                .map(|pos| {
                    let v = corpus.weights(pos);
                    centroids
                        .iter()
                        .map(|c| f64::from(js_divergence(v, c)))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let total: f64 = distances.iter().sum();

            let chosen = if total > 0.0 {
                let threshold = rng.random::<f64>() * total;
                let mut cumulative = 0.0;
                distances
                    .iter()
                    .position(|&d| {
                        cumulative += d;
                        d > 0.0 && cumulative >= threshold
                    })
                    .unwrap_or(n - 1)
            } else {
                // every document coincides with a centroid
                rng.random_range(0..n)
            };
            centroids.push(corpus.weights(chosen).to_vec());
        }

        centroids
    }
}

/// Assign each document to its nearest centroid (lowest index on ties).
fn assign(corpus: &Corpus, centroids: &[Vec<f32>]) -> Vec<usize> {
    (0..corpus.len())
        .map(|pos| {
            let v = corpus.weights(pos);
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = js_divergence(v, centroid);
                if d < best_dist {
                    best_dist = d;
                    best = c;
                }
            }
            best
        })
        .collect()
}

/// Mean of each cluster; empty clusters keep their previous centroid.
fn update_centroids(corpus: &Corpus, assignments: &[usize], previous: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let dimension = corpus.dimension();
    let mut sums = vec![vec![0.0f64; dimension]; previous.len()];
    let mut counts = vec![0usize; previous.len()];

    for (pos, &c) in assignments.iter().enumerate() {
        counts[c] += 1;
        for (s, &w) in sums[c].iter_mut().zip(corpus.weights(pos)) {
            *s += f64::from(w);
        }
    }

    sums.into_iter()
        .zip(counts)
        .zip(previous)
        .map(|((sum, count), old)| {
            if count > 0 {
                sum.iter().map(|&s| (s / count as f64) as f32).collect()
            } else {
                old.clone()
            }
        })
        .collect()
}

impl Strategy for CentroidClustering {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let fit = self.fit(corpus);
        if !fit.converged {
            warn!(
                k = self.k,
                iterations = fit.iterations,
                "k-means did not converge, using last assignment"
            );
        }

        let mut scorer = PairScorer::new(corpus, metric, min_score);
        for members in fit.members() {
            scorer.confirm_within(&members);
        }

        debug!(
            k = fit.centroids.len(),
            iterations = fit.iterations,
            comparisons = scorer.comparisons(),
            "centroid clustering finished"
        );
        Ok(scorer.into_outcome(fit.centroids.len()))
    }

    fn label(&self) -> String {
        format!("kmeans-{}", self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_groups() -> Corpus {
        Corpus::new(vec![
            vec![0.9, 0.1],
            vec![0.85, 0.15],
            vec![0.1, 0.9],
            vec![0.2, 0.8],
        ])
        .unwrap()
    }

    #[test]
    fn separates_two_obvious_groups() {
        let corpus = two_groups();
        for seed in 0..8 {
            let fit = CentroidClustering::new(2).unwrap().with_seed(seed).fit(&corpus);
            assert!(fit.converged);
            assert_eq!(fit.assignments[0], fit.assignments[1]);
            assert_eq!(fit.assignments[2], fit.assignments[3]);
            assert_ne!(fit.assignments[0], fit.assignments[2]);
        }
    }

    #[test]
    fn compares_only_within_clusters() {
        let corpus = two_groups();
        let outcome = CentroidClustering::new(2)
            .unwrap()
            .with_seed(42)
            .find(&corpus, 0.95, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome.clusters, 2);
        assert_eq!(outcome.comparisons, 2);
        assert_eq!(outcome.candidates.len(), 2);
    }

    #[test]
    fn k_larger_than_corpus_is_clamped() {
        let corpus = two_groups();
        let outcome = CentroidClustering::new(10)
            .unwrap()
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome.clusters, 4);
        assert_eq!(outcome.comparisons, 0);
    }

    #[test]
    fn identical_documents_do_not_break_seeding() {
        let corpus = Corpus::new(vec![vec![0.5, 0.5]; 5]).unwrap();
        let fit = CentroidClustering::new(3).unwrap().fit(&corpus);
        assert_eq!(fit.centroids.len(), 3);
        assert_eq!(fit.assignments, vec![0; 5]);
    }

    #[test]
    fn empty_corpus_has_no_clusters() {
        let corpus = Corpus::new(Vec::new()).unwrap();
        let outcome = CentroidClustering::new(3)
            .unwrap()
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .unwrap();
        assert_eq!(outcome, StrategyOutcome::default());
    }

    fn to_simplex(raw: &[f32], dimension: usize, n: usize) -> Corpus {
        let vectors = raw
            .chunks(dimension)
            .take(n)
            .map(|chunk| {
                let total: f32 = chunk.iter().sum::<f32>() + 1e-3 * dimension as f32;
                chunk.iter().map(|x| (x + 1e-3) / total).collect()
            })
            .collect();
        Corpus::new(vectors).unwrap()
    }

    proptest! {
        #[test]
        fn prop_fit_is_deterministic_given_seed(
            seed in any::<u64>(),
            dimension in 2usize..8,
            n in 2usize..40,
            k in 1usize..10,
            raw in proptest::collection::vec(0.0f32..1.0f32, 320),
        ) {
            let corpus = to_simplex(&raw, dimension, n);
            let a = CentroidClustering::new(k).unwrap().with_seed(seed).fit(&corpus);
            let b = CentroidClustering::new(k).unwrap().with_seed(seed).fit(&corpus);
            prop_assert_eq!(a, b);
        }
    }
}
