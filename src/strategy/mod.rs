//! Candidate-pair strategies.
//!
//! Every strategy answers the same question as the gold standard ("which pairs
//! score at least `min_score`?") while trying to evaluate fewer pairs:
//!
//! | Strategy | Pruning idea | Clusters |
//! |----------|--------------|----------|
//! | [`ExhaustiveScan`] | none (reference) | 0 |
//! | [`GradientScan`] | projection order, decaying reach | 0 |
//! | [`EntropyBuckets`] | equal-width entropy ranges | 0 |
//! | [`HierarchicalEntropy`] | median bisection of entropy order | 0 |
//! | [`CentroidClustering`] | k-means under JS divergence | k |
//! | [`DensityClustering`] | DBSCAN over dominant-topic blocks | found |
//! | [`RandomSampling`] | uniform pair sample | 0 |
//!
//! All scoring goes through [`PairScorer`], which counts distinct evaluations.
//! Strategies return an error only for invalid configuration; trouble inside a
//! run (e.g. k-means not converging) degrades to a best-effort outcome.

mod dbscan;
mod entropy;
mod exhaustive;
mod gradient;
mod hierarchical;
mod kmeans;
mod random;
pub mod scorer;

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::distance::SimilarityMetric;
use crate::distribution::{Corpus, Pair};
use crate::{Result, SimPairError};

pub use dbscan::{DensityClustering, DEFAULT_RADIUS};
pub use entropy::EntropyBuckets;
pub use exhaustive::ExhaustiveScan;
pub use gradient::GradientScan;
pub use hierarchical::HierarchicalEntropy;
pub use kmeans::{CentroidClustering, DEFAULT_MAX_ITERATIONS};
pub use random::RandomSampling;
pub use scorer::PairScorer;

/// What a strategy found and what it cost.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyOutcome {
    /// Evaluated pairs that passed the threshold.
    pub candidates: HashSet<Pair>,
    /// Distinct similarity evaluations performed.
    pub comparisons: usize,
    /// Clusters built (0 for strategies that do not cluster).
    pub clusters: usize,
}

/// Contract shared by all candidate-pair strategies.
pub trait Strategy: fmt::Debug + Send + Sync {
    /// Find pairs scoring at least `min_score` under `metric`.
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome>;

    /// Label describing the strategy and its hyperparameters.
    fn label(&self) -> String;
}

/// Validate a similarity threshold.
pub fn check_threshold(min_score: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&min_score) {
        return Err(SimPairError::Configuration(format!(
            "similarity threshold must be in [0, 1], got {min_score}"
        )));
    }
    Ok(())
}

/// Strategy kind plus hyperparameters.
///
/// Serialized with an internal `kind` tag, e.g. `{"kind": "kmeans", "k": 20}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyKind {
    /// Evaluate every pair.
    Exhaustive,
    /// Projection-ordered scan with decaying reach.
    Gradient { decay: f32 },
    /// Flat entropy bucketing.
    Entropy { buckets: usize },
    /// Recursive median bisection of entropy order.
    HierarchicalEntropy { levels: usize },
    /// k-means clustering.
    #[serde(rename = "kmeans")]
    KMeans {
        k: usize,
        #[serde(default = "default_max_iterations")]
        max_iterations: usize,
    },
    /// DBSCAN clustering.
    Dbscan {
        min_points: usize,
        #[serde(default = "default_radius")]
        radius: f32,
    },
    /// Uniform pair sample.
    Random { sample_size: usize },
}

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_radius() -> f32 {
    DEFAULT_RADIUS
}

impl StrategyKind {
    /// Instantiate the strategy. `seed` is only used by randomized kinds.
    pub fn build(&self, seed: u64) -> Result<Box<dyn Strategy>> {
        Ok(match *self {
            StrategyKind::Exhaustive => Box::new(ExhaustiveScan),
            StrategyKind::Gradient { decay } => Box::new(GradientScan::new(decay)?),
            StrategyKind::Entropy { buckets } => Box::new(EntropyBuckets::new(buckets)?),
            StrategyKind::HierarchicalEntropy { levels } => {
                Box::new(HierarchicalEntropy::new(levels)?)
            }
            StrategyKind::KMeans { k, max_iterations } => Box::new(
                CentroidClustering::new(k)?
                    .with_max_iterations(max_iterations)?
                    .with_seed(seed),
            ),
            StrategyKind::Dbscan { min_points, radius } => {
                Box::new(DensityClustering::new(min_points, radius)?)
            }
            StrategyKind::Random { sample_size } => {
                Box::new(RandomSampling::new(sample_size).with_seed(seed))
            }
        })
    }

    /// Conventional short label (`kmeans-20`, `dbscan-10`, ...).
    pub fn label(&self) -> String {
        match self {
            StrategyKind::Exhaustive => "exhaustive".to_string(),
            StrategyKind::Gradient { decay } => format!("gradient-{decay}"),
            StrategyKind::Entropy { buckets } => format!("entropy-{buckets}"),
            StrategyKind::HierarchicalEntropy { levels } => format!("hentropy-{levels}"),
            StrategyKind::KMeans { k, .. } => format!("kmeans-{k}"),
            StrategyKind::Dbscan { min_points, .. } => format!("dbscan-{min_points}"),
            StrategyKind::Random { sample_size } => format!("random-{sample_size}"),
        }
    }
}

/// A strategy kind under a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedStrategy {
    pub name: String,
    #[serde(flatten)]
    pub kind: StrategyKind,
}

impl NamedStrategy {
    pub fn new(name: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Named after [`StrategyKind::label`].
    pub fn labeled(kind: StrategyKind) -> Self {
        Self {
            name: kind.label(),
            kind,
        }
    }
}

/// The standard line-up compared in topic-similarity studies.
pub fn default_lineup() -> Vec<NamedStrategy> {
    let mut lineup = vec![NamedStrategy::new(
        "gradient",
        StrategyKind::Gradient { decay: 0.99 },
    )];
    lineup.extend((1..=3).map(|buckets| NamedStrategy::labeled(StrategyKind::Entropy { buckets })));
    lineup.extend(
        (1..=3).map(|levels| NamedStrategy::labeled(StrategyKind::HierarchicalEntropy { levels })),
    );
    lineup.extend([20, 50, 100].into_iter().map(|k| {
        NamedStrategy::labeled(StrategyKind::KMeans {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        })
    }));
    lineup.extend([10, 50, 100, 200].into_iter().map(|min_points| {
        NamedStrategy::labeled(StrategyKind::Dbscan {
            min_points,
            radius: DEFAULT_RADIUS,
        })
    }));
    lineup.push(NamedStrategy::new(
        "random",
        StrategyKind::Random { sample_size: 10_000 },
    ));
    lineup
}
