//! simpair: benchmarking approximate similar-pair detection over topic distributions.
//!
//! Given a corpus of per-document topic distributions and a similarity
//! threshold, the exhaustive answer to "which documents are similar?" costs
//! `C(N,2)` comparisons. This crate provides cheaper strategies and the
//! machinery to measure what they give up:
//!
//! - `distribution`: validated corpora and order-independent pairs
//! - `distance`: the similarity function shared by every component
//! - `strategy`: the [`Strategy`] contract and its variants (bucketing,
//!   clustering, sampling)
//! - `benchmark`: gold standard, evaluator, metrics and batch sweeps
//!
//! # Example
//!
//! ```rust
//! use simpair::benchmark::{evaluate, GoldStandard};
//! use simpair::strategy::CentroidClustering;
//! use simpair::{Corpus, SimilarityMetric};
//!
//! let corpus = Corpus::new(vec![
//!     vec![0.9, 0.1],
//!     vec![0.85, 0.15],
//!     vec![0.1, 0.9],
//!     vec![0.2, 0.8],
//! ])?;
//! let gold = GoldStandard::build(&corpus, 0.95, SimilarityMetric::Cosine)?;
//! let kmeans = CentroidClustering::new(2)?.with_seed(7);
//! let record = evaluate("kmeans-2", 4, 2, 0.95, &corpus, &gold, &kmeans)?;
//!
//! assert_eq!(record.comparisons, 2);
//! assert_eq!(record.recall, 1.0);
//! # Ok::<(), simpair::SimPairError>(())
//! ```
//!
//! # Critical Nuances
//!
//! ## Honest accounting
//!
//! A strategy's `comparisons` counts every distinct similarity evaluation it
//! performed, including those spent building its own structure (density
//! region queries). Centroid distances in k-means are not document pairs and
//! are not counted.
//!
//! ## One similarity function per run
//!
//! The gold standard and all strategies score pairs with the same
//! [`SimilarityMetric`]; mixing functions would make precision and recall
//! meaningless.

pub mod benchmark;
pub mod distance;
pub mod distribution;
pub mod error;
pub mod strategy;

// Re-exports
pub use distance::SimilarityMetric;
pub use distribution::{Corpus, DocId, Distribution, Pair};
pub use error::{Result, SimPairError};
pub use strategy::{Strategy, StrategyKind, StrategyOutcome};
