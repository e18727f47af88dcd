//! Edge case tests for simpair.
//!
//! Tests unusual inputs and boundary conditions that could cause failures.

use simpair::benchmark::{run_benchmark, BenchmarkConfig, GoldStandard};
use simpair::strategy::{
    CentroidClustering, DensityClustering, EntropyBuckets, ExhaustiveScan, GradientScan,
    HierarchicalEntropy, NamedStrategy, RandomSampling,
};
use simpair::{Corpus, SimPairError, SimilarityMetric, Strategy, StrategyKind};

fn strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(ExhaustiveScan),
        Box::new(GradientScan::new(0.9).expect("decay")),
        Box::new(EntropyBuckets::new(4).expect("buckets")),
        Box::new(HierarchicalEntropy::new(3).expect("levels")),
        Box::new(CentroidClustering::new(5).expect("k").with_seed(1)),
        Box::new(DensityClustering::new(2, 0.1).expect("dbscan")),
        Box::new(RandomSampling::new(10).with_seed(1)),
    ]
}

// =============================================================================
// Corpus size edge cases
// =============================================================================

#[test]
fn empty_corpus() {
    let corpus = Corpus::new(Vec::new()).expect("empty corpus is valid");
    for strategy in strategies() {
        let outcome = strategy
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .expect("find on empty corpus");
        assert!(outcome.candidates.is_empty(), "{}", strategy.label());
        assert_eq!(outcome.comparisons, 0, "{}", strategy.label());
        assert_eq!(outcome.clusters, 0, "{}", strategy.label());
    }
}

#[test]
fn single_document() {
    let corpus = Corpus::new(vec![vec![0.3, 0.7]]).expect("corpus");
    for strategy in strategies() {
        let outcome = strategy
            .find(&corpus, 0.5, SimilarityMetric::Cosine)
            .expect("find on single document");
        assert_eq!(outcome.comparisons, 0, "{}", strategy.label());
        assert!(outcome.clusters <= 1, "{}", strategy.label());
    }
}

#[test]
fn identical_documents() {
    let corpus = Corpus::new(vec![vec![0.25; 4]; 12]).expect("corpus");
    let gold = GoldStandard::build(&corpus, 0.99, SimilarityMetric::JensenShannon).expect("gold");
    assert_eq!(gold.num_pairs(), 66);

    for strategy in strategies() {
        let outcome = strategy
            .find(&corpus, 0.99, SimilarityMetric::JensenShannon)
            .expect("find on identical documents");
        assert!(
            outcome.candidates.iter().all(|p| gold.contains(p.first(), p.second())),
            "{}",
            strategy.label()
        );
    }
}

// =============================================================================
// Threshold edge cases
// =============================================================================

#[test]
fn threshold_of_one_keeps_only_exact_matches() {
    let corpus =
        Corpus::new(vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.9, 0.1]]).expect("corpus");
    let gold = GoldStandard::build(&corpus, 1.0, SimilarityMetric::Cosine).expect("gold");
    assert_eq!(gold.num_pairs(), 1);
    assert!(gold.contains(0, 1));
}

#[test]
fn out_of_range_threshold_is_rejected_everywhere() {
    let corpus = Corpus::new(vec![vec![1.0, 0.0]; 3]).expect("corpus");
    for strategy in strategies() {
        let err = strategy
            .find(&corpus, -0.1, SimilarityMetric::Cosine)
            .expect_err("negative threshold");
        assert!(err.is_configuration(), "{}", strategy.label());
    }
}

// =============================================================================
// Input validation
// =============================================================================

#[test]
fn inconsistent_dimensions_fail_fast() {
    let err = Corpus::new(vec![vec![0.5, 0.5], vec![1.0]]).expect_err("mixed dimensions");
    assert!(matches!(err, SimPairError::DimensionMismatch { index: 1, .. }));
}

#[test]
fn non_finite_weights_fail_fast() {
    let err = Corpus::new(vec![vec![f32::NAN, 1.0]]).expect_err("NaN weight");
    assert!(matches!(err, SimPairError::NumericDegeneracy { .. }));

    let err = Corpus::normalized(vec![vec![f32::INFINITY, 1.0]]).expect_err("infinite weight");
    assert!(matches!(err, SimPairError::NumericDegeneracy { .. }));
}

// =============================================================================
// Oversized hyperparameters degrade instead of failing
// =============================================================================

#[test]
fn oversized_hyperparameters() {
    let corpus = Corpus::new(vec![
        vec![0.7, 0.2, 0.1],
        vec![0.1, 0.7, 0.2],
        vec![0.2, 0.1, 0.7],
    ])
    .expect("corpus");

    let kmeans = CentroidClustering::new(1_000).expect("k").with_seed(3);
    let outcome = kmeans
        .find(&corpus, 0.5, SimilarityMetric::Cosine)
        .expect("k larger than corpus");
    assert_eq!(outcome.clusters, 3);

    let dbscan = DensityClustering::new(1_000, 0.5).expect("dbscan");
    let outcome = dbscan
        .find(&corpus, 0.5, SimilarityMetric::Cosine)
        .expect("min_points larger than corpus");
    assert_eq!(outcome.clusters, 0);
    assert!(outcome.candidates.is_empty());

    let buckets = EntropyBuckets::new(10_000).expect("buckets");
    assert!(buckets.find(&corpus, 0.5, SimilarityMetric::Cosine).is_ok());
}

#[test]
fn invalid_hyperparameters_abort_the_sweep() {
    let corpus = Corpus::new(vec![vec![1.0, 0.0]; 4]).expect("corpus");
    let config = BenchmarkConfig {
        sizes: vec![4],
        strategies: vec![NamedStrategy::new("broken", StrategyKind::KMeans {
            k: 0,
            max_iterations: 10,
        })],
        ..BenchmarkConfig::default()
    };
    let err = run_benchmark(&corpus, &config).expect_err("k = 0");
    assert!(err.is_configuration());
}

#[test]
fn oversized_corpus_size_only_skips_that_size() {
    let corpus = Corpus::new(vec![
        vec![0.9, 0.1],
        vec![0.85, 0.15],
        vec![0.1, 0.9],
        vec![0.2, 0.8],
    ])
    .expect("corpus");
    let config = BenchmarkConfig {
        sizes: vec![4, 10],
        min_score: 0.95,
        strategies: vec![
            NamedStrategy::labeled(StrategyKind::Exhaustive),
            NamedStrategy::labeled(StrategyKind::Entropy { buckets: 2 }),
        ],
        ..BenchmarkConfig::default()
    };

    let report = run_benchmark(&corpus, &config).expect("sweep survives a bad size");
    assert_eq!(report.len(), 2);
    assert!(report.for_size(4).all(|r| r.corpus_size == 4));
    assert_eq!(report.for_size(10).count(), 0);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].corpus_size, 10);
}

#[test]
fn huge_bucket_count_degrades() {
    let corpus = Corpus::new(vec![
        vec![0.7, 0.2, 0.1],
        vec![0.1, 0.7, 0.2],
        vec![0.2, 0.1, 0.7],
    ])
    .expect("corpus");
    let outcome = EntropyBuckets::new(usize::MAX / 16)
        .expect("buckets")
        .find(&corpus, 0.5, SimilarityMetric::Cosine)
        .expect("oversized bucket count");
    assert!(outcome.comparisons <= corpus.total_pairs());
}
