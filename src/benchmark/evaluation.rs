//! Running strategies and scoring them against the gold standard.
//!
//! [`evaluate`] times a single `find` call and turns its outcome into a
//! [`MetricsRecord`]. [`run_benchmark`] drives the whole sweep:
//!
//! ```text
//! for size in config.sizes:
//!     corpus = prefix(size)
//!     gold   = GoldStandard::build(corpus)        // once per size
//!     for strategy in strategies (by name):
//!         records.push(evaluate(strategy))
//! ```
//!
//! Runs are sequential so elapsed times are not contended.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::config::BenchmarkConfig;
use super::gold::GoldStandard;
use super::metrics::{MetricsRecord, PairCounts};
use crate::distribution::Corpus;
use crate::strategy::{check_threshold, Strategy};
use crate::{Result, SimPairError};

/// Run one strategy on one corpus and score it.
///
/// `gold` must have been built from `corpus` with `min_score`; the strategy is
/// run with the gold standard's metric so both sides use the same function.
#[instrument(skip_all, fields(strategy = name, corpus_size = corpus_size))]
pub fn evaluate(
    name: &str,
    corpus_size: usize,
    topic_count: usize,
    min_score: f32,
    corpus: &Corpus,
    gold: &GoldStandard,
    strategy: &dyn Strategy,
) -> Result<MetricsRecord> {
    check_threshold(min_score)?;
    if corpus.len() != corpus_size || gold.corpus_size() != corpus_size {
        return Err(SimPairError::Configuration(format!(
            "corpus size {corpus_size} does not match corpus ({}) or gold standard ({})",
            corpus.len(),
            gold.corpus_size()
        )));
    }
    if corpus.dimension() != topic_count {
        return Err(SimPairError::Configuration(format!(
            "topic count {topic_count} does not match corpus dimension {}",
            corpus.dimension()
        )));
    }
    if gold.min_score() != min_score {
        return Err(SimPairError::Configuration(format!(
            "gold standard was built at threshold {}, evaluating at {min_score}",
            gold.min_score()
        )));
    }

    let start = Instant::now();
    let outcome = strategy.find(corpus, min_score, gold.metric())?;
    let elapsed = start.elapsed();

    let counts = PairCounts::compare(&outcome.candidates, gold.pairs());
    let record = MetricsRecord::new(
        name,
        corpus_size,
        topic_count,
        min_score,
        elapsed,
        outcome.comparisons,
        counts,
        outcome.clusters,
    );
    info!(
        precision = record.precision,
        recall = record.recall,
        efficiency = record.efficiency,
        comparisons = record.comparisons,
        "{}",
        record.summary()
    );
    Ok(record)
}

/// A run that produced no record, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRun {
    pub corpus_size: usize,
    /// `None` when the whole corpus size was skipped.
    pub strategy: Option<String>,
    pub reason: String,
}

/// All records of a sweep, ordered by corpus size, then strategy name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub records: Vec<MetricsRecord>,
    /// Sizes and strategy runs that failed; the rest of the sweep still ran.
    #[serde(default)]
    pub skipped: Vec<SkippedRun>,
}

impl BenchmarkReport {
    /// Record for a strategy at a corpus size.
    pub fn get(&self, strategy: &str, corpus_size: usize) -> Option<&MetricsRecord> {
        self.records
            .iter()
            .find(|r| r.strategy == strategy && r.corpus_size == corpus_size)
    }

    /// Records of one strategy across sizes.
    pub fn for_strategy<'a>(&'a self, strategy: &'a str) -> impl Iterator<Item = &'a MetricsRecord> {
        self.records.iter().filter(move |r| r.strategy == strategy)
    }

    /// Records at one corpus size.
    pub fn for_size(&self, corpus_size: usize) -> impl Iterator<Item = &MetricsRecord> {
        self.records
            .iter()
            .filter(move |r| r.corpus_size == corpus_size)
    }

    /// Strategy with the highest effectiveness at a size (first by name on ties).
    pub fn best_at(&self, corpus_size: usize) -> Option<&MetricsRecord> {
        self.for_size(corpus_size).fold(None, |best, r| match best {
            Some(b) if b.effectiveness >= r.effectiveness => Some(b),
            _ => Some(r),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Evaluate every configured strategy on every configured corpus prefix.
///
/// Invalid thresholds, sizes lists, names or hyperparameters fail the sweep
/// before any work starts. A size larger than the corpus skips that size, and a
/// strategy that fails on one size skips that record; both are logged and
/// listed in [`BenchmarkReport::skipped`].
#[instrument(skip_all, fields(documents = corpus.len(), sizes = config.sizes.len(), strategies = config.strategies.len()))]
pub fn run_benchmark(corpus: &Corpus, config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    config.validate()?;

    let mut strategies = Vec::with_capacity(config.strategies.len());
    for named in &config.strategies {
        let seed = config.strategy_seed(&named.name);
        strategies.push((named.name.as_str(), named.kind.build(seed)?));
    }
    strategies.sort_by(|a, b| a.0.cmp(b.0));
    let lineup: Vec<(&str, &dyn Strategy)> = strategies
        .iter()
        .map(|(name, strategy)| (*name, strategy.as_ref()))
        .collect();
    Ok(sweep(corpus, config, &lineup))
}

/// Per-size loop of [`run_benchmark`] over already built, name-ordered strategies.
fn sweep(
    corpus: &Corpus,
    config: &BenchmarkConfig,
    strategies: &[(&str, &dyn Strategy)],
) -> BenchmarkReport {
    let mut report = BenchmarkReport::default();
    for &size in &config.sizes {
        let prepared = corpus.prefix(size).and_then(|subset| {
            let gold = GoldStandard::build(&subset, config.min_score, config.metric)?;
            Ok((subset, gold))
        });
        let (subset, gold) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                warn!(corpus_size = size, error = %err, "skipping corpus size");
                report.skipped.push(SkippedRun {
                    corpus_size: size,
                    strategy: None,
                    reason: err.to_string(),
                });
                continue;
            }
        };
        info!(
            corpus_size = size,
            similar_pairs = gold.num_pairs(),
            total_pairs = subset.total_pairs(),
            "evaluating corpus size"
        );

        for &(name, strategy) in strategies {
            match evaluate(
                name,
                size,
                subset.dimension(),
                config.min_score,
                &subset,
                &gold,
                strategy,
            ) {
                Ok(record) => report.records.push(record),
                Err(err) => {
                    warn!(
                        strategy = name,
                        corpus_size = size,
                        error = %err,
                        "strategy run failed"
                    );
                    report.skipped.push(SkippedRun {
                        corpus_size: size,
                        strategy: Some(name.to_string()),
                        reason: err.to_string(),
                    });
                }
            }
        }
    }
    report
}
