//! Batch run configuration.
//!
//! Defaults reproduce the reference topic-similarity study: corpus prefixes of
//! 200 to 1000 documents in steps of 100, cosine similarity at 0.83, and the
//! fifteen-strategy line-up from [`default_lineup`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::distance::SimilarityMetric;
use crate::strategy::{check_threshold, default_lineup, NamedStrategy};
use crate::{Result, SimPairError};

/// Parameters of a benchmark sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Corpus sizes (prefix lengths) to evaluate, in order.
    pub sizes: Vec<usize>,
    /// Similarity threshold for "similar".
    pub min_score: f32,
    /// Similarity function shared by gold standard and strategies.
    pub metric: SimilarityMetric,
    /// Strategies to run, each under a unique name.
    pub strategies: Vec<NamedStrategy>,
    /// Run seed; each strategy derives its own seed from it and its name.
    pub seed: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            sizes: (2..=10).map(|i| i * 100).collect(),
            min_score: 0.83,
            metric: SimilarityMetric::Cosine,
            strategies: default_lineup(),
            seed: 42,
        }
    }
}

impl BenchmarkConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check threshold, sizes and strategy names.
    pub fn validate(&self) -> Result<()> {
        check_threshold(self.min_score)?;
        if self.sizes.is_empty() {
            return Err(SimPairError::Configuration(
                "at least one corpus size is required".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for s in &self.strategies {
            if !seen.insert(s.name.as_str()) {
                return Err(SimPairError::Configuration(format!(
                    "duplicate strategy name {:?}",
                    s.name
                )));
            }
        }
        Ok(())
    }

    /// Seed handed to the named strategy.
    ///
    /// FNV-1a over the name, mixed with the run seed: stable across platforms and
    /// releases, and different for every strategy.
    pub fn strategy_seed(&self, name: &str) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let hash = name
            .bytes()
            .fold(OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(PRIME));
        hash ^ self.seed.wrapping_mul(0x9e37_79b9_7f4a_7c15)
    }
}
