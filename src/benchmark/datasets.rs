//! Synthetic topic-distribution corpora.
//!
//! Real corpora come from an upstream topic model. For tests and benches we
//! sample Dirichlet vectors instead: each document gets a planted dominant
//! topic whose concentration is boosted by `dominance`, which produces the
//! clumpy structure (many near-duplicates per topic, a long tail of mixed
//! documents) that topic models tend to produce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution as _, Gamma};

use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Parameters of a synthetic corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicCorpusParams {
    /// Number of documents
    pub documents: usize,
    /// Number of topics (vector length)
    pub topics: usize,
    /// Symmetric Dirichlet concentration for all topics
    pub concentration: f32,
    /// Extra concentration on each document's planted topic
    pub dominance: f32,
    pub seed: u64,
}

impl Default for TopicCorpusParams {
    fn default() -> Self {
        Self {
            documents: 1000,
            topics: 20,
            concentration: 0.1,
            dominance: 5.0,
            seed: 42,
        }
    }
}

/// Sample a corpus. Identical parameters give an identical corpus.
pub fn generate_topic_corpus(params: &TopicCorpusParams) -> Result<Corpus> {
    if params.topics == 0 {
        return Err(SimPairError::Configuration(
            "synthetic corpus needs at least one topic".to_string(),
        ));
    }
    let base = gamma(params.concentration)?;
    let boosted = gamma(params.concentration + params.dominance)?;
    let mut rng = StdRng::seed_from_u64(params.seed);

    let vectors = (0..params.documents)
        .map(|_| {
            let planted = rng.random_range(0..params.topics);
            let mut v: Vec<f32> = (0..params.topics)
                .map(|t| {
                    if t == planted {
                        boosted.sample(&mut rng)
                    } else {
                        base.sample(&mut rng)
                    }
                })
                .collect();
            if v.iter().sum::<f32>() <= 0.0 {
                // all draws underflowed
                v[planted] = 1.0;
            }
            v
        })
        .collect();

    Corpus::normalized(vectors)
}

fn gamma(shape: f32) -> Result<Gamma<f32>> {
    Gamma::new(shape, 1.0).map_err(|e| {
        SimPairError::Configuration(format!("invalid Dirichlet concentration {shape}: {e}"))
    })
}
