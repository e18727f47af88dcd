//! Benchmark harness for similar-pair strategies.
//!
//! Measures each strategy along two axes against an exhaustive gold standard:
//!
//! - **Correctness**: precision, recall, F-measure over similar pairs
//! - **Cost**: similarity evaluations performed vs `C(N,2)`, wall-clock time
//!
//! and folds them into one score, `effectiveness = F-measure × efficiency`.
//! A strategy that is fast but inaccurate, or accurate but exhaustive, scores low.
//!
//! Rendering records (tables, files) is left to the caller; everything here
//! stays in memory.

pub mod config;
pub mod datasets;
pub mod evaluation;
pub mod gold;
pub mod metrics;

pub use config::BenchmarkConfig;
pub use datasets::{generate_topic_corpus, TopicCorpusParams};
pub use evaluation::{evaluate, run_benchmark, BenchmarkReport, SkippedRun};
pub use gold::GoldStandard;
pub use metrics::{efficiency, f_measure, MetricsRecord, PairCounts};
