//! Density clustering (DBSCAN).
//!
//! Two documents are neighbors when `1 - similarity <= radius`; a document with
//! at least `min_points` neighbors (itself included) is a core point, and
//! clusters are the density-connected components grown from core points.
//! Points reachable from no core point are noise and are never paired.
//!
//! Region queries are themselves similarity evaluations and are counted. To keep
//! them below `C(N, 2)`, a region query only looks at documents sharing the
//! query's dominant topic. Confirmation afterwards reuses the cached scores.

use std::collections::{BTreeMap, VecDeque};

use tracing::debug;

use super::{check_threshold, PairScorer, Strategy, StrategyOutcome};
use crate::distance::{dominant_topic, SimilarityMetric};
use crate::distribution::Corpus;
use crate::{Result, SimPairError};

/// Neighborhood radius used when none is configured.
pub const DEFAULT_RADIUS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// DBSCAN strategy.
#[derive(Debug, Clone, Copy)]
pub struct DensityClustering {
    min_points: usize,
    radius: f32,
}

impl DensityClustering {
    /// `min_points >= 1`, `radius` in `[0, 1]`.
    pub fn new(min_points: usize, radius: f32) -> Result<Self> {
        if min_points == 0 {
            return Err(SimPairError::Configuration(
                "DBSCAN min_points must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&radius) {
            return Err(SimPairError::Configuration(format!(
                "DBSCAN radius must be in [0, 1], got {radius}"
            )));
        }
        Ok(Self { min_points, radius })
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Neighbor lists (excluding the point itself) from blocked region queries.
    fn neighborhoods(&self, corpus: &Corpus, scorer: &mut PairScorer<'_>) -> Vec<Vec<usize>> {
        let mut blocks: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for pos in 0..corpus.len() {
            blocks
                .entry(dominant_topic(corpus.weights(pos)).0)
                .or_default()
                .push(pos);
        }

        let min_similarity = 1.0 - self.radius;
        let mut neighbors = vec![Vec::new(); corpus.len()];
        for block in blocks.values() {
            for (i, &a) in block.iter().enumerate() {
                for &b in &block[i + 1..] {
                    if scorer.score(a, b) >= min_similarity {
                        neighbors[a].push(b);
                        neighbors[b].push(a);
                    }
                }
            }
        }
        neighbors
    }

    /// Cluster members per cluster, in discovery order.
    fn expand(&self, neighbors: &[Vec<usize>]) -> Vec<Vec<usize>> {
        let is_core = |p: usize| neighbors[p].len() + 1 >= self.min_points;
        let mut labels = vec![Label::Unvisited; neighbors.len()];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for p in 0..neighbors.len() {
            if labels[p] != Label::Unvisited {
                continue;
            }
            if !is_core(p) {
                labels[p] = Label::Noise;
                continue;
            }

            let id = clusters.len();
            let mut members = vec![p];
            labels[p] = Label::Cluster(id);
            let mut queue: VecDeque<usize> = neighbors[p].iter().copied().collect();

            while let Some(q) = queue.pop_front() {
                match labels[q] {
                    Label::Cluster(_) => continue,
                    // border point previously marked as noise
                    Label::Noise => {
                        labels[q] = Label::Cluster(id);
                        members.push(q);
                    }
                    Label::Unvisited => {
                        labels[q] = Label::Cluster(id);
                        members.push(q);
                        if is_core(q) {
                            queue.extend(neighbors[q].iter().copied());
                        }
                    }
                }
            }
            clusters.push(members);
        }
        clusters
    }
}

impl Strategy for DensityClustering {
    fn find(
        &self,
        corpus: &Corpus,
        min_score: f32,
        metric: SimilarityMetric,
    ) -> Result<StrategyOutcome> {
        check_threshold(min_score)?;
        let mut scorer = PairScorer::new(corpus, metric, min_score);
        let neighbors = self.neighborhoods(corpus, &mut scorer);
        let region_queries = scorer.comparisons();

        let clusters = self.expand(&neighbors);
        for members in &clusters {
            scorer.confirm_within(members);
        }

        let noise = corpus.len() - clusters.iter().map(Vec::len).sum::<usize>();
        debug!(
            min_points = self.min_points,
            radius = self.radius,
            clusters = clusters.len(),
            noise,
            region_queries,
            comparisons = scorer.comparisons(),
            "density clustering finished"
        );
        Ok(scorer.into_outcome(clusters.len()))
    }

    fn label(&self) -> String {
        format!("dbscan-{}", self.min_points)
    }
}
