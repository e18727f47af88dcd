//! Topic distributions, corpora and similar pairs.
//!
//! A [`Corpus`] is the only way distributions enter the crate. Its constructor
//! enforces a single numeric policy for everything downstream:
//!
//! - all vectors share one non-zero dimensionality (otherwise `DimensionMismatch`),
//! - every component is finite and non-negative, and every vector sums to 1
//!   within [`SUM_TOLERANCE`] (otherwise `NumericDegeneracy`).
//!
//! Out-of-tolerance input fails fast. Producers that hold raw topic weights and
//! want them rescaled call [`Corpus::normalized`] instead.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use crate::{Result, SimPairError};

/// Allowed drift of a distribution's sum from 1.
pub const SUM_TOLERANCE: f32 = 1e-3;

/// Positional identifier of a document inside its corpus.
pub type DocId = u32;

/// A single document's topic distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    id: DocId,
    weights: Vec<f32>,
}

impl Distribution {
    /// Document identifier.
    #[inline]
    pub fn id(&self) -> DocId {
        self.id
    }

    /// Topic weights.
    #[inline]
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    /// Number of topics.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.weights.len()
    }
}

/// Ordered, fixed-dimensionality collection of distributions.
///
/// Document `i` always has id `i`, so positions and ids are interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    docs: Vec<Distribution>,
    dimension: usize,
}

impl Corpus {
    /// Build a corpus from vectors that already lie on the simplex.
    pub fn new(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = check_dimensions(&vectors)?;
        for (index, v) in vectors.iter().enumerate() {
            check_simplex(index, v)?;
        }
        Self::from_checked(vectors, dimension)
    }

    /// Build a corpus from raw non-negative weights, rescaling each vector to sum to 1.
    ///
    /// Vectors with a zero (or non-finite) total are still rejected.
    pub fn normalized(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimension = check_dimensions(&vectors)?;
        let mut out = Vec::with_capacity(vectors.len());
        for (index, v) in vectors.into_iter().enumerate() {
            if let Some(bad) = v.iter().find(|x| !x.is_finite() || **x < 0.0) {
                return Err(SimPairError::NumericDegeneracy {
                    index,
                    reason: format!("component {bad} is negative or not finite"),
                });
            }
            let total: f32 = v.iter().sum();
            if total <= 0.0 || !total.is_finite() {
                return Err(SimPairError::NumericDegeneracy {
                    index,
                    reason: format!("cannot normalize a vector summing to {total}"),
                });
            }
            out.push(v.into_iter().map(|x| x / total).collect());
        }
        Self::from_checked(out, dimension)
    }

    fn from_checked(vectors: Vec<Vec<f32>>, dimension: usize) -> Result<Self> {
        let docs = vectors
            .into_iter()
            .enumerate()
            .map(|(i, weights)| {
                Ok(Distribution {
                    id: doc_id(i)?,
                    weights,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { docs, dimension })
    }

    /// The first `n` documents (ids are unchanged).
    pub fn prefix(&self, n: usize) -> Result<Self> {
        if n > self.docs.len() {
            return Err(SimPairError::Configuration(format!(
                "requested {n} documents from a corpus of {}",
                self.docs.len()
            )));
        }
        Ok(Self {
            docs: self.docs[..n].to_vec(),
            dimension: self.dimension,
        })
    }

    /// Number of documents.
    #[inline]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Whether the corpus has no documents.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Number of topics per document (0 for an empty corpus).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Document at a position.
    #[inline]
    pub fn get(&self, pos: usize) -> Option<&Distribution> {
        self.docs.get(pos)
    }

    /// Weights of the document at a position.
    ///
    /// Panics if `pos` is out of range; strategies only index positions below `len()`.
    #[inline]
    pub fn weights(&self, pos: usize) -> &[f32] {
        &self.docs[pos].weights
    }

    /// Iterate over documents in order.
    pub fn iter(&self) -> impl Iterator<Item = &Distribution> {
        self.docs.iter()
    }

    /// `C(N, 2)`, the number of unordered pairs.
    #[inline]
    pub fn total_pairs(&self) -> usize {
        total_pairs(self.docs.len())
    }
}

/// Id of the document at `index`; a corpus holds at most `u32::MAX + 1` documents.
fn doc_id(index: usize) -> Result<DocId> {
    DocId::try_from(index).map_err(|_| {
        SimPairError::Configuration(format!(
            "document {index} exceeds the {} documents a corpus can address",
            u64::from(DocId::MAX) + 1
        ))
    })
}

/// `n (n - 1) / 2`.
#[inline]
pub fn total_pairs(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

fn check_dimensions(vectors: &[Vec<f32>]) -> Result<usize> {
    let Some(first) = vectors.first() else {
        return Ok(0);
    };
    let expected = first.len();
    if expected == 0 {
        return Err(SimPairError::Configuration(
            "distributions must have at least one topic".to_string(),
        ));
    }
    for (index, v) in vectors.iter().enumerate() {
        if v.len() != expected {
            return Err(SimPairError::DimensionMismatch {
                index,
                expected,
                found: v.len(),
            });
        }
    }
    Ok(expected)
}

fn check_simplex(index: usize, v: &[f32]) -> Result<()> {
    if let Some(bad) = v.iter().find(|x| !x.is_finite() || **x < 0.0) {
        return Err(SimPairError::NumericDegeneracy {
            index,
            reason: format!("component {bad} is negative or not finite"),
        });
    }
    let total: f32 = v.iter().sum();
    if (total - 1.0).abs() > SUM_TOLERANCE {
        return Err(SimPairError::NumericDegeneracy {
            index,
            reason: format!("components sum to {total}"),
        });
    }
    Ok(())
}

/// Unordered pair of distinct documents with their similarity score.
///
/// Equality, ordering and hashing only look at the ids, so
/// `Pair::new(a, b, s) == Pair::new(b, a, t)`.
#[derive(Debug, Clone, Copy)]
pub struct Pair {
    lo: DocId,
    hi: DocId,
    score: f32,
}

impl Pair {
    /// Create a pair; the ids are stored in ascending order.
    ///
    /// `a` and `b` must differ.
    pub fn new(a: DocId, b: DocId, score: f32) -> Self {
        debug_assert_ne!(a, b, "a pair needs two distinct documents");
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        Self { lo, hi, score }
    }

    /// The smaller id.
    #[inline]
    pub fn first(&self) -> DocId {
        self.lo
    }

    /// The larger id.
    #[inline]
    pub fn second(&self) -> DocId {
        self.hi
    }

    /// Similarity score recorded when the pair was evaluated.
    #[inline]
    pub fn score(&self) -> f32 {
        self.score
    }

    /// `(lo, hi)` key.
    #[inline]
    pub fn key(&self) -> (DocId, DocId) {
        (self.lo, self.hi)
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pair {}

impl Hash for Pair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Pair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pair {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
