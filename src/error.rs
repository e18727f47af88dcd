//! Error types for simpair.

use thiserror::Error;

/// Errors that can occur while building corpora, gold standards or running strategies.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimPairError {
    /// Invalid parameter or run configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A distribution does not have the corpus dimensionality.
    #[error("dimension mismatch at document {index}: expected {expected} topics, found {found}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A distribution is not a valid point on the probability simplex.
    #[error("numeric degeneracy at document {index}: {reason}")]
    NumericDegeneracy { index: usize, reason: String },

    /// Config (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SimPairError {
    /// Whether this error is a configuration problem (bad shape or bad parameters).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SimPairError::Configuration(_) | SimPairError::DimensionMismatch { .. }
        )
    }
}

impl From<serde_json::Error> for SimPairError {
    fn from(err: serde_json::Error) -> Self {
        SimPairError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SimPairError>;
