//! Error taxonomy for the feature selection run.
//!
//! Three classes, matching where a failure can originate:
//! - `Config`: invalid constructor arguments, raised before any computation
//! - `Input`: malformed data handed to `fit`, raised before any evaluation
//! - `Evaluation`: failures surfaced by the scoring collaborator, fatal to the run

use thiserror::Error;

/// Errors produced by the particle swarm feature selector.
#[derive(Debug, Error)]
pub enum SelectError {
    /// Invalid constructor argument. Raised eagerly at construction,
    /// never retried.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Malformed input data at `fit` time. Raised before any particle
    /// is evaluated.
    #[error("invalid input: {0}")]
    Input(String),

    /// Failure raised by the cross-validation scoring collaborator
    /// (incompatible estimator, degenerate fold, ...). Propagated
    /// unmodified; a single failed evaluation aborts the whole search.
    #[error("subset evaluation failed: {0}")]
    Evaluation(anyhow::Error),
}
