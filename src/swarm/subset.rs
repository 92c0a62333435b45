//! Feature subsets and particle decoding
//!
//! A particle is decoded into a discrete subset by drawing one uniform
//! threshold per particle per evaluation pass and keeping every feature
//! whose probability meets it. The threshold is never cached: the same
//! particle row can decode to different subsets on different passes, but
//! decoding is fully deterministic once the threshold is fixed.

use std::fmt;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// An ordered, deduplicated set of feature column indices.
///
/// Ordering always follows the original column order of the input
/// matrix. Equality and hashing use the exact index sequence, which is
/// what keys the fitness cache and the evaluation record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureSubset(Vec<usize>);

impl FeatureSubset {
    /// Build a subset from arbitrary indices, normalizing to column
    /// order without duplicates.
    pub fn new(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self(indices)
    }

    /// Decode one particle row against a single threshold: keep every
    /// feature whose selection probability is at least `threshold`.
    pub fn decode(row: ArrayView1<'_, f64>, threshold: f64) -> Self {
        Self(
            row.iter()
                .enumerate()
                .filter_map(|(column, &probability)| (probability >= threshold).then_some(column))
                .collect(),
        )
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FeatureSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index}")?;
        }
        write!(f, "]")
    }
}
