//! Global best tracking
//!
//! Scans the cumulative evaluation ledger after each pass and replaces
//! the stored best only on strict improvement, so the best score is
//! monotonically non-decreasing across the whole run. Because the
//! ledger is cumulative, a subset evaluated many iterations ago can
//! keep winning over everything the current iteration produced.

use serde::{Deserialize, Serialize};

use super::evaluate::EvaluationLedger;
use super::subset::FeatureSubset;

/// The best (particle row, subset) identity observed so far, with its
/// score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    pub score: f64,
    pub row: usize,
    pub subset: FeatureSubset,
}

/// Replace `current` with the ledger's maximum iff no best exists yet
/// or the maximum strictly exceeds it.
pub fn update_global_best(
    ledger: &EvaluationLedger,
    current: Option<GlobalBest>,
) -> Option<GlobalBest> {
    let Some((key, score)) = ledger.best() else {
        return current;
    };

    match current {
        Some(best) if score <= best.score => Some(best),
        _ => Some(GlobalBest {
            score,
            row: key.0,
            subset: key.1.clone(),
        }),
    }
}
