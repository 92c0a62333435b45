//! Subset evaluation - decoding, memoization, scoring
//!
//! One evaluation pass decodes every particle, skips empty subsets,
//! consults the fitness memo, and sends only genuinely new subsets to
//! the scoring collaborator. Results accumulate in the
//! [`EvaluationLedger`] for the whole run; nothing is cleared between
//! iterations, so the ledger doubles as a whole-run fitness cache and as
//! the record the global-best scan walks.
//!
//! The ledger is an explicit value owned by the search loop and passed
//! in by reference, which keeps each pass pure and testable on its own.

use std::collections::{BTreeMap, HashMap};

use ndarray::{ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::Rng;

use crate::error::SelectError;
use crate::progress::Reporter;

use super::search::RunStats;
use super::state::SwarmState;
use super::subset::FeatureSubset;

/// Narrow interface to the cross-validation scoring collaborator.
///
/// Receives the input matrix restricted to a candidate subset's columns
/// plus the full label vector, and returns one score per fold. The
/// evaluator averages the folds; any error is fatal to the run.
pub trait SubsetScorer: Send + Sync {
    fn fold_scores(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> anyhow::Result<Vec<f64>>;
}

/// Key of one recorded evaluation: the particle row that decoded the
/// subset, plus the subset itself.
pub type RecordKey = (usize, FeatureSubset);

/// Cumulative evaluation results for a whole run.
///
/// Two views of the same scores: `record` keyed by `(row, subset)` for
/// global-best identity, and `memo` keyed by the bare subset so an
/// identical subset decoded from any particle row is never re-scored.
#[derive(Debug, Clone, Default)]
pub struct EvaluationLedger {
    record: BTreeMap<RecordKey, f64>,
    memo: HashMap<FeatureSubset, f64>,
}

impl EvaluationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized score for a subset, regardless of which particle row
    /// produced it.
    pub fn memoized(&self, subset: &FeatureSubset) -> Option<f64> {
        self.memo.get(subset).copied()
    }

    /// Record a score under its compound key and memoize it by subset.
    pub fn insert(&mut self, row: usize, subset: FeatureSubset, score: f64) {
        self.memo.insert(subset.clone(), score);
        self.record.insert((row, subset), score);
    }

    /// Number of recorded `(row, subset)` keys.
    pub fn len(&self) -> usize {
        self.record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.is_empty()
    }

    /// All recorded evaluations, in deterministic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&RecordKey, f64)> {
        self.record.iter().map(|(key, &score)| (key, score))
    }

    /// The maximum recorded score. Ties resolve to the smallest key in
    /// ordered-key order, deterministically.
    pub fn best(&self) -> Option<(&RecordKey, f64)> {
        let mut best: Option<(&RecordKey, f64)> = None;
        for (key, score) in self.iter() {
            let improves = match best {
                None => true,
                Some((_, current)) => score > current,
            };
            if improves {
                best = Some((key, score));
            }
        }
        best
    }
}

/// Runs one evaluation pass over the swarm.
pub struct Evaluator<'a> {
    scorer: &'a dyn SubsetScorer,
    reporter: &'a Reporter,
}

impl<'a> Evaluator<'a> {
    pub fn new(scorer: &'a dyn SubsetScorer, reporter: &'a Reporter) -> Self {
        Self { scorer, reporter }
    }

    /// Decode and score every particle in the swarm.
    ///
    /// Per particle: draw one fresh threshold, decode, skip empty
    /// subsets, reuse memoized scores, otherwise invoke the scoring
    /// collaborator on the column-restricted matrix and record the mean
    /// fold score. Collaborator failures abort the pass immediately.
    pub fn evaluate(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
        swarm: &SwarmState,
        rng: &mut StdRng,
        ledger: &mut EvaluationLedger,
        stats: &mut RunStats,
    ) -> Result<(), SelectError> {
        self.reporter.stage("Evaluating particles:");
        let bar = self.reporter.particle_bar(swarm.n_particles());

        for (row, particle) in swarm.particles().outer_iter().enumerate() {
            let threshold = rng.gen::<f64>();
            let subset = FeatureSubset::decode(particle, threshold);

            if subset.is_empty() {
                stats.empty_decodes += 1;
            } else if let Some(score) = ledger.memoized(&subset) {
                stats.cache_hits += 1;
                ledger.insert(row, subset, score);
            } else {
                let x_subset = x.select(Axis(1), subset.indices());
                let folds = self
                    .scorer
                    .fold_scores(x_subset.view(), y.view())
                    .map_err(SelectError::Evaluation)?;
                if folds.is_empty() {
                    return Err(SelectError::Evaluation(anyhow::anyhow!(
                        "scoring collaborator returned no fold scores"
                    )));
                }

                let mean = folds.iter().sum::<f64>() / folds.len() as f64;
                stats.subsets_scored += 1;
                ledger.insert(row, subset, mean);
            }

            bar.inc(1);
        }

        bar.finish_and_clear();
        Ok(())
    }
}
