//! Cross-validation scoring collaborator
//!
//! The default [`SubsetScorer`](crate::swarm::SubsetScorer) implementation:
//! k-fold index splitting, estimator fit/predict per fold, metric scoring,
//! with folds evaluated in parallel inside a dedicated rayon pool bounded
//! by the configured worker count.
//!
//! The search loop only hands over the column-restricted matrix and waits
//! for the per-fold scores; any failure here is fatal to the run.

use std::sync::Arc;

use anyhow::{ensure, Result};
use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;

use crate::error::SelectError;
use crate::estimator::{Estimator, Metric};
use crate::swarm::SubsetScorer;

// ============================================================================
// K-fold splitting
// ============================================================================

/// Sequential k-fold splitter. The first `n_samples % n_splits` folds get
/// one extra sample, the fold order follows row order (no shuffling).
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    pub n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    /// Produce `(train, test)` index pairs covering every row exactly
    /// once on the test side.
    pub fn split(&self, n_samples: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        ensure!(self.n_splits >= 2, "cv must be at least 2, got {}", self.n_splits);
        ensure!(
            self.n_splits <= n_samples,
            "cannot split {} samples into {} folds",
            n_samples,
            self.n_splits
        );

        let base = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut splits = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < remainder);
            let stop = start + size;
            let test: Vec<usize> = (start..stop).collect();
            let train: Vec<usize> = (0..start).chain(stop..n_samples).collect();
            splits.push((train, test));
            start = stop;
        }

        Ok(splits)
    }
}

// ============================================================================
// Cross-validator
// ============================================================================

/// Scores a feature subset by cross-validating an estimator over it.
pub struct CrossValidator {
    estimator: Arc<dyn Estimator>,
    folds: KFold,
    metric: Metric,
    pool: rayon::ThreadPool,
}

impl CrossValidator {
    /// Build a validator with its own thread pool. `n_jobs == 0` uses
    /// all available cores.
    pub fn new(
        estimator: Arc<dyn Estimator>,
        cv: usize,
        metric: Metric,
        n_jobs: usize,
    ) -> Result<Self, SelectError> {
        let workers = if n_jobs == 0 { num_cpus::get() } else { n_jobs };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| SelectError::Config(format!("failed to build scoring thread pool: {e}")))?;

        Ok(Self {
            estimator,
            folds: KFold::new(cv),
            metric,
            pool,
        })
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }
}

impl SubsetScorer for CrossValidator {
    fn fold_scores(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Vec<f64>> {
        let splits = self.folds.split(x.nrows())?;

        self.pool.install(|| {
            splits
                .par_iter()
                .map(|(train, test)| {
                    let x_train = x.select(Axis(0), train);
                    let y_train = y.select(Axis(0), train);
                    let x_test = x.select(Axis(0), test);
                    let y_test = y.select(Axis(0), test);

                    let model = self.estimator.fit(x_train.view(), y_train.view())?;
                    let predictions = model.predict(x_test.view())?;
                    Ok(self.metric.score(y_test.view(), predictions.view()))
                })
                .collect::<Result<Vec<f64>>>()
        })
    }
}
