//! Search loop - the selector's public surface
//!
//! Orchestrates one run: initialize the swarm, then repeat
//! {apply velocity -> evaluate -> update global best -> recompute
//! velocity} for the fixed iteration budget, then expose the best
//! subset, score, and probability vector found. The loop is strictly
//! sequential; only fold scoring inside the collaborator may run in
//! parallel.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::SelectorConfig;
use crate::crossval::CrossValidator;
use crate::error::SelectError;
use crate::estimator::Estimator;
use crate::progress::Reporter;

use super::best::{update_global_best, GlobalBest};
use super::evaluate::{EvaluationLedger, Evaluator, SubsetScorer};
use super::state::SwarmState;
use super::subset::FeatureSubset;
use super::velocity::attraction_velocities;

// ============================================================================
// Run outputs
// ============================================================================

/// Terminal result of a search: the best subset found and how it scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    /// Best cross-validated score observed across the run.
    pub score: f64,
    /// Index of the particle row that produced the best subset.
    pub particle: usize,
    /// Selected feature column indices, in original column order.
    pub features: FeatureSubset,
    /// The winning particle's probability values restricted to the
    /// selected features, read from the end-of-run particle matrix.
    pub probabilities: Vec<f64>,
    /// Column labels for the selected features, when names were
    /// configured.
    pub feature_names: Option<Vec<String>>,
}

/// One recorded evaluation, exposed for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationEntry {
    pub particle: usize,
    pub subset: FeatureSubset,
    pub score: f64,
}

/// Observational summary of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Loop passes performed (always the configured budget).
    pub iterations: usize,
    /// Subsets sent to the scoring collaborator.
    pub subsets_scored: usize,
    /// Decodes answered from the fitness memo instead of the scorer.
    pub cache_hits: usize,
    /// Decodes that produced an empty subset and were skipped.
    pub empty_decodes: usize,
    /// Best score after each iteration (None until a subset scored).
    pub best_score_history: Vec<Option<f64>>,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_secs: f64,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
}

/// Everything a finished search exposes. `best` is None only when every
/// decode across the whole run came up empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOutcome {
    pub best: Option<FitResult>,
    /// Every recorded `(particle, subset)` evaluation, cumulative over
    /// the run, in deterministic key order.
    pub evaluations: Vec<EvaluationEntry>,
    pub stats: RunStats,
}

// ============================================================================
// Selector
// ============================================================================

/// Particle swarm feature selector.
///
/// Holds the validated configuration and the scoring collaborator; each
/// [`fit`](Self::fit) call runs one complete, self-contained search.
pub struct ParticleSwarmFeatureSelector {
    config: SelectorConfig,
    scorer: Box<dyn SubsetScorer>,
    reporter: Reporter,
}

impl ParticleSwarmFeatureSelector {
    /// Build a selector that scores subsets by cross-validating the
    /// given estimator with the configured fold count, metric, and
    /// worker count.
    pub fn new(config: SelectorConfig, estimator: Arc<dyn Estimator>) -> Result<Self, SelectError> {
        config.validate()?;
        let metric = config.metric()?;
        let scorer = CrossValidator::new(estimator, config.cv, metric, config.n_jobs)?;
        Ok(Self {
            reporter: Reporter::new(config.verbose),
            config,
            scorer: Box::new(scorer),
        })
    }

    /// Build a selector around a custom scoring collaborator.
    pub fn with_scorer(
        config: SelectorConfig,
        scorer: Box<dyn SubsetScorer>,
    ) -> Result<Self, SelectError> {
        config.validate()?;
        Ok(Self {
            reporter: Reporter::new(config.verbose),
            config,
            scorer,
        })
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    fn validate_input(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<(), SelectError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(SelectError::Input(format!(
                "X must be non-empty, got shape ({}, {})",
                x.nrows(),
                x.ncols()
            )));
        }
        if x.nrows() != y.len() {
            return Err(SelectError::Input(format!(
                "X has {} rows but y has {} labels",
                x.nrows(),
                y.len()
            )));
        }
        if let Some(names) = &self.config.feature_names {
            if names.len() != x.ncols() {
                return Err(SelectError::Input(format!(
                    "{} feature names configured but X has {} columns",
                    names.len(),
                    x.ncols()
                )));
            }
        }
        Ok(())
    }

    /// Run the full search over `x` (samples x features) and `y`
    /// (one label per sample).
    ///
    /// Each call is self-contained: the random source is re-seeded from
    /// the configured seed and the fitness cache starts empty, so
    /// repeated fits on the same data are reproducible.
    pub fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, f64>,
    ) -> Result<SearchOutcome, SelectError> {
        self.validate_input(x.view(), y.view())?;

        let started = Instant::now();
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.reporter.stage("Particle swarm feature selection started.");
        self.reporter
            .stage("Initializing global best, particles and velocities.");
        let mut swarm = SwarmState::init(self.config.n_particles, x.ncols(), &mut rng);
        let mut ledger = EvaluationLedger::new();
        let mut global_best: Option<GlobalBest> = None;
        let mut stats = RunStats::default();

        let evaluator = Evaluator::new(self.scorer.as_ref(), &self.reporter);
        let budget = self.config.max_iter;
        let mut remaining = budget;

        while remaining > 0 {
            if remaining != budget {
                self.reporter.stage("Updating particle velocities.");
            }
            swarm.apply_velocities();

            evaluator.evaluate(x.view(), y.view(), &swarm, &mut rng, &mut ledger, &mut stats)?;

            self.reporter
                .stage("Updating global best score and best particle.");
            global_best = update_global_best(&ledger, global_best);

            // Until something scored there is no attractor; velocities
            // stay zero and the swarm holds still.
            if let Some(best) = &global_best {
                self.reporter.stage("Calculating new velocities for particles.");
                swarm.set_velocities(attraction_velocities(
                    swarm.particles(),
                    best.row,
                    remaining,
                ));
            }

            stats.iterations += 1;
            stats
                .best_score_history
                .push(global_best.as_ref().map(|best| best.score));
            self.reporter
                .stage(&format!("Iteration {}/{} done.", stats.iterations, budget));
            remaining -= 1;
        }

        stats.elapsed_secs = started.elapsed().as_secs_f64();
        stats.finished_at = Some(Utc::now());

        let evaluations = ledger
            .iter()
            .map(|((particle, subset), score)| EvaluationEntry {
                particle: *particle,
                subset: subset.clone(),
                score,
            })
            .collect();

        let best = global_best.map(|best| {
            let winner = swarm.particle(best.row);
            let probabilities = best
                .subset
                .indices()
                .iter()
                .map(|&column| winner[column])
                .collect();
            let feature_names = self.config.feature_names.as_ref().map(|names| {
                best.subset
                    .indices()
                    .iter()
                    .map(|&column| names[column].clone())
                    .collect()
            });

            FitResult {
                score: best.score,
                particle: best.row,
                features: best.subset,
                probabilities,
                feature_names,
            }
        });

        self.reporter.stage("Particle swarm feature selection finished.");
        Ok(SearchOutcome {
            best,
            evaluations,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    struct MeanScorer;
    impl SubsetScorer for MeanScorer {
        fn fold_scores(
            &self,
            x: ArrayView2<'_, f64>,
            _y: ArrayView1<'_, f64>,
        ) -> anyhow::Result<Vec<f64>> {
            Ok(vec![x.ncols() as f64 * 0.1, x.ncols() as f64 * 0.1])
        }
    }

    fn selector(config: SelectorConfig) -> ParticleSwarmFeatureSelector {
        ParticleSwarmFeatureSelector::with_scorer(config, Box::new(MeanScorer)).unwrap()
    }

    #[test]
    fn test_rejects_empty_matrix() {
        let sel = selector(SelectorConfig::new(3, 2, "accuracy", 2).with_seed(1));
        let x = Array2::<f64>::zeros((0, 4));
        let y = Array1::<f64>::zeros(0);
        assert!(matches!(
            sel.fit(x.view(), y.view()),
            Err(SelectError::Input(_))
        ));
    }

    #[test]
    fn test_rejects_label_length_mismatch() {
        let sel = selector(SelectorConfig::new(3, 2, "accuracy", 2).with_seed(1));
        let x = Array2::<f64>::zeros((4, 3));
        let y = Array1::<f64>::zeros(5);
        assert!(matches!(
            sel.fit(x.view(), y.view()),
            Err(SelectError::Input(_))
        ));
    }

    #[test]
    fn test_rejects_feature_name_count_mismatch() {
        let config = SelectorConfig::new(3, 2, "accuracy", 2)
            .with_seed(1)
            .with_feature_names(vec!["a".to_string(), "b".to_string()]);
        let sel = selector(config);
        let x = Array2::<f64>::zeros((4, 3));
        let y = Array1::<f64>::zeros(4);
        assert!(matches!(
            sel.fit(x.view(), y.view()),
            Err(SelectError::Input(_))
        ));
    }

    #[test]
    fn test_runs_exactly_the_configured_iterations() {
        let sel = selector(SelectorConfig::new(4, 2, "accuracy", 7).with_seed(3));
        let x = Array2::from_elem((6, 5), 0.5);
        let y = Array1::zeros(6);

        let outcome = sel.fit(x.view(), y.view()).unwrap();
        assert_eq!(outcome.stats.iterations, 7);
        assert_eq!(outcome.stats.best_score_history.len(), 7);
    }

    #[test]
    fn test_every_decode_is_accounted_for() {
        let sel = selector(SelectorConfig::new(4, 2, "accuracy", 5).with_seed(11));
        let x = Array2::from_elem((6, 3), 0.5);
        let y = Array1::zeros(6);

        let outcome = sel.fit(x.view(), y.view()).unwrap();
        let stats = &outcome.stats;
        assert_eq!(
            stats.subsets_scored + stats.cache_hits + stats.empty_decodes,
            4 * 5
        );
    }

    #[test]
    fn test_feature_names_flow_into_result() {
        let config = SelectorConfig::new(5, 2, "accuracy", 4)
            .with_seed(2)
            .with_feature_names(vec![
                "alpha".to_string(),
                "beta".to_string(),
                "gamma".to_string(),
            ]);
        let sel = selector(config);
        let x = Array2::from_elem((6, 3), 0.5);
        let y = Array1::zeros(6);

        let outcome = sel.fit(x.view(), y.view()).unwrap();
        if let Some(best) = outcome.best {
            let names = best.feature_names.unwrap();
            assert_eq!(names.len(), best.features.len());
            for (name, &index) in names.iter().zip(best.features.indices()) {
                assert_eq!(name, &["alpha", "beta", "gamma"][index]);
            }
        }
    }

    #[test]
    fn test_outcome_serializes() {
        let sel = selector(SelectorConfig::new(2, 2, "accuracy", 2).with_seed(8));
        let x = Array2::from_elem((4, 3), 0.5);
        let y = Array1::zeros(4);

        let outcome = sel.fit(x.view(), y.view()).unwrap();
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: SearchOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
