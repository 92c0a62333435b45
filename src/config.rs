//! Selector configuration
//!
//! All knobs for a search run live here and are validated eagerly,
//! before any particle is drawn:
//! - swarm size and iteration budget
//! - cross-validation fold count and scoring metric
//! - worker count for fold scoring (0 = auto-detect)
//! - verbosity, random seed, optional feature names

use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::estimator::Metric;

/// Configuration for a particle swarm feature selection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Number of particles in the swarm (probability vectors evaluated per iteration).
    pub n_particles: usize,
    /// Number of cross-validation folds per subset evaluation.
    pub cv: usize,
    /// Scoring metric identifier, e.g. "accuracy" or "neg_mean_squared_error".
    pub scoring: String,
    /// Total loop iterations. The loop always runs the full budget.
    pub max_iter: usize,
    /// Worker count for fold scoring (0 = use all available cores).
    pub n_jobs: usize,
    /// Emit timestamped progress lines and a per-particle progress bar.
    pub verbose: bool,
    /// Seed for the run's random source. None seeds from entropy.
    pub seed: Option<u64>,
    /// Column labels for the input features, used to report the best
    /// subset by name. Length must match the input width at `fit` time.
    pub feature_names: Option<Vec<String>>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            n_particles: 20,
            cv: 5,
            scoring: "accuracy".to_string(),
            max_iter: 10,
            n_jobs: 0, // auto-detect
            verbose: false,
            seed: None,
            feature_names: None,
        }
    }
}

impl SelectorConfig {
    pub fn new(n_particles: usize, cv: usize, scoring: &str, max_iter: usize) -> Self {
        Self {
            n_particles,
            cv,
            scoring: scoring.to_string(),
            max_iter,
            ..Default::default()
        }
    }

    pub fn with_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = Some(names);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the configuration. Called at selector construction so a
    /// bad run never starts.
    pub fn validate(&self) -> Result<(), SelectError> {
        if self.n_particles == 0 {
            return Err(SelectError::Config(
                "n_particles must be at least 1".to_string(),
            ));
        }
        if self.cv < 2 {
            return Err(SelectError::Config(format!(
                "cv must be at least 2, got {}",
                self.cv
            )));
        }
        if self.max_iter == 0 {
            return Err(SelectError::Config(
                "max_iter must be at least 1".to_string(),
            ));
        }
        self.metric()?;
        Ok(())
    }

    /// Parse the scoring identifier into a metric.
    pub fn metric(&self) -> Result<Metric, SelectError> {
        self.scoring.parse::<Metric>().map_err(SelectError::Config)
    }

    /// Resolved worker count for the scoring collaborator.
    pub fn workers(&self) -> usize {
        if self.n_jobs == 0 {
            num_cpus::get()
        } else {
            self.n_jobs
        }
    }
}
