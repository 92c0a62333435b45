//! Swarm Select Library
//!
//! Particle swarm feature selection with cross-validated scoring:
//! searches for the feature subset on which a predictive model scores
//! best, by steering a swarm of selection-probability vectors toward
//! the best subset found so far.
//!
//! # How it works
//!
//! - **Swarm of probabilities**: each particle holds one selection
//!   propensity per feature, initialized uniformly at random
//! - **Stochastic decoding**: one fresh uniform threshold per particle
//!   per pass turns probabilities into a discrete feature subset
//! - **Memoized fitness**: every subset is cross-validated at most once
//!   per run; identical subsets from any particle reuse the score
//! - **Attraction-only updates**: all particles move toward the global
//!   best, with steps shrinking as the iteration budget runs out
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use ndarray::{Array1, Array2};
//! use swarm_select::{NearestCentroid, ParticleSwarmFeatureSelector, SelectorConfig};
//!
//! fn main() -> Result<(), swarm_select::SelectError> {
//!     // Two interleaved classes over three features.
//!     let x = Array2::from_shape_fn((8, 3), |(i, j)| ((i % 2) * 10 + j) as f64);
//!     let y = Array1::from_shape_fn(8, |i| (i % 2) as f64);
//!
//!     let config = SelectorConfig::new(5, 2, "accuracy", 3).with_seed(42);
//!     let selector = ParticleSwarmFeatureSelector::new(config, Arc::new(NearestCentroid))?;
//!
//!     let outcome = selector.fit(x.view(), y.view())?;
//!     if let Some(best) = outcome.best {
//!         println!("best subset {} scored {:.3}", best.features, best.score);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crossval;
pub mod error;
pub mod estimator;
pub mod progress;
pub mod swarm;

// Re-export commonly used types
pub use config::SelectorConfig;
pub use crossval::{CrossValidator, KFold};
pub use error::SelectError;
pub use estimator::{Estimator, Metric, Model, NearestCentroid};
pub use progress::Reporter;
pub use swarm::{
    attraction_velocities, update_global_best, EvaluationEntry, EvaluationLedger, Evaluator,
    FeatureSubset, FitResult, GlobalBest, ParticleSwarmFeatureSelector, RunStats, SearchOutcome,
    SubsetScorer, SwarmState,
};
