//! Estimator contract and scoring metrics
//!
//! The selector never inspects the predictive model beyond this seam:
//! an [`Estimator`] fits on a training fold and yields a [`Model`] that
//! predicts on the matching test fold. Both return `anyhow` errors so
//! caller-supplied implementations can surface arbitrary failures, which
//! the search loop treats as fatal.
//!
//! [`Metric`] is the vocabulary behind the scoring identifier string.
//! All metrics follow the higher-is-better convention (error metrics are
//! negated), so the search loop can maximize uniformly.
//!
//! [`NearestCentroid`] is a small reference classifier so the crate is
//! usable end-to-end without external model dependencies.

use std::fmt;
use std::str::FromStr;

use anyhow::{ensure, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

// ============================================================================
// Estimator contract
// ============================================================================

/// A predictive model template that can be fitted to a training fold.
///
/// Implementations are treated as opaque: the selector only passes data
/// through this interface and propagates any failure unmodified.
pub trait Estimator: Send + Sync {
    /// Fit on training data, producing a fitted model.
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Box<dyn Model>>;
}

/// A fitted model that predicts targets for unseen rows.
pub trait Model: Send + Sync {
    /// Predict one target value per input row.
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>>;
}

// ============================================================================
// Scoring metrics
// ============================================================================

/// Scoring metric named by the configuration's scoring identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Fraction of exactly matching predictions (classification).
    Accuracy,
    /// Coefficient of determination (regression).
    R2,
    /// Negated mean squared error (regression, higher is better).
    NegMeanSquaredError,
    /// Negated mean absolute error (regression, higher is better).
    NegMeanAbsoluteError,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accuracy" | "acc" => Ok(Metric::Accuracy),
            "r2" => Ok(Metric::R2),
            "neg_mean_squared_error" | "neg_mse" => Ok(Metric::NegMeanSquaredError),
            "neg_mean_absolute_error" | "neg_mae" => Ok(Metric::NegMeanAbsoluteError),
            other => Err(format!(
                "unknown scoring metric '{other}' (expected one of: accuracy, r2, \
                 neg_mean_squared_error, neg_mean_absolute_error)"
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Metric::Accuracy => "accuracy",
            Metric::R2 => "r2",
            Metric::NegMeanSquaredError => "neg_mean_squared_error",
            Metric::NegMeanAbsoluteError => "neg_mean_absolute_error",
        };
        write!(f, "{name}")
    }
}

impl Metric {
    /// Score predictions against ground truth. Both arrays must be the
    /// same non-zero length (folds are never empty).
    pub fn score(self, y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> f64 {
        debug_assert_eq!(y_true.len(), y_pred.len());
        let n = y_true.len() as f64;

        match self {
            Metric::Accuracy => {
                let hits = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .filter(|(t, p)| t == p)
                    .count();
                hits as f64 / n
            }
            Metric::R2 => {
                let mean = y_true.sum() / n;
                let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
                let ss_res: f64 = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).powi(2))
                    .sum();
                if ss_tot == 0.0 {
                    0.0
                } else {
                    1.0 - ss_res / ss_tot
                }
            }
            Metric::NegMeanSquaredError => {
                let sse: f64 = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).powi(2))
                    .sum();
                -(sse / n)
            }
            Metric::NegMeanAbsoluteError => {
                let sae: f64 = y_true
                    .iter()
                    .zip(y_pred.iter())
                    .map(|(t, p)| (t - p).abs())
                    .sum();
                -(sae / n)
            }
        }
    }
}

// ============================================================================
// NearestCentroid - reference estimator
// ============================================================================

/// Nearest-centroid classifier: fit computes one centroid per distinct
/// label, predict assigns the label of the closest centroid.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestCentroid;

struct CentroidModel {
    labels: Vec<f64>,
    centroids: Vec<Array1<f64>>,
}

impl Estimator for NearestCentroid {
    fn fit(&self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<Box<dyn Model>> {
        ensure!(
            x.nrows() == y.len(),
            "training fold has {} rows but {} labels",
            x.nrows(),
            y.len()
        );
        ensure!(x.nrows() > 0, "cannot fit on an empty training fold");

        let mut labels: Vec<f64> = Vec::new();
        let mut sums: Vec<Array1<f64>> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();

        for (row, &label) in x.outer_iter().zip(y.iter()) {
            match labels.iter().position(|&l| l == label) {
                Some(k) => {
                    sums[k] += &row;
                    counts[k] += 1;
                }
                None => {
                    labels.push(label);
                    sums.push(row.to_owned());
                    counts.push(1);
                }
            }
        }

        let centroids = sums
            .into_iter()
            .zip(&counts)
            .map(|(sum, &count)| sum / count as f64)
            .collect();

        Ok(Box::new(CentroidModel { labels, centroids }))
    }
}

impl Model for CentroidModel {
    fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        ensure!(
            x.ncols() == self.centroids[0].len(),
            "prediction fold has {} features but the model was fitted on {}",
            x.ncols(),
            self.centroids[0].len()
        );

        let predictions: Vec<f64> = x
            .outer_iter()
            .map(|row| {
                let mut best_label = self.labels[0];
                let mut best_dist = f64::INFINITY;
                for (&label, centroid) in self.labels.iter().zip(&self.centroids) {
                    let dist: f64 = row
                        .iter()
                        .zip(centroid.iter())
                        .map(|(a, b)| (a - b).powi(2))
                        .sum();
                    if dist < best_dist {
                        best_label = label;
                        best_dist = dist;
                    }
                }
                best_label
            })
            .collect();

        Ok(Array1::from_vec(predictions))
    }
}
