//! Swarm state - particle and velocity matrices
//!
//! Pure data plus shape invariants: an `n_particles x n_features`
//! probability matrix paired 1:1 with a velocity matrix of identical
//! shape. Row identity is stable across iterations and keys cache and
//! result entries.

use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;

/// The swarm's particle probability matrix and its paired velocity
/// matrix. Both always share the same shape.
#[derive(Debug, Clone)]
pub struct SwarmState {
    particles: Array2<f64>,
    velocities: Array2<f64>,
}

impl SwarmState {
    /// Initialize a swarm: independent uniform draws in `[0, 1)` for
    /// every particle probability, all-zero velocities.
    pub fn init(n_particles: usize, n_features: usize, rng: &mut StdRng) -> Self {
        let particles = Array2::from_shape_fn((n_particles, n_features), |_| rng.gen::<f64>());
        let velocities = Array2::zeros((n_particles, n_features));
        Self {
            particles,
            velocities,
        }
    }

    /// Build a swarm from explicit matrices.
    ///
    /// # Panics
    ///
    /// Panics if the matrices differ in shape.
    pub fn from_parts(particles: Array2<f64>, velocities: Array2<f64>) -> Self {
        assert_eq!(
            particles.dim(),
            velocities.dim(),
            "particle and velocity matrices must have identical shape"
        );
        Self {
            particles,
            velocities,
        }
    }

    pub fn n_particles(&self) -> usize {
        self.particles.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.particles.ncols()
    }

    pub fn particles(&self) -> &Array2<f64> {
        &self.particles
    }

    pub fn velocities(&self) -> &Array2<f64> {
        &self.velocities
    }

    /// One particle's probability row.
    pub fn particle(&self, row: usize) -> ArrayView1<'_, f64> {
        self.particles.row(row)
    }

    /// Apply the current velocities to the particle matrix, elementwise.
    /// Probabilities are not clamped and may drift outside `[0, 1]`.
    pub fn apply_velocities(&mut self) {
        self.particles += &self.velocities;
    }

    /// Replace the velocity matrix with a freshly computed one.
    pub fn set_velocities(&mut self, velocities: Array2<f64>) {
        debug_assert_eq!(velocities.dim(), self.particles.dim());
        self.velocities = velocities;
    }
}
