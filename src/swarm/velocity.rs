//! Velocity recomputation
//!
//! Attraction-only update: every particle is pulled straight toward the
//! particle that produced the current global best, with the step scaled
//! down by the remaining iteration budget. No inertia term, no
//! per-particle personal best, no stochastic coefficient.

use ndarray::Array2;

/// Compute the next velocity matrix:
/// `(best_row - particle_row) / remaining_iterations` for every row.
///
/// `remaining` counts the current iteration, so the final pass moves
/// each particle the full residual distance. The best particle's own
/// velocity becomes the zero vector.
pub fn attraction_velocities(
    particles: &Array2<f64>,
    best_row: usize,
    remaining: usize,
) -> Array2<f64> {
    debug_assert!(best_row < particles.nrows());
    debug_assert!(remaining > 0);

    let best = particles.row(best_row).to_owned();
    let step = remaining as f64;
    Array2::from_shape_fn(particles.raw_dim(), |(row, column)| {
        (best[column] - particles[[row, column]]) / step
    })
}
