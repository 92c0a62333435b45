//! Particle swarm search core
//!
//! The components of one search run, leaves first:
//! - State: particle probability matrix + paired velocity matrix
//! - Subset: threshold decoding of particles into feature subsets
//! - Evaluate: memoized cross-validated scoring of decoded subsets
//! - Best: strict-improvement global best tracking
//! - Velocity: attraction-only velocity recomputation
//! - Search: the fixed-budget loop orchestrating all of the above

mod best;
mod evaluate;
mod search;
mod state;
mod subset;
mod velocity;

pub use best::*;
pub use evaluate::*;
pub use search::*;
pub use state::*;
pub use subset::*;
pub use velocity::*;
