//! Progress reporting
//!
//! A single `Reporter` owns the verbosity flag and is consulted by every
//! stage of the search loop. Output is purely observational:
//! - timestamped stage lines via tracing
//! - a per-particle progress bar during evaluation
//!
//! Reporting never affects computed results and never fails the run.

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Reporting hook for the search loop.
#[derive(Debug, Clone)]
pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn stamp() -> String {
        chrono::Local::now().format("[%Y-%m-%d | %H:%M:%S]").to_string()
    }

    /// Emit one timestamped stage line when verbose.
    pub fn stage(&self, message: &str) {
        if self.verbose {
            info!("{} {}", Self::stamp(), message);
        }
    }

    /// Progress bar over the swarm's particles for one evaluation pass.
    /// Hidden (all operations no-op) when not verbose.
    pub fn particle_bar(&self, total: usize) -> ProgressBar {
        if !self.verbose {
            return ProgressBar::hidden();
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} particles ({eta})")
                .unwrap(),
        );
        bar
    }
}
