pub mod candidate;
pub mod crossover;
pub mod diversity;
pub mod evaluation;
pub mod fitness;
pub mod initialization;
pub mod mutation;
pub mod runner;
pub mod selection;

pub use self::candidate::{DesignCandidate, Issue, IssueCategory, Population};
pub use self::runner::GeneticOptimizer;

use serde::{Deserialize, Serialize};

/// Summary of one generation after evaluation and sorting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub generation: usize,
    /// Lowest fitness among valid candidates.
    pub best_fitness: f64,
    pub valid_count: usize,
    pub population_size: usize,
    pub diversity: f64,
    pub mutation_rate: f64,
}

/// Observe-only hook called once per generation.
pub trait ProgressCallback: Send + Sync {
    fn on_generation(&self, report: &GenerationReport);
}

/// Callback for runs nobody watches.
pub struct SilentProgress;

impl ProgressCallback for SilentProgress {
    fn on_generation(&self, _report: &GenerationReport) {}
}

impl<T: ProgressCallback> ProgressCallback for &T {
    fn on_generation(&self, report: &GenerationReport) {
        (**self).on_generation(report)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOutcome {
    /// Valid designs, best first.
    pub designs: Vec<DesignCandidate>,
    pub generations_run: usize,
    pub history: Vec<GenerationReport>,
    pub evaluations: usize,
}

impl OptimizationOutcome {
    pub fn best(&self) -> Option<&DesignCandidate> {
        self.designs.first()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}
