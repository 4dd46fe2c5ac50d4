use crate::catalog::Catalog;
use crate::oracle::DesignGenes;
use fastrand::Rng;

const WIDTH_FACTOR: f64 = 1.2;
const BELT_FACTOR: f64 = 0.8;
const GEARBOX_FACTOR: f64 = 1.0;
const CHAIN_FACTOR: f64 = 0.9;

/// Individuals scoring worse than this mutate harder.
const POOR_FITNESS_THRESHOLD: f64 = 5.0;
const POOR_FITNESS_BOOST: f64 = 1.5;

const ADJACENT_STEP_PROBABILITY: f64 = 0.7;

/// Per-call mutation inputs that stay fixed for a whole generation.
#[derive(Debug, Clone, Copy)]
pub struct MutationPlan<'a> {
    pub catalog: &'a Catalog,
    /// Generation mutation rate, already multiplied by any clone boost.
    pub rate: f64,
    /// Set in manual gearbox mode.
    pub lock_gearbox: bool,
}

impl MutationPlan<'_> {
    /// Base rate for genes taken from an individual scoring `prior_fitness`.
    pub fn effective_rate(&self, prior_fitness: f64) -> f64 {
        if prior_fitness.is_finite() && prior_fitness > POOR_FITNESS_THRESHOLD {
            self.rate * POOR_FITNESS_BOOST
        } else {
            self.rate
        }
    }

    /// Mutates `genes` in place. `prior_fitness` is the score of the individual
    /// the genes were taken from. Returns true if any gene changed.
    pub fn apply(&self, genes: &mut DesignGenes, prior_fitness: f64, rng: &mut Rng) -> bool {
        let rate = self.effective_rate(prior_fitness);
        let cat = self.catalog;
        let before = genes.clone();

        if rng.f64() < rate * WIDTH_FACTOR {
            let current = cat.nearest_width_index(genes.belt_width_mm);
            let next = step_index(current, cat.widths_mm.len(), rng);
            genes.belt_width_mm = cat.widths_mm[next];
        }

        if rng.f64() < rate * BELT_FACTOR {
            genes.belt_type = cat.belt_types[rng.usize(0..cat.belt_types.len())];
        }

        if !self.lock_gearbox && rng.f64() < rate * GEARBOX_FACTOR {
            let current = cat.nearest_ratio_index(genes.gearbox_ratio);
            let next = step_index(current, cat.gearbox_ratios.len(), rng);
            genes.gearbox_ratio = cat.gearbox_ratios[next];
        }

        if rng.f64() < rate * CHAIN_FACTOR {
            let pick = rng.usize(0..cat.chains.len());
            genes.chain_designation = cat.chains[pick].designation.clone();
        }

        *genes != before
    }
}

/// Moves to a neighbouring table slot most of the time, otherwise anywhere.
fn step_index(current: usize, len: usize, rng: &mut Rng) -> usize {
    if len <= 1 {
        return 0;
    }
    if rng.f64() >= ADJACENT_STEP_PROBABILITY {
        return rng.usize(0..len);
    }
    match current {
        0 => 1,
        c if c + 1 >= len => len - 2,
        c if rng.bool() => c + 1,
        c => c - 1,
    }
}
