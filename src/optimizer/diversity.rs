use super::candidate::DesignCandidate;
use crate::catalog::Catalog;
use std::collections::HashSet;

const W_WIDTH: f64 = 0.4;
const W_BELT: f64 = 0.2;
const W_RATIO: f64 = 0.3;
const W_CHAIN: f64 = 0.1;

pub const LOW_DIVERSITY: f64 = 0.3;
pub const HIGH_DIVERSITY: f64 = 0.7;
const MAX_MUTATION_RATE: f64 = 0.3;
const MIN_MUTATION_RATE: f64 = 0.05;

/// Weighted share of each gene's catalog present in the population, in [0, 1].
pub fn population_diversity(population: &[DesignCandidate], catalog: &Catalog) -> f64 {
    if population.is_empty() {
        return 0.0;
    }

    let widths: HashSet<u32> = population.iter().map(|c| c.genes.belt_width_mm).collect();
    let belts: HashSet<_> = population.iter().map(|c| c.genes.belt_type).collect();
    let ratios: HashSet<u64> = population
        .iter()
        .map(|c| c.genes.gearbox_ratio.to_bits())
        .collect();
    let chains: HashSet<&str> = population
        .iter()
        .map(|c| c.genes.chain_designation.as_str())
        .collect();

    let share = |distinct: usize, table: usize| -> f64 {
        if table == 0 {
            0.0
        } else {
            (distinct as f64 / table as f64).min(1.0)
        }
    };

    W_WIDTH * share(widths.len(), catalog.widths_mm.len())
        + W_BELT * share(belts.len(), catalog.belt_types.len())
        + W_RATIO * share(ratios.len(), catalog.gearbox_ratios.len())
        + W_CHAIN * share(chains.len(), catalog.chains.len())
}

/// Mutation rate for one generation, derived from the configured base rate.
pub fn adapt_mutation_rate(base_rate: f64, diversity: f64) -> f64 {
    if diversity < LOW_DIVERSITY {
        (base_rate * 1.5).min(MAX_MUTATION_RATE)
    } else if diversity > HIGH_DIVERSITY {
        (base_rate * 0.8).max(MIN_MUTATION_RATE)
    } else {
        base_rate
    }
}
