use super::candidate::DesignCandidate;
use fastrand::Rng;

/// Probability the tournament returns its best member rather than a random one.
const ELITE_PICK_PROBABILITY: f64 = 0.8;

/// Tournament selection over `pool` (indices into `population`).
///
/// Returns an index into `population`. `pool` must not be empty.
pub fn tournament(
    pool: &[usize],
    population: &[DesignCandidate],
    size: usize,
    rng: &mut Rng,
) -> usize {
    debug_assert!(!pool.is_empty(), "tournament over an empty pool");

    let size = size.max(1);
    let entrants: Vec<usize> = (0..size).map(|_| pool[rng.usize(0..pool.len())]).collect();

    if rng.f64() < ELITE_PICK_PROBABILITY {
        entrants
            .iter()
            .copied()
            .min_by(|&a, &b| {
                population[a]
                    .fitness_score
                    .total_cmp(&population[b].fitness_score)
            })
            .unwrap_or(entrants[0])
    } else {
        entrants[rng.usize(0..entrants.len())]
    }
}
