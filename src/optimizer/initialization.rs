use super::candidate::{DesignCandidate, Population};
use crate::catalog::Catalog;
use crate::oracle::DesignGenes;
use crate::request::{ConveyorRequest, GearboxMode};
use fastrand::Rng;
use itertools::Itertools;

const NEIGHBOUR_CHAINS: usize = 3;
const NEAR_WIDTHS: usize = 5;
const NEAR_RATIOS: usize = 3;

/// Deterministic variants of the baseline that are likely to be feasible.
///
/// Order is stable and duplicates are removed, so the same request always
/// yields the same seed list.
pub fn seed_candidates(request: &ConveyorRequest, catalog: &Catalog) -> Vec<DesignGenes> {
    let baseline = DesignGenes::from_request(request);
    let manual = matches!(request.gearbox, GearboxMode::Manual(_));
    let mut seeds = vec![baseline.clone()];

    // Widths
    if let Some(&wider) = catalog
        .widths_mm
        .iter()
        .find(|&&w| w > baseline.belt_width_mm)
    {
        seeds.push(DesignGenes {
            belt_width_mm: wider,
            ..baseline.clone()
        });
    }
    if let Some(&narrower) = catalog
        .widths_mm
        .iter()
        .rev()
        .find(|&&w| w < baseline.belt_width_mm)
    {
        seeds.push(DesignGenes {
            belt_width_mm: narrower,
            ..baseline.clone()
        });
    }

    // Next standard ratio above the baseline's nearest
    if !manual {
        let nearest = catalog.nearest_ratio_index(baseline.gearbox_ratio);
        if let Some(&alt) = catalog.gearbox_ratios.get(nearest + 1) {
            seeds.push(DesignGenes {
                gearbox_ratio: alt,
                ..baseline.clone()
            });
        }
    }

    // Next stronger belt
    let rating = baseline.belt_type.rating_n_per_mm();
    if let Some(&stronger) = catalog
        .belt_types
        .iter()
        .filter(|b| b.rating_n_per_mm() > rating)
        .min_by(|a, b| a.rating_n_per_mm().total_cmp(&b.rating_n_per_mm()))
    {
        seeds.push(DesignGenes {
            belt_type: stronger,
            ..baseline.clone()
        });
    }

    // Catalog neighbours of the baseline chain
    if let Some(base_idx) = catalog.chain_index(&baseline.chain_designation) {
        let neighbours = (0..catalog.chains.len())
            .filter(|&i| i != base_idx)
            .sorted_by_key(|&i| (i.abs_diff(base_idx), i))
            .take(NEIGHBOUR_CHAINS);
        for i in neighbours {
            seeds.push(DesignGenes {
                chain_designation: catalog.chains[i].designation.clone(),
                ..baseline.clone()
            });
        }
    }

    if !manual {
        let mid = catalog.gearbox_ratios[catalog.gearbox_ratios.len() / 2];
        seeds.push(DesignGenes {
            gearbox_ratio: mid,
            ..baseline.clone()
        });
    }

    let mut unique: Vec<DesignGenes> = Vec::with_capacity(seeds.len());
    for seed in seeds {
        if !unique.contains(&seed) {
            unique.push(seed);
        }
    }
    unique
}

/// One biased-random individual around the baseline.
pub fn random_genes(request: &ConveyorRequest, catalog: &Catalog, rng: &mut Rng) -> DesignGenes {
    let baseline = DesignGenes::from_request(request);

    let widths = &catalog.widths_mm;
    let roll = rng.f64();
    let belt_width_mm = if roll < 0.4 {
        let near = catalog.nearest_width_indices(baseline.belt_width_mm, NEAR_WIDTHS);
        widths[near[rng.usize(0..near.len())]]
    } else if roll < 0.7 {
        let lo = widths.len() / 4;
        let hi = (widths.len() * 3 / 4).max(lo + 1);
        widths[rng.usize(lo..hi)]
    } else {
        widths[rng.usize(0..widths.len())]
    };

    let belt_type = if rng.f64() < 0.6 {
        baseline.belt_type
    } else {
        catalog.belt_types[rng.usize(0..catalog.belt_types.len())]
    };

    let ratios = &catalog.gearbox_ratios;
    let gearbox_ratio = match request.gearbox {
        GearboxMode::Manual(r) => r,
        GearboxMode::Automatic if rng.f64() < 0.5 => {
            let near = catalog.nearest_ratio_indices(ratios[0], NEAR_RATIOS);
            ratios[near[rng.usize(0..near.len())]]
        }
        GearboxMode::Automatic => ratios[rng.usize(0..ratios.len())],
    };

    let chain_designation = if rng.f64() < 0.6 {
        baseline.chain_designation
    } else {
        catalog.chains[rng.usize(0..catalog.chains.len())]
            .designation
            .clone()
    };

    DesignGenes {
        belt_width_mm,
        belt_type,
        gearbox_ratio,
        chain_designation,
    }
}

/// Seeds first, then biased-random fill, exactly `size` candidates.
pub fn initial_population(
    request: &ConveyorRequest,
    catalog: &Catalog,
    size: usize,
    rng: &mut Rng,
) -> Population {
    let mut population: Population = seed_candidates(request, catalog)
        .into_iter()
        .take(size)
        .map(DesignCandidate::new)
        .collect();

    while population.len() < size {
        population.push(DesignCandidate::new(random_genes(request, catalog, rng)));
    }
    population
}
