use crate::oracle::DesignGenes;
use fastrand::Rng;
use strum_macros::{Display, EnumIter};

/// Genes in crossover order: width, belt type, gearbox ratio, chain.
pub const GENE_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display)]
pub enum CrossoverKind {
    SinglePoint,
    TwoPoint,
    Uniform,
}

impl CrossoverKind {
    pub fn random(rng: &mut Rng) -> Self {
        match rng.usize(0..3) {
            0 => Self::SinglePoint,
            1 => Self::TwoPoint,
            _ => Self::Uniform,
        }
    }
}

fn swap_gene(a: &mut DesignGenes, b: &mut DesignGenes, gene: usize) {
    match gene {
        0 => std::mem::swap(&mut a.belt_width_mm, &mut b.belt_width_mm),
        1 => std::mem::swap(&mut a.belt_type, &mut b.belt_type),
        2 => std::mem::swap(&mut a.gearbox_ratio, &mut b.gearbox_ratio),
        _ => std::mem::swap(&mut a.chain_designation, &mut b.chain_designation),
    }
}

/// Produces two children from two parents. Every child gene comes from one of
/// the parents at the same position.
pub fn crossover(
    p1: &DesignGenes,
    p2: &DesignGenes,
    kind: CrossoverKind,
    rng: &mut Rng,
) -> (DesignGenes, DesignGenes) {
    let mut c1 = p1.clone();
    let mut c2 = p2.clone();

    match kind {
        CrossoverKind::SinglePoint => {
            let cut = rng.usize(1..GENE_COUNT);
            for gene in cut..GENE_COUNT {
                swap_gene(&mut c1, &mut c2, gene);
            }
        }
        CrossoverKind::TwoPoint => {
            let first = rng.usize(1..GENE_COUNT - 1);
            let second = rng.usize(first + 1..GENE_COUNT);
            for gene in first..second {
                swap_gene(&mut c1, &mut c2, gene);
            }
        }
        CrossoverKind::Uniform => {
            for gene in 0..GENE_COUNT {
                if rng.bool() {
                    swap_gene(&mut c1, &mut c2, gene);
                }
            }
        }
    }

    (c1, c2)
}
