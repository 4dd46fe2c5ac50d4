pub mod belts;
pub mod chains;

pub use self::belts::BeltType;
pub use self::chains::{load_chain_catalog, standard_chains, ChainSpec};
use crate::error::{BeltForgeError, BfResult};

pub const STANDARD_WIDTHS_MM: [u32; 12] = [
    300, 400, 500, 650, 800, 1000, 1200, 1400, 1600, 1800, 2000, 2200,
];

/// R10/R20 preferred gearbox reductions.
pub const STANDARD_GEARBOX_RATIOS: [f64; 14] = [
    5.0, 6.3, 8.0, 10.0, 12.5, 16.0, 20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0,
];

/// Immutable snapshot of every lookup table a run reads.
///
/// Built once before a run and shared behind an `Arc`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub widths_mm: Vec<u32>,
    pub gearbox_ratios: Vec<f64>,
    pub belt_types: Vec<BeltType>,
    pub chains: Vec<ChainSpec>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn standard() -> Self {
        Self {
            widths_mm: STANDARD_WIDTHS_MM.to_vec(),
            gearbox_ratios: STANDARD_GEARBOX_RATIOS.to_vec(),
            belt_types: BeltType::all(),
            chains: standard_chains(),
        }
    }

    pub fn with_chains(mut self, chains: Vec<ChainSpec>) -> Self {
        self.chains = chains;
        self
    }

    /// Restricts the gearbox table to one user-fixed ratio.
    pub fn with_fixed_ratio(mut self, ratio: f64) -> Self {
        self.gearbox_ratios = vec![ratio];
        self
    }

    pub fn validate(&self) -> BfResult<()> {
        if self.widths_mm.is_empty()
            || self.gearbox_ratios.is_empty()
            || self.belt_types.is_empty()
            || self.chains.is_empty()
        {
            return Err(BeltForgeError::Validation(
                "Catalog tables must not be empty".into(),
            ));
        }
        if !self.widths_mm.windows(2).all(|w| w[0] < w[1]) {
            return Err(BeltForgeError::Validation(
                "Width table must be strictly ascending".into(),
            ));
        }
        if !self.gearbox_ratios.windows(2).all(|w| w[0] < w[1]) {
            return Err(BeltForgeError::Validation(
                "Gearbox ratio table must be strictly ascending".into(),
            ));
        }
        if self.gearbox_ratios.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(BeltForgeError::Validation(
                "Gearbox ratios must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn design_space_size(&self) -> usize {
        self.widths_mm.len() * self.belt_types.len() * self.gearbox_ratios.len() * self.chains.len()
    }

    pub fn find_chain(&self, designation: &str) -> Option<&ChainSpec> {
        self.chains
            .iter()
            .find(|c| c.designation.eq_ignore_ascii_case(designation))
    }

    pub fn chain_index(&self, designation: &str) -> Option<usize> {
        self.chains
            .iter()
            .position(|c| c.designation.eq_ignore_ascii_case(designation))
    }

    pub fn nearest_width_index(&self, width_mm: u32) -> usize {
        nearest_index(&self.widths_mm, |w| (w as f64 - width_mm as f64).abs())
    }

    pub fn nearest_ratio_index(&self, ratio: f64) -> usize {
        nearest_index(&self.gearbox_ratios, |r| (r - ratio).abs())
    }

    /// Indices of the `count` widths closest to `width_mm`, closest first.
    pub fn nearest_width_indices(&self, width_mm: u32, count: usize) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.widths_mm.len()).collect();
        idx.sort_by_key(|&i| (self.widths_mm[i] as i64 - width_mm as i64).abs());
        idx.truncate(count);
        idx
    }

    /// Indices of the `count` ratios closest to `ratio`, closest first.
    pub fn nearest_ratio_indices(&self, ratio: f64, count: usize) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.gearbox_ratios.len()).collect();
        idx.sort_by(|&a, &b| {
            let da = (self.gearbox_ratios[a] - ratio).abs();
            let db = (self.gearbox_ratios[b] - ratio).abs();
            da.total_cmp(&db)
        });
        idx.truncate(count);
        idx
    }
}

fn nearest_index<T: Copy, F: Fn(T) -> f64>(table: &[T], distance: F) -> usize {
    table
        .iter()
        .enumerate()
        .min_by(|a, b| distance(*a.1).total_cmp(&distance(*b.1)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}
