use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Belt carcass grades. `Ep*` are polyester/polyamide fabric belts, `St*` steel cord.
/// The number is the nominal breaking strength in N/mm of width.
#[derive(
    Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum BeltType {
    Ep200,
    Ep250,
    Ep315,
    Ep400,
    Ep500,
    Ep630,
    Ep800,
    Ep1000,
    St1000,
    St1250,
    St1600,
    St2000,
}

impl BeltType {
    pub fn all() -> Vec<BeltType> {
        BeltType::iter().collect()
    }

    pub fn rating_n_per_mm(&self) -> f64 {
        match self {
            Self::Ep200 => 200.0,
            Self::Ep250 => 250.0,
            Self::Ep315 => 315.0,
            Self::Ep400 => 400.0,
            Self::Ep500 => 500.0,
            Self::Ep630 => 630.0,
            Self::Ep800 => 800.0,
            Self::Ep1000 | Self::St1000 => 1000.0,
            Self::St1250 => 1250.0,
            Self::St1600 => 1600.0,
            Self::St2000 => 2000.0,
        }
    }

    pub fn is_steel_cord(&self) -> bool {
        matches!(
            self,
            Self::St1000 | Self::St1250 | Self::St1600 | Self::St2000
        )
    }

    /// Belt mass per square metre including covers.
    pub fn mass_kg_per_m2(&self) -> f64 {
        let rating = self.rating_n_per_mm();
        if self.is_steel_cord() {
            18.0 + rating * 0.009
        } else {
            8.0 + rating * 0.008
        }
    }

    pub fn cost_usd_per_m2(&self) -> f64 {
        let rating = self.rating_n_per_mm();
        if self.is_steel_cord() {
            45.0 + rating * 0.05
        } else {
            18.0 + rating * 0.045
        }
    }
}
