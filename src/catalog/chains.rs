use crate::error::{BeltForgeError, BfResult};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// One roller chain size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSpec {
    pub designation: String,
    pub pitch_mm: f64,
    pub tensile_kn: f64,
    pub weight_kg_per_m: f64,
}

impl ChainSpec {
    pub fn new(designation: &str, pitch_mm: f64, tensile_kn: f64, weight_kg_per_m: f64) -> Self {
        Self {
            designation: designation.to_string(),
            pitch_mm,
            tensile_kn,
            weight_kg_per_m,
        }
    }
}

/// ISO 606 B-series simplex and duplex chains, ordered by pitch then strength.
pub fn standard_chains() -> Vec<ChainSpec> {
    vec![
        ChainSpec::new("08B-1", 12.7, 18.0, 0.70),
        ChainSpec::new("08B-2", 12.7, 32.0, 1.35),
        ChainSpec::new("10B-1", 15.875, 22.4, 0.95),
        ChainSpec::new("10B-2", 15.875, 44.5, 1.85),
        ChainSpec::new("12B-1", 19.05, 29.0, 1.25),
        ChainSpec::new("12B-2", 19.05, 57.8, 2.50),
        ChainSpec::new("16B-1", 25.4, 60.0, 2.70),
        ChainSpec::new("16B-2", 25.4, 106.0, 5.40),
        ChainSpec::new("20B-1", 31.75, 95.0, 3.60),
        ChainSpec::new("20B-2", 31.75, 170.0, 7.20),
        ChainSpec::new("24B-1", 38.1, 160.0, 6.70),
        ChainSpec::new("24B-2", 38.1, 280.0, 13.50),
        ChainSpec::new("28B-1", 44.45, 200.0, 8.30),
        ChainSpec::new("32B-1", 50.8, 250.0, 10.50),
        ChainSpec::new("32B-2", 50.8, 450.0, 21.00),
    ]
}

/// Reads a chain table with columns `designation,pitch_mm,tensile_kn,weight_kg_per_m`.
/// Malformed rows are skipped; an empty result is an error.
pub fn load_chain_catalog<P: AsRef<Path>>(path: P) -> BfResult<Vec<ChainSpec>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut chains = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if record.len() < 4 {
            debug!("Skipping short chain row: {:?}", record);
            continue;
        }
        let parsed = (
            record[1].parse::<f64>(),
            record[2].parse::<f64>(),
            record[3].parse::<f64>(),
        );
        match parsed {
            (Ok(pitch), Ok(tensile), Ok(weight))
                if pitch > 0.0 && tensile > 0.0 && weight >= 0.0 =>
            {
                chains.push(ChainSpec::new(&record[0], pitch, tensile, weight));
            }
            _ => debug!("Skipping malformed chain row: {:?}", record),
        }
    }

    if chains.is_empty() {
        return Err(BeltForgeError::Validation(format!(
            "No usable chain rows in {}",
            path.display()
        )));
    }

    info!("Loaded {} chains from {}", chains.len(), path.display());
    Ok(chains)
}
