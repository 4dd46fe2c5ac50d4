use crate::catalog::{BeltType, Catalog};
use crate::drive::{self, DriveInputs, TransmissionSolution};
use crate::physics::{BeltPhysics, DesignWarning, SimplifiedResistance};
use crate::request::ConveyorRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The four genes of a design candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignGenes {
    pub belt_width_mm: u32,
    pub belt_type: BeltType,
    pub gearbox_ratio: f64,
    pub chain_designation: String,
}

impl DesignGenes {
    pub fn from_request(request: &ConveyorRequest) -> Self {
        Self {
            belt_width_mm: request.belt_width_mm,
            belt_type: request.belt_type,
            gearbox_ratio: request.baseline_ratio(),
            chain_designation: request.chain_designation.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub required_power_kw: f64,
    pub cost_capital_total: f64,
    pub safety_factor: f64,
    pub warnings: Vec<DesignWarning>,
    /// `None` when no feasible drive train exists for this design.
    pub transmission: Option<TransmissionSolution>,
    /// Set when the evaluation itself faulted.
    pub failure: Option<String>,
}

impl EvaluationResult {
    /// Zeroed result carrying the failure text.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn is_failure(&self) -> bool {
        self.failure.is_some()
    }

    pub fn velocity_error_percent(&self) -> Option<f64> {
        self.transmission.as_ref().map(|t| t.velocity_error_percent)
    }
}

/// Per-candidate evaluation function used by the optimizer.
///
/// Implementations must behave as pure functions of `genes` and report internal
/// faults through [`EvaluationResult::failed`] instead of returning errors.
pub trait Oracle: Send + Sync {
    fn evaluate(&self, genes: &DesignGenes) -> EvaluationResult;
}

/// Physics model plus drive-train solver over a fixed catalog snapshot.
pub struct DesignOracle<P: BeltPhysics = SimplifiedResistance> {
    request: ConveyorRequest,
    catalog: Arc<Catalog>,
    physics: P,
}

impl DesignOracle<SimplifiedResistance> {
    pub fn new(request: ConveyorRequest, catalog: Arc<Catalog>) -> Self {
        Self::with_physics(request, catalog, SimplifiedResistance::default())
    }
}

impl<P: BeltPhysics> DesignOracle<P> {
    pub fn with_physics(request: ConveyorRequest, catalog: Arc<Catalog>, physics: P) -> Self {
        Self {
            request,
            catalog,
            physics,
        }
    }

    pub fn request(&self) -> &ConveyorRequest {
        &self.request
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    fn gearbox_cost(power_kw: f64, ratio: f64) -> f64 {
        350.0 + 55.0 * power_kw.max(0.0).powf(0.8) * (1.0 + ratio.max(1.0).ln() / 4.0)
    }

    fn chain_drive_cost(weight_kg_per_m: f64, transmission: Option<&TransmissionSolution>) -> f64 {
        let chain = 80.0 + weight_kg_per_m * 3.0 * 9.0;
        let sprockets = transmission
            .map(|t| t.total_teeth() as f64 * t.chain_pitch_mm * 0.05)
            .unwrap_or(0.0);
        chain + sprockets
    }
}

impl<P: BeltPhysics> Oracle for DesignOracle<P> {
    fn evaluate(&self, genes: &DesignGenes) -> EvaluationResult {
        let chain = match self.catalog.find_chain(&genes.chain_designation) {
            Some(c) => c.clone(),
            None => {
                return EvaluationResult::failed(format!(
                    "Unknown chain designation '{}'",
                    genes.chain_designation
                ))
            }
        };

        let report = match self
            .physics
            .analyze(&self.request, genes.belt_width_mm, genes.belt_type)
        {
            Ok(r) => r,
            Err(e) => return EvaluationResult::failed(e.to_string()),
        };

        // The gene pins the ratio; automatic mode still discards it when the
        // sprocket window cannot be met, manual mode clamps.
        let inputs = DriveInputs::builder()
            .target_speed_mps(self.request.belt_speed_mps)
            .motor_rpm(self.request.motor_rpm)
            .pulley_diameter_mm(self.request.drive_pulley_diameter_mm)
            .required_power_kw(report.required_power_kw)
            .mode(self.request.gearbox)
            .ratios(vec![genes.gearbox_ratio])
            .chains(vec![chain.clone()])
            .build();

        let transmission = drive::solve(&inputs);

        let cost = report.capital_cost_usd
            + Self::gearbox_cost(report.required_power_kw, genes.gearbox_ratio)
            + Self::chain_drive_cost(chain.weight_kg_per_m, transmission.as_ref());

        EvaluationResult {
            required_power_kw: report.required_power_kw,
            cost_capital_total: cost,
            safety_factor: report.safety_factor,
            warnings: report.warnings,
            transmission,
            failure: None,
        }
    }
}
