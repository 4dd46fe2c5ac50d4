use crate::catalog::{standard_chains, ChainSpec, STANDARD_GEARBOX_RATIOS};
use crate::request::GearboxMode;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Everything the drive-train solver needs for one speed target.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DriveInputs {
    pub target_speed_mps: f64,
    pub motor_rpm: f64,
    pub pulley_diameter_mm: f64,
    pub required_power_kw: f64,
    #[builder(default)]
    pub mode: GearboxMode,
    /// Ratios searched in automatic mode. Ignored in manual mode.
    #[builder(default = STANDARD_GEARBOX_RATIOS.to_vec())]
    pub ratios: Vec<f64>,
    #[builder(default = standard_chains())]
    pub chains: Vec<ChainSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransmissionSolution {
    pub gearbox_ratio: f64,
    pub drive_sprocket_teeth: u32,
    pub driven_sprocket_teeth: u32,
    pub chain_pitch_mm: f64,
    pub chain_designation: String,
    pub actual_velocity_mps: f64,
    pub velocity_error_percent: f64,
    pub total_transmission_ratio: f64,
    pub required_force_kn: f64,
    pub allowable_force_kn: f64,
    pub safety_margin: f64,
}

impl TransmissionSolution {
    pub fn sprocket_ratio(&self) -> f64 {
        self.driven_sprocket_teeth as f64 / self.drive_sprocket_teeth as f64
    }

    pub fn total_teeth(&self) -> u32 {
        self.drive_sprocket_teeth + self.driven_sprocket_teeth
    }
}
