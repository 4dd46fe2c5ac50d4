use crate::catalog::BeltType;
use crate::error::{BeltForgeError, BfResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How the gearbox reduction is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GearboxMode {
    /// Search the standard ratio table.
    #[default]
    Automatic,
    /// Ratio fixed by the user.
    Manual(f64),
}

/// The baseline conveyor the optimizer starts from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConveyorRequest {
    pub name: String,
    pub capacity_tph: f64,
    /// Bulk density in t/m³.
    pub material_density: f64,
    pub length_m: f64,
    /// Net lift, negative for declines.
    pub lift_m: f64,
    pub belt_speed_mps: f64,
    pub belt_width_mm: u32,
    pub belt_type: BeltType,
    pub motor_rpm: f64,
    pub drive_pulley_diameter_mm: f64,
    pub gearbox: GearboxMode,
    pub gearbox_ratio: f64,
    pub chain_designation: String,
}

impl Default for ConveyorRequest {
    fn default() -> Self {
        Self {
            name: "Baseline".to_string(),
            capacity_tph: 400.0,
            material_density: 1.6,
            length_m: 120.0,
            lift_m: 8.0,
            belt_speed_mps: 2.5,
            belt_width_mm: 800,
            belt_type: BeltType::Ep400,
            motor_rpm: 1450.0,
            drive_pulley_diameter_mm: 500.0,
            gearbox: GearboxMode::Automatic,
            gearbox_ratio: 8.0,
            chain_designation: "20B-2".to_string(),
        }
    }
}

impl ConveyorRequest {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BfResult<Self> {
        let content = fs::read_to_string(path)?;
        let request: ConveyorRequest = serde_json::from_str(&content)?;
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> BfResult<()> {
        let positive = [
            ("capacity_tph", self.capacity_tph),
            ("material_density", self.material_density),
            ("length_m", self.length_m),
            ("belt_speed_mps", self.belt_speed_mps),
            ("motor_rpm", self.motor_rpm),
            ("drive_pulley_diameter_mm", self.drive_pulley_diameter_mm),
            ("gearbox_ratio", self.gearbox_ratio),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(BeltForgeError::Validation(format!(
                    "'{}' must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.lift_m.is_finite() {
            return Err(BeltForgeError::Validation("'lift_m' must be finite".into()));
        }
        if self.belt_width_mm == 0 {
            return Err(BeltForgeError::Validation(
                "'belt_width_mm' must be non-zero".into(),
            ));
        }
        if let GearboxMode::Manual(r) = self.gearbox {
            if !r.is_finite() || r <= 0.0 {
                return Err(BeltForgeError::Validation(format!(
                    "Manual gearbox ratio must be positive, got {}",
                    r
                )));
            }
        }
        Ok(())
    }

    /// The ratio the baseline actually runs with.
    pub fn baseline_ratio(&self) -> f64 {
        match self.gearbox {
            GearboxMode::Manual(r) => r,
            GearboxMode::Automatic => self.gearbox_ratio,
        }
    }
}
