//! Belt tension and power estimation.
//!
//! The optimizer only depends on the [`BeltPhysics`] trait. [`SimplifiedResistance`]
//! is a compact DIN 22101-style estimate that is good enough for ranking design
//! alternatives; a full resistance model can be plugged in behind the same trait.

use crate::catalog::BeltType;
use crate::consts::GRAVITY;
use crate::error::{BeltForgeError, BfResult};
use crate::request::ConveyorRequest;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub enum WarningKind {
    Ordinary,
    Severe,
    CrossSectionOverload,
    SpeedLimit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignWarning {
    pub kind: WarningKind,
    pub message: String,
}

impl DesignWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsReport {
    pub effective_tension_kn: f64,
    pub peak_tension_kn: f64,
    /// Power at the motor, after drive losses.
    pub required_power_kw: f64,
    pub safety_factor: f64,
    pub capacity_limit_tph: f64,
    /// Belt, idlers, structure and motor. Gearbox and chain drive are priced by the oracle.
    pub capital_cost_usd: f64,
    pub warnings: Vec<DesignWarning>,
}

pub trait BeltPhysics: Send + Sync {
    fn analyze(
        &self,
        request: &ConveyorRequest,
        width_mm: u32,
        belt_type: BeltType,
    ) -> BfResult<PhysicsReport>;
}

#[derive(Debug, Clone)]
pub struct SimplifiedResistance {
    /// Fictitious friction factor `f`.
    pub friction_factor: f64,
    pub drive_efficiency: f64,
    /// Pulley/belt friction coefficient.
    pub pulley_friction: f64,
    pub wrap_angle_deg: f64,
    pub idler_spacing_m: f64,
    /// Cross-section coefficient for a three-roll trough.
    pub trough_coefficient: f64,
    /// Largest standard motor, kW.
    pub max_motor_kw: f64,
}

impl Default for SimplifiedResistance {
    fn default() -> Self {
        Self {
            friction_factor: 0.022,
            drive_efficiency: 0.9,
            pulley_friction: 0.35,
            wrap_angle_deg: 200.0,
            idler_spacing_m: 1.2,
            trough_coefficient: 0.16,
            max_motor_kw: 355.0,
        }
    }
}

/// Recommended belt speed ceiling for bulk material by belt width.
pub fn recommended_max_speed(width_mm: u32) -> f64 {
    match width_mm {
        0..=500 => 2.5,
        501..=800 => 3.35,
        801..=1200 => 4.2,
        _ => 5.0,
    }
}

impl SimplifiedResistance {
    /// Length coefficient `C` for secondary resistances.
    fn length_coefficient(length_m: f64) -> f64 {
        1.0 + 90.0 / (length_m + 70.0)
    }

    pub fn capacity_limit_tph(&self, width_mm: u32, speed_mps: f64, density: f64) -> f64 {
        let b = width_mm as f64 / 1000.0;
        let usable = (0.9 * b - 0.05).max(0.0);
        let area = self.trough_coefficient * usable * usable;
        area * speed_mps * density * 3600.0
    }

    fn capital_cost(&self, req: &ConveyorRequest, width_m: f64, belt: BeltType, motor_kw: f64) -> f64 {
        let belt_cost = belt.cost_usd_per_m2() * width_m * (2.0 * req.length_m + 10.0);
        let idler_sets = (req.length_m / self.idler_spacing_m).ceil();
        let idler_cost = idler_sets * (45.0 + 90.0 * width_m) * 1.5;
        let structure_cost = req.length_m * (120.0 + 150.0 * width_m);
        let motor_cost = 300.0 + 110.0 * motor_kw.powf(0.85);
        belt_cost + idler_cost + structure_cost + motor_cost
    }
}

impl BeltPhysics for SimplifiedResistance {
    fn analyze(
        &self,
        req: &ConveyorRequest,
        width_mm: u32,
        belt_type: BeltType,
    ) -> BfResult<PhysicsReport> {
        if width_mm == 0 || req.belt_speed_mps <= 0.0 || req.length_m <= 0.0 {
            return Err(BeltForgeError::Model(format!(
                "Degenerate geometry: width {} mm, speed {} m/s, length {} m",
                width_mm, req.belt_speed_mps, req.length_m
            )));
        }

        let width_m = width_mm as f64 / 1000.0;
        let v = req.belt_speed_mps;

        // Line masses, kg/m
        let q_load = req.capacity_tph / (3.6 * v);
        let q_belt = belt_type.mass_kg_per_m2() * width_m;
        let q_idlers = 20.0 + 30.0 * width_m;

        let main_resistance = self.friction_factor
            * req.length_m
            * GRAVITY
            * (q_idlers + 2.0 * q_belt + q_load);
        let lift_resistance = q_load * GRAVITY * req.lift_m;
        let effective_n = (Self::length_coefficient(req.length_m) * main_resistance
            + lift_resistance)
            .abs()
            .max(1.0);

        let shaft_kw = effective_n * v / 1000.0;
        let motor_kw = shaft_kw / self.drive_efficiency;

        let grip = (self.pulley_friction * self.wrap_angle_deg.to_radians()).exp();
        let peak_n = effective_n * (1.0 + 1.0 / (grip - 1.0));
        let strength_n = belt_type.rating_n_per_mm() * width_mm as f64;
        let safety_factor = strength_n / peak_n;

        if !safety_factor.is_finite() || !motor_kw.is_finite() {
            return Err(BeltForgeError::Model(format!(
                "Non-finite result for {} mm {}",
                width_mm, belt_type
            )));
        }

        let capacity_limit = self.capacity_limit_tph(width_mm, v, req.material_density);
        let mut warnings = Vec::new();

        if req.capacity_tph > capacity_limit {
            warnings.push(DesignWarning::new(
                WarningKind::CrossSectionOverload,
                format!(
                    "Load {:.0} t/h exceeds cross-section capacity {:.0} t/h",
                    req.capacity_tph, capacity_limit
                ),
            ));
        } else if capacity_limit > 0.0 && req.capacity_tph / capacity_limit < 0.3 {
            warnings.push(DesignWarning::new(
                WarningKind::Ordinary,
                format!(
                    "Belt oversized: {:.0}% cross-section utilization",
                    req.capacity_tph / capacity_limit * 100.0
                ),
            ));
        }

        let speed_limit = recommended_max_speed(width_mm);
        if v > speed_limit {
            warnings.push(DesignWarning::new(
                WarningKind::SpeedLimit,
                format!(
                    "Belt speed {:.2} m/s above {:.2} m/s recommended for {} mm",
                    v, speed_limit, width_mm
                ),
            ));
        }

        if motor_kw > self.max_motor_kw {
            warnings.push(DesignWarning::new(
                WarningKind::Severe,
                format!(
                    "Drive power {:.0} kW exceeds largest standard motor ({:.0} kW)",
                    motor_kw, self.max_motor_kw
                ),
            ));
        }

        Ok(PhysicsReport {
            effective_tension_kn: effective_n / 1000.0,
            peak_tension_kn: peak_n / 1000.0,
            required_power_kw: motor_kw,
            safety_factor,
            capacity_limit_tph: capacity_limit,
            capital_cost_usd: self.capital_cost(req, width_m, belt_type, motor_kw),
            warnings,
        })
    }
}
