pub mod types;

pub use self::types::{DriveInputs, TransmissionSolution};
use crate::consts::{
    CHAIN_SAFETY_FACTOR, DRIVEN_TEETH_MAX, DRIVER_TEETH_MAX, DRIVER_TEETH_MIN,
    PREFERRED_SPROCKET_RATIO, SPROCKET_RATIO_MAX, SPROCKET_RATIO_MIN,
};
use crate::request::GearboxMode;
use crate::util::Span;
use std::collections::HashMap;
use std::f64::consts::PI;
use tracing::debug;

// Secondary ranking weights over normalized criteria.
const W_RATIO_DEVIATION: f64 = 0.35;
const W_TOTAL_TEETH: f64 = 0.15;
const W_CHAIN_PITCH: f64 = 0.15;
const W_MARGIN_AUTOMATIC: f64 = 0.25;
const W_MARGIN_MANUAL: f64 = 0.6;

/// Velocity error points one unit of secondary score is worth.
const SECONDARY_SCALE_PERCENT: f64 = 0.1;

/// Largest velocity error gap (percent) the secondary criteria can overturn.
/// A solution worse than the best error by more than this never ranks first.
pub const MAX_SECONDARY_BRIDGE_PERCENT: f64 = SECONDARY_SCALE_PERCENT
    * (W_RATIO_DEVIATION + W_TOTAL_TEETH + W_CHAIN_PITCH + W_MARGIN_MANUAL);

/// Margins above this add nothing to the ranking.
const MARGIN_CAP: f64 = 100.0;

struct Combo {
    solution: TransmissionSolution,
    chain_index: usize,
}

impl Combo {
    fn ratio_deviation(&self) -> f64 {
        (self.solution.sprocket_ratio() - PREFERRED_SPROCKET_RATIO).abs()
    }
}

/// Pulley speed (rpm) that moves the belt at `speed_mps`.
#[inline]
pub fn pulley_rpm(speed_mps: f64, pulley_diameter_mm: f64) -> f64 {
    speed_mps * 60.0 / (PI * pulley_diameter_mm / 1000.0)
}

/// Linear chain speed (m/s) on a sprocket with `teeth` teeth turning at `rpm`.
#[inline]
pub fn chain_speed(teeth: u32, pitch_mm: f64, rpm: f64) -> f64 {
    teeth as f64 * pitch_mm * rpm / 60_000.0
}

/// Returns the best gearbox/sprocket/chain combination, or `None` when nothing
/// reaches the target within the tooth, window and strength limits.
pub fn solve(inputs: &DriveInputs) -> Option<TransmissionSolution> {
    ranked_solutions(inputs).into_iter().next()
}

/// Every feasible combination after duplicate collapsing, best first.
pub fn ranked_solutions(inputs: &DriveInputs) -> Vec<TransmissionSolution> {
    if !inputs_are_sane(inputs) {
        debug!("Drive solver rejected inputs: {:?}", inputs);
        return Vec::new();
    }

    let combos = collapse_tooth_pairs(enumerate(inputs));
    if combos.is_empty() {
        return Vec::new();
    }

    let margin_weight = match inputs.mode {
        GearboxMode::Automatic => W_MARGIN_AUTOMATIC,
        GearboxMode::Manual(_) => W_MARGIN_MANUAL,
    };

    let dev_span = Span::from_values(combos.iter().map(|c| c.ratio_deviation()));
    let teeth_span = Span::from_values(combos.iter().map(|c| c.solution.total_teeth() as f64));
    let pitch_span = Span::from_values(combos.iter().map(|c| c.solution.chain_pitch_mm));
    let margin_span = Span::from_values(combos.iter().map(|c| c.solution.safety_margin));

    let mut scored: Vec<(f64, Combo)> = combos
        .into_iter()
        .map(|c| {
            let s = &c.solution;
            let secondary = W_RATIO_DEVIATION * dev_span.normalize(c.ratio_deviation())
                + W_TOTAL_TEETH * teeth_span.normalize(s.total_teeth() as f64)
                + W_CHAIN_PITCH * pitch_span.normalize(s.chain_pitch_mm)
                - margin_weight * margin_span.normalize(s.safety_margin);
            // Raw error percent carries full weight so it dominates.
            let score = s.velocity_error_percent + SECONDARY_SCALE_PERCENT * secondary;
            (score, c)
        })
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| {
        sa.total_cmp(sb)
            .then(
                a.solution
                    .velocity_error_percent
                    .total_cmp(&b.solution.velocity_error_percent),
            )
            .then(a.ratio_deviation().total_cmp(&b.ratio_deviation()))
            .then(a.solution.total_teeth().cmp(&b.solution.total_teeth()))
            .then(a.chain_index.cmp(&b.chain_index))
            .then(a.solution.gearbox_ratio.total_cmp(&b.solution.gearbox_ratio))
    });

    scored.into_iter().map(|(_, c)| c.solution).collect()
}

fn inputs_are_sane(inputs: &DriveInputs) -> bool {
    let positive = |v: f64| v.is_finite() && v > 0.0;
    positive(inputs.target_speed_mps)
        && positive(inputs.motor_rpm)
        && positive(inputs.pulley_diameter_mm)
        && inputs.required_power_kw.is_finite()
        && inputs.required_power_kw >= 0.0
        && !inputs.chains.is_empty()
}

fn enumerate(inputs: &DriveInputs) -> Vec<Combo> {
    let target_pulley_rpm = pulley_rpm(inputs.target_speed_mps, inputs.pulley_diameter_mm);
    let pulley_circumference_m = PI * inputs.pulley_diameter_mm / 1000.0;

    let ratios: Vec<f64> = match inputs.mode {
        GearboxMode::Automatic => inputs.ratios.clone(),
        GearboxMode::Manual(r) => vec![r],
    };

    let mut combos = Vec::new();

    for ratio in ratios {
        if !ratio.is_finite() || ratio <= 0.0 {
            continue;
        }
        let output_rpm = inputs.motor_rpm / ratio;
        let ideal = output_rpm / target_pulley_rpm;

        let sprocket_target = if (SPROCKET_RATIO_MIN..=SPROCKET_RATIO_MAX).contains(&ideal) {
            ideal
        } else {
            match inputs.mode {
                GearboxMode::Automatic => continue,
                GearboxMode::Manual(_) => ideal.clamp(SPROCKET_RATIO_MIN, SPROCKET_RATIO_MAX),
            }
        };

        for driver in DRIVER_TEETH_MIN..=DRIVER_TEETH_MAX {
            let driven = (driver as f64 * sprocket_target).round();
            if driven < driver as f64 || driven > DRIVEN_TEETH_MAX as f64 {
                continue;
            }
            let driven = driven as u32;

            let sprocket_ratio = driven as f64 / driver as f64;
            let total_ratio = ratio * sprocket_ratio;
            let actual_speed = inputs.motor_rpm / total_ratio * pulley_circumference_m / 60.0;
            let velocity_error =
                (actual_speed - inputs.target_speed_mps).abs() / inputs.target_speed_mps * 100.0;

            for (chain_index, chain) in inputs.chains.iter().enumerate() {
                let v_chain = chain_speed(driver, chain.pitch_mm, output_rpm);
                if v_chain <= 0.0 {
                    continue;
                }
                // kW / (m/s) = kN
                let required = inputs.required_power_kw / v_chain;
                let allowable = chain.tensile_kn / CHAIN_SAFETY_FACTOR;
                if required > allowable {
                    continue;
                }
                let margin = if required > 0.0 {
                    (allowable / required).min(MARGIN_CAP)
                } else {
                    MARGIN_CAP
                };

                combos.push(Combo {
                    solution: TransmissionSolution {
                        gearbox_ratio: ratio,
                        drive_sprocket_teeth: driver,
                        driven_sprocket_teeth: driven,
                        chain_pitch_mm: chain.pitch_mm,
                        chain_designation: chain.designation.clone(),
                        actual_velocity_mps: actual_speed,
                        velocity_error_percent: velocity_error,
                        total_transmission_ratio: total_ratio,
                        required_force_kn: required,
                        allowable_force_kn: allowable,
                        safety_margin: margin,
                    },
                    chain_index,
                });
            }
        }
    }

    combos
}

/// Keeps one combination per (driver, driven) pair: lowest velocity error,
/// then highest margin, then earliest in enumeration order.
fn collapse_tooth_pairs(combos: Vec<Combo>) -> Vec<Combo> {
    let mut best: HashMap<(u32, u32), Combo> = HashMap::new();
    let mut order: Vec<(u32, u32)> = Vec::new();

    for combo in combos {
        let key = (
            combo.solution.drive_sprocket_teeth,
            combo.solution.driven_sprocket_teeth,
        );
        match best.get(&key) {
            None => {
                order.push(key);
                best.insert(key, combo);
            }
            Some(current) => {
                let better = combo.solution.velocity_error_percent
                    < current.solution.velocity_error_percent
                    || (combo.solution.velocity_error_percent
                        == current.solution.velocity_error_percent
                        && combo.solution.safety_margin > current.solution.safety_margin);
                if better {
                    best.insert(key, combo);
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| best.remove(&key))
        .collect()
}
