use crate::reports;
use beltforge::catalog::Catalog;
use beltforge::drive::{self, DriveInputs};
use beltforge::error::BfResult;
use beltforge::physics::{BeltPhysics, SimplifiedResistance};
use beltforge::request::{ConveyorRequest, GearboxMode};
use clap::Args;
use tracing::info;

/// Unset values fall back to the baseline request.
#[derive(Args, Debug, Clone)]
pub struct DriveArgs {
    /// Target belt speed (m/s)
    #[arg(long)]
    pub speed: Option<f64>,

    #[arg(long)]
    pub motor_rpm: Option<f64>,

    /// Drive pulley diameter (mm)
    #[arg(long)]
    pub pulley: Option<f64>,

    /// Transmitted power (kW). Estimated from the request when omitted.
    #[arg(long)]
    pub power: Option<f64>,

    /// Fix the gearbox ratio instead of searching the standard table.
    #[arg(long)]
    pub manual_ratio: Option<f64>,

    #[arg(short = 'n', long, default_value_t = 5)]
    pub top: usize,
}

pub fn run(args: DriveArgs, request: &ConveyorRequest, catalog: &Catalog) -> BfResult<()> {
    let power = match args.power {
        Some(p) => p,
        None => {
            let report = SimplifiedResistance::default().analyze(
                request,
                request.belt_width_mm,
                request.belt_type,
            )?;
            info!("⚡ Estimated drive power: {:.1} kW", report.required_power_kw);
            report.required_power_kw
        }
    };

    let mode = match args.manual_ratio {
        Some(r) => GearboxMode::Manual(r),
        None => request.gearbox,
    };

    let inputs = DriveInputs::builder()
        .target_speed_mps(args.speed.unwrap_or(request.belt_speed_mps))
        .motor_rpm(args.motor_rpm.unwrap_or(request.motor_rpm))
        .pulley_diameter_mm(args.pulley.unwrap_or(request.drive_pulley_diameter_mm))
        .required_power_kw(power)
        .mode(mode)
        .ratios(catalog.gearbox_ratios.clone())
        .chains(catalog.chains.clone())
        .build();

    let solutions = drive::ranked_solutions(&inputs);
    if solutions.is_empty() {
        println!("\nNo feasible drive train for these inputs.");
        return Ok(());
    }

    info!("Found {} feasible combinations", solutions.len());
    reports::print_drive_solutions(&solutions[..args.top.clamp(1, solutions.len())]);
    Ok(())
}
