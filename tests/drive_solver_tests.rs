use beltforge::catalog::{standard_chains, ChainSpec, STANDARD_GEARBOX_RATIOS};
use beltforge::drive::{self, DriveInputs};
use beltforge::request::GearboxMode;
use proptest::prelude::*;
use rstest::rstest;

fn inputs(power_kw: f64, mode: GearboxMode) -> DriveInputs {
    DriveInputs::builder()
        .target_speed_mps(2.5)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(500.0)
        .required_power_kw(power_kw)
        .mode(mode)
        .build()
}

#[test]
fn test_standard_conveyor_hits_speed_target() {
    let best = drive::solve(&inputs(5.0, GearboxMode::Automatic))
        .expect("standard conveyor must have a drive train");
    assert!(
        best.velocity_error_percent < 5.0,
        "velocity error {:.2}%",
        best.velocity_error_percent
    );
    assert!(STANDARD_GEARBOX_RATIOS.contains(&best.gearbox_ratio));
}

#[test]
fn test_manual_ratio_outside_window_is_clamped() {
    // 1450 / 100 rpm against a ~95 rpm pulley needs a sprocket ratio near 0.15
    let manual = drive::solve(&inputs(2.0, GearboxMode::Manual(100.0)))
        .expect("manual mode clamps instead of giving up");
    assert_eq!(manual.gearbox_ratio, 100.0);
    assert!(manual.sprocket_ratio() >= 1.2 - 0.05);
    assert!(manual.velocity_error_percent > 10.0);

    let automatic = DriveInputs::builder()
        .target_speed_mps(2.5)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(500.0)
        .required_power_kw(2.0)
        .ratios(vec![100.0])
        .build();
    assert!(drive::solve(&automatic).is_none());
}

#[test]
fn test_solver_is_idempotent() {
    let a = drive::solve(&inputs(22.0, GearboxMode::Automatic));
    let b = drive::solve(&inputs(22.0, GearboxMode::Automatic));
    assert_eq!(a, b);
    assert_eq!(
        drive::ranked_solutions(&inputs(22.0, GearboxMode::Automatic)),
        drive::ranked_solutions(&inputs(22.0, GearboxMode::Automatic))
    );
}

#[test]
fn test_weak_chains_are_filtered() {
    let weak = DriveInputs::builder()
        .target_speed_mps(2.5)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(500.0)
        .required_power_kw(200.0)
        .chains(vec![ChainSpec::new("WEAK", 12.7, 5.0, 0.5)])
        .build();
    assert!(drive::solve(&weak).is_none());
}

#[rstest]
#[case(GearboxMode::Automatic)]
#[case(GearboxMode::Manual(8.0))]
#[case(GearboxMode::Manual(12.5))]
fn test_every_ranked_solution_is_strong_enough(#[case] mode: GearboxMode) {
    let all = drive::ranked_solutions(&inputs(30.0, mode));
    assert!(!all.is_empty());
    for s in &all {
        assert!(s.required_force_kn <= s.allowable_force_kn);
        assert!(s.safety_margin >= 1.0);
    }
}

fn min_error(all: &[drive::TransmissionSolution]) -> f64 {
    all.iter()
        .map(|s| s.velocity_error_percent)
        .fold(f64::INFINITY, f64::min)
}

#[rstest]
#[case(2.5, 400.0, 5.0)]
#[case(2.5, 500.0, 22.0)]
#[case(1.2, 315.0, 3.0)]
#[case(4.0, 630.0, 45.0)]
fn test_best_solution_has_near_minimum_error(
    #[case] speed: f64,
    #[case] pulley: f64,
    #[case] power: f64,
) {
    let inputs = DriveInputs::builder()
        .target_speed_mps(speed)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(pulley)
        .required_power_kw(power)
        .build();
    let all = drive::ranked_solutions(&inputs);
    let best = drive::solve(&inputs).expect("feasible drive train");
    let floor = min_error(&all);
    assert!(
        best.velocity_error_percent <= floor + drive::MAX_SECONDARY_BRIDGE_PERCENT,
        "best {:.3}% ({}/{} i={}) vs min {:.3}%",
        best.velocity_error_percent,
        best.drive_sprocket_teeth,
        best.driven_sprocket_teeth,
        best.gearbox_ratio,
        floor
    );
}

#[test]
fn test_tooth_pairs_are_unique() {
    let all = drive::ranked_solutions(&inputs(10.0, GearboxMode::Automatic));
    let mut pairs: Vec<(u32, u32)> = all
        .iter()
        .map(|s| (s.drive_sprocket_teeth, s.driven_sprocket_teeth))
        .collect();
    let before = pairs.len();
    pairs.sort();
    pairs.dedup();
    assert_eq!(before, pairs.len());
}

#[test]
fn test_invalid_inputs_yield_nothing() {
    let zero_speed = DriveInputs::builder()
        .target_speed_mps(0.0)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(500.0)
        .required_power_kw(5.0)
        .build();
    assert!(drive::solve(&zero_speed).is_none());

    let no_chains = DriveInputs::builder()
        .target_speed_mps(2.5)
        .motor_rpm(1450.0)
        .pulley_diameter_mm(500.0)
        .required_power_kw(5.0)
        .chains(Vec::new())
        .build();
    assert!(drive::solve(&no_chains).is_none());
}

prop_compose! {
    fn arb_inputs()(
        speed in 0.5..6.0f64,
        rpm in 700.0..3000.0f64,
        pulley in 250.0..1200.0f64,
        power in 0.0..80.0f64,
        manual in proptest::option::of(proptest::sample::select(STANDARD_GEARBOX_RATIOS.to_vec())),
    ) -> DriveInputs {
        DriveInputs::builder()
            .target_speed_mps(speed)
            .motor_rpm(rpm)
            .pulley_diameter_mm(pulley)
            .required_power_kw(power)
            .mode(manual.map_or(GearboxMode::Automatic, GearboxMode::Manual))
            .chains(standard_chains())
            .build()
    }
}

proptest! {
    #[test]
    fn prop_solutions_respect_tooth_and_strength_bounds(inputs in arb_inputs()) {
        for s in drive::ranked_solutions(&inputs) {
            prop_assert!((17..=25).contains(&s.drive_sprocket_teeth));
            prop_assert!(s.driven_sprocket_teeth >= s.drive_sprocket_teeth);
            prop_assert!(s.driven_sprocket_teeth <= 120);
            prop_assert!(s.required_force_kn <= s.allowable_force_kn);
            prop_assert!(s.velocity_error_percent >= 0.0);
        }
    }

    #[test]
    fn prop_best_error_is_within_secondary_bridge(inputs in arb_inputs()) {
        let all = drive::ranked_solutions(&inputs);
        if let Some(best) = all.first() {
            prop_assert!(
                best.velocity_error_percent <= min_error(&all) + drive::MAX_SECONDARY_BRIDGE_PERCENT
            );
        }
    }

    #[test]
    fn prop_solve_is_idempotent(inputs in arb_inputs()) {
        prop_assert_eq!(drive::solve(&inputs), drive::solve(&inputs.clone()));
    }
}
