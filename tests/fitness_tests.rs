use beltforge::config::OptimizerSettings;
use beltforge::consts::FALLBACK_FITNESS;
use beltforge::optimizer::evaluation::classify;
use beltforge::optimizer::fitness::{assign_fitness, compute_fitness, PopulationStats};
use beltforge::optimizer::{DesignCandidate, Issue, IssueCategory};
use beltforge::oracle::{DesignGenes, EvaluationResult};
use beltforge::request::ConveyorRequest;
use beltforge::util::Span;
use rstest::rstest;
use strum::IntoEnumIterator;

fn candidate(cost: f64, power: f64, safety: f64) -> DesignCandidate {
    let mut c = DesignCandidate::new(DesignGenes::from_request(&ConveyorRequest::default()));
    c.evaluation = Some(EvaluationResult {
        required_power_kw: power,
        cost_capital_total: cost,
        safety_factor: safety,
        ..Default::default()
    });
    c
}

#[test]
fn test_identical_costs_normalize_to_half() {
    let settings = OptimizerSettings::default();
    let mut pop = vec![
        candidate(5000.0, 10.0, 8.0),
        candidate(5000.0, 20.0, 8.0),
        candidate(5000.0, 30.0, 8.0),
    ];
    for c in pop.iter_mut() {
        classify(c, &settings);
        assert!(c.is_valid);
    }

    let stats = PopulationStats::from_valid(&pop, &settings);
    for c in &pop {
        let eval = c.evaluation.as_ref().unwrap();
        assert_eq!(stats.cost.normalize(eval.cost_capital_total), 0.5);
        assert_eq!(stats.safety.normalize(eval.safety_factor), 0.5);
    }

    assign_fitness(&mut pop, &settings);
    // Only power differs, so fitness steps by w_power * 0.5 per candidate
    let step = settings.weight_power * 0.5;
    assert!((pop[1].fitness_score - pop[0].fitness_score - step).abs() < 1e-9);
    assert!((pop[2].fitness_score - pop[1].fitness_score - step).abs() < 1e-9);
}

#[test]
fn test_safer_design_scores_lower() {
    let settings = OptimizerSettings::default();
    let mut pop = vec![candidate(5000.0, 10.0, 7.0), candidate(5000.0, 10.0, 12.0)];
    for c in pop.iter_mut() {
        classify(c, &settings);
    }
    assign_fitness(&mut pop, &settings);
    assert!(pop[1].fitness_score < pop[0].fitness_score);
}

#[test]
fn test_every_category_except_failure_penalizes() {
    for category in IssueCategory::iter() {
        if category == IssueCategory::OracleFailure {
            continue;
        }
        assert!(category.penalty() > 0.0, "{} has no penalty", category);
    }
}

#[rstest]
#[case(IssueCategory::NoTransmission, 2.0)]
#[case(IssueCategory::SevereWarning, 1.5)]
#[case(IssueCategory::Warning, 0.3)]
#[case(IssueCategory::HighCost, 1.0)]
#[case(IssueCategory::CrossSectionOverload, 1.5)]
#[case(IssueCategory::SpeedLimit, 1.0)]
#[case(IssueCategory::HighVelocityError, 0.8)]
fn test_single_issue_adds_its_penalty(#[case] category: IssueCategory, #[case] penalty: f64) {
    let settings = OptimizerSettings::default();
    let clean = candidate(5000.0, 10.0, 8.0);
    let stats = PopulationStats::from_valid(&[], &settings);

    let mut flagged = clean.clone();
    flagged.invalid_reasons = vec![Issue::soft(category, "test")];

    let diff = compute_fitness(&flagged, &stats, &settings) - compute_fitness(&clean, &stats, &settings);
    assert!((diff - penalty).abs() < 1e-9);
}

#[test]
fn test_low_safety_penalty_grows_with_shortfall() {
    let settings = OptimizerSettings::default();
    let stats = PopulationStats::default();
    let near = compute_fitness(&candidate(5000.0, 10.0, 5.5), &stats, &settings);
    let far = compute_fitness(&candidate(5000.0, 10.0, 3.0), &stats, &settings);
    let ok = compute_fitness(&candidate(5000.0, 10.0, 6.0), &stats, &settings);
    assert!(ok < near);
    assert!(near < far);
}

#[test]
fn test_missing_transmission_uses_velocity_limit() {
    let settings = OptimizerSettings::default();
    let mut pop = vec![candidate(5000.0, 10.0, 8.0)];
    classify(&mut pop[0], &settings);
    let stats = PopulationStats::from_valid(&pop, &settings);
    assert_eq!(stats.velocity_error.min, settings.max_velocity_error_percent);
    assert_eq!(stats.velocity_error.max, settings.max_velocity_error_percent);
}

#[test]
fn test_non_finite_inputs_fall_back() {
    let settings = OptimizerSettings::default();
    let stats = PopulationStats {
        cost: Span::from_values([1000.0, 2000.0]),
        ..Default::default()
    };
    let nan = candidate(f64::NAN, 10.0, 8.0);
    assert_eq!(compute_fitness(&nan, &stats, &settings), FALLBACK_FITNESS);
    let failed = {
        let mut c = candidate(0.0, 0.0, 0.0);
        c.evaluation = Some(EvaluationResult::failed("physics diverged"));
        c
    };
    assert_eq!(compute_fitness(&failed, &stats, &settings), FALLBACK_FITNESS);
}
