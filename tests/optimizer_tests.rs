use beltforge::catalog::Catalog;
use beltforge::config::{OptimizerSettings, SearchParams};
use beltforge::consts::FALLBACK_FITNESS;
use beltforge::error::BeltForgeError;
use beltforge::optimizer::{
    GenerationReport, GeneticOptimizer, IssueCategory, ProgressCallback, SilentProgress,
};
use beltforge::oracle::{DesignGenes, DesignOracle, EvaluationResult, Oracle};
use beltforge::request::{ConveyorRequest, GearboxMode};
use fastrand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn small_search() -> SearchParams {
    SearchParams {
        generations: Some(8),
        population_size: Some(30),
        ..Default::default()
    }
}

fn optimizer(
    request: ConveyorRequest,
    settings: OptimizerSettings,
) -> GeneticOptimizer<DesignOracle> {
    let catalog = Arc::new(Catalog::standard());
    let oracle = DesignOracle::new(request.clone(), catalog.clone());
    GeneticOptimizer::new(oracle, request, &catalog, settings, &small_search())
        .expect("valid optimizer setup")
}

#[test]
fn test_population_size_is_constant() {
    let opt = optimizer(ConveyorRequest::default(), OptimizerSettings::default());
    let outcome = opt.run(Some(1), SilentProgress);
    assert_eq!(outcome.history.len(), 8);
    for report in &outcome.history {
        assert_eq!(report.population_size, 30);
    }
}

#[test]
fn test_valid_designs_meet_safety_floor() {
    let settings = OptimizerSettings {
        min_belt_safety_factor: 7.0,
        ..Default::default()
    };
    let opt = optimizer(ConveyorRequest::default(), settings);
    let outcome = opt.run(Some(2), SilentProgress);
    assert!(!outcome.is_empty());
    for d in &outcome.designs {
        assert!(d.is_valid);
        assert!(d.safety_factor() >= 7.0);
    }
}

#[test]
fn test_best_fitness_never_regresses() {
    let opt = optimizer(ConveyorRequest::default(), OptimizerSettings::default());
    let outcome = opt.run(Some(3), SilentProgress);
    for pair in outcome.history.windows(2) {
        assert!(
            pair[1].best_fitness <= pair[0].best_fitness,
            "gen {} best {} worse than gen {} best {}",
            pair[1].generation,
            pair[1].best_fitness,
            pair[0].generation,
            pair[0].best_fitness
        );
    }
}

#[test]
fn test_designs_are_sorted_and_capped() {
    let opt = optimizer(ConveyorRequest::default(), OptimizerSettings::default());
    let outcome = opt.run(Some(4), SilentProgress);
    assert!(outcome.designs.len() <= 15);
    for pair in outcome.designs.windows(2) {
        assert!(pair[0].fitness_score <= pair[1].fitness_score);
    }
}

#[test]
fn test_lower_floor_never_loses_valid_candidates() {
    let strict = optimizer(
        ConveyorRequest::default(),
        OptimizerSettings {
            min_belt_safety_factor: 8.0,
            ..Default::default()
        },
    );
    let relaxed = optimizer(
        ConveyorRequest::default(),
        OptimizerSettings {
            min_belt_safety_factor: 6.0,
            ..Default::default()
        },
    );

    let mut strict_pop = strict.initial_population(&mut Rng::with_seed(99));
    let mut relaxed_pop = relaxed.initial_population(&mut Rng::with_seed(99));
    strict.evaluate(&mut strict_pop);
    relaxed.evaluate(&mut relaxed_pop);

    let strict_valid = strict_pop.iter().filter(|c| c.is_valid).count();
    let relaxed_valid = relaxed_pop.iter().filter(|c| c.is_valid).count();
    assert!(relaxed_valid >= strict_valid);
    for (s, r) in strict_pop.iter().zip(&relaxed_pop) {
        assert_eq!(s.genes, r.genes);
        if s.is_valid {
            assert!(r.is_valid);
        }
    }
}

#[test]
fn test_same_seed_same_result() {
    let a = optimizer(ConveyorRequest::default(), OptimizerSettings::default()).run(Some(7), SilentProgress);
    let b = optimizer(ConveyorRequest::default(), OptimizerSettings::default()).run(Some(7), SilentProgress);
    assert_eq!(a.designs.len(), b.designs.len());
    for (x, y) in a.designs.iter().zip(&b.designs) {
        assert_eq!(x.genes, y.genes);
        assert_eq!(x.fitness_score, y.fitness_score);
    }
    assert_eq!(a.history, b.history);
}

#[test]
fn test_impossible_floor_ends_early_and_empty() {
    let settings = OptimizerSettings {
        min_belt_safety_factor: 1000.0,
        ..Default::default()
    };
    let outcome = optimizer(ConveyorRequest::default(), settings).run(Some(5), SilentProgress);
    assert!(outcome.is_empty());
    assert_eq!(outcome.generations_run, 0);
    assert!(outcome.history.is_empty());
}

#[test]
fn test_manual_gearbox_is_never_mutated() {
    let request = ConveyorRequest {
        gearbox: GearboxMode::Manual(12.5),
        gearbox_ratio: 12.5,
        ..Default::default()
    };
    let opt = optimizer(request, OptimizerSettings::default());
    assert_eq!(opt.catalog().gearbox_ratios, vec![12.5]);
    let outcome = opt.run(Some(6), SilentProgress);
    for d in &outcome.designs {
        assert_eq!(d.genes.gearbox_ratio, 12.5);
    }
}

#[test]
fn test_unknown_baseline_chain_is_rejected() {
    let request = ConveyorRequest {
        chain_designation: "99Z-9".into(),
        ..Default::default()
    };
    let catalog = Arc::new(Catalog::standard());
    let oracle = DesignOracle::new(request.clone(), catalog.clone());
    let result = GeneticOptimizer::new(
        oracle,
        request,
        &catalog,
        OptimizerSettings::default(),
        &small_search(),
    );
    assert!(matches!(result, Err(BeltForgeError::Validation(_))));
}

struct CountingProgress(AtomicUsize);

impl ProgressCallback for CountingProgress {
    fn on_generation(&self, _report: &GenerationReport) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_callback_sees_every_generation() {
    let progress = CountingProgress(AtomicUsize::new(0));
    let outcome = optimizer(ConveyorRequest::default(), OptimizerSettings::default())
        .run(Some(8), &progress);
    assert_eq!(progress.0.load(Ordering::SeqCst), outcome.history.len());
}

// --- Faulty oracles ---

/// Panics on one chain and returns a fixed healthy result otherwise.
struct FlakyOracle;

impl Oracle for FlakyOracle {
    fn evaluate(&self, genes: &DesignGenes) -> EvaluationResult {
        if genes.chain_designation == "08B-1" {
            panic!("solver blew up on {}", genes.chain_designation);
        }
        EvaluationResult {
            required_power_kw: 20.0,
            cost_capital_total: 10_000.0 + genes.belt_width_mm as f64,
            safety_factor: 9.0,
            ..Default::default()
        }
    }
}

struct BrokenOracle;

impl Oracle for BrokenOracle {
    fn evaluate(&self, _genes: &DesignGenes) -> EvaluationResult {
        EvaluationResult::failed("model offline")
    }
}

#[test]
fn test_panicking_oracle_is_contained() {
    let request = ConveyorRequest::default();
    let catalog = Catalog::standard();
    let opt = GeneticOptimizer::new(
        FlakyOracle,
        request,
        &catalog,
        OptimizerSettings::default(),
        &small_search(),
    )
    .unwrap();

    let mut pop = opt.initial_population(&mut Rng::with_seed(12));
    pop[1].genes.chain_designation = "08B-1".into();
    let evaluated = opt.evaluate(&mut pop);
    assert_eq!(evaluated, pop.len());

    for c in &pop {
        if c.genes.chain_designation == "08B-1" {
            assert!(!c.is_valid);
            assert_eq!(c.fitness_score, FALLBACK_FITNESS);
            assert_eq!(c.invalid_reasons[0].category, IssueCategory::OracleFailure);
            assert!(c.invalid_reasons[0].detail.contains("solver blew up"));
        } else {
            assert!(c.is_valid);
        }
    }
}

#[test]
fn test_failing_oracle_yields_empty_outcome() {
    let catalog = Catalog::standard();
    let opt = GeneticOptimizer::new(
        BrokenOracle,
        ConveyorRequest::default(),
        &catalog,
        OptimizerSettings::default(),
        &small_search(),
    )
    .unwrap();
    let outcome = opt.run(Some(1), SilentProgress);
    assert!(outcome.is_empty());
    assert_eq!(outcome.evaluations, 30);
}
