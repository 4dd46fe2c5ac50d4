use super::candidate::{DesignCandidate, IssueCategory};
use crate::config::OptimizerSettings;
use crate::consts::FALLBACK_FITNESS;
use crate::oracle::EvaluationResult;
use crate::util::Span;

/// Per-criterion spans over the valid part of a population.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationStats {
    pub cost: Span,
    pub power: Span,
    pub safety: Span,
    pub velocity_error: Span,
}

impl PopulationStats {
    pub fn from_valid(population: &[DesignCandidate], settings: &OptimizerSettings) -> Self {
        let mut stats = PopulationStats::default();
        for eval in population
            .iter()
            .filter(|c| c.is_valid)
            .filter_map(|c| c.evaluation.as_ref())
        {
            stats.cost.include(eval.cost_capital_total);
            stats.power.include(eval.required_power_kw);
            stats.safety.include(eval.safety_factor);
            stats
                .velocity_error
                .include(velocity_criterion(eval, settings));
        }
        stats
    }
}

/// Designs without a drive train are scored as if at the hard velocity limit.
#[inline]
pub fn velocity_criterion(eval: &EvaluationResult, settings: &OptimizerSettings) -> f64 {
    eval.velocity_error_percent()
        .unwrap_or(settings.max_velocity_error_percent)
}

/// Lower is better.
pub fn compute_fitness(
    candidate: &DesignCandidate,
    stats: &PopulationStats,
    settings: &OptimizerSettings,
) -> f64 {
    let eval = match &candidate.evaluation {
        Some(e) if !e.is_failure() => e,
        _ => return FALLBACK_FITNESS,
    };

    let base = settings.weight_cost * stats.cost.normalize(eval.cost_capital_total)
        + settings.weight_power * stats.power.normalize(eval.required_power_kw)
        - settings.weight_safety * stats.safety.normalize(eval.safety_factor)
        + settings.weight_velocity_error
            * stats
                .velocity_error
                .normalize(velocity_criterion(eval, settings));

    let mut penalty: f64 = candidate
        .invalid_reasons
        .iter()
        .map(|r| r.category.penalty())
        .sum();

    // Valid candidates already clear this floor, so only invalid ones pay here.
    let floor = settings.min_belt_safety_factor;
    if eval.safety_factor < floor {
        penalty += IssueCategory::LowSafety.penalty() * (floor - eval.safety_factor) / floor;
    }

    let fitness = base + penalty;
    if fitness.is_finite() {
        fitness
    } else {
        FALLBACK_FITNESS
    }
}

/// Scores every evaluated candidate that has no fitness yet.
///
/// Candidates carried over unmodified keep their previous score.
pub fn assign_fitness(population: &mut [DesignCandidate], settings: &OptimizerSettings) {
    let stats = PopulationStats::from_valid(population, settings);
    for candidate in population.iter_mut() {
        if candidate.is_evaluated() && !candidate.is_scored() {
            candidate.fitness_score = compute_fitness(candidate, &stats, settings);
        }
    }
}

/// Drops every cached score and rescores all evaluated candidates against
/// one shared set of spans.
pub fn rescore_all(population: &mut [DesignCandidate], settings: &OptimizerSettings) {
    for candidate in population.iter_mut() {
        candidate.fitness_score = f64::INFINITY;
    }
    assign_fitness(population, settings);
}

/// Ascending fitness, unscored candidates last.
pub fn sort_by_fitness(population: &mut [DesignCandidate]) {
    population.sort_by(|a, b| a.fitness_score.total_cmp(&b.fitness_score));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::DesignGenes;
    use crate::optimizer::candidate::Issue;
    use crate::request::ConveyorRequest;

    fn valid(cost: f64, power: f64, sf: f64) -> DesignCandidate {
        let mut c = DesignCandidate::new(DesignGenes::from_request(&ConveyorRequest::default()));
        c.evaluation = Some(EvaluationResult {
            required_power_kw: power,
            cost_capital_total: cost,
            safety_factor: sf,
            ..Default::default()
        });
        c.is_valid = true;
        c
    }

    #[test]
    fn test_cheaper_design_scores_lower() {
        let mut pop = vec![valid(1000.0, 10.0, 8.0), valid(2000.0, 10.0, 8.0)];
        assign_fitness(&mut pop, &OptimizerSettings::default());
        assert!(pop[0].fitness_score < pop[1].fitness_score);
    }

    #[test]
    fn test_penalties_are_additive() {
        let settings = OptimizerSettings::default();
        let clean = valid(1000.0, 10.0, 8.0);
        let mut flagged = clean.clone();
        flagged.invalid_reasons = vec![
            Issue::soft(IssueCategory::Warning, "w"),
            Issue::soft(IssueCategory::SpeedLimit, "s"),
        ];
        let stats = PopulationStats::from_valid(&[clean.clone()], &settings);
        let diff = compute_fitness(&flagged, &stats, &settings) - compute_fitness(&clean, &stats, &settings);
        assert!((diff - 1.3).abs() < 1e-9);
    }

    #[test]
    fn test_failed_candidate_gets_fallback() {
        let mut c = valid(0.0, 0.0, 0.0);
        c.evaluation = Some(EvaluationResult::failed("x"));
        let stats = PopulationStats::default();
        assert_eq!(compute_fitness(&c, &stats, &OptimizerSettings::default()), FALLBACK_FITNESS);
    }

    #[test]
    fn test_scored_candidates_are_not_rescored() {
        let mut pop = vec![valid(1000.0, 10.0, 8.0), valid(2000.0, 10.0, 8.0)];
        pop[0].fitness_score = -3.0;
        assign_fitness(&mut pop, &OptimizerSettings::default());
        assert_eq!(pop[0].fitness_score, -3.0);
        assert!(pop[1].is_scored());
    }

    #[test]
    fn test_rescore_ranks_dominating_design_ahead_of_carried_elite() {
        let settings = OptimizerSettings::default();

        // Elite scored while a worse design set the range
        let mut earlier = vec![valid(1000.0, 10.0, 10.0), valid(2000.0, 20.0, 6.5)];
        assign_fitness(&mut earlier, &settings);
        let elite = earlier[0].clone();

        // Cheaper, leaner and safer than the elite
        let dominating = valid(990.0, 9.9, 10.1);
        let range_shifter = valid(500.0, 20.0, 6.5);

        let mut pop = vec![elite, dominating, range_shifter];
        assign_fitness(&mut pop, &settings);
        assert!(pop[0].fitness_score < pop[1].fitness_score);

        rescore_all(&mut pop, &settings);
        assert!(
            pop[1].fitness_score < pop[0].fitness_score,
            "dominating {:.4} vs elite {:.4}",
            pop[1].fitness_score,
            pop[0].fitness_score
        );
        sort_by_fitness(&mut pop);
        assert_eq!(pop[0].evaluation.as_ref().map(|e| e.cost_capital_total), Some(990.0));
    }

    #[test]
    fn test_rescore_leaves_unevaluated_candidates_unscored() {
        let mut pop = vec![valid(1000.0, 10.0, 8.0)];
        pop.push(DesignCandidate::new(DesignGenes::from_request(&ConveyorRequest::default())));
        rescore_all(&mut pop, &OptimizerSettings::default());
        assert!(pop[0].is_scored());
        assert!(!pop[1].is_scored());
    }
}
