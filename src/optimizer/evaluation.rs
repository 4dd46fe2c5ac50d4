use super::candidate::{DesignCandidate, Issue, IssueCategory};
use crate::config::OptimizerSettings;
use crate::consts::{BUDGET_TOLERANCE, SOFT_VELOCITY_ERROR_PERCENT};
use crate::oracle::{EvaluationResult, Oracle};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::warn;

/// Evaluates every candidate without a cached result on `pool`.
///
/// Each task writes only into its own candidate. Returns once every dispatched
/// evaluation has finished, with the number of candidates evaluated.
pub fn evaluate_pending<O: Oracle>(
    population: &mut [DesignCandidate],
    oracle: &O,
    settings: &OptimizerSettings,
    pool: &rayon::ThreadPool,
) -> usize {
    pool.install(|| {
        population
            .par_iter_mut()
            .filter(|c| !c.is_evaluated())
            .map(|candidate| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| oracle.evaluate(&candidate.genes)))
                    .unwrap_or_else(|payload| EvaluationResult::failed(panic_message(payload)));
                candidate.evaluation = Some(result);
                classify(candidate, settings);
                1
            })
            .sum()
    })
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("Oracle panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("Oracle panicked: {}", s)
    } else {
        "Oracle panicked".to_string()
    }
}

/// Sets validity and issue list from the cached evaluation.
pub fn classify(candidate: &mut DesignCandidate, settings: &OptimizerSettings) {
    candidate.invalid_reasons.clear();

    let Some(eval) = candidate.evaluation.as_ref() else {
        candidate.is_valid = false;
        return;
    };

    if let Some(msg) = &eval.failure {
        warn!("Evaluation failed for {:?}: {}", candidate.genes, msg);
        candidate.invalid_reasons =
            vec![Issue::hard(IssueCategory::OracleFailure, msg.clone())];
        candidate.is_valid = false;
        return;
    }

    let mut issues = Vec::new();

    let floor = settings.effective_safety_floor();
    if eval.safety_factor < floor {
        issues.push(Issue::hard(
            IssueCategory::LowSafety,
            format!("Safety factor {:.2} below {:.2}", eval.safety_factor, floor),
        ));
    }

    if let Some(budget) = settings.max_budget_usd {
        let cost = eval.cost_capital_total;
        if cost > budget * BUDGET_TOLERANCE {
            issues.push(Issue::hard(
                IssueCategory::HighCost,
                format!("Cost ${:.0} exceeds budget ${:.0} beyond tolerance", cost, budget),
            ));
        } else if cost > budget {
            issues.push(Issue::soft(
                IssueCategory::HighCost,
                format!("Cost ${:.0} over budget ${:.0}", cost, budget),
            ));
        }
    }

    match &eval.transmission {
        None => issues.push(Issue::soft(
            IssueCategory::NoTransmission,
            "No feasible drive train",
        )),
        Some(t) => {
            let err = t.velocity_error_percent;
            if err > settings.max_velocity_error_percent {
                issues.push(Issue::hard(
                    IssueCategory::HighVelocityError,
                    format!(
                        "Velocity error {:.2}% above {:.2}%",
                        err, settings.max_velocity_error_percent
                    ),
                ));
            } else if err > SOFT_VELOCITY_ERROR_PERCENT {
                issues.push(Issue::soft(
                    IssueCategory::HighVelocityError,
                    format!("Velocity error {:.2}%", err),
                ));
            }
        }
    }

    for w in &eval.warnings {
        issues.push(Issue::soft(
            IssueCategory::from_warning(w.kind),
            w.message.clone(),
        ));
    }

    candidate.is_valid = !issues.iter().any(|i| i.hard);
    candidate.invalid_reasons = issues;
}
