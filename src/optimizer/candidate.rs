use crate::oracle::{DesignGenes, EvaluationResult};
use crate::physics::WarningKind;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Closed set of reasons a design is rejected or penalized.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize, Deserialize,
)]
pub enum IssueCategory {
    NoTransmission,
    SevereWarning,
    Warning,
    HighCost,
    LowSafety,
    CrossSectionOverload,
    SpeedLimit,
    HighVelocityError,
    OracleFailure,
}

impl IssueCategory {
    /// Additive fitness penalty per recorded issue.
    pub fn penalty(&self) -> f64 {
        match self {
            Self::NoTransmission => 2.0,
            Self::SevereWarning => 1.5,
            Self::Warning => 0.3,
            Self::HighCost => 1.0,
            Self::LowSafety => 2.0,
            Self::CrossSectionOverload => 1.5,
            Self::SpeedLimit => 1.0,
            Self::HighVelocityError => 0.8,
            // Failed evaluations are assigned the fallback fitness outright.
            Self::OracleFailure => 0.0,
        }
    }

    pub fn from_warning(kind: WarningKind) -> Self {
        match kind {
            WarningKind::Ordinary => Self::Warning,
            WarningKind::Severe => Self::SevereWarning,
            WarningKind::CrossSectionOverload => Self::CrossSectionOverload,
            WarningKind::SpeedLimit => Self::SpeedLimit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    /// Hard issues exclude the design from the valid pool.
    pub hard: bool,
    pub detail: String,
}

impl Issue {
    pub fn hard(category: IssueCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            hard: true,
            detail: detail.into(),
        }
    }

    pub fn soft(category: IssueCategory, detail: impl Into<String>) -> Self {
        Self {
            category,
            hard: false,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignCandidate {
    pub genes: DesignGenes,
    pub is_valid: bool,
    /// `f64::INFINITY` until the candidate has been evaluated and scored.
    pub fitness_score: f64,
    pub evaluation: Option<EvaluationResult>,
    pub invalid_reasons: Vec<Issue>,
}

impl DesignCandidate {
    pub fn new(genes: DesignGenes) -> Self {
        Self {
            genes,
            is_valid: false,
            fitness_score: f64::INFINITY,
            evaluation: None,
            invalid_reasons: Vec::new(),
        }
    }

    pub fn is_evaluated(&self) -> bool {
        self.evaluation.is_some()
    }

    pub fn is_scored(&self) -> bool {
        self.fitness_score.is_finite()
    }

    pub fn safety_factor(&self) -> f64 {
        self.evaluation.as_ref().map_or(0.0, |e| e.safety_factor)
    }

    pub fn has_hard_issue(&self) -> bool {
        self.invalid_reasons.iter().any(|r| r.hard)
    }
}

pub type Population = Vec<DesignCandidate>;
