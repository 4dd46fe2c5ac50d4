use crate::error::{BeltForgeError, BfResult};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[command(flatten)]
    pub search: SearchParams,
    #[command(flatten)]
    pub settings: OptimizerSettings,
}

/// GA run parameters. Unset values are derived from the design-space size.
#[derive(Args, Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchParams {
    #[arg(long)]
    pub generations: Option<usize>,
    #[arg(long)]
    pub population_size: Option<usize>,
    #[arg(long)]
    pub mutation_rate: Option<f64>,
    #[arg(long)]
    pub crossover_rate: Option<f64>,
    #[arg(long)]
    pub tournament_size: Option<usize>,
    /// 0 derives the elite count from generations and population size.
    #[arg(long, default_value_t = 0)]
    pub elitism_count: usize,
}

/// Fully resolved run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunParams {
    pub generations: usize,
    pub population_size: usize,
    pub mutation_rate: f64,
    pub crossover_rate: f64,
    pub tournament_size: usize,
    pub elitism_count: usize,
}

impl SearchParams {
    pub fn resolve(&self, design_space_size: usize) -> RunParams {
        let (generations, population, mutation, crossover) = match design_space_size {
            0..=1_999 => (35, 60, 0.20, 0.80),
            2_000..=19_999 => (45, 100, 0.15, 0.82),
            _ => (60, 150, 0.12, 0.85),
        };

        let generations = self.generations.unwrap_or(generations).max(1);
        let population_size = self.population_size.unwrap_or(population).max(2);

        RunParams {
            generations,
            population_size,
            mutation_rate: self.mutation_rate.unwrap_or(mutation).clamp(0.0, 1.0),
            crossover_rate: self.crossover_rate.unwrap_or(crossover).clamp(0.0, 1.0),
            tournament_size: self
                .tournament_size
                .unwrap_or_else(|| auto_tournament_size(population_size))
                .clamp(1, population_size),
            elitism_count: if self.elitism_count == 0 {
                auto_elitism_count(generations, population_size)
            } else {
                self.elitism_count.min(population_size)
            },
        }
    }
}

pub fn auto_tournament_size(population_size: usize) -> usize {
    match population_size {
        0..=79 => 3,
        80..=119 => 4,
        _ => 5,
    }
}

pub fn auto_elitism_count(generations: usize, population_size: usize) -> usize {
    let count = if generations >= 50 {
        (population_size / 15).max(2)
    } else if generations >= 35 {
        (population_size / 20).max(2)
    } else {
        (population_size / 25).max(1)
    };
    count.min((population_size / 4).max(1))
}

#[derive(Args, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerSettings {
    #[arg(long, default_value_t = 0.4)]
    pub weight_cost: f64,
    #[arg(long, default_value_t = 0.3)]
    pub weight_power: f64,
    #[arg(long, default_value_t = 0.2)]
    pub weight_safety: f64,
    #[arg(long, default_value_t = 0.1)]
    pub weight_velocity_error: f64,

    #[arg(long)]
    pub max_budget_usd: Option<f64>,

    #[arg(long, default_value_t = 6.0)]
    pub min_belt_safety_factor: f64,
    #[arg(long, default_value_t = 10.0)]
    pub max_velocity_error_percent: f64,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            weight_cost: 0.4,
            weight_power: 0.3,
            weight_safety: 0.2,
            weight_velocity_error: 0.1,
            max_budget_usd: None,
            min_belt_safety_factor: 6.0,
            max_velocity_error_percent: 10.0,
        }
    }
}

impl OptimizerSettings {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> BfResult<Self> {
        let content = fs::read_to_string(path)?;
        let settings: OptimizerSettings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> BfResult<()> {
        let weights = [
            ("weight_cost", self.weight_cost),
            ("weight_power", self.weight_power),
            ("weight_safety", self.weight_safety),
            ("weight_velocity_error", self.weight_velocity_error),
        ];
        for (name, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(BeltForgeError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, w
                )));
            }
        }
        if let Some(budget) = self.max_budget_usd {
            if !budget.is_finite() || budget <= 0.0 {
                return Err(BeltForgeError::Config(format!(
                    "max_budget_usd must be positive, got {}",
                    budget
                )));
            }
        }
        if !self.min_belt_safety_factor.is_finite() || self.min_belt_safety_factor <= 0.0 {
            return Err(BeltForgeError::Config(
                "min_belt_safety_factor must be positive".into(),
            ));
        }
        if !self.max_velocity_error_percent.is_finite() || self.max_velocity_error_percent <= 0.0 {
            return Err(BeltForgeError::Config(
                "max_velocity_error_percent must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The safety factor a valid design must reach.
    #[inline(always)]
    pub fn effective_safety_floor(&self) -> f64 {
        self.min_belt_safety_factor
            .max(crate::consts::HARD_MIN_SAFETY_FACTOR)
    }

    pub fn merge_from_cli(&mut self, cli_settings: &OptimizerSettings, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli_settings.$field.clone();
                }
            };
        }

        update_if_present!(weight_cost, "weight_cost");
        update_if_present!(weight_power, "weight_power");
        update_if_present!(weight_safety, "weight_safety");
        update_if_present!(weight_velocity_error, "weight_velocity_error");
        update_if_present!(max_budget_usd, "max_budget_usd");
        update_if_present!(min_belt_safety_factor, "min_belt_safety_factor");
        update_if_present!(max_velocity_error_percent, "max_velocity_error_percent");
    }
}
