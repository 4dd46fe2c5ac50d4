use super::candidate::{DesignCandidate, Population};
use super::crossover::{crossover, CrossoverKind};
use super::diversity::{adapt_mutation_rate, population_diversity};
use super::evaluation::evaluate_pending;
use super::fitness::{assign_fitness, rescore_all, sort_by_fitness};
use super::initialization;
use super::mutation::MutationPlan;
use super::selection::tournament;
use super::{GenerationReport, OptimizationOutcome, ProgressCallback};
use crate::catalog::Catalog;
use crate::config::{OptimizerSettings, RunParams, SearchParams};
use crate::consts::{MAX_EVAL_WORKERS, RESULT_COUNT_FULL, RESULT_COUNT_REDUCED};
use crate::error::{BeltForgeError, BfResult};
use crate::oracle::Oracle;
use crate::request::{ConveyorRequest, GearboxMode};
use fastrand::Rng;
use tracing::{debug, info, warn};

/// Clones produced instead of crossover mutate harder.
const CLONE_MUTATION_BOOST: f64 = 1.5;

/// Mutation rate for an offspring pair. Pairs that skipped crossover are
/// plain copies of their parents and get the clone boost.
pub(crate) fn offspring_rate(generation_rate: f64, crossed: bool) -> f64 {
    if crossed {
        generation_rate
    } else {
        generation_rate * CLONE_MUTATION_BOOST
    }
}

pub struct GeneticOptimizer<O: Oracle> {
    oracle: O,
    request: ConveyorRequest,
    /// Gene tables. In manual gearbox mode the ratio table holds only the fixed ratio.
    catalog: Catalog,
    settings: OptimizerSettings,
    params: RunParams,
    pool: rayon::ThreadPool,
}

impl<O: Oracle> GeneticOptimizer<O> {
    pub fn new(
        oracle: O,
        request: ConveyorRequest,
        catalog: &Catalog,
        settings: OptimizerSettings,
        search: &SearchParams,
    ) -> BfResult<Self> {
        request.validate()?;
        settings.validate()?;
        catalog.validate()?;

        if catalog.find_chain(&request.chain_designation).is_none() {
            return Err(BeltForgeError::Validation(format!(
                "Baseline chain '{}' is not in the chain catalog",
                request.chain_designation
            )));
        }

        let catalog = match request.gearbox {
            GearboxMode::Manual(r) => catalog.clone().with_fixed_ratio(r),
            GearboxMode::Automatic => catalog.clone(),
        };
        let params = search.resolve(catalog.design_space_size());

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
            .min(MAX_EVAL_WORKERS);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("beltforge-eval-{}", i))
            .build()
            .map_err(|e| BeltForgeError::Config(format!("Cannot start worker pool: {}", e)))?;

        Ok(Self {
            oracle,
            request,
            catalog,
            settings,
            params,
            pool,
        })
    }

    pub fn params(&self) -> &RunParams {
        &self.params
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    fn gearbox_locked(&self) -> bool {
        matches!(self.request.gearbox, GearboxMode::Manual(_))
    }

    pub fn initial_population(&self, rng: &mut Rng) -> Population {
        initialization::initial_population(
            &self.request,
            &self.catalog,
            self.params.population_size,
            rng,
        )
    }

    /// Evaluates and scores every candidate that lacks a cached result.
    /// Returns the number of oracle calls made.
    pub fn evaluate(&self, population: &mut [DesignCandidate]) -> usize {
        let evaluated = evaluate_pending(population, &self.oracle, &self.settings, &self.pool);
        assign_fitness(population, &self.settings);
        evaluated
    }

    pub fn run<CB: ProgressCallback>(&self, seed: Option<u64>, callback: CB) -> OptimizationOutcome {
        let params = self.params;
        let mut rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };

        info!(
            "Optimizing '{}': {} generations, population {}, elites {}, tournament {}",
            self.request.name,
            params.generations,
            params.population_size,
            params.elitism_count,
            params.tournament_size
        );

        let mut population = self.initial_population(&mut rng);
        let mut history = Vec::with_capacity(params.generations);
        let mut evaluations = 0;

        for generation in 0..params.generations {
            evaluations += self.evaluate(&mut population);

            let valid_count = population.iter().filter(|c| c.is_valid).count();
            if valid_count == 0 {
                warn!(
                    "Generation {}: no valid designs, stopping early",
                    generation
                );
                return OptimizationOutcome {
                    designs: Vec::new(),
                    generations_run: generation,
                    history,
                    evaluations,
                };
            }

            // Elites keep the score from the generation that produced them, so
            // the reported best never regresses. Selection pressure between an
            // elite and a fresh offspring can be off by the span drift until
            // the final rescore below.
            sort_by_fitness(&mut population);

            let diversity = population_diversity(&population, &self.catalog);
            let mutation_rate = adapt_mutation_rate(params.mutation_rate, diversity);
            let best_fitness = population
                .iter()
                .find(|c| c.is_valid)
                .map_or(f64::INFINITY, |c| c.fitness_score);

            let report = GenerationReport {
                generation,
                best_fitness,
                valid_count,
                population_size: population.len(),
                diversity,
                mutation_rate,
            };
            info!(
                "Gen {:>3} | best {:.4} | valid {}/{}",
                generation, best_fitness, valid_count, report.population_size
            );
            debug!(
                "Gen {:>3} | diversity {:.3} | mutation rate {:.3}",
                generation, diversity, mutation_rate
            );
            callback.on_generation(&report);
            history.push(report);

            population = self.next_generation(&population, mutation_rate, &mut rng);
        }

        evaluations += self.evaluate(&mut population);
        rescore_all(&mut population, &self.settings);
        sort_by_fitness(&mut population);

        let mut designs: Vec<DesignCandidate> =
            population.into_iter().filter(|c| c.is_valid).collect();
        let keep = if designs.len() >= RESULT_COUNT_FULL {
            RESULT_COUNT_FULL
        } else if designs.len() >= RESULT_COUNT_REDUCED {
            RESULT_COUNT_REDUCED
        } else {
            designs.len()
        };
        designs.truncate(keep);

        if designs.is_empty() {
            warn!("Final generation has no valid designs");
        } else {
            info!(
                "Finished after {} evaluations, best fitness {:.4}",
                evaluations, designs[0].fitness_score
            );
        }

        OptimizationOutcome {
            designs,
            generations_run: params.generations,
            history,
            evaluations,
        }
    }

    /// Builds the next population from a sorted, evaluated one.
    ///
    /// Elites are cloned with their evaluation and fitness intact; every other
    /// member is a fresh offspring awaiting evaluation.
    fn next_generation(&self, population: &[DesignCandidate], mutation_rate: f64, rng: &mut Rng) -> Population {
        let size = self.params.population_size;
        let valid: Vec<usize> = population
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_valid)
            .map(|(i, _)| i)
            .collect();

        let mut next: Population = valid
            .iter()
            .take(self.params.elitism_count)
            .map(|&i| population[i].clone())
            .collect();

        let lock_gearbox = self.gearbox_locked();

        while next.len() < size {
            let p1 = &population[tournament(&valid, population, self.params.tournament_size, rng)];
            let p2 = &population[tournament(&valid, population, self.params.tournament_size, rng)];

            let crossed = rng.f64() < self.params.crossover_rate;
            let (mut g1, mut g2) = if crossed {
                let kind = CrossoverKind::random(rng);
                crossover(&p1.genes, &p2.genes, kind, rng)
            } else {
                (p1.genes.clone(), p2.genes.clone())
            };

            let plan = MutationPlan {
                catalog: &self.catalog,
                rate: offspring_rate(mutation_rate, crossed),
                lock_gearbox,
            };
            plan.apply(&mut g1, p1.fitness_score, rng);
            plan.apply(&mut g2, p2.fitness_score, rng);

            next.push(DesignCandidate::new(g1));
            next.push(DesignCandidate::new(g2));
        }

        next.truncate(size);
        debug_assert_eq!(next.len(), size);
        next
    }
}
