use crate::reports;
use beltforge::catalog::Catalog;
use beltforge::config::{Config, OptimizerSettings};
use beltforge::error::BfResult;
use beltforge::optimizer::{GenerationReport, GeneticOptimizer, ProgressCallback};
use beltforge::oracle::DesignOracle;
use beltforge::request::ConveyorRequest;
use clap::Args;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Also print the per-generation history.
    #[arg(long, default_value_t = false)]
    pub history: bool,
}

struct CliLogger;
impl ProgressCallback for CliLogger {
    fn on_generation(&self, report: &GenerationReport) {
        if report.generation % 10 == 0 {
            info!(
                "Gen {:3} | Best: {:.4} | Valid {}/{}",
                report.generation, report.best_fitness, report.valid_count, report.population_size
            );
        }
    }
}

pub fn run(
    args: OptimizeArgs,
    request: ConveyorRequest,
    catalog: Arc<Catalog>,
    settings: OptimizerSettings,
) -> BfResult<()> {
    let oracle = DesignOracle::new(request.clone(), catalog.clone());
    let optimizer =
        GeneticOptimizer::new(oracle, request.clone(), &catalog, settings, &args.config.search)?;

    let params = optimizer.params();
    info!(
        "🧬 Design space {} | {} generations x {} candidates",
        optimizer.catalog().design_space_size(),
        params.generations,
        params.population_size
    );

    let outcome = optimizer.run(args.seed, CliLogger);

    if args.history {
        reports::print_history(&outcome.history);
    }

    if outcome.is_empty() {
        println!("\nNo feasible design found. Relax constraints and try again.");
        return Ok(());
    }

    info!("\n=== 🏆 FINAL RESULT ===");
    reports::print_designs(&request, &outcome);
    if let Some(best) = outcome.best() {
        reports::print_issues(best);
    }
    Ok(())
}
