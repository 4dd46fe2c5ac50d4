use beltforge::catalog::{load_chain_catalog, Catalog};
use beltforge::config::OptimizerSettings;
use beltforge::error::BfResult;
use beltforge::request::ConveyorRequest;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Baseline conveyor request (JSON). Built-in defaults when omitted.
    #[arg(global = true, short, long)]
    request: Option<String>,

    /// Optimizer settings (JSON). Explicit flags override the file.
    #[arg(global = true, short, long)]
    settings: Option<String>,

    /// Chain catalog (CSV). Built-in ISO 606 B-series when omitted.
    #[arg(global = true, short, long)]
    chains: Option<String>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search belt width, belt type, gearbox ratio and chain with the genetic optimizer.
    Optimize(cmd::optimize::OptimizeArgs),
    /// Solve the drive train alone for a belt speed target.
    Drive(cmd::drive::DriveArgs),
}

fn load_request(path: Option<&str>) -> BfResult<ConveyorRequest> {
    match path {
        Some(p) => {
            info!("📂 Loading request: {}", p);
            ConveyorRequest::load_from_file(p)
        }
        None => {
            info!("📂 No request file given. Using the built-in baseline.");
            Ok(ConveyorRequest::default())
        }
    }
}

fn load_catalog(path: Option<&str>) -> BfResult<Catalog> {
    let catalog = match path {
        Some(p) => {
            info!("⛓️  Loading chain catalog: {}", p);
            Catalog::standard().with_chains(load_chain_catalog(p)?)
        }
        None => Catalog::standard(),
    };
    catalog.validate()?;
    Ok(catalog)
}

fn fatal(e: impl std::fmt::Display) -> ! {
    error!("❌ {}", e);
    process::exit(1);
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing BeltForge...");

    let request = load_request(cli.request.as_deref()).unwrap_or_else(|e| fatal(e));
    let catalog = load_catalog(cli.chains.as_deref())
        .map(Arc::new)
        .unwrap_or_else(|e| fatal(e));

    let result = match cli.command {
        Commands::Optimize(args) => {
            let mut settings = args.config.settings.clone();
            if let Some(path) = &cli.settings {
                info!("⚖️  Loading settings from: {}", path);
                let mut file_settings =
                    OptimizerSettings::load_from_file(path).unwrap_or_else(|e| fatal(e));
                if let Some(sub_matches) = matches.subcommand_matches("optimize") {
                    file_settings.merge_from_cli(&args.config.settings, sub_matches);
                }
                settings = file_settings;
            }
            cmd::optimize::run(args, request, catalog, settings)
        }
        Commands::Drive(args) => cmd::drive::run(args, &request, &catalog),
    };

    if let Err(e) = result {
        fatal(e);
    }
}
