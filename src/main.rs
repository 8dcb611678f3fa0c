use clap::Parser;
use tracing_subscriber::EnvFilter;

use diet_optimizer_rs::cli::{Cli, Command};
use diet_optimizer_rs::data::{load_bounds, load_foods};
use diet_optimizer_rs::error::Result;
use diet_optimizer_rs::interface::{display_model_summary, display_report};
use diet_optimizer_rs::planner::{MicroLpEngine, ModelBuilder, optimize_diet};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;

    // Load tables
    let db = load_foods(&cli.nutrients)?;
    let bounds = load_bounds(&cli.constraints, &config)?;

    match cli.command.unwrap_or_default() {
        Command::Optimize { details, json } => {
            let outcome = optimize_diet(&db, &bounds, &config, &MicroLpEngine, details)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            } else {
                display_report(&outcome.report, details);
            }
        }
        Command::Summarize => {
            let model = ModelBuilder::new(&db, &config)?.build(&bounds);
            display_model_summary(&model);
        }
    }

    Ok(())
}
