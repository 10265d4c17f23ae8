//! prefsim CLI - simulate sequential preference-based recommendation.
//!
//! Draws simulated users with hidden linear utilities, suggests items with a
//! kernel preference model learned from pairwise comparisons, and reports
//! cumulative regret next to a uniform-random baseline.
//!
//! # Usage
//!
//! ```bash
//! # Simulate one user over the MovieLens catalog
//! prefsim simulate --horizon 100 --burnin 20
//!
//! # Ten users, summary only
//! prefsim simulate --users 10 --summary
//!
//! # Inspect a ranking dataset and its train/test split
//! prefsim dataset german2005 --rows 200
//!
//! # Instance preferences from a regression table
//! prefsim instances housing --batch 200
//!
//! # View configuration
//! prefsim config show
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// prefsim - sequential preference-based suggestion and regret simulation.
#[derive(Parser, Debug)]
#[command(name = "prefsim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "PREFSIM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the suggestion loop and the random baseline for simulated users
    Simulate(cli::simulate::SimulateArgs),

    /// Load a ranking or classification dataset into preference graphs
    Dataset(cli::dataset::DatasetArgs),

    /// Load a regression table and draw instance preferences from its target
    Instances(cli::instances::InstancesArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let loaded = match &cli.config {
        Some(path) => prefsim_core::Config::load_from(path),
        None => prefsim_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) if cli.config.is_some() => return Err(e.into()),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `prefsim config path`."
            );
            prefsim_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("prefsim v{}", prefsim_core::VERSION);

    match cli.command {
        Commands::Simulate(args) => cli::simulate::execute(args, config),
        Commands::Dataset(args) => cli::dataset::execute(args, config),
        Commands::Instances(args) => cli::instances::execute(args, config),
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()),
    }
}
