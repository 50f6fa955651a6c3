use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use harvester::meanfield::{self, MeanFieldParams};
use harvester::telemetry::TracingSink;
use harvester::{Simulation, SimulationConfig};

/// Command-line arguments for the headless runner.
#[derive(Parser)]
#[command(name = "harvester", version, about = "Harvester ant foraging simulation")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the RNG seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the run budget with a tick count.
    #[arg(long)]
    ticks: Option<u64>,

    /// Writes the per-tick history to this file.
    #[arg(long)]
    history: Option<PathBuf>,

    /// Logs a telemetry line every N ticks.
    #[arg(long, default_value_t = 200)]
    log_every: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the spatial agent simulation (default).
    Run,
    /// Runs the non-spatial model for a number of time slots.
    MeanField {
        #[arg(long, default_value_t = 100)]
        slots: usize,
    },
}

/// Loads the simulation configuration from a TOML file or uses defaults.
fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    match path {
        Some(path) => {
            let config = SimulationConfig::load(path)
                .with_context(|| format!("loading config '{}'", path.display()))?;
            info!("Loaded config from '{}'", path.display());
            Ok(config)
        }
        None => {
            info!("No config file provided, using defaults.");
            Ok(SimulationConfig::default())
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(seed) = cli.seed {
        config.run.seed = seed;
    }
    if let Some(ticks) = cli.ticks {
        config.run.ticks = Some(ticks);
    }

    let history = match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut sim = Simulation::new(config).context("invalid simulation config")?;
            let mut sink = TracingSink::new(cli.log_every);
            let report = sim.run(&mut sink);
            println!("{}", report);
            sim.history
        }
        Command::MeanField { slots } => {
            let mut rng = ChaCha8Rng::seed_from_u64(config.run.seed);
            let history = meanfield::simulate(
                slots,
                config.recruitment,
                &MeanFieldParams::default(),
                &mut rng,
            );
            println!(
                "Mean-field run: {} slots, {} arrivals, {} departures, final alpha {:.4}",
                slots,
                history.cumulative_arrivals.last().copied().unwrap_or(0),
                history.cumulative_departures.last().copied().unwrap_or(0),
                history.alpha.last().copied().unwrap_or(config.recruitment.alpha_min),
            );
            history
        }
    };

    if let Some(path) = cli.history {
        history
            .save(&path)
            .with_context(|| format!("writing history to '{}'", path.display()))?;
        info!("History written to '{}'", path.display());
    }
    Ok(())
}
