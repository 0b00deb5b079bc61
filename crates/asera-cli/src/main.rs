//! ASERA batch runner
//!
//! Headless driver for the simulation engine: builds a population (or
//! resumes one from a snapshot), runs it for a fixed number of ticks under a
//! selectable tax policy, and optionally writes a snapshot and CSV exports.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use asera_core::{Params, SimError, Simulation};

mod export;

/// Command line arguments for the simulation runner.
#[derive(Parser, Debug)]
#[command(name = "asera")]
#[command(about = "Agent-based socio-economic simulation runner")]
struct Args {
    /// Random seed for reproducibility
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 50)]
    ticks: u64,

    /// Number of agents (overrides the parameters file)
    #[arg(long)]
    agents: Option<usize>,

    /// Social network edge probability (overrides the parameters file)
    #[arg(long)]
    edge_probability: Option<f64>,

    /// Tax policy: adaptive, flat, ubi or progressive
    #[arg(long, default_value = "adaptive")]
    policy: String,

    /// Optional parameters TOML file
    #[arg(long)]
    params: Option<PathBuf>,

    /// Progress log interval in ticks (0 disables progress logging)
    #[arg(long, default_value_t = 10)]
    log_interval: u64,

    /// Write the final state as a snapshot to this path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Resume from a snapshot instead of building a fresh population
    #[arg(long)]
    load: Option<PathBuf>,

    /// Export CSV files with this filename prefix after the run
    #[arg(long)]
    export: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SimError> {
    let mut sim = match &args.load {
        Some(path) => {
            info!(path = %path.display(), "resuming from snapshot");
            Simulation::load(path)?
        }
        None => {
            let mut params = match &args.params {
                Some(path) => Params::load(path)?,
                None => Params::default(),
            };
            if let Some(agents) = args.agents {
                params.num_agents = agents;
            }
            if let Some(probability) = args.edge_probability {
                params.edge_probability = probability;
            }
            Simulation::new(params, args.seed)?
        }
    };

    sim.apply_policy(&args.policy)?;
    info!(
        seed = sim.seed(),
        agents = sim.agent_count(),
        edges = sim.graph().edge_count(),
        policy = sim.active_policy().name(),
        ticks = args.ticks,
        "starting run"
    );

    sim.start();
    for _ in 0..args.ticks {
        sim.update();
        let tick = sim.tick();
        if args.log_interval > 0 && tick % args.log_interval == 0 {
            if let Some(point) = sim.time_series().latest() {
                info!(
                    tick,
                    mean_wealth = point.mean_wealth,
                    gini = point.gini,
                    mean_competence = point.mean_competence,
                    "tick complete"
                );
            }
        }
    }
    sim.pause();

    if let Some(path) = &args.save {
        sim.save(path)?;
        info!(path = %path.display(), "snapshot written");
    }
    if let Some(prefix) = &args.export {
        export::export_run(&mut sim, prefix)?;
        info!(prefix, "csv export written");
    }

    println!("Simulation complete");
    println!("  Ticks: {}", sim.tick());
    if let Some(point) = sim.time_series().latest() {
        println!("  Mean wealth: {:.2}", point.mean_wealth);
        println!("  Gini coefficient: {:.4}", point.gini);
        println!("  Mean competence: {:.2}", point.mean_competence);
    }
    Ok(())
}
