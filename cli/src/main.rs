//! Fleet simulator CLI
//!
//! Runs a policy-driven simulation and a run-to-failure baseline over the
//! same generated fleet and reports the profit difference.
//!
//! Binary: fleet-sim

use anyhow::Context;
use clap::Parser;
use maintenance_simulator_core_rs::summary::{ComparisonSummary, RunSummary};
use maintenance_simulator_core_rs::{run_comparison, HazardRiskPredictor, ScenarioConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fleet maintenance simulator - policy versus baseline
#[derive(Parser)]
#[command(name = "fleet-sim")]
#[command(about = "Compare optimized preventive maintenance against run-to-failure", long_about = None)]
struct Cli {
    /// Scenario JSON file (defaults apply for anything omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Total simulated days
    #[arg(long)]
    days: Option<usize>,

    /// Warm-up days before the policy acts
    #[arg(long)]
    warmup: Option<usize>,

    /// Fleet size
    #[arg(long)]
    machines: Option<usize>,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Strategies per generation
    #[arg(long)]
    population: Option<usize>,

    /// Generations per day
    #[arg(long)]
    generations: Option<usize>,

    /// Rollouts per fitness evaluation
    #[arg(long)]
    rollouts: Option<usize>,

    /// Fitness evaluation threads
    #[arg(long)]
    workers: Option<usize>,

    /// Daily discount rate for net present value
    #[arg(long, default_value_t = 0.0)]
    discount_rate: f64,

    /// Write the comparison summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn scenario(&self) -> anyhow::Result<ScenarioConfig> {
        let mut scenario = match &self.config {
            Some(path) => ScenarioConfig::from_path(path)?,
            None => ScenarioConfig::default(),
        };

        let simulation = &mut scenario.simulation;
        if let Some(days) = self.days {
            simulation.total_days = days;
        }
        if let Some(warmup) = self.warmup {
            simulation.warmup_days = warmup;
        }
        if let Some(seed) = self.seed {
            simulation.rng_seed = seed;
        }
        if let Some(population) = self.population {
            simulation.optimizer.population_size = population;
        }
        if let Some(generations) = self.generations {
            simulation.optimizer.generations = generations;
        }
        if let Some(rollouts) = self.rollouts {
            simulation.optimizer.rollouts = rollouts;
        }
        if let Some(workers) = self.workers {
            simulation.optimizer.workers = workers;
        }
        if let Some(machines) = self.machines {
            scenario.fleet.machine_count = machines;
        }

        scenario.validate()?;
        Ok(scenario)
    }
}

fn print_run(label: &str, run: &RunSummary) {
    println!("{label}");
    println!("  total profit:          {:>14.2}", run.total_profit);
    println!("  net present value:     {:>14.2}", run.net_present_value);
    println!(
        "  failures:              {:>14}  (minor {}, major {}, total replacement {})",
        run.failures.all(),
        run.failures.minor,
        run.failures.major,
        run.failures.total_replacement
    );
    println!("  preventive stand-downs:{:>14}", run.preventive_stand_downs);
    println!("  recovering days:       {:>14}", run.recovering_days);
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let scenario = cli.scenario().context("invalid scenario")?;
    let predictor = HazardRiskPredictor::new(scenario.simulation.failure, scenario.predictor)
        .context("invalid predictor configuration")?;

    let outcome = run_comparison(&scenario, Arc::new(predictor)).context("simulation failed")?;
    let summary = ComparisonSummary::from_outcome(&outcome, cli.discount_rate);

    println!(
        "{} machines, {} days ({} warm-up)",
        scenario.fleet.machine_count, scenario.simulation.total_days, scenario.simulation.warmup_days
    );
    print_run("policy", &summary.policy);
    print_run("baseline", &summary.baseline);
    println!("profit advantage:        {:>14.2}", summary.profit_advantage);

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(())
}
