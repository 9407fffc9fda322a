//! trials — multi-trial urgency-batching experiment for robot_dispatch.
//!
//! Runs the reference four-robot experiment by default: coverage-placed
//! anchors, Poisson task arrivals over a 10×10 world, urgency-threshold
//! batching, and per-robot/per-trial average weighted waits.
//!
//! ```text
//! trials --trials 10 --seed 7 --policy all --output ./out
//! RUST_LOG=rd_sim=debug trials --no-coverage
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rd_dispatch::{CutoffPolicy, DispatchAll, UniformPrefix, UrgencyThreshold, load_stream_csv};
use rd_output::{CsvWriter, OutputWriter, SimOutputObserver};
use rd_route::{ExactOracle, HybridOracle, RoutingOracle, TwoOptOracle};
use rd_scenario::{Experiment, ExperimentSummary, ScenarioConfig, TrialSummary};

type DynExperiment = Experiment<Box<dyn RoutingOracle>, Box<dyn CutoffPolicy>>;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "trials")]
#[command(about = "Simulate robots batching urgency-weighted tasks", long_about = None)]
struct Cli {
    /// JSON scenario file; omitted fields keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the master seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of trials
    #[arg(long)]
    trials: Option<usize>,

    /// How many pending tasks each batch takes
    #[arg(long, value_enum, default_value_t = PolicyKind::Threshold)]
    policy: PolicyKind,

    /// Route solver for each batch
    #[arg(long, value_enum, default_value_t = OracleKind::Hybrid)]
    oracle: OracleKind,

    /// Directory for stops.csv and robot_summaries.csv
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write output.db instead of CSV files
    #[cfg(feature = "sqlite")]
    #[arg(long, requires = "output")]
    sqlite: bool,

    /// Keep the initial anchors instead of running coverage placement
    #[arg(long)]
    no_coverage: bool,

    /// Replay a recorded task CSV (arrival_time,x,y,urgency) as a single trial
    #[arg(long)]
    tasks: Option<PathBuf>,

    /// Worker threads for the parallel runner
    #[cfg(feature = "parallel")]
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyKind {
    /// Uniform urgency threshold below the most urgent pending task
    Threshold,
    /// Every pending task
    All,
    /// Uniformly random prefix length
    Uniform,
}

impl PolicyKind {
    fn build(self) -> Box<dyn CutoffPolicy> {
        match self {
            PolicyKind::Threshold => Box::new(UrgencyThreshold),
            PolicyKind::All => Box::new(DispatchAll),
            PolicyKind::Uniform => Box::new(UniformPrefix),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OracleKind {
    /// Held-Karp; fails on batches above 16 stops
    Exact,
    /// Nearest neighbour plus 2-opt
    TwoOpt,
    /// Exact for small batches, 2-opt beyond
    Hybrid,
}

impl OracleKind {
    fn build(self) -> Box<dyn RoutingOracle> {
        match self {
            OracleKind::Exact => Box::new(ExactOracle),
            OracleKind::TwoOpt => Box::new(TwoOptOracle::default()),
            OracleKind::Hybrid => Box::new(HybridOracle::default()),
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let oracle = cli.oracle.build();
    let policy = cli.policy.build();
    info!(
        robots = config.robot_count(),
        trials = config.num_trials,
        seed = config.sim.seed,
        oracle = oracle.name(),
        policy = policy.name(),
        "starting experiment"
    );

    let experiment = Experiment::new(config, oracle, policy)?;
    let started = Instant::now();

    if let Some(path) = &cli.tasks {
        let tasks = load_stream_csv(path)
            .with_context(|| format!("loading tasks from {}", path.display()))?;
        let trial = match &cli.output {
            Some(dir) => {
                let mut obs = SimOutputObserver::new(open_writer(&cli, dir)?);
                let trial = experiment.replay(&tasks, &mut obs)?;
                obs.finish()?;
                trial
            }
            None => experiment.replay(&tasks, &mut rd_sim::NoopObserver)?,
        };
        print_trial(&trial);
    } else {
        let summary = match &cli.output {
            Some(dir) => run_with_output(&experiment, open_writer(&cli, dir)?)?,
            None => experiment.run()?,
        };
        print_summary(&summary);
    }

    info!(elapsed_ms = started.elapsed().as_millis() as u64, "done");
    Ok(())
}

fn load_config(cli: &Cli) -> Result<ScenarioConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => ScenarioConfig::default(),
    };

    if let Some(seed) = cli.seed {
        config.sim.seed = seed;
    }
    if let Some(n) = cli.trials {
        config.num_trials = n;
    }
    if cli.no_coverage {
        config.coverage = None;
    }
    #[cfg(feature = "parallel")]
    if cli.threads.is_some() {
        config.sim.num_threads = cli.threads;
    }
    Ok(config)
}

// ── Output ────────────────────────────────────────────────────────────────────

fn open_writer(cli: &Cli, dir: &Path) -> Result<Box<dyn OutputWriter>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    #[cfg(feature = "sqlite")]
    if cli.sqlite {
        return Ok(Box::new(rd_output::SqliteWriter::new(dir)?));
    }
    #[cfg(not(feature = "sqlite"))]
    let _ = cli;

    Ok(Box::new(CsvWriter::new(dir)?))
}

fn run_with_output(
    experiment: &DynExperiment,
    writer:     Box<dyn OutputWriter>,
) -> Result<ExperimentSummary> {
    let mut obs = SimOutputObserver::new(writer);
    let summary = experiment.run_with(&mut obs)?;
    obs.finish()?;
    Ok(summary)
}

fn print_trial(trial: &TrialSummary) {
    println!("Trial {} ({} tasks)", trial.trial, trial.task_count);
    for r in &trial.fleet.robots {
        match r.average_weighted_wait() {
            Some(avg) => println!(
                "  {}: {:>4} tasks  {:>4} batches  average weighted wait {avg:.3}",
                r.robot, r.task_count, r.batches
            ),
            None => println!("  {}: no tasks", r.robot),
        }
    }
    match trial.average_weighted_wait() {
        Some(avg) => println!("  all tasks: average weighted wait {avg:.3}"),
        None => println!("  all tasks: none generated"),
    }
}

fn print_summary(summary: &ExperimentSummary) {
    println!("Anchors:");
    for (i, a) in summary.anchors.iter().enumerate() {
        println!("  robot {i}: {a}");
    }
    println!();
    for trial in &summary.trials {
        print_trial(trial);
    }
    println!();
    match summary.mean_average_weighted_wait() {
        Some(avg) => println!("Average over all trials: {avg:.3}"),
        None => println!("Average over all trials: no tasks"),
    }
}
