use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use u_tardiness::dp::{BudgetMode, DpConfig, DpResult, DpStatus, DpStrategy, SubsetScheduler};
use u_tardiness::eval::total_tardiness;
use u_tardiness::instance::{InstanceGenerator, InstanceLoader};

#[derive(Parser, Debug)]
#[command(
    name = "u-tardiness",
    version,
    about = "Exact single-machine total tardiness scheduling"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve an instance file to optimality.
    Solve {
        /// Path to the project file.
        file: PathBuf,

        /// Wall-clock budget in seconds.
        #[arg(long, default_value_t = 300)]
        time_limit_secs: u64,

        /// Stop as soon as the budget is reached instead of checking afterwards.
        #[arg(long)]
        cooperative: bool,

        #[arg(long, value_enum, default_value_t = StrategyArg::TopDown)]
        strategy: StrategyArg,

        /// Evaluate subset size classes in parallel (bottom-up only).
        #[arg(long)]
        parallel: bool,

        /// Also print an optimal job order.
        #[arg(long)]
        sequence: bool,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write a random instance in the project file format.
    Generate {
        #[arg(long, default_value_t = 10)]
        jobs: usize,

        #[arg(long)]
        seed: Option<u64>,

        #[arg(long, default_value_t = 1)]
        min_p: u64,

        #[arg(long, default_value_t = 100)]
        max_p: u64,

        /// Tardiness factor in [0, 1].
        #[arg(long, default_value_t = 0.4)]
        tau: f64,

        /// Relative due-date range.
        #[arg(long, default_value_t = 0.6)]
        range: f64,

        #[arg(long, default_value_t = 1)]
        teams: usize,

        /// Output file (stdout if omitted).
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Total tardiness of a given job order (0-based indices).
    Evaluate {
        file: PathBuf,

        #[arg(required = true, num_args = 1..)]
        order: Vec<usize>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    TopDown,
    BottomUp,
}

impl From<StrategyArg> for DpStrategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::TopDown => DpStrategy::TopDown,
            StrategyArg::BottomUp => DpStrategy::BottomUp,
        }
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
}

fn print_result(result: &DpResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }
    match result.status {
        DpStatus::Completed => {
            if let Some(value) = result.optimal_tardiness {
                println!("Optimal objective value: {}", value);
            }
            if let Some(ref seq) = result.sequence {
                println!("Optimal sequence: {:?}", seq);
            }
        }
        DpStatus::TimedOut => println!("Solution exceeded time limit."),
        DpStatus::Cancelled => println!("Solution cancelled."),
    }
    println!("Computation time: {:.2} seconds", result.elapsed_seconds());
    println!("Number of subsets considered: {}", result.subsets_evaluated);
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match cli.command {
        Command::Solve {
            file,
            time_limit_secs,
            cooperative,
            strategy,
            parallel,
            sequence,
            json,
        } => {
            let instance = InstanceLoader::new().from_path(&file)?;
            tracing::info!(
                "Solving {} with {} jobs",
                file.display(),
                instance.job_count()
            );

            let config = DpConfig::default()
                .with_time_limit_ms(time_limit_secs.saturating_mul(1000))
                .with_budget_mode(if cooperative {
                    BudgetMode::Cooperative
                } else {
                    BudgetMode::PostHoc
                })
                .with_strategy(strategy.into())
                .with_parallel(parallel)
                .with_sequence(sequence);

            let result = SubsetScheduler::with_config(&instance, config)?.solve();
            print_result(&result, json)?;

            Ok(match result.status {
                DpStatus::Completed => ExitCode::SUCCESS,
                DpStatus::TimedOut | DpStatus::Cancelled => ExitCode::from(2),
            })
        }
        Command::Generate {
            jobs,
            seed,
            min_p,
            max_p,
            tau,
            range,
            teams,
            out,
        } => {
            let mut generator = InstanceGenerator::default()
                .with_jobs(jobs)
                .with_processing_time_range(min_p, max_p)
                .with_tardiness_factor(tau)
                .with_due_date_range(range);
            if let Some(seed) = seed {
                generator = generator.with_seed(seed);
            }
            let instance = generator.generate()?.with_team_count(teams);

            match out {
                Some(path) => {
                    let mut w = BufWriter::new(File::create(&path)?);
                    instance.write_to(&mut w)?;
                    w.flush()?;
                    tracing::info!("Wrote {} jobs to {}", instance.job_count(), path.display());
                }
                None => instance.write_to(io::stdout().lock())?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Evaluate { file, order } => {
            let instance = InstanceLoader::new().from_path(&file)?;
            let value = total_tardiness(&instance, &order)?;
            println!("Total tardiness: {}", value);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    enable_tracing();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
