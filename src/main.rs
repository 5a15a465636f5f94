#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use shift_roster::data::{DEFAULT_CREW_SIZE, ShiftKind, Worker};
use shift_roster::validate::{audit, recorded_extra_days};
use shift_roster::{RosterConfig, RosterOutcome, RosterPlan, SolveOptions, io, pipeline, server};

/// Four-week two-shift roster generator
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a new roster and write it as JSON
    Generate(GenerateArgs),

    /// Audit the staffing rules of an existing schedule
    Check {
        #[arg(long)]
        schedule: PathBuf,
    },

    /// Serve roster generation over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// `*workers.json` worker list and/or a previous schedule `*.json`
    files: Vec<PathBuf>,
    #[arg(long)]
    workers: Option<PathBuf>,
    #[arg(long)]
    previous: Option<PathBuf>,
    #[arg(long, default_value = "schedule.json")]
    out: PathBuf,
    /// Fixes extra-staffing picks and solver tie-breaking
    #[arg(long)]
    seed: Option<u64>,
    /// Date of day 0 (YYYY-MM-DD), defaults to today
    #[arg(long)]
    start_date: Option<NaiveDate>,
    #[arg(long, default_value_t = 4)]
    weeks: usize,
    /// Solver time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,
    #[arg(long)]
    solver_log: bool,
}

fn generate(args: GenerateArgs) -> Result<ExitCode> {
    let GenerateArgs {
        files,
        workers,
        previous,
        out,
        seed,
        start_date,
        weeks,
        time_limit,
        solver_log,
    } = args;
    io::check_weeks(Path::new("--weeks"), weeks)?;
    let inputs = io::classify_inputs(&files)?;
    let workers_path = workers.or(inputs.workers);
    let previous_path = previous.or(inputs.previous);

    // inputs are validated before any model work
    let names = match &workers_path {
        Some(path) => io::load_workers(path)
            .with_context(|| format!("reading workers from {}", path.display()))?,
        None => Worker::default_names(DEFAULT_CREW_SIZE),
    };
    let previous = previous_path
        .as_ref()
        .map(|path| {
            io::load_schedule(path)
                .with_context(|| format!("reading previous schedule from {}", path.display()))
        })
        .transpose()?;

    let start_date = start_date.unwrap_or_else(|| Local::now().date_naive());
    let mut plan = RosterPlan::new(&names, start_date)
        .with_config(RosterConfig::default().with_weeks(weeks));
    if let Some(previous) = &previous {
        plan = plan.with_previous(previous);
    }
    let options = SolveOptions {
        seed,
        time_limit,
        solver_log,
        ..SolveOptions::default()
    };

    let roster = match pipeline::run(&plan, &options)? {
        RosterOutcome::Generated(roster) => roster,
        RosterOutcome::Infeasible { .. } => {
            println!("No feasible solution found.");
            return Ok(ExitCode::from(2));
        }
    };

    let saved = pipeline::save_if_clean(&roster, &out)
        .with_context(|| format!("writing {}", out.display()))?;
    if saved {
        println!("Schedule generated and saved to '{}'.", out.display());
    } else {
        println!("Schedule failed validation and was not saved.");
    }
    println!("\nExtra staffing days for {} shift are on:", ShiftKind::Late);
    for day in &roster.extra_days {
        println!("{day}");
    }
    println!("\n{}", roster.report);

    Ok(if saved { ExitCode::SUCCESS } else { ExitCode::from(2) })
}

fn check(path: PathBuf) -> Result<ExitCode> {
    let schedule = io::load_schedule(&path)?;
    let config = RosterConfig::default();
    let extra_days = recorded_extra_days(&config, &schedule);
    let violations = audit(&config, &schedule, &extra_days);
    if violations.is_empty() {
        println!("OK: no staffing violations");
        return Ok(ExitCode::SUCCESS);
    }
    eprintln!("Found {} violation(s)", violations.len());
    for v in &violations {
        println!("ERROR: {v}");
    }
    Ok(ExitCode::from(2))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Generate(args) => generate(args),
        Commands::Check { schedule } => check(schedule),
        Commands::Serve { addr } => {
            info!("Starting roster server on {addr}");
            server::run_server(addr).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
