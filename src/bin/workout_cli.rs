use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use workout_trainer::config::{AppConfig, WorkoutConfig};
use workout_trainer::exercise::ExerciseKind;
use workout_trainer::replay::synth::{synthesize, SynthOptions};
use workout_trainer::replay::{ExpectationDiff, ReplayReport, TraceCatalog, TraceRunner};

#[derive(Parser, Debug)]
#[command(
    name = "workout_cli",
    about = "Deterministic trace replay harness for the workout trainer"
)]
struct Cli {
    /// Override directory containing trace assets (defaults to fixtures/)
    #[arg(long)]
    traces_dir: Option<PathBuf>,
    /// JSON configuration file (defaults are used when absent or invalid)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded trace and optionally compare against expectations
    Replay {
        #[arg(long)]
        trace: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate a seeded synthetic trace and replay it
    Simulate {
        #[arg(long, default_value = "sit-up")]
        exercise: ExerciseKind,
        #[arg(long, default_value_t = 2)]
        sets: u32,
        #[arg(long, default_value_t = 5)]
        reps: u32,
        #[arg(long, default_value_t = 5.0)]
        margin: f32,
        /// Reps to perform before stopping (defaults to the full workout)
        #[arg(long)]
        performed: Option<u32>,
        #[arg(long, default_value_t = 1.5)]
        noise: f32,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        /// Write the generated trace JSON here
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List available traces on disk
    DumpTraces,
}

fn main() -> ExitCode {
    workout_trainer::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let catalog = cli
        .traces_dir
        .map(TraceCatalog::new)
        .unwrap_or_else(TraceCatalog::default);
    let config = cli
        .config
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Replay {
            trace,
            expect,
            output,
        } => run_replay(&catalog, config, &trace, expect, output),
        Commands::Simulate {
            exercise,
            sets,
            reps,
            margin,
            performed,
            noise,
            seed,
            save,
        } => {
            let workout = WorkoutConfig::new(sets, reps, margin)
                .with_calories_per_rep(config.workout.calories_per_rep);
            let mut options = SynthOptions::new(exercise, workout);
            options.reps_performed = performed.unwrap_or(options.reps_performed);
            options.noise_degrees = noise;
            options.seed = seed;
            run_simulate(config, &options, save)
        }
        Commands::DumpTraces => run_dump(&catalog),
    }
}

fn run_replay(
    catalog: &TraceCatalog,
    config: AppConfig,
    trace: &str,
    override_expect: Option<PathBuf>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog.load(trace, override_expect)?;
    let report = TraceRunner::new(config)
        .run_data(&data)
        .with_context(|| format!("replaying trace {}", trace))?;

    emit_report(&report, output_path)?;

    if let Some(expectations) = data.expectations {
        match expectations.verify(&report) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        }
    } else {
        Ok(ExitCode::from(0))
    }
}

fn run_simulate(
    config: AppConfig,
    options: &SynthOptions,
    save_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let trace = synthesize(options)?;
    if let Some(path) = save_path {
        let json = serde_json::to_string_pretty(&trace)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    }

    let report = TraceRunner::new(config)
        .run("synthetic", &trace)
        .context("replaying synthetic trace")?;
    emit_report(&report, None)?;
    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &TraceCatalog) -> Result<ExitCode> {
    let traces = catalog.discover()?;
    if traces.is_empty() {
        println!("No traces found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in traces {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(report: &ReplayReport, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}
