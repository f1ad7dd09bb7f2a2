//! roadhawkes — command-line front end for the pipeline.
//!
//! Purpose
//! -------
//! Load the event and road files, resolve the temporal window and the fit
//! parameters, run the pipeline synchronously, and print the evaluation
//! report and the diagnostic artifact paths.
//!
//! Key behaviors
//! -------------
//! - Window dates may be omitted entirely; the span of the loaded events
//!   then suggests a window (first year training, the remainder held out).
//!   Partial date sets are rejected rather than half-guessed.
//! - The learning rate and step count arrive as text and pass through the
//!   same validation library callers use.
//! - Log output goes to stderr by default; `--log-file` redirects it to a
//!   file for post-mortem inspection.
//!
//! Invariants & assumptions
//! ------------------------
//! - File loads happen here, on the caller's path, before the run starts;
//!   the orchestrator never sees a path to event or road data.
//! - A failed run exits non-zero after printing the terminal error.
use std::{error::Error, fs::File, path::PathBuf, process::ExitCode, sync::Mutex};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use roadhawkes::{
    events::{load_events, load_roads, DAY_FIRST_FORMAT},
    inputs::{
        suggest_window, FitConfig, TemporalWindow, DEFAULT_LEARNING_RATE, DEFAULT_NUM_STEPS,
    },
    model::HawkesEngine,
    pipeline::{Orchestrator, RunOptions},
    spatial::DEFAULT_MARGIN_DEGREES,
};

/// Fit a road-constrained spatio-temporal Hawkes model to crime events and
/// score it on a held-out period.
#[derive(Parser, Debug)]
#[command(name = "roadhawkes", version, about)]
struct Cli {
    /// Event GeoJSON file (`Fecha`, `Long`, `Lat` properties per feature).
    #[arg(long)]
    events: PathBuf,

    /// Road-network GeoJSON file (line or polygon features).
    #[arg(long)]
    roads: PathBuf,

    /// Training window start, `dd/mm/yyyy`.
    #[arg(long)]
    train_start: Option<String>,

    /// Training window end, `dd/mm/yyyy`.
    #[arg(long)]
    train_end: Option<String>,

    /// Evaluation window start, `dd/mm/yyyy`.
    #[arg(long)]
    test_start: Option<String>,

    /// Evaluation window end, `dd/mm/yyyy`.
    #[arg(long)]
    test_end: Option<String>,

    /// Optimizer learning rate.
    #[arg(long, default_value_t = DEFAULT_LEARNING_RATE.to_string())]
    learning_rate: String,

    /// Optimizer step count.
    #[arg(long, default_value_t = DEFAULT_NUM_STEPS.to_string())]
    num_steps: String,

    /// Buffer margin around road features, in degrees.
    #[arg(long, default_value_t = DEFAULT_MARGIN_DEGREES)]
    margin: f64,

    /// Directory the diagnostic SVGs are written to.
    #[arg(long = "out", default_value = "diagnostics")]
    out_dir: PathBuf,

    /// Cells per axis for the spatial intensity surface.
    #[arg(long, default_value_t = 64)]
    grid_resolution: usize,

    /// Redirect log output to a file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.log_file.as_deref()) {
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .map_err(|err| format!("cannot open log file {}: {err}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let catalog = load_events(&cli.events)?;
    let roads = load_roads(&cli.roads)?;

    let window = resolve_window(&cli, &catalog)?;
    let config = FitConfig::parse(&cli.learning_rate, &cli.num_steps)?;
    let options = RunOptions {
        margin: cli.margin,
        out_dir: cli.out_dir.clone(),
        grid_resolution: cli.grid_resolution,
    };

    let orchestrator = Orchestrator::new(HawkesEngine::default());
    let report = orchestrator.run(&catalog, &roads, &window, &config, &options)?;

    println!(
        "Fitted {} training events ({} iterations, {}).",
        report.fit.num_events, report.fit.iterations, report.fit.status
    );
    println!("Evaluated {} held-out events.", report.evaluation_events);
    println!("{}", report.evaluation);
    println!("Diagnostics:");
    for artifact in &report.artifacts {
        println!("  {}", artifact.display());
    }
    Ok(())
}

// All four dates, or none; a partial set is an error rather than a guess.
fn resolve_window(
    cli: &Cli, catalog: &roadhawkes::events::EventCatalog,
) -> Result<TemporalWindow, Box<dyn Error>> {
    match (&cli.train_start, &cli.train_end, &cli.test_start, &cli.test_end) {
        (Some(train_start), Some(train_end), Some(test_start), Some(test_end)) => {
            Ok(TemporalWindow::parse(train_start, train_end, test_start, test_end)?)
        }
        (None, None, None, None) => {
            let window = suggest_window(catalog).ok_or(
                "the event dates span too few days to suggest a window; \
                 pass --train-start/--train-end/--test-start/--test-end explicitly",
            )?;
            println!(
                "Using suggested window: training {} to {}, evaluation {} to {}.",
                window.training_start().format(DAY_FIRST_FORMAT),
                window.training_end().format(DAY_FIRST_FORMAT),
                window.test_start().format(DAY_FIRST_FORMAT),
                window.test_end().format(DAY_FIRST_FORMAT),
            );
            Ok(window)
        }
        _ => Err("window dates must be given all together or not at all".into()),
    }
}
