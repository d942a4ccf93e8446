//! Batch simulation CLI.
//!
//! Plays games with the Japanese autoplay doctrine and writes one JSON record
//! per game, followed by a summary on stderr.
//!
//! Usage:
//!   cargo run --release --bin simulate -- --games 500 --seed 7 --output runs.jsonl

use std::fs::File;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use kido_butai::scenario;
use kido_butai::simulate::{run_simulation, summarize, write_jsonl, SimulationConfig};

/// Kido Butai batch simulator - autoplay games and report outcomes
#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Play Midway games with the Japanese autoplay doctrine and report the results")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Base random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Scenario to start from (STANDARD_MORNING, FATEFUL_FIVE, HIRYU_REVENGE)
    #[arg(long)]
    scenario: Option<String>,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<String>,

    /// Suppress per-game progress and the summary
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Some(id) = &args.scenario {
        if scenario::find(id).is_none() {
            tracing::error!(scenario = %id, "unknown scenario");
            return ExitCode::FAILURE;
        }
    }

    let config = SimulationConfig {
        num_games: args.games,
        threads: args.threads.max(1),
        seed: args.seed,
        scenario: args.scenario,
        quiet: args.quiet,
    };

    let start = Instant::now();
    let games = match run_simulation(&config) {
        Ok(games) => games,
        Err(e) => {
            tracing::error!("simulation failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let written = match &args.output {
        Some(path) => File::create(path)
            .and_then(|f| write_jsonl(&games, &mut BufWriter::new(f))),
        None => write_jsonl(&games, &mut BufWriter::new(io::stdout().lock())),
    };
    if let Err(e) = written {
        tracing::error!("failed to write results: {}", e);
        return ExitCode::FAILURE;
    }

    if !args.quiet {
        eprint!("{}", summarize(&games));
        eprintln!("Total time: {:.1}s", start.elapsed().as_secs_f64());
    }
    ExitCode::SUCCESS
}
