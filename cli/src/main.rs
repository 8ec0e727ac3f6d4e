use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use chromatic_core::validation::{parse_algorithms, EntryStatus};
use chromatic_core::{
    AlgorithmId, BenchmarkSequence, ColoringEngine, EngineOptions, RunEvent, RunRequest,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "chromatic")]
#[command(about = "Chromatic - graph-coloring solver observatory", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one strategy and stream its events as JSON lines
    Run {
        /// Request file (`-` for stdin)
        #[arg(short, long)]
        request: PathBuf,

        /// Override the request's algorithm
        #[arg(short, long)]
        algorithm: Option<String>,

        /// Override the time limit in seconds
        #[arg(short, long)]
        time_limit: Option<f64>,

        /// Pause after each progress event, in milliseconds
        #[arg(long, env = "CHROMATIC_PACING_MS")]
        pacing_ms: Option<u64>,

        /// Watchdog slack past the time limit, in milliseconds
        #[arg(long, default_value_t = 2_000)]
        grace_ms: u64,

        /// Only print the terminal event
        #[arg(long)]
        quiet: bool,
    },

    /// Run several strategies one after another on the same graph
    Bench {
        /// Request file (`-` for stdin); its algorithm field is ignored
        #[arg(short, long)]
        request: PathBuf,

        /// Comma-separated algorithm identifiers; all when omitted
        #[arg(short, long)]
        algorithms: Option<String>,

        /// Idle time between runs, in milliseconds
        #[arg(long, default_value_t = 500)]
        pause_ms: u64,

        #[arg(short, long, value_enum, default_value = "pretty")]
        output: OutputFormat,
    },

    /// List algorithm identifiers
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();

    match execute(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Run {
            request,
            algorithm,
            time_limit,
            pacing_ms,
            grace_ms,
            quiet,
        } => {
            let mut request = load_request(&request)?;
            if let Some(algorithm) = algorithm {
                request.algorithm = algorithm;
            }
            if let Some(seconds) = time_limit {
                request.params.time_limit = seconds;
            }

            let options = EngineOptions {
                pacing: pacing_ms.map(Duration::from_millis),
                grace_period: Duration::from_millis(grace_ms),
                ..EngineOptions::default()
            };
            run(request, options, quiet)
        }
        Commands::Bench {
            request,
            algorithms,
            pause_ms,
            output,
        } => {
            let request = load_request(&request)?;
            let algorithms = match algorithms {
                Some(list) => parse_algorithms(&list)?,
                None => AlgorithmId::ALL.to_vec(),
            };
            bench(request, algorithms, Duration::from_millis(pause_ms), output)
        }
        Commands::List => {
            for id in AlgorithmId::ALL {
                println!("{:<20} {}", id.as_str(), id.display_name());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_request(path: &PathBuf) -> Result<RunRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("Request is not a valid run request")
}

fn run(request: RunRequest, options: EngineOptions, quiet: bool) -> Result<ExitCode> {
    let engine = ColoringEngine::new(options);
    let handle = engine.spawn(request);
    info!("Run {} started", handle.id());

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut code = ExitCode::FAILURE;

    for event in handle {
        let terminal = event.is_terminal();
        if terminal {
            if let RunEvent::Done { status, .. } = &event {
                if status.is_success() {
                    code = ExitCode::SUCCESS;
                }
            }
        }
        if terminal || !quiet {
            write_line(&mut out, &event)?;
        }
    }

    out.flush()?;
    Ok(code)
}

fn bench(
    request: RunRequest,
    algorithms: Vec<AlgorithmId>,
    pause: Duration,
    output: OutputFormat,
) -> Result<ExitCode> {
    let sequence = BenchmarkSequence::new(algorithms, EngineOptions::benchmark()).with_pause(pause);
    let entries = sequence.run(&request.graph, &request.params);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    match output {
        OutputFormat::Json => write_line(&mut out, &entries)?,
        OutputFormat::Pretty => {
            writeln!(out, "{:<26} {:>12} {:>8}  Status", "Algorithm", "Time (ms)", "Colors")?;
            for entry in &entries {
                let status = match &entry.status {
                    EntryStatus::Finished(status) => status.to_string(),
                    EntryStatus::Errored { error } => format!("Error: {}", error),
                };
                writeln!(
                    out,
                    "{:<26} {:>12.1} {:>8}  {}",
                    entry.name, entry.elapsed_ms, entry.colors_used, status
                )?;
            }
        }
    }
    out.flush()?;

    let all_finished = entries
        .iter()
        .all(|entry| matches!(entry.status, EntryStatus::Finished(_)));
    Ok(if all_finished {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn write_line<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    out.write_all(b"\n")?;
    Ok(())
}
