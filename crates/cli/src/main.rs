//! Multi-level cache simulator CLI.
//!
//! This binary replays a load/store trace through a cache hierarchy. It performs:
//! 1. **Configuration:** Reads the hierarchy from a `KEY:VALUE` file (or `.json`).
//! 2. **Replay:** Reads the whole trace, then replays it in order.
//! 3. **Report:** Prints per-level hits, misses, totals, and access time to stdout.
//!
//! Exit codes: 0 success, 1 usage error, 2 configuration error, 3 trace error.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::common::error::{SimError, exit_code};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven multi-level cache simulator",
    long_about = "Replay a load/store trace through a cache hierarchy and report per-level statistics.\n\nExamples:\n  cachesim hierarchy.conf trace.txt\n  cachesim hierarchy.json trace.txt --json\n  RUST_LOG=debug cachesim hierarchy.conf trace.txt"
)]
struct Cli {
    /// Hierarchy configuration (`KEY:VALUE` text, or JSON if the path ends in `.json`).
    config: PathBuf,

    /// Trace of `LD <addr>` / `ST <addr>` instructions.
    trace: PathBuf,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). Overridden by `RUST_LOG`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::OKAY
            };
            let _ = e.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}

/// Installs a stderr subscriber so stdout carries only the report.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the hierarchy, replays the trace, and prints the report.
fn run(cli: &Cli) -> Result<(), SimError> {
    debug!(config = %cli.config.display(), trace = %cli.trace.display(), "starting replay");
    let mut sim = Simulator::from_config_path(&cli.config)?;
    let _ = sim.run_path(&cli.trace)?;

    let report = sim.report();
    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: could not serialize report: {e}"),
        }
    } else {
        print!("{report}");
    }
    Ok(())
}
