//! Out-of-order backend simulator CLI.
//!
//! This binary provides a single entry point for running workloads through
//! the instruction queue simulator. It performs:
//! 1. **Run:** Load a JSON workload (and optional JSON config), simulate, print statistics.
//! 2. **Config dump:** Print the effective configuration as a starting point for edits.

use clap::{Parser, Subcommand};
use o3sim_core::common::SimError;
use o3sim_core::sim::Workload;
use o3sim_core::{Config, Simulator};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(
    name = "o3sim",
    author,
    version,
    about = "Out-of-order SMT backend simulator",
    long_about = "Run a renamed instruction stream through the out-of-order instruction queue.\n\n\
        Workloads are JSON files describing instructions with physical registers and\n\
        scheduling flags (non_spec, barrier, mispredict, wrong_path). Configuration\n\
        is JSON too; the CLI uses built-in defaults when none is given.\n\n\
        Examples:\n  \
        o3sim run -f workloads/chain.json\n  \
        o3sim run -f smt.json -c twothread.json --stats summary --stats issue\n  \
        RUST_LOG=o3sim_core=debug o3sim run -f chain.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a workload to completion (or a cycle limit) and print stats.
    Run {
        /// Workload JSON file.
        #[arg(short, long)]
        file: PathBuf,

        /// Machine configuration JSON file (defaults when omitted).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Stop after this many cycles even if the workload has not drained.
        #[arg(long, default_value_t = 1_000_000)]
        max_cycles: u64,

        /// Statistics sections to print (repeatable); all when omitted.
        #[arg(long)]
        stats: Vec<String>,
    },

    /// Print the effective configuration as JSON-ish debug output.
    Config {
        /// Machine configuration JSON file (defaults when omitted).
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            config,
            max_cycles,
            stats,
        } => cmd_run(file, config, max_cycles, stats),
        Commands::Config { config } => cmd_config(config),
    };

    if let Err(e) = result {
        eprintln!("o3sim: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config, SimError> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&text).map_err(|e| SimError::Parse(e.to_string()))?;
            config.validate()?;
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

/// Runs the simulator: loads workload and config, ticks to completion, and
/// prints the requested statistics sections.
fn cmd_run(
    file: PathBuf,
    config: Option<PathBuf>,
    max_cycles: u64,
    stats: Vec<String>,
) -> Result<(), SimError> {
    let config = load_config(config)?;
    let workload = Workload::from_file(&file)?;

    println!(
        "Machine: {} thread(s), {} IQ entries ({:?}), issue width {}",
        config.num_threads, config.iq.num_entries, config.iq.policy, config.iq.issue_width
    );
    println!("Workload: {} instruction(s) from {}", workload.insts.len(), file.display());

    let mut simulator = Simulator::new(config, workload)?;
    let summary = simulator.run(max_cycles);

    if !summary.drained {
        eprintln!(
            "warning: cycle limit {} reached before the workload drained",
            max_cycles
        );
    }
    println!(
        "\nRetired {} instruction(s) in {} cycle(s)",
        summary.committed, summary.cycles
    );
    simulator.iq_stats().print_sections(&stats);
    Ok(())
}

/// Prints the effective configuration.
fn cmd_config(config: Option<PathBuf>) -> Result<(), SimError> {
    let config = load_config(config)?;
    println!("{:#?}", config);
    Ok(())
}
