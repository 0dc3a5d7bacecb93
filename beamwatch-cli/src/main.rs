//! BeamWatch CLI - Command-line interface
//!
//! This binary provides a command-line interface to the BeamWatch library:
//! the central pointing monitor daemon and the per-beam recorder workers.

use clap::{Parser, Subcommand};

mod commands;
mod error;
mod runner;

use error::CliError;

#[derive(Parser)]
#[command(name = "beamwatch")]
#[command(version = beamwatch::VERSION)]
#[command(about = "Pointing-driven recording control for a multi-beam receiver", long_about = None)]
struct Cli {
    /// Be verbose (debug-level logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the central pointing monitor: sample telemetry, debounce
    /// validity, and broadcast start/stop to every beam channel
    Monitor,

    /// Run one beam's recorder worker
    Record {
        /// Beam number to record
        #[arg(short, long, default_value_t = 0)]
        beam: u8,

        /// Drive the recorder from stdin instead of the command channel
        #[arg(long)]
        manual: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Monitor => commands::monitor::run(cli.verbose),
        Commands::Record { beam, manual } => commands::record::run(commands::record::RecordArgs {
            beam,
            manual,
            verbose: cli.verbose,
        }),
    };

    if let Err(error) = result {
        error.exit();
    }
}
