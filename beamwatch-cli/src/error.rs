//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use beamwatch::command::TransportError;
use beamwatch::metrics::MetricsError;
use beamwatch::telemetry::{TelemetryError, NUM_BEAMS};
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the async runtime
    Runtime(String),
    /// Telemetry store settings could not be used
    Telemetry(TelemetryError),
    /// Metrics sink settings could not be used
    Metrics(MetricsError),
    /// Command broker could not be reached at startup
    Broker(TransportError),
    /// Requested beam does not exist on this receiver
    InvalidBeam { beam: u8 },
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Broker(_) => {
                eprintln!();
                eprintln!("Daemon mode cannot run without the command broker. Make sure:");
                eprintln!("  1. The broker is running and reachable from this node");
                eprintln!("  2. [broker] host/port/credentials in config.ini are correct");
                eprintln!("  3. The configured vhost exists and the user may access it");
            }
            CliError::InvalidBeam { .. } => {
                eprintln!();
                eprintln!("This receiver has beams 0 through {}.", NUM_BEAMS - 1);
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(msg) => write!(f, "Failed to start async runtime: {}", msg),
            CliError::Telemetry(e) => write!(f, "Telemetry store error: {}", e),
            CliError::Metrics(e) => write!(f, "Metrics sink error: {}", e),
            CliError::Broker(e) => write!(f, "Command broker unavailable: {}", e),
            CliError::InvalidBeam { beam } => write!(f, "No such beam: {}", beam),
        }
    }
}
