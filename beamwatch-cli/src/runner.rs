//! CLI runner for common setup and operations.
//!
//! Encapsulates config loading and logging initialization to reduce
//! duplication across command handlers.

use crate::error::CliError;
use beamwatch::config::ConfigFile;
use beamwatch::logging::{init_logging, LoggingGuard};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner with optional verbose logging.
    ///
    /// Loads the config file (creating it with defaults on first run) and
    /// initializes logging to the file named there plus stdout.
    pub fn with_verbose(verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load().map_err(|e| CliError::Config(e.to_string()))?;

        let log_path = &config.logging.file;
        let log_dir = log_path
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let log_file = log_path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| beamwatch::logging::default_log_file().to_string());

        let logging_guard = init_logging(&log_dir, &log_file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("BeamWatch v{}", beamwatch::VERSION);
        info!("BeamWatch CLI: {} command", command);
    }
}
