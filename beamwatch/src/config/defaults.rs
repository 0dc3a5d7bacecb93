//! Default values and constants for all configuration settings.
//!
//! Contains all `DEFAULT_*` constants and the `ConfigFile::default()`
//! implementation.

use super::settings::*;
use std::path::PathBuf;

// =============================================================================
// Telemetry store
// =============================================================================

/// Default telemetry store host.
pub const DEFAULT_TELEMETRY_HOST: &str = "localhost";

/// Default telemetry store port.
pub const DEFAULT_TELEMETRY_PORT: u16 = 6379;

/// Default telemetry read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 2_000;

// =============================================================================
// Command broker
// =============================================================================

/// Default command broker host.
pub const DEFAULT_BROKER_HOST: &str = "localhost";

/// Default command broker port.
pub const DEFAULT_BROKER_PORT: u16 = 5672;

/// Default command broker virtual host.
pub const DEFAULT_BROKER_VHOST: &str = "/";

// =============================================================================
// Metrics sink
// =============================================================================

/// Default metrics database URL.
pub const DEFAULT_METRICS_URL: &str = "http://localhost:8086";

/// Default metrics database name.
pub const DEFAULT_METRICS_DATABASE: &str = "pointing";

/// Default measurement name for pointing records.
pub const DEFAULT_MEASUREMENT: &str = "telescope";

/// Default metrics write timeout in seconds.
pub const DEFAULT_WRITE_TIMEOUT_SECS: u64 = 5;

// =============================================================================
// Controller
// =============================================================================

/// Default sampling period in milliseconds.
pub const DEFAULT_TICK_PERIOD_MS: u64 = 1_000;

/// Default debounce window size in ticks.
pub const DEFAULT_DEBOUNCE_WINDOW: usize = 15;

/// Default expected signal-source flag value.
pub const DEFAULT_EXPECTED_SIG_SOURCE: f64 = 1.0;

/// Default expected receiver-enabled flag value.
pub const DEFAULT_EXPECTED_RECEIVER_ENABLED: f64 = 1.0;

// =============================================================================
// Recorder
// =============================================================================

/// Default recorder executable path.
pub const DEFAULT_RECORDER_PROGRAM: &str = "/usr/local/bin/beam-recorder";

/// Default directory of per-beam recorder config files.
pub const DEFAULT_RECORDER_CONFIG_DIR: &str = "/etc/beamwatch/recorder";

/// Default stop timeout in seconds.
pub const DEFAULT_STOP_TIMEOUT_SECS: u64 = 10;

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            telemetry: TelemetrySettings {
                host: DEFAULT_TELEMETRY_HOST.to_string(),
                port: DEFAULT_TELEMETRY_PORT,
                read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            },
            broker: BrokerSettings {
                host: DEFAULT_BROKER_HOST.to_string(),
                port: DEFAULT_BROKER_PORT,
                username: "guest".to_string(),
                password: "guest".to_string(),
                vhost: DEFAULT_BROKER_VHOST.to_string(),
            },
            metrics: MetricsSettings {
                url: DEFAULT_METRICS_URL.to_string(),
                database: DEFAULT_METRICS_DATABASE.to_string(),
                username: None,
                password: None,
                measurement: DEFAULT_MEASUREMENT.to_string(),
                write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            },
            controller: ControllerSettings {
                tick_period_ms: DEFAULT_TICK_PERIOD_MS,
                debounce_window: DEFAULT_DEBOUNCE_WINDOW,
                expected_sig_source: DEFAULT_EXPECTED_SIG_SOURCE,
                expected_receiver_enabled: DEFAULT_EXPECTED_RECEIVER_ENABLED,
            },
            recorder: RecorderSettings {
                program: PathBuf::from(DEFAULT_RECORDER_PROGRAM),
                config_dir: PathBuf::from(DEFAULT_RECORDER_CONFIG_DIR),
                extra_args: Vec::new(),
                working_dir: None,
                stop_timeout_secs: DEFAULT_STOP_TIMEOUT_SECS,
            },
            logging: LoggingSettings {
                file: PathBuf::from("logs/beamwatch.log"),
            },
        }
    }
}
