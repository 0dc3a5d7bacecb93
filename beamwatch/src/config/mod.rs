//! Configuration for BeamWatch components.
//!
//! Deployment configuration lives in `~/.beamwatch/config.ini`, one
//! `[section]` per concern. The module is split the same way the data
//! flows:
//!
//! - [`settings`](self) - pure data structs, one per section
//! - `defaults` - all `DEFAULT_*` constants and the `Default` impl
//! - `parser` - INI → structs, the single place key names are mapped
//! - `writer` - structs → INI text
//! - `file` - load/save plus the error type

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_file_path, ConfigFileError};
pub use settings::{
    BrokerSettings, ConfigFile, ControllerSettings, LoggingSettings, MetricsSettings,
    RecorderSettings, TelemetrySettings,
};
