//! Configuration file handling for ~/.beamwatch/config.ini.
//!
//! Loads and saves user configuration with sensible defaults.
//! Settings structs live in [`super::settings`], constants in
//! [`super::defaults`], parsing in `super::parser`, and serialization in
//! `super::writer`.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::settings::ConfigFile;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

/// Path of the user configuration file (~/.beamwatch/config.ini).
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".beamwatch")
        .join("config.ini")
}

impl ConfigFile {
    /// Load configuration from the default path (~/.beamwatch/config.ini).
    ///
    /// If the file doesn't exist, creates it with defaults so operators have
    /// something to edit.
    pub fn load() -> Result<Self, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            let config = Self::default();
            config.save_to(&path)?;
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to the default path (~/.beamwatch/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        let path = config_file_path();
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("beamwatch_test_{nanos}_{name}"))
    }

    #[test]
    fn test_load_from_missing_file_returns_defaults() {
        let path = unique_temp_path("missing.ini");
        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.controller.debounce_window, 15);
    }

    #[test]
    fn test_save_and_reload() {
        let path = unique_temp_path("roundtrip.ini");

        let mut config = ConfigFile::default();
        config.broker.host = "headnode".to_string();
        config.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded.broker.host, "headnode");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_config_file_path_is_under_home() {
        let path = config_file_path();
        assert!(path.ends_with(".beamwatch/config.ini"));
    }
}
