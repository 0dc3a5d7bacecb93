//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [telemetry] section
    if let Some(section) = ini.section(Some("telemetry")) {
        if let Some(v) = section.get("host") {
            set_string(&mut config.telemetry.host, v);
        }
        if let Some(v) = section.get("port") {
            config.telemetry.port = parse_value(v, "telemetry", "port", "must be a port number")?;
        }
        if let Some(v) = section.get("read_timeout_ms") {
            config.telemetry.read_timeout_ms = parse_value(
                v,
                "telemetry",
                "read_timeout_ms",
                "must be a positive integer (milliseconds)",
            )?;
        }
    }

    // [broker] section
    if let Some(section) = ini.section(Some("broker")) {
        if let Some(v) = section.get("host") {
            set_string(&mut config.broker.host, v);
        }
        if let Some(v) = section.get("port") {
            config.broker.port = parse_value(v, "broker", "port", "must be a port number")?;
        }
        if let Some(v) = section.get("username") {
            set_string(&mut config.broker.username, v);
        }
        if let Some(v) = section.get("password") {
            set_string(&mut config.broker.password, v);
        }
        if let Some(v) = section.get("vhost") {
            set_string(&mut config.broker.vhost, v);
        }
    }

    // [metrics] section
    if let Some(section) = ini.section(Some("metrics")) {
        if let Some(v) = section.get("url") {
            set_string(&mut config.metrics.url, v);
        }
        if let Some(v) = section.get("database") {
            set_string(&mut config.metrics.database, v);
        }
        if let Some(v) = section.get("username") {
            let v = v.trim();
            if !v.is_empty() {
                config.metrics.username = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("password") {
            let v = v.trim();
            if !v.is_empty() {
                config.metrics.password = Some(v.to_string());
            }
        }
        if let Some(v) = section.get("measurement") {
            set_string(&mut config.metrics.measurement, v);
        }
        if let Some(v) = section.get("write_timeout_secs") {
            config.metrics.write_timeout_secs = parse_value(
                v,
                "metrics",
                "write_timeout_secs",
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [controller] section
    if let Some(section) = ini.section(Some("controller")) {
        if let Some(v) = section.get("tick_period_ms") {
            config.controller.tick_period_ms = parse_value(
                v,
                "controller",
                "tick_period_ms",
                "must be a positive integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("debounce_window") {
            let window: usize = parse_value(
                v,
                "controller",
                "debounce_window",
                "must be a positive integer (ticks)",
            )?;
            if window == 0 {
                return Err(ConfigFileError::InvalidValue {
                    section: "controller".to_string(),
                    key: "debounce_window".to_string(),
                    value: v.to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config.controller.debounce_window = window;
        }
        if let Some(v) = section.get("expected_sig_source") {
            config.controller.expected_sig_source = parse_value(
                v,
                "controller",
                "expected_sig_source",
                "must be a number (flag value)",
            )?;
        }
        if let Some(v) = section.get("expected_receiver_enabled") {
            config.controller.expected_receiver_enabled = parse_value(
                v,
                "controller",
                "expected_receiver_enabled",
                "must be a number (flag value)",
            )?;
        }
    }

    // [recorder] section
    if let Some(section) = ini.section(Some("recorder")) {
        if let Some(v) = section.get("program") {
            let v = v.trim();
            if !v.is_empty() {
                config.recorder.program = PathBuf::from(v);
            }
        }
        if let Some(v) = section.get("config_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.recorder.config_dir = PathBuf::from(v);
            }
        }
        if let Some(v) = section.get("extra_args") {
            config.recorder.extra_args = v.split_whitespace().map(String::from).collect();
        }
        if let Some(v) = section.get("working_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.recorder.working_dir = Some(PathBuf::from(v));
            }
        }
        if let Some(v) = section.get("stop_timeout_secs") {
            config.recorder.stop_timeout_secs = parse_value(
                v,
                "recorder",
                "stop_timeout_secs",
                "must be a positive integer (seconds)",
            )?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = PathBuf::from(v);
            }
        }
    }

    Ok(config)
}

fn set_string(target: &mut String, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *target = value.to_string();
    }
}

fn parse_value<T: FromStr>(
    value: &str,
    section: &str,
    key: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value.trim().parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    })
}
