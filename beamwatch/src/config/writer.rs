//! Serialization of `ConfigFile` back to INI text.
//!
//! Key names here must stay in sync with `parser.rs`; the round-trip test
//! at the bottom keeps them honest.

use super::settings::ConfigFile;
use std::fmt::Write;

/// Render a complete config.ini for the given configuration.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let mut out = String::new();

    // Infallible for String; unwraps via expect would just add noise.
    let _ = writeln!(out, "[telemetry]");
    let _ = writeln!(out, "host = {}", config.telemetry.host);
    let _ = writeln!(out, "port = {}", config.telemetry.port);
    let _ = writeln!(out, "read_timeout_ms = {}", config.telemetry.read_timeout_ms);
    let _ = writeln!(out);

    let _ = writeln!(out, "[broker]");
    let _ = writeln!(out, "host = {}", config.broker.host);
    let _ = writeln!(out, "port = {}", config.broker.port);
    let _ = writeln!(out, "username = {}", config.broker.username);
    let _ = writeln!(out, "password = {}", config.broker.password);
    let _ = writeln!(out, "vhost = {}", config.broker.vhost);
    let _ = writeln!(out);

    let _ = writeln!(out, "[metrics]");
    let _ = writeln!(out, "url = {}", config.metrics.url);
    let _ = writeln!(out, "database = {}", config.metrics.database);
    if let Some(username) = &config.metrics.username {
        let _ = writeln!(out, "username = {username}");
    }
    if let Some(password) = &config.metrics.password {
        let _ = writeln!(out, "password = {password}");
    }
    let _ = writeln!(out, "measurement = {}", config.metrics.measurement);
    let _ = writeln!(
        out,
        "write_timeout_secs = {}",
        config.metrics.write_timeout_secs
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "[controller]");
    let _ = writeln!(out, "tick_period_ms = {}", config.controller.tick_period_ms);
    let _ = writeln!(
        out,
        "debounce_window = {}",
        config.controller.debounce_window
    );
    let _ = writeln!(
        out,
        "expected_sig_source = {}",
        config.controller.expected_sig_source
    );
    let _ = writeln!(
        out,
        "expected_receiver_enabled = {}",
        config.controller.expected_receiver_enabled
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "[recorder]");
    let _ = writeln!(out, "program = {}", config.recorder.program.display());
    let _ = writeln!(out, "config_dir = {}", config.recorder.config_dir.display());
    if !config.recorder.extra_args.is_empty() {
        let _ = writeln!(out, "extra_args = {}", config.recorder.extra_args.join(" "));
    }
    if let Some(working_dir) = &config.recorder.working_dir {
        let _ = writeln!(out, "working_dir = {}", working_dir.display());
    }
    let _ = writeln!(
        out,
        "stop_timeout_secs = {}",
        config.recorder.stop_timeout_secs
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "[logging]");
    let _ = writeln!(out, "file = {}", config.logging.file.display());

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ini::Ini;
    use std::path::PathBuf;

    #[test]
    fn test_round_trip_preserves_values() {
        let mut config = ConfigFile::default();
        config.telemetry.host = "telemetry-node".to_string();
        config.controller.debounce_window = 20;
        config.controller.expected_sig_source = 0.0;
        config.recorder.extra_args = vec!["-p".into(), "empty".into()];
        config.metrics.username = Some("observer".to_string());
        config.metrics.password = Some("secret".to_string());
        config.recorder.working_dir = Some(PathBuf::from("/var/spool/recorder"));

        let text = to_config_string(&config);
        let ini = Ini::load_from_str(&text).unwrap();
        let parsed = super::super::parser::parse_ini(&ini).unwrap();

        assert_eq!(parsed.telemetry.host, config.telemetry.host);
        assert_eq!(
            parsed.controller.debounce_window,
            config.controller.debounce_window
        );
        assert_eq!(
            parsed.controller.expected_sig_source,
            config.controller.expected_sig_source
        );
        assert_eq!(parsed.recorder.extra_args, config.recorder.extra_args);
        assert_eq!(parsed.metrics.username, config.metrics.username);
        assert_eq!(parsed.recorder.working_dir, config.recorder.working_dir);
    }
}
