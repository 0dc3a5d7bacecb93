//! Immutable recorder launch specification.

use crate::config::RecorderSettings;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Launch specification for one beam's recorder process.
///
/// Built once from configuration at worker startup and never re-derived at
/// runtime; every (re)start of the recorder uses the same spec.
#[derive(Clone, Debug, PartialEq)]
pub struct RecorderSpec {
    program: PathBuf,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl RecorderSpec {
    /// Create a spec from a program and its fixed argument list.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: None,
        }
    }

    /// Set the working directory the recorder is launched in.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Build the spec for one beam from the `[recorder]` settings.
    ///
    /// The recorder is launched as
    /// `<program> --config <config_dir>/beam<N>.xml <extra_args...>`.
    pub fn for_beam(settings: &RecorderSettings, beam: u8) -> Self {
        let beam_config = settings.config_dir.join(format!("beam{beam}.xml"));
        let mut args = vec![
            "--config".to_string(),
            beam_config.to_string_lossy().into_owned(),
        ];
        args.extend(settings.extra_args.iter().cloned());

        let mut spec = Self::new(settings.program.clone(), args);
        if let Some(dir) = &settings.working_dir {
            spec = spec.with_working_dir(dir);
        }
        spec
    }

    /// The program path.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The fixed argument list.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Build a ready-to-spawn command for a fresh recorder process.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdin(Stdio::null());
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        // A handle dropped without an explicit stop must not leak the
        // process.
        command.kill_on_drop(true);
        command
    }
}
