//! The per-beam recorder supervisor state machine.

use super::spec::RecorderSpec;
use crate::command::Command;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Child;
use tracing::{debug, info, warn};

/// Lifecycle state of the supervised recorder process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecorderState {
    /// No process; ready to start.
    Stopped,
    /// A recorder process is (believed to be) running.
    Running,
    /// The last start or stop failed; the next start retries from scratch.
    Failed,
}

/// Errors from supervisor transitions.
///
/// Every error leaves the supervisor in [`RecorderState::Failed`] with no
/// process handle, so the caller only needs to log and keep consuming
/// commands; the next start retries.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// Spawning the recorder failed.
    #[error("failed to launch recorder: {0}")]
    Launch(#[source] std::io::Error),

    /// Killing the recorder failed.
    #[error("failed to terminate recorder: {0}")]
    Terminate(#[source] std::io::Error),

    /// The recorder did not exit within the stop timeout.
    #[error("recorder did not exit within {timeout:?}")]
    StopTimeout { timeout: Duration },
}

/// Supervises the lifecycle of one beam's external recorder process.
///
/// Owns at most one [`Child`] at a time; a handle exists iff the state is
/// [`RecorderState::Running`]. The underlying process primitive cannot
/// resume a stopped process, so every stop discards the handle and every
/// start spawns a fresh process from the immutable [`RecorderSpec`].
///
/// A recorder that exits on its own while `Running` is not detected here —
/// there is no health-check loop. The mismatch is corrected by the next
/// stop/start cycle driven by the pointing decision.
#[derive(Debug)]
pub struct RecorderSupervisor {
    beam: u8,
    spec: RecorderSpec,
    stop_timeout: Duration,
    state: RecorderState,
    child: Option<Child>,
}

impl RecorderSupervisor {
    /// Create a supervisor in the `Stopped` state.
    pub fn new(beam: u8, spec: RecorderSpec, stop_timeout: Duration) -> Self {
        Self {
            beam,
            spec,
            stop_timeout,
            state: RecorderState::Stopped,
            child: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// OS process id of the active recorder, if one is running.
    pub fn process_id(&self) -> Option<u32> {
        self.child.as_ref().and_then(Child::id)
    }

    /// Apply one command, returning the resulting state.
    pub async fn apply(&mut self, command: Command) -> Result<RecorderState, SupervisorError> {
        match command {
            Command::Start => self.start(),
            Command::Stop => self.stop().await,
        }
    }

    /// Launch a fresh recorder process unless one is already running.
    ///
    /// Spawning reports failure synchronously, so no timeout is needed on
    /// this side of the state machine.
    fn start(&mut self) -> Result<RecorderState, SupervisorError> {
        if self.state == RecorderState::Running {
            debug!(beam = self.beam, "start ignored, recorder already running");
            return Ok(RecorderState::Running);
        }

        match self.spec.command().spawn() {
            Ok(child) => {
                info!(
                    beam = self.beam,
                    pid = child.id(),
                    program = %self.spec.program().display(),
                    "recorder started"
                );
                self.child = Some(child);
                self.state = RecorderState::Running;
                Ok(RecorderState::Running)
            }
            Err(error) => {
                self.state = RecorderState::Failed;
                Err(SupervisorError::Launch(error))
            }
        }
    }

    /// Terminate the recorder process, if any, and discard its handle.
    ///
    /// The handle is taken out of the supervisor before anything else: no
    /// path below puts it back, because a stopped process can never be
    /// resumed and the next start must build a fresh one.
    async fn stop(&mut self) -> Result<RecorderState, SupervisorError> {
        let Some(mut child) = self.child.take() else {
            if self.state == RecorderState::Failed {
                debug!(beam = self.beam, "stop clears failed state");
            }
            self.state = RecorderState::Stopped;
            return Ok(RecorderState::Stopped);
        };

        // The recorder may have exited on its own while we believed it was
        // running; reap it instead of signalling a dead pid.
        match child.try_wait() {
            Ok(Some(status)) => {
                warn!(
                    beam = self.beam,
                    %status,
                    "recorder had already exited, discarding handle"
                );
                self.state = RecorderState::Stopped;
                return Ok(RecorderState::Stopped);
            }
            Ok(None) => {}
            Err(error) => {
                self.state = RecorderState::Failed;
                return Err(SupervisorError::Terminate(error));
            }
        }

        if let Err(error) = child.start_kill() {
            self.state = RecorderState::Failed;
            return Err(SupervisorError::Terminate(error));
        }

        match tokio::time::timeout(self.stop_timeout, child.wait()).await {
            Ok(Ok(status)) => {
                info!(beam = self.beam, %status, "recorder stopped");
                self.state = RecorderState::Stopped;
                Ok(RecorderState::Stopped)
            }
            Ok(Err(error)) => {
                self.state = RecorderState::Failed;
                Err(SupervisorError::Terminate(error))
            }
            Err(_) => {
                self.state = RecorderState::Failed;
                Err(SupervisorError::StopTimeout {
                    timeout: self.stop_timeout,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STOP_TIMEOUT: Duration = Duration::from_secs(5);

    fn sleeper() -> RecorderSpec {
        RecorderSpec::new("sleep", vec!["300".to_string()])
    }

    fn broken() -> RecorderSpec {
        RecorderSpec::new("/nonexistent/recorder-binary", vec![])
    }

    #[tokio::test]
    async fn test_start_launches_process() {
        let mut supervisor = RecorderSupervisor::new(0, sleeper(), STOP_TIMEOUT);
        assert_eq!(supervisor.state(), RecorderState::Stopped);
        assert_eq!(supervisor.process_id(), None);

        let state = supervisor.apply(Command::Start).await.unwrap();
        assert_eq!(state, RecorderState::Running);
        assert!(supervisor.process_id().is_some());

        supervisor.apply(Command::Stop).await.unwrap();
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mut supervisor = RecorderSupervisor::new(0, sleeper(), STOP_TIMEOUT);

        supervisor.apply(Command::Start).await.unwrap();
        let first_pid = supervisor.process_id();

        let state = supervisor.apply(Command::Start).await.unwrap();
        assert_eq!(state, RecorderState::Running);
        // No double-launch: the same process is still the active one.
        assert_eq!(supervisor.process_id(), first_pid);

        supervisor.apply(Command::Stop).await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_then_start_builds_fresh_process() {
        let mut supervisor = RecorderSupervisor::new(0, sleeper(), STOP_TIMEOUT);

        supervisor.apply(Command::Start).await.unwrap();
        let first_pid = supervisor.process_id();

        let state = supervisor.apply(Command::Stop).await.unwrap();
        assert_eq!(state, RecorderState::Stopped);
        assert_eq!(supervisor.process_id(), None);

        let state = supervisor.apply(Command::Start).await.unwrap();
        assert_eq!(state, RecorderState::Running);
        let second_pid = supervisor.process_id();
        assert!(second_pid.is_some());
        assert_ne!(first_pid, second_pid);

        supervisor.apply(Command::Stop).await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_without_start_is_noop() {
        let mut supervisor = RecorderSupervisor::new(0, sleeper(), STOP_TIMEOUT);
        let state = supervisor.apply(Command::Stop).await.unwrap();
        assert_eq!(state, RecorderState::Stopped);
    }

    #[tokio::test]
    async fn test_launch_failure_marks_failed_and_retries() {
        let mut supervisor = RecorderSupervisor::new(0, broken(), STOP_TIMEOUT);

        let error = supervisor.apply(Command::Start).await.unwrap_err();
        assert!(matches!(error, SupervisorError::Launch(_)));
        assert_eq!(supervisor.state(), RecorderState::Failed);
        assert_eq!(supervisor.process_id(), None);

        // A retry goes through the same spawn path, not a resume.
        let error = supervisor.apply(Command::Start).await.unwrap_err();
        assert!(matches!(error, SupervisorError::Launch(_)));
        assert_eq!(supervisor.state(), RecorderState::Failed);
    }

    #[tokio::test]
    async fn test_stop_clears_failed_state() {
        let mut supervisor = RecorderSupervisor::new(0, broken(), STOP_TIMEOUT);
        supervisor.apply(Command::Start).await.unwrap_err();
        assert_eq!(supervisor.state(), RecorderState::Failed);

        let state = supervisor.apply(Command::Stop).await.unwrap();
        assert_eq!(state, RecorderState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_after_silent_exit_recovers() {
        // "true" exits immediately; the supervisor still believes it is
        // running until the next stop reaps it.
        let spec = RecorderSpec::new("true", vec![]);
        let mut supervisor = RecorderSupervisor::new(0, spec, STOP_TIMEOUT);

        supervisor.apply(Command::Start).await.unwrap();
        assert_eq!(supervisor.state(), RecorderState::Running);

        tokio::time::sleep(Duration::from_millis(100)).await;

        let state = supervisor.apply(Command::Stop).await.unwrap();
        assert_eq!(state, RecorderState::Stopped);
        assert_eq!(supervisor.process_id(), None);
    }
}
