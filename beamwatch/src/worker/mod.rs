//! The per-beam worker loop.
//!
//! One worker runs per beam, in its own process, owning its supervisor and
//! recorder exclusively — there is no shared state between beams, so a
//! wedged recorder on one beam can never stall another.
//!
//! The loop is: await the next command (or shutdown), apply it to the
//! supervisor in arrival order, repeat. Transition failures are logged and
//! absorbed — the supervisor parks itself in `Failed` and the next start
//! command retries. On every exit path the worker stops its recorder before
//! returning, so a cancelled worker never leaves an orphaned recording
//! process behind.

use crate::command::{Command, CommandConsumer};
use crate::supervisor::RecorderSupervisor;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Consumes one beam's command channel and drives its recorder supervisor.
pub struct BeamWorker<C> {
    beam: u8,
    consumer: C,
    supervisor: RecorderSupervisor,
}

impl<C: CommandConsumer> BeamWorker<C> {
    /// Create a worker for one beam.
    pub fn new(beam: u8, consumer: C, supervisor: RecorderSupervisor) -> Self {
        Self {
            beam,
            consumer,
            supervisor,
        }
    }

    /// The worker's supervisor, for inspection after the loop exits.
    pub fn supervisor(&self) -> &RecorderSupervisor {
        &self.supervisor
    }

    /// Run until shutdown is requested or the command channel is
    /// unrecoverably lost.
    ///
    /// Either way, the recorder is stopped before this returns.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(beam = self.beam, "beam worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(beam = self.beam, "beam worker shutting down");
                    break;
                }
                result = self.consumer.next_command() => match result {
                    Ok(command) => self.apply(command).await,
                    Err(error) => {
                        error!(beam = self.beam, %error, "command channel lost, stopping worker");
                        break;
                    }
                }
            }
        }

        // Guaranteed release: never exit with a recorder still running.
        if let Err(error) = self.supervisor.apply(Command::Stop).await {
            warn!(beam = self.beam, %error, "failed to stop recorder during shutdown");
        }
    }

    async fn apply(&mut self, command: Command) {
        match self.supervisor.apply(command).await {
            Ok(state) => {
                info!(beam = self.beam, ?command, ?state, "command applied");
            }
            Err(error) => {
                // The supervisor is now Failed; the next start retries.
                error!(beam = self.beam, ?command, %error, "recorder transition failed");
            }
        }
    }
}
