//! Transport seams for command delivery.

use super::Command;
use std::future::Future;
use thiserror::Error;

/// Errors from the command transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Broker connection could not be established or was lost.
    #[error("command channel error: {0}")]
    Broker(#[from] lapin::Error),

    /// The channel is gone and will not come back.
    #[error("command channel closed")]
    Closed,

    /// A received payload was not a known command.
    #[error("malformed command payload ({0} bytes)")]
    Malformed(usize),
}

/// Controller-side handle for broadcasting commands.
///
/// Publishing is fire-and-forget per tick: an error is reported to the
/// caller for logging but the controller keeps ticking, because the next
/// tick re-publishes the current decision anyway.
pub trait CommandPublisher {
    /// Publish one command to one beam's channel.
    fn publish(
        &mut self,
        beam: u8,
        command: Command,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// Worker-side handle for receiving commands.
///
/// Implementations deliver commands in the order the controller issued them
/// for this beam, at least once. Transient broker outages must be handled
/// inside the implementation (reconnect with backoff); an `Err` from
/// [`next_command`](Self::next_command) is unrecoverable and the worker will
/// shut down on it, stopping its recorder.
pub trait CommandConsumer {
    /// Await the next command for this beam.
    fn next_command(&mut self) -> impl Future<Output = Result<Command, TransportError>> + Send;
}
