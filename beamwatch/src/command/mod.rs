//! Start/stop commands and the channel they travel on.
//!
//! The controller re-broadcasts the current confirmed decision to every
//! beam's channel on every tick. Commands are level-triggered: receiving the
//! same command twice is normal and must be harmless, which the supervisor's
//! idempotent transitions guarantee. A dropped message is forgiven by the
//! next tick's re-publication.

mod amqp;
mod transport;

pub use amqp::{AmqpCommandConsumer, AmqpCommandPublisher};
pub use transport::{CommandConsumer, CommandPublisher, TransportError};

/// Prefix of every per-beam command channel name.
pub const COMMAND_CHANNEL_PREFIX: &str = "recorder-beam";

/// Deterministic channel name for one beam's commands.
pub fn channel_name(beam: u8) -> String {
    format!("{COMMAND_CHANNEL_PREFIX}{beam}")
}

/// A recording command destined for one beam channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// Launch the recorder if it is not already running.
    Start,
    /// Terminate the recorder if it is running.
    Stop,
}

impl Command {
    /// The command corresponding to a confirmed-validity decision.
    pub fn from_confirmed(confirmed: bool) -> Self {
        if confirmed {
            Command::Start
        } else {
            Command::Stop
        }
    }

    /// Wire payload for this command.
    pub fn as_wire(&self) -> &'static [u8] {
        match self {
            Command::Start => b"START",
            Command::Stop => b"STOP",
        }
    }

    /// Decode a wire payload.
    ///
    /// Returns `None` for anything other than the two known payloads;
    /// consumers drop (and acknowledge) malformed messages so a poison
    /// message cannot wedge a channel.
    pub fn from_wire(payload: &[u8]) -> Option<Self> {
        match payload {
            b"START" => Some(Command::Start),
            b"STOP" => Some(Command::Stop),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_is_deterministic() {
        assert_eq!(channel_name(0), "recorder-beam0");
        assert_eq!(channel_name(6), "recorder-beam6");
    }

    #[test]
    fn test_from_confirmed() {
        assert_eq!(Command::from_confirmed(true), Command::Start);
        assert_eq!(Command::from_confirmed(false), Command::Stop);
    }

    #[test]
    fn test_wire_round_trip() {
        assert_eq!(Command::from_wire(Command::Start.as_wire()), Some(Command::Start));
        assert_eq!(Command::from_wire(Command::Stop.as_wire()), Some(Command::Stop));
    }

    #[test]
    fn test_malformed_wire_is_none() {
        assert_eq!(Command::from_wire(b"start"), None);
        assert_eq!(Command::from_wire(b""), None);
        assert_eq!(Command::from_wire(b"RESTART"), None);
    }
}
