//! AMQP-backed command transport.
//!
//! One durable queue per beam on a shared broker. The publisher writes
//! persistent messages; each worker consumes its own queue with prefetch 1
//! and explicit acks, so commands are applied one at a time in issue order.
//!
//! Startup is strict (daemon mode cannot function without the broker, so a
//! failed initial connect propagates), but runtime outages are absorbed:
//! both ends drop their link and rebuild it, the consumer with exponential
//! backoff. No missed-command replay is attempted — the controller
//! re-broadcasts the current decision every tick, which heals any gap.

use super::transport::{CommandConsumer, CommandPublisher, TransportError};
use super::{channel_name, Command};
use crate::config::BrokerSettings;
use futures::StreamExt;
use lapin::options::{
    BasicAckOptions, BasicConsumeOptions, BasicPublishOptions, BasicQosOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{BasicProperties, Channel, Connection, ConnectionProperties, Consumer};
use std::time::Duration;
use tracing::{debug, info, warn};

/// First reconnect attempt delay.
const RECONNECT_INITIAL_DELAY: Duration = Duration::from_millis(500);

/// Reconnect delay ceiling.
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(30);

/// AMQP delivery mode for messages that survive a broker restart.
const DELIVERY_MODE_PERSISTENT: u8 = 2;

/// An open connection plus the channel used on it.
///
/// Kept together so the connection is not dropped while the channel is live.
struct Link {
    _connection: Connection,
    channel: Channel,
}

async fn open_link(uri: &str) -> Result<Link, TransportError> {
    let connection = Connection::connect(uri, ConnectionProperties::default()).await?;
    let channel = connection.create_channel().await?;
    Ok(Link {
        _connection: connection,
        channel,
    })
}

async fn declare_beam_queue(channel: &Channel, beam: u8) -> Result<(), TransportError> {
    channel
        .queue_declare(
            &channel_name(beam),
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;
    Ok(())
}

// =============================================================================
// Publisher
// =============================================================================

/// Controller-side publisher over a shared AMQP broker.
pub struct AmqpCommandPublisher {
    uri: String,
    beam_count: u8,
    link: Option<Link>,
}

impl AmqpCommandPublisher {
    /// Connect to the broker and declare every beam queue.
    ///
    /// An error here is fatal to the caller: the controller cannot issue
    /// commands without the broker.
    pub async fn connect(settings: &BrokerSettings, beam_count: u8) -> Result<Self, TransportError> {
        let uri = settings.amqp_uri();
        let link = Self::open(&uri, beam_count).await?;
        info!(beam_count, "connected to command broker");
        Ok(Self {
            uri,
            beam_count,
            link: Some(link),
        })
    }

    async fn open(uri: &str, beam_count: u8) -> Result<Link, TransportError> {
        let link = open_link(uri).await?;
        for beam in 0..beam_count {
            declare_beam_queue(&link.channel, beam).await?;
        }
        Ok(link)
    }
}

impl CommandPublisher for AmqpCommandPublisher {
    async fn publish(&mut self, beam: u8, command: Command) -> Result<(), TransportError> {
        let link = match self.link.take() {
            Some(link) if link.channel.status().connected() => link,
            _ => {
                let link = Self::open(&self.uri, self.beam_count).await?;
                info!("re-established command broker link");
                link
            }
        };

        let result = link
            .channel
            .basic_publish(
                "",
                &channel_name(beam),
                BasicPublishOptions::default(),
                command.as_wire(),
                BasicProperties::default().with_delivery_mode(DELIVERY_MODE_PERSISTENT),
            )
            .await;

        self.link = Some(link);
        // Fire-and-forget: the broker confirm is not awaited, a lost tick is
        // healed by the next re-broadcast.
        let _confirm = result?;
        Ok(())
    }
}

// =============================================================================
// Consumer
// =============================================================================

/// An open consumer link for one beam queue.
struct ConsumerLink {
    _connection: Connection,
    channel: Channel,
    consumer: Consumer,
}

/// Worker-side consumer of one beam's command queue.
pub struct AmqpCommandConsumer {
    uri: String,
    beam: u8,
    link: Option<ConsumerLink>,
    reconnect_delay: Duration,
}

impl AmqpCommandConsumer {
    /// Connect to the broker and start consuming this beam's queue.
    ///
    /// An error here is fatal to the caller: a worker in daemon mode cannot
    /// function without its command channel.
    pub async fn connect(settings: &BrokerSettings, beam: u8) -> Result<Self, TransportError> {
        let uri = settings.amqp_uri();
        let link = Self::open(&uri, beam).await?;
        info!(beam, queue = %channel_name(beam), "consuming command channel");
        Ok(Self {
            uri,
            beam,
            link: Some(link),
            reconnect_delay: RECONNECT_INITIAL_DELAY,
        })
    }

    async fn open(uri: &str, beam: u8) -> Result<ConsumerLink, TransportError> {
        let link = open_link(uri).await?;
        declare_beam_queue(&link.channel, beam).await?;
        // One unacked command at a time keeps application strictly ordered.
        link.channel.basic_qos(1, BasicQosOptions::default()).await?;
        let consumer = link
            .channel
            .basic_consume(
                &channel_name(beam),
                &format!("beamwatch-worker-{beam}"),
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;
        Ok(ConsumerLink {
            _connection: link._connection,
            channel: link.channel,
            consumer,
        })
    }

    /// Rebuild the link, sleeping the current backoff delay first.
    async fn reconnect(&mut self) {
        self.link = None;
        tokio::time::sleep(self.reconnect_delay).await;
        match Self::open(&self.uri, self.beam).await {
            Ok(link) => {
                info!(beam = self.beam, "re-subscribed to command channel");
                self.link = Some(link);
                self.reconnect_delay = RECONNECT_INITIAL_DELAY;
            }
            Err(error) => {
                warn!(
                    beam = self.beam,
                    %error,
                    retry_in = ?self.reconnect_delay,
                    "command channel reconnect failed"
                );
                self.reconnect_delay = (self.reconnect_delay * 2).min(RECONNECT_MAX_DELAY);
            }
        }
    }
}

impl CommandConsumer for AmqpCommandConsumer {
    async fn next_command(&mut self) -> Result<Command, TransportError> {
        loop {
            let Some(link) = self.link.as_mut() else {
                self.reconnect().await;
                continue;
            };

            match link.consumer.next().await {
                Some(Ok(delivery)) => {
                    let decoded = Command::from_wire(&delivery.data);
                    if let Err(error) = delivery.ack(BasicAckOptions::default()).await {
                        // The command was still received; a redelivered
                        // duplicate is harmless because application is
                        // idempotent.
                        warn!(beam = self.beam, %error, "command ack failed, rebuilding link");
                        self.link = None;
                    }
                    match decoded {
                        Some(command) => {
                            debug!(beam = self.beam, ?command, "received command");
                            return Ok(command);
                        }
                        None => {
                            warn!(
                                beam = self.beam,
                                len = delivery.data.len(),
                                "dropping malformed command payload"
                            );
                        }
                    }
                }
                Some(Err(error)) => {
                    warn!(beam = self.beam, %error, "command stream error, reconnecting");
                    self.link = None;
                }
                None => {
                    warn!(beam = self.beam, "command stream closed, reconnecting");
                    self.link = None;
                }
            }
        }
    }
}
