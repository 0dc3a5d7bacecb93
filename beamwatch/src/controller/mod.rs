//! The central pointing controller.
//!
//! Drives the per-tick pipeline at a fixed cadence:
//!
//! ```text
//! tick ──► TelemetryStore::fetch (bounded by read timeout)
//!             │
//!             ▼
//!          ValidityEvaluator ──► DebounceWindow
//!             │                      │
//!             ▼                      ▼
//!          MetricsSink::write    CommandPublisher::publish (all beams)
//! ```
//!
//! Ticks are strictly serialized: one loop awaits each tick to completion,
//! so validity samples reach the debounce window in temporal order. A tick
//! that overruns the period delays the next tick rather than overlapping it.
//!
//! Failure bias is always toward "not recording": a timed-out or failed
//! telemetry read makes the tick invalid (clearing the window), and the
//! resulting stop decision is still published. A failed metrics write or a
//! failed publish to one beam is logged and forgiven — the next tick
//! re-publishes the current decision anyway.

use crate::command::{Command, CommandPublisher};
use crate::config::ConfigFile;
use crate::metrics::{MetricsSink, PointingRecord};
use crate::telemetry::{PointingSnapshot, TelemetryStore, NUM_BEAMS};
use crate::validity::{DebounceWindow, FlagExpectations, ValidityEvaluator};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runtime configuration for the controller loop.
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Sampling period of the scheduler.
    pub tick_period: Duration,
    /// Upper bound on one telemetry fetch; a slower read makes the tick
    /// invalid.
    pub read_timeout: Duration,
    /// Size of the debounce window in ticks.
    pub debounce_window: usize,
    /// Expected values of the routing flags.
    pub expectations: FlagExpectations,
    /// Number of beam channels to publish to.
    pub beam_count: u8,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            read_timeout: Duration::from_secs(2),
            debounce_window: 15,
            expectations: FlagExpectations::default(),
            beam_count: NUM_BEAMS as u8,
        }
    }
}

impl From<&ConfigFile> for ControllerConfig {
    fn from(config: &ConfigFile) -> Self {
        Self {
            tick_period: Duration::from_millis(config.controller.tick_period_ms),
            read_timeout: Duration::from_millis(config.telemetry.read_timeout_ms),
            debounce_window: config.controller.debounce_window,
            expectations: FlagExpectations {
                sig_source: config.controller.expected_sig_source,
                receiver_enabled: config.controller.expected_receiver_enabled,
            },
            beam_count: NUM_BEAMS as u8,
        }
    }
}

/// The validity-debounce decision engine plus its adapters.
///
/// Generic over the three external seams so the tick pipeline is testable
/// with scripted implementations.
pub struct PointingController<S, M, P> {
    store: S,
    sink: M,
    publisher: P,
    evaluator: ValidityEvaluator,
    window: DebounceWindow,
    config: ControllerConfig,
}

impl<S, M, P> PointingController<S, M, P>
where
    S: TelemetryStore,
    M: MetricsSink,
    P: CommandPublisher,
{
    /// Create a controller with an empty debounce window and no frequency
    /// history.
    pub fn new(store: S, sink: M, publisher: P, config: ControllerConfig) -> Self {
        Self {
            store,
            sink,
            publisher,
            evaluator: ValidityEvaluator::new(config.expectations),
            window: DebounceWindow::new(config.debounce_window),
            config,
        }
    }

    /// Run the tick loop until shutdown is requested.
    pub async fn run(&mut self, shutdown: CancellationToken) {
        info!(
            period = ?self.config.tick_period,
            window = self.config.debounce_window,
            beams = self.config.beam_count,
            "pointing controller started"
        );

        let mut ticker = tokio::time::interval(self.config.tick_period);
        // Serialized ticks: an overrunning tick delays the next one instead
        // of overlapping it, preserving the window's sample order.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("pointing controller shutting down");
                    break;
                }
                _ = ticker.tick() => self.tick().await,
            }
        }
    }

    /// Execute one tick of the pipeline.
    ///
    /// Public so tests can drive the pipeline deterministically without the
    /// interval loop.
    pub async fn tick(&mut self) {
        let snapshot = self.fetch_snapshot().await;

        let valid = match &snapshot {
            Some(snapshot) => self.evaluator.evaluate(snapshot),
            None => false,
        };
        let confirmed = self.window.observe(valid);

        debug!(
            valid,
            confirmed,
            window_len = self.window.len(),
            "tick evaluated"
        );

        if let Some(snapshot) = &snapshot {
            let record = PointingRecord::new(snapshot, valid);
            if let Err(error) = self.sink.write(&record).await {
                warn!(%error, "dropping pointing record");
            }
        }

        self.broadcast(Command::from_confirmed(confirmed)).await;
    }

    /// Fetch one snapshot, bounded by the read timeout.
    ///
    /// `None` means this tick has no usable telemetry and is treated as
    /// invalid.
    async fn fetch_snapshot(&mut self) -> Option<PointingSnapshot> {
        match tokio::time::timeout(self.config.read_timeout, self.store.fetch()).await {
            Ok(Ok(snapshot)) => Some(snapshot),
            Ok(Err(error)) => {
                warn!(%error, "telemetry read failed, treating tick as invalid");
                None
            }
            Err(_) => {
                warn!(
                    timeout = ?self.config.read_timeout,
                    "telemetry read timed out, treating tick as invalid"
                );
                None
            }
        }
    }

    /// Re-publish the current decision to every beam channel.
    async fn broadcast(&mut self, command: Command) {
        for beam in 0..self.config.beam_count {
            if let Err(error) = self.publisher.publish(beam, command).await {
                warn!(beam, ?command, %error, "command publish failed");
            }
        }
    }
}
