//! Integration tests for the beam worker and its recorder supervisor.
//!
//! These tests run real (short-lived, killed) OS processes through the
//! supervisor, driven either by a scripted command source or end-to-end by
//! the controller through an in-memory channel transport.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use beamwatch::command::{Command, CommandConsumer, CommandPublisher, TransportError};
use beamwatch::controller::{ControllerConfig, PointingController};
use beamwatch::metrics::{MetricsError, MetricsSink, PointingRecord};
use beamwatch::supervisor::{RecorderSpec, RecorderState, RecorderSupervisor};
use beamwatch::telemetry::{
    BeamPointing, PointingSnapshot, TelemetryError, TelemetryStore, NUM_BEAMS,
};
use beamwatch::validity::FlagExpectations;
use beamwatch::worker::BeamWorker;

// =============================================================================
// Test Helpers
// =============================================================================

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

fn sleeper() -> RecorderSpec {
    RecorderSpec::new("sleep", vec!["300".to_string()])
}

fn supervisor() -> RecorderSupervisor {
    RecorderSupervisor::new(0, sleeper(), STOP_TIMEOUT)
}

/// Command source that replays a script, then waits forever.
struct ScriptedConsumer {
    commands: VecDeque<Command>,
}

impl ScriptedConsumer {
    fn new(commands: Vec<Command>) -> Self {
        Self {
            commands: commands.into(),
        }
    }
}

impl CommandConsumer for ScriptedConsumer {
    async fn next_command(&mut self) -> Result<Command, TransportError> {
        match self.commands.pop_front() {
            Some(command) => Ok(command),
            None => std::future::pending().await,
        }
    }
}

/// In-memory channel transport: one unbounded channel per beam.
struct ChannelPublisher {
    senders: Vec<mpsc::UnboundedSender<Command>>,
}

impl CommandPublisher for ChannelPublisher {
    async fn publish(&mut self, beam: u8, command: Command) -> Result<(), TransportError> {
        self.senders[usize::from(beam)]
            .send(command)
            .map_err(|_| TransportError::Closed)
    }
}

struct ChannelConsumer {
    receiver: mpsc::UnboundedReceiver<Command>,
}

impl CommandConsumer for ChannelConsumer {
    async fn next_command(&mut self) -> Result<Command, TransportError> {
        self.receiver.recv().await.ok_or(TransportError::Closed)
    }
}

fn channel_transport() -> (ChannelPublisher, Vec<ChannelConsumer>) {
    let mut senders = Vec::new();
    let mut consumers = Vec::new();
    for _ in 0..NUM_BEAMS {
        let (tx, rx) = mpsc::unbounded_channel();
        senders.push(tx);
        consumers.push(ChannelConsumer { receiver: rx });
    }
    (ChannelPublisher { senders }, consumers)
}

/// Drive the worker for `millis`, then stop polling it (leaving its state
/// intact for inspection).
async fn drive_worker<C: CommandConsumer>(
    worker: &mut BeamWorker<C>,
    shutdown: CancellationToken,
    millis: u64,
) {
    let run = worker.run(shutdown);
    tokio::pin!(run);
    tokio::select! {
        _ = &mut run => panic!("worker exited unexpectedly"),
        _ = tokio::time::sleep(Duration::from_millis(millis)) => {}
    }
}

/// Drive the worker until it observes the cancelled token and exits.
async fn finish_worker<C: CommandConsumer>(worker: &mut BeamWorker<C>, shutdown: CancellationToken) {
    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(5), worker.run(shutdown))
        .await
        .expect("worker must exit after shutdown");
}

// Scripted telemetry, for the end-to-end test.

struct ScriptedStore {
    script: VecDeque<PointingSnapshot>,
}

impl TelemetryStore for ScriptedStore {
    async fn fetch(&mut self) -> Result<PointingSnapshot, TelemetryError> {
        self.script.pop_front().ok_or(TelemetryError::MissingField {
            hash: "status:if".to_string(),
            field: "sig_source".to_string(),
        })
    }
}

struct NullSink;

impl MetricsSink for NullSink {
    async fn write(&mut self, _record: &PointingRecord) -> Result<(), MetricsError> {
        Ok(())
    }
}

fn valid_snapshot() -> PointingSnapshot {
    PointingSnapshot {
        sig_source: 1.0,
        receiver_enabled: 1.0,
        rf_center_freq_mhz: 1420.0,
        mjd: 58_849.0,
        beams: [BeamPointing::default(); NUM_BEAMS],
    }
}

fn invalid_snapshot() -> PointingSnapshot {
    PointingSnapshot {
        sig_source: 0.0,
        ..valid_snapshot()
    }
}

// =============================================================================
// Worker Tests
// =============================================================================

#[tokio::test]
async fn test_worker_applies_commands_in_order() {
    let consumer = ScriptedConsumer::new(vec![
        Command::Start,
        Command::Stop,
        Command::Start,
    ]);
    let mut worker = BeamWorker::new(0, consumer, supervisor());
    let shutdown = CancellationToken::new();

    drive_worker(&mut worker, shutdown.clone(), 300).await;
    // The script ends on a start: the recorder must be running.
    assert_eq!(worker.supervisor().state(), RecorderState::Running);
    assert!(worker.supervisor().process_id().is_some());

    finish_worker(&mut worker, shutdown).await;
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
}

#[tokio::test]
async fn test_worker_stops_recorder_on_shutdown() {
    let consumer = ScriptedConsumer::new(vec![Command::Start]);
    let mut worker = BeamWorker::new(0, consumer, supervisor());
    let shutdown = CancellationToken::new();

    drive_worker(&mut worker, shutdown.clone(), 200).await;
    assert_eq!(worker.supervisor().state(), RecorderState::Running);

    finish_worker(&mut worker, shutdown).await;
    // Guaranteed release: shutdown killed the recorder and discarded the
    // handle.
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
    assert_eq!(worker.supervisor().process_id(), None);
}

#[tokio::test]
async fn test_worker_exits_promptly_without_commands() {
    let consumer = ScriptedConsumer::new(vec![]);
    let mut worker = BeamWorker::new(0, consumer, supervisor());
    let shutdown = CancellationToken::new();

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), worker.run(shutdown))
        .await
        .expect("worker must exit on an already-cancelled token");
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
}

#[tokio::test]
async fn test_worker_survives_launch_failures() {
    let broken = RecorderSpec::new("/nonexistent/recorder-binary", vec![]);
    let consumer = ScriptedConsumer::new(vec![Command::Start, Command::Start]);
    let mut worker = BeamWorker::new(0, consumer, RecorderSupervisor::new(0, broken, STOP_TIMEOUT));
    let shutdown = CancellationToken::new();

    // Both launches fail; the worker keeps consuming instead of dying.
    drive_worker(&mut worker, shutdown.clone(), 300).await;
    assert_eq!(worker.supervisor().state(), RecorderState::Failed);

    finish_worker(&mut worker, shutdown).await;
    // The shutdown stop clears the failed state.
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
}

#[tokio::test]
async fn test_worker_exits_when_channel_lost() {
    let (publisher, mut consumers) = channel_transport();
    // Dropping the publisher closes every channel.
    drop(publisher);

    let mut worker = BeamWorker::new(0, consumers.remove(0), supervisor());
    let shutdown = CancellationToken::new();

    tokio::time::timeout(Duration::from_secs(2), worker.run(shutdown))
        .await
        .expect("worker must exit when its channel is unrecoverable");
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
}

// =============================================================================
// End-to-End: controller decision drives the supervisor
// =============================================================================

#[tokio::test]
async fn test_end_to_end_confirm_then_glitch() {
    // Full pipeline: scripted telemetry -> controller -> channel transport
    // -> worker -> supervisor -> real process.
    let mut script: VecDeque<PointingSnapshot> = VecDeque::new();
    script.push_back(valid_snapshot()); // priming sample
    for _ in 0..15 {
        script.push_back(valid_snapshot());
    }
    script.push_back(invalid_snapshot());

    let (publisher, mut consumers) = channel_transport();
    let mut controller = PointingController::new(
        ScriptedStore { script },
        NullSink,
        publisher,
        ControllerConfig {
            tick_period: Duration::from_millis(10),
            read_timeout: Duration::from_millis(50),
            debounce_window: 15,
            expectations: FlagExpectations::default(),
            beam_count: NUM_BEAMS as u8,
        },
    );

    let mut worker = BeamWorker::new(0, consumers.remove(0), supervisor());
    let shutdown = CancellationToken::new();

    // Sixteen ticks: priming sample plus a full window of valid samples.
    for _ in 0..16 {
        controller.tick().await;
    }
    drive_worker(&mut worker, shutdown.clone(), 300).await;
    assert_eq!(worker.supervisor().state(), RecorderState::Running);
    let first_pid = worker.supervisor().process_id();
    assert!(first_pid.is_some());

    // One invalid sample: the controller stops every beam on that tick and
    // the supervisor discards its process handle.
    controller.tick().await;
    drive_worker(&mut worker, shutdown.clone(), 300).await;
    assert_eq!(worker.supervisor().state(), RecorderState::Stopped);
    assert_eq!(worker.supervisor().process_id(), None);

    finish_worker(&mut worker, shutdown).await;
}
