//! Monitor command - run the central pointing controller.

use crate::error::CliError;
use crate::runner::CliRunner;
use beamwatch::command::AmqpCommandPublisher;
use beamwatch::controller::{ControllerConfig, PointingController};
use beamwatch::metrics::InfluxMetricsSink;
use beamwatch::telemetry::{RedisTelemetryStore, NUM_BEAMS};

/// Run the monitor command.
pub fn run(verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::with_verbose(verbose)?;
    runner.log_startup("monitor");
    let config = runner.config().clone();

    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(async move {
        // Store and sink tolerate outages at runtime, so their constructors
        // do no I/O; only the broker connection is a startup gate.
        let store = RedisTelemetryStore::new(&config.telemetry).map_err(CliError::Telemetry)?;
        let sink = InfluxMetricsSink::new(&config.metrics).map_err(CliError::Metrics)?;
        let publisher = AmqpCommandPublisher::connect(&config.broker, NUM_BEAMS as u8)
            .await
            .map_err(CliError::Broker)?;

        let mut controller =
            PointingController::new(store, sink, publisher, ControllerConfig::from(&config));

        let shutdown = super::shutdown_token();
        controller.run(shutdown).await;
        Ok(())
    })
}
