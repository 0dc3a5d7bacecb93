//! Record command - run one beam's recorder worker.

use crate::error::CliError;
use crate::runner::CliRunner;
use beamwatch::command::{AmqpCommandConsumer, Command};
use beamwatch::supervisor::{RecorderSpec, RecorderSupervisor};
use beamwatch::telemetry::NUM_BEAMS;
use beamwatch::worker::BeamWorker;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Arguments for the record command.
pub struct RecordArgs {
    pub beam: u8,
    pub manual: bool,
    pub verbose: bool,
}

/// Run the record command.
pub fn run(args: RecordArgs) -> Result<(), CliError> {
    if usize::from(args.beam) >= NUM_BEAMS {
        return Err(CliError::InvalidBeam { beam: args.beam });
    }

    let runner = CliRunner::with_verbose(args.verbose)?;
    runner.log_startup("record");
    let config = runner.config().clone();

    let spec = RecorderSpec::for_beam(&config.recorder, args.beam);
    let stop_timeout = Duration::from_secs(config.recorder.stop_timeout_secs);
    let supervisor = RecorderSupervisor::new(args.beam, spec, stop_timeout);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| CliError::Runtime(e.to_string()))?;

    runtime.block_on(async move {
        let shutdown = super::shutdown_token();

        if args.manual {
            info!(beam = args.beam, "running in manual mode");
            manual_loop(args.beam, supervisor, shutdown).await
        } else {
            info!(beam = args.beam, "running in daemon mode");
            let consumer = AmqpCommandConsumer::connect(&config.broker, args.beam)
                .await
                .map_err(CliError::Broker)?;
            let mut worker = BeamWorker::new(args.beam, consumer, supervisor);
            worker.run(shutdown).await;
            Ok(())
        }
    })
}

/// Operator-driven mode: read `start` / `stop` lines from stdin.
async fn manual_loop(
    beam: u8,
    mut supervisor: RecorderSupervisor,
    shutdown: CancellationToken,
) -> Result<(), CliError> {
    println!("Manual mode for beam {beam}: type 'start', 'stop', or 'quit'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => match line.trim().to_ascii_lowercase().as_str() {
                    "start" => apply(&mut supervisor, Command::Start).await,
                    "stop" => apply(&mut supervisor, Command::Stop).await,
                    "quit" | "exit" => break,
                    "" => {}
                    other => println!("Unknown input '{other}' (expected start, stop, or quit)"),
                },
                Ok(None) => break,
                Err(e) => return Err(CliError::Runtime(e.to_string())),
            }
        }
    }

    // Same guarantee as the daemon worker: never exit with the recorder
    // still running.
    if let Err(error) = supervisor.apply(Command::Stop).await {
        warn!(beam, %error, "failed to stop recorder on exit");
    }
    Ok(())
}

async fn apply(supervisor: &mut RecorderSupervisor, command: Command) {
    match supervisor.apply(command).await {
        Ok(state) => println!("recorder is now {state:?}"),
        Err(error) => eprintln!("Error: {error}"),
    }
}
