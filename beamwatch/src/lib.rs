//! BeamWatch - Pointing-driven recording control for a multi-beam receiver
//!
//! This library coordinates a fleet of per-beam data-recording processes so
//! that each one records only while the shared telescope-pointing telemetry
//! reports a valid, stable observing state.
//!
//! # Architecture
//!
//! Two independent roles share this library:
//!
//! - The **controller** ([`controller::PointingController`]) samples the
//!   telemetry store at a fixed cadence, derives an instantaneous validity
//!   flag, debounces it over a sliding window, records the labeled snapshot
//!   to the metrics sink, and broadcasts the confirmed start/stop decision
//!   to every beam's command channel.
//! - A **worker** ([`worker::BeamWorker`]) runs once per beam, consumes
//!   commands from its dedicated channel, and drives a
//!   [`supervisor::RecorderSupervisor`] that owns the lifecycle of the
//!   external recording process.
//!
//! # High-Level API
//!
//! ```ignore
//! use beamwatch::config::ConfigFile;
//! use beamwatch::controller::{ControllerConfig, PointingController};
//!
//! let config = ConfigFile::load()?;
//! let controller = PointingController::new(store, sink, publisher, ControllerConfig::from(&config));
//! controller.run(shutdown).await;
//! ```

pub mod command;
pub mod config;
pub mod controller;
pub mod logging;
pub mod metrics;
pub mod supervisor;
pub mod telemetry;
pub mod time;
pub mod validity;
pub mod worker;

/// Version of the BeamWatch library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
