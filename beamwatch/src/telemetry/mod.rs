//! Pointing telemetry: the per-tick snapshot and the store it is read from.
//!
//! The shared instrument telemetry lives in a key-value store that many
//! subsystems write into. The controller only ever takes one consistent,
//! batched read per tick ([`TelemetryStore::fetch`]) and hands the resulting
//! [`PointingSnapshot`] to the validity evaluator and the metrics sink. The
//! snapshot is owned by the tick that produced it and discarded afterwards;
//! nothing here caches telemetry across ticks.

mod snapshot;
mod store;

pub use snapshot::{BeamPointing, PointingSnapshot, NUM_BEAMS};
pub use store::{RedisTelemetryStore, TelemetryError, TelemetryStore};
