//! Metrics recording for the pointing pipeline.
//!
//! Every successful telemetry read becomes one [`PointingRecord`]: the full
//! labeled snapshot plus the derived instantaneous-validity flag, stamped
//! with the instrument's own clock (the snapshot MJD), never wall-clock
//! write time.
//!
//! Writes go through the [`MetricsSink`] seam. The sink is strictly
//! best-effort: a failed or slow write is logged and dropped by the caller
//! and must never stall the decision pipeline.

mod record;
mod sink;

pub use record::PointingRecord;
pub use sink::{InfluxMetricsSink, MetricsError, MetricsSink};
