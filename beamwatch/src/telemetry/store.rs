//! Telemetry store access.
//!
//! The store is a shared Redis instance whose hashes are populated by the
//! instrument control system. One [`fetch`](TelemetryStore::fetch) issues a
//! single atomic pipeline so every value in the returned snapshot comes from
//! the same round trip, per the consistency requirement on snapshots.
//!
//! Hash layout consumed here:
//!
//! | hash              | fields                                          |
//! |-------------------|-------------------------------------------------|
//! | `status:if`       | `sig_source`, `receiver_enabled`, `rf_center_freq` |
//! | `status:pointing` | `mjd`                                           |
//! | `status:derived`  | `ra0`..`ra6`, `dec0`..`dec6`                    |

use super::snapshot::{BeamPointing, PointingSnapshot, NUM_BEAMS};
use crate::config::TelemetrySettings;
use redis::aio::ConnectionManager;
use std::future::Future;
use thiserror::Error;
use tracing::debug;

const IF_STATUS_HASH: &str = "status:if";
const POINTING_STATUS_HASH: &str = "status:pointing";
const DERIVED_STATUS_HASH: &str = "status:derived";

const SIG_SOURCE_FIELD: &str = "sig_source";
const RECEIVER_ENABLED_FIELD: &str = "receiver_enabled";
const RF_CENTER_FREQ_FIELD: &str = "rf_center_freq";
const MJD_FIELD: &str = "mjd";

/// Errors from a telemetry fetch.
///
/// None of these are fatal to the controller: a failed fetch makes the tick
/// invalid and the next tick tries again.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Store connection or protocol error.
    #[error("telemetry store error: {0}")]
    Store(#[from] redis::RedisError),

    /// A required field is absent from its hash.
    #[error("telemetry field {hash}.{field} is missing")]
    MissingField { hash: String, field: String },

    /// The pipeline returned fewer values than requested.
    #[error("telemetry returned {got} values, expected {expected}")]
    ShortRead { got: usize, expected: usize },
}

/// Read-only source of consistent pointing snapshots.
///
/// Implementations must return values read in one atomic batch; the
/// controller never stitches a snapshot together from multiple reads.
pub trait TelemetryStore {
    /// Fetch one consistent snapshot of all pointing telemetry.
    fn fetch(&mut self) -> impl Future<Output = Result<PointingSnapshot, TelemetryError>> + Send;
}

/// Telemetry store backed by a shared Redis instance.
///
/// The connection is established lazily on first fetch and re-established
/// by the connection manager after outages, so a store that is down at
/// startup only costs invalid ticks, never a crash.
pub struct RedisTelemetryStore {
    client: redis::Client,
    connection: Option<ConnectionManager>,
}

impl RedisTelemetryStore {
    /// Create a store for the given settings.
    ///
    /// Only parses the connection URL; no I/O happens until the first fetch.
    pub fn new(settings: &TelemetrySettings) -> Result<Self, TelemetryError> {
        let url = format!("redis://{}:{}", settings.host, settings.port);
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            connection: None,
        })
    }

    /// Get the live connection, establishing it on first use.
    ///
    /// `ConnectionManager` is a cheap handle onto one multiplexed connection
    /// and reconnects internally after outages, so handing out clones is the
    /// intended usage.
    async fn connection(&mut self) -> Result<ConnectionManager, TelemetryError> {
        if let Some(connection) = &self.connection {
            return Ok(connection.clone());
        }
        let manager = self.client.get_connection_manager().await?;
        debug!("connected to telemetry store");
        self.connection = Some(manager.clone());
        Ok(manager)
    }

    /// The (hash, field) pairs read each tick, in pipeline order.
    fn field_list() -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (IF_STATUS_HASH, SIG_SOURCE_FIELD.to_string()),
            (IF_STATUS_HASH, RECEIVER_ENABLED_FIELD.to_string()),
            (IF_STATUS_HASH, RF_CENTER_FREQ_FIELD.to_string()),
            (POINTING_STATUS_HASH, MJD_FIELD.to_string()),
        ];
        for beam in 0..NUM_BEAMS {
            fields.push((DERIVED_STATUS_HASH, format!("ra{beam}")));
            fields.push((DERIVED_STATUS_HASH, format!("dec{beam}")));
        }
        fields
    }
}

impl TelemetryStore for RedisTelemetryStore {
    async fn fetch(&mut self) -> Result<PointingSnapshot, TelemetryError> {
        let fields = Self::field_list();

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (hash, field) in &fields {
            pipe.hget(*hash, field);
        }

        let mut connection = self.connection().await?;
        let values: Vec<Option<f64>> = pipe.query_async(&mut connection).await?;

        if values.len() != fields.len() {
            return Err(TelemetryError::ShortRead {
                got: values.len(),
                expected: fields.len(),
            });
        }

        let mut resolved = Vec::with_capacity(fields.len());
        for ((hash, field), value) in fields.iter().zip(values) {
            match value {
                Some(v) => resolved.push(v),
                None => {
                    return Err(TelemetryError::MissingField {
                        hash: hash.to_string(),
                        field: field.clone(),
                    })
                }
            }
        }

        let mut beams = [BeamPointing::default(); NUM_BEAMS];
        for (beam, pointing) in beams.iter_mut().enumerate() {
            pointing.ra_deg = resolved[4 + beam * 2];
            pointing.dec_deg = resolved[4 + beam * 2 + 1];
        }

        Ok(PointingSnapshot {
            sig_source: resolved[0],
            receiver_enabled: resolved[1],
            rf_center_freq_mhz: resolved[2],
            mjd: resolved[3],
            beams,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_list_covers_all_beams() {
        let fields = RedisTelemetryStore::field_list();
        assert_eq!(fields.len(), 4 + 2 * NUM_BEAMS);
        assert_eq!(fields[0], (IF_STATUS_HASH, "sig_source".to_string()));
        assert_eq!(fields[4], (DERIVED_STATUS_HASH, "ra0".to_string()));
        assert_eq!(
            fields.last().unwrap(),
            &(DERIVED_STATUS_HASH, format!("dec{}", NUM_BEAMS - 1))
        );
    }
}
