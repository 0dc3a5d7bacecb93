//! Metrics sink seam and the InfluxDB implementation.

use super::record::PointingRecord;
use crate::config::MetricsSettings;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors from a metrics write.
///
/// All of these are recovered locally by the caller: the write is dropped
/// and logged, and the decision pipeline continues untouched.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// HTTP transport or server-side failure.
    #[error("metrics write failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The record's instrument timestamp is not representable.
    #[error("record timestamp is not representable")]
    BadTimestamp,
}

/// Write-only sink for per-tick pointing records.
pub trait MetricsSink {
    /// Write one record.
    fn write(
        &mut self,
        record: &PointingRecord,
    ) -> impl Future<Output = Result<(), MetricsError>> + Send;
}

/// Metrics sink posting InfluxDB line protocol over HTTP.
///
/// One point per tick, nanosecond precision, timestamped by the record's
/// instrument clock.
pub struct InfluxMetricsSink {
    client: reqwest::Client,
    write_url: String,
    username: Option<String>,
    password: Option<String>,
    measurement: String,
}

impl InfluxMetricsSink {
    /// Build a sink for the given settings.
    ///
    /// Only constructs the HTTP client; the database is first contacted on
    /// the first write.
    pub fn new(settings: &MetricsSettings) -> Result<Self, MetricsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.write_timeout_secs))
            .build()?;
        let write_url = format!(
            "{}/write?db={}&precision=ns",
            settings.url.trim_end_matches('/'),
            settings.database
        );
        Ok(Self {
            client,
            write_url,
            username: settings.username.clone(),
            password: settings.password.clone(),
            measurement: settings.measurement.clone(),
        })
    }
}

impl MetricsSink for InfluxMetricsSink {
    async fn write(&mut self, record: &PointingRecord) -> Result<(), MetricsError> {
        let line = record
            .to_line_protocol(&self.measurement)
            .ok_or(MetricsError::BadTimestamp)?;

        let mut request = self.client.post(&self.write_url).body(line);
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        request.send().await?.error_for_status()?;
        debug!(measurement = %self.measurement, "wrote pointing record");
        Ok(())
    }
}
