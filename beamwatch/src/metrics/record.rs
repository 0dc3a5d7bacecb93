//! The per-tick metrics record and its wire encoding.

use crate::telemetry::PointingSnapshot;
use crate::time::mjd_to_unix_nanos;

/// One tick's labeled telemetry, ready for the metrics sink.
#[derive(Clone, Debug, PartialEq)]
pub struct PointingRecord {
    /// The snapshot the record was derived from.
    pub snapshot: PointingSnapshot,
    /// Instantaneous validity derived by the evaluator for this tick.
    pub data_valid: bool,
}

impl PointingRecord {
    /// Build a record from a snapshot and its validity flag.
    pub fn new(snapshot: &PointingSnapshot, data_valid: bool) -> Self {
        Self {
            snapshot: snapshot.clone(),
            data_valid,
        }
    }

    /// Record timestamp in nanoseconds since the Unix epoch, taken from the
    /// snapshot's instrument clock.
    pub fn timestamp_nanos(&self) -> Option<i64> {
        mjd_to_unix_nanos(self.snapshot.mjd)
    }

    /// Encode as one InfluxDB line-protocol point.
    ///
    /// Returns `None` when the instrument timestamp is not representable;
    /// such a record cannot be written meaningfully.
    pub fn to_line_protocol(&self, measurement: &str) -> Option<String> {
        let timestamp = self.timestamp_nanos()?;

        let mut fields = vec![
            format!("sig_source={}", self.snapshot.sig_source),
            format!("receiver_enabled={}", self.snapshot.receiver_enabled),
            format!("rf_center_freq={}", self.snapshot.rf_center_freq_mhz),
            format!("mjd={}", self.snapshot.mjd),
        ];
        for (beam, pointing) in self.snapshot.beams.iter().enumerate() {
            fields.push(format!("ra{beam}={}", pointing.ra_deg));
            fields.push(format!("dec{beam}={}", pointing.dec_deg));
        }
        fields.push(format!(
            "data_valid={}",
            if self.data_valid { 1.0 } else { 0.0 }
        ));

        Some(format!("{measurement} {} {timestamp}", fields.join(",")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{BeamPointing, NUM_BEAMS};

    fn test_snapshot() -> PointingSnapshot {
        let mut beams = [BeamPointing::default(); NUM_BEAMS];
        beams[0] = BeamPointing {
            ra_deg: 83.5,
            dec_deg: 22.25,
        };
        PointingSnapshot {
            sig_source: 1.0,
            receiver_enabled: 1.0,
            rf_center_freq_mhz: 1420.25,
            mjd: 58_849.0,
            beams,
        }
    }

    #[test]
    fn test_timestamp_from_instrument_clock() {
        let record = PointingRecord::new(&test_snapshot(), true);
        // MJD 58849 = 2020-01-01T00:00:00Z
        assert_eq!(record.timestamp_nanos(), Some(1_577_836_800_000_000_000));
    }

    #[test]
    fn test_line_protocol_layout() {
        let record = PointingRecord::new(&test_snapshot(), true);
        let line = record.to_line_protocol("telescope").unwrap();

        assert!(line.starts_with("telescope sig_source=1,"));
        assert!(line.contains("rf_center_freq=1420.25"));
        assert!(line.contains("ra0=83.5,dec0=22.25"));
        assert!(line.contains(&format!("ra{0}=0,dec{0}=0", NUM_BEAMS - 1)));
        assert!(line.contains("data_valid=1"));
        assert!(line.ends_with(" 1577836800000000000"));
    }

    #[test]
    fn test_line_protocol_invalid_flag() {
        let record = PointingRecord::new(&test_snapshot(), false);
        let line = record.to_line_protocol("telescope").unwrap();
        assert!(line.contains("data_valid=0"));
    }

    #[test]
    fn test_line_protocol_unrepresentable_timestamp() {
        let mut snapshot = test_snapshot();
        snapshot.mjd = f64::NAN;
        let record = PointingRecord::new(&snapshot, true);
        assert!(record.to_line_protocol("telescope").is_none());
    }
}
