//! Point-in-time pointing snapshot.
//!
//! An immutable record of the named scalar readings the controller needs,
//! all taken from the same telemetry round trip.

use crate::time::mjd_to_datetime;
use chrono::{DateTime, Utc};
use std::fmt;

/// Number of independently steerable beams on the receiver.
pub const NUM_BEAMS: usize = 7;

/// Sky position of one beam at the snapshot instant.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeamPointing {
    /// Right ascension in decimal degrees.
    pub ra_deg: f64,
    /// Declination in decimal degrees.
    pub dec_deg: f64,
}

/// A point-in-time snapshot of the pointing telemetry.
///
/// Created fresh each scheduler tick from one batched store read, evaluated,
/// written to the metrics sink, and then dropped. All values are reported by
/// the instrument; the snapshot itself performs no derivation.
#[derive(Clone, Debug, PartialEq)]
pub struct PointingSnapshot {
    /// Signal-source routing flag as reported by the IF chain.
    ///
    /// The value that means "routed to the receiver we record from" differs
    /// between hardware revisions; see
    /// [`FlagExpectations`](crate::validity::FlagExpectations).
    pub sig_source: f64,

    /// Receiver-enabled flag as reported by the IF chain.
    pub receiver_enabled: f64,

    /// RF center frequency in MHz.
    pub rf_center_freq_mhz: f64,

    /// Instrument timestamp as a Modified Julian Date (fractional days).
    pub mjd: f64,

    /// Per-beam sky positions.
    pub beams: [BeamPointing; NUM_BEAMS],
}

impl PointingSnapshot {
    /// Instrument timestamp as a UTC datetime.
    ///
    /// Returns `None` when the MJD field is not a representable time.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        mjd_to_datetime(self.mjd)
    }
}

impl fmt::Display for PointingSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mjd={:.6} sig_source={} receiver_enabled={} rf={:.3} MHz beam0=({:.4}, {:.4})",
            self.mjd,
            self.sig_source,
            self.receiver_enabled,
            self.rf_center_freq_mhz,
            self.beams[0].ra_deg,
            self.beams[0].dec_deg,
        )
    }
}
