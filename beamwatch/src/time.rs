//! Time-related utility functions.
//!
//! The pointing telemetry timestamps samples with a Modified Julian Date
//! (a fractional day count kept by the instrument clock). Everything the
//! controller writes downstream is stamped with that instrument time, not
//! wall-clock arrival time, so the conversions live in one place here.

use chrono::{DateTime, Utc};

/// MJD of the Unix epoch (1970-01-01T00:00:00Z).
pub const MJD_UNIX_EPOCH: f64 = 40_587.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a Modified Julian Date to nanoseconds since the Unix epoch.
///
/// Returns `None` when the MJD is not finite or falls outside the range
/// representable as `i64` nanoseconds (roughly year 1678 to 2262).
pub fn mjd_to_unix_nanos(mjd: f64) -> Option<i64> {
    if !mjd.is_finite() {
        return None;
    }

    let nanos = (mjd - MJD_UNIX_EPOCH) * SECONDS_PER_DAY * 1e9;
    if nanos >= i64::MIN as f64 && nanos <= i64::MAX as f64 {
        Some(nanos as i64)
    } else {
        None
    }
}

/// Convert a Modified Julian Date to a UTC datetime.
///
/// Returns `None` under the same conditions as [`mjd_to_unix_nanos`].
pub fn mjd_to_datetime(mjd: f64) -> Option<DateTime<Utc>> {
    mjd_to_unix_nanos(mjd).map(DateTime::from_timestamp_nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mjd_unix_epoch_is_zero_nanos() {
        assert_eq!(mjd_to_unix_nanos(MJD_UNIX_EPOCH), Some(0));
    }

    #[test]
    fn mjd_known_date() {
        // MJD 58849 = 2020-01-01T00:00:00Z
        let dt = mjd_to_datetime(58_849.0).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-01-01T00:00:00+00:00");
    }

    #[test]
    fn mjd_fractional_day() {
        // Half a day past MJD 58849 is noon UTC.
        let dt = mjd_to_datetime(58_849.5).unwrap();
        assert_eq!(dt.to_rfc3339(), "2020-01-01T12:00:00+00:00");
    }

    #[test]
    fn mjd_non_finite_is_none() {
        assert_eq!(mjd_to_unix_nanos(f64::NAN), None);
        assert_eq!(mjd_to_unix_nanos(f64::INFINITY), None);
    }

    #[test]
    fn mjd_out_of_range_is_none() {
        assert_eq!(mjd_to_unix_nanos(1e12), None);
        assert_eq!(mjd_to_unix_nanos(-1e12), None);
    }
}
