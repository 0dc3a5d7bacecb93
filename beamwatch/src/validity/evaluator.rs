//! Instantaneous validity derivation.

use crate::telemetry::PointingSnapshot;
use tracing::debug;

/// Expected values of the two routing flags.
///
/// The telemetry convention for these flags is not consistent across
/// deployments: one hardware revision reports the recorded signal source as
/// `1.0`, another as `0.0` for what appears to be the same routing state.
/// Rather than hard-code one reading, both expected values are deployment
/// configuration (`[controller] expected_sig_source` /
/// `expected_receiver_enabled`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlagExpectations {
    /// Value of the signal-source flag that means "routed for recording".
    pub sig_source: f64,
    /// Value of the receiver-enabled flag that means "enabled".
    pub receiver_enabled: f64,
}

impl Default for FlagExpectations {
    fn default() -> Self {
        Self {
            sig_source: 1.0,
            receiver_enabled: 1.0,
        }
    }
}

/// Derives the instantaneous validity flag from one snapshot.
///
/// A sample is valid when the signal source is routed for recording, the
/// receiver is enabled, and the RF center frequency equals the previous
/// sample's frequency. The frequency comparison is deliberately exact: any
/// retune, however small, invalidates the sample.
///
/// The evaluator owns the last-observed frequency so the cross-tick state is
/// explicit and testable rather than ambient. The first sample after
/// construction is always invalid (there is nothing to compare against), but
/// still establishes the reference frequency.
#[derive(Debug)]
pub struct ValidityEvaluator {
    expectations: FlagExpectations,
    last_frequency: Option<f64>,
}

impl ValidityEvaluator {
    /// Create an evaluator with no frequency history.
    pub fn new(expectations: FlagExpectations) -> Self {
        Self {
            expectations,
            last_frequency: None,
        }
    }

    /// Evaluate one snapshot, updating the reference frequency.
    ///
    /// The reference frequency is updated on every call regardless of the
    /// outcome, so a retune costs exactly one invalid sample.
    pub fn evaluate(&mut self, snapshot: &PointingSnapshot) -> bool {
        let frequency_stable = match self.last_frequency {
            Some(previous) => snapshot.rf_center_freq_mhz == previous,
            None => false,
        };
        self.last_frequency = Some(snapshot.rf_center_freq_mhz);

        let routed = snapshot.sig_source == self.expectations.sig_source;
        let enabled = snapshot.receiver_enabled == self.expectations.receiver_enabled;
        let valid = routed && enabled && frequency_stable;

        debug!(
            routed,
            enabled, frequency_stable, valid, "evaluated pointing sample"
        );
        valid
    }

    /// The frequency the next sample will be compared against.
    pub fn last_frequency(&self) -> Option<f64> {
        self.last_frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::{BeamPointing, NUM_BEAMS};

    fn snapshot(sig_source: f64, receiver_enabled: f64, freq: f64) -> PointingSnapshot {
        PointingSnapshot {
            sig_source,
            receiver_enabled,
            rf_center_freq_mhz: freq,
            mjd: 58_849.0,
            beams: [BeamPointing::default(); NUM_BEAMS],
        }
    }

    #[test]
    fn test_first_sample_is_invalid() {
        let mut evaluator = ValidityEvaluator::new(FlagExpectations::default());
        assert!(!evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0)));
        assert_eq!(evaluator.last_frequency(), Some(1420.0));
    }

    #[test]
    fn test_stable_flags_and_frequency_are_valid() {
        let mut evaluator = ValidityEvaluator::new(FlagExpectations::default());
        evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0));
        assert!(evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0)));
    }

    #[test]
    fn test_frequency_drift_invalidates() {
        let mut evaluator = ValidityEvaluator::new(FlagExpectations::default());
        evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0));
        assert!(!evaluator.evaluate(&snapshot(1.0, 1.0, 1420.1)));
        // The drifted frequency becomes the new reference.
        assert!(evaluator.evaluate(&snapshot(1.0, 1.0, 1420.1)));
    }

    #[test]
    fn test_wrong_sig_source_invalidates() {
        let mut evaluator = ValidityEvaluator::new(FlagExpectations::default());
        evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0));
        assert!(!evaluator.evaluate(&snapshot(0.0, 1.0, 1420.0)));
    }

    #[test]
    fn test_disabled_receiver_invalidates() {
        let mut evaluator = ValidityEvaluator::new(FlagExpectations::default());
        evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0));
        assert!(!evaluator.evaluate(&snapshot(1.0, 0.0, 1420.0)));
    }

    #[test]
    fn test_inverted_polarity_expectations() {
        let expectations = FlagExpectations {
            sig_source: 0.0,
            receiver_enabled: 1.0,
        };
        let mut evaluator = ValidityEvaluator::new(expectations);
        evaluator.evaluate(&snapshot(0.0, 1.0, 1420.0));
        assert!(evaluator.evaluate(&snapshot(0.0, 1.0, 1420.0)));
        assert!(!evaluator.evaluate(&snapshot(1.0, 1.0, 1420.0)));
    }
}
