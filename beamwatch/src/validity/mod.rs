//! The validity-debounce decision engine.
//!
//! Turns noisy per-sample telemetry into a stable start/stop decision in two
//! stages:
//!
//! 1. [`ValidityEvaluator`] derives an instantaneous boolean from one
//!    snapshot: correct signal routing, receiver enabled, and an RF center
//!    frequency unchanged since the previous sample.
//! 2. [`DebounceWindow`] requires a full window of consecutive valid samples
//!    before confirming, and clears on the first invalid sample — slow to
//!    start an expensive recording, instant to stop it.

mod debounce;
mod evaluator;

pub use debounce::DebounceWindow;
pub use evaluator::{FlagExpectations, ValidityEvaluator};
