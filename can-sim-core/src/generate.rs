//! Random signal value sampling
//!
//! Produces one value per signal per tick, always inside the range the
//! range calculator derived. The RNG is injected so tests can substitute
//! a seeded source for reproducible runs.

use crate::schema::SignalSpec;
use crate::types::{Result, SignalValue, SimError};
use rand::Rng;

/// Safety margin applied to the upper bound of float signals.
///
/// Keeps sampled values away from an exclusive upper bound that the
/// encoder could reject after floating-point re-quantization. The exact
/// factor is preserved from the original emulator.
pub const FLOAT_HIGH_MARGIN: f64 = 0.9999;

/// Sample one value for a signal within the given (low, high) range.
///
/// Float signals are drawn uniformly from [low, high * 0.9999]; integer
/// signals are drawn uniformly from the inclusive range
/// [floor(low), floor(high)]. Malformed bounds (low > high, possible with
/// conflicting declared min/max) fail fast rather than clamping.
pub fn sample_value<R: Rng>(
    signal: &SignalSpec,
    (low, high): (f64, f64),
    rng: &mut R,
) -> Result<SignalValue> {
    if low > high {
        return Err(SimError::InvalidRange {
            signal: signal.name.clone(),
            low,
            high,
        });
    }

    if signal.is_float {
        // A degenerate range (low == high) would invert once the margin is
        // applied; keep the interval non-empty.
        let margin_high = (high * FLOAT_HIGH_MARGIN).max(low);
        Ok(SignalValue::Float(rng.gen_range(low..=margin_high)))
    } else {
        // The f64 -> i64 cast saturates: a derived 64-bit unsigned range
        // (high = 2^64 - 1) tops out at i64::MAX, the widest value
        // SignalValue::Integer can carry.
        let lo = low.floor() as i64;
        let hi = high.floor() as i64;
        Ok(SignalValue::Integer(rng.gen_range(lo..=hi)))
    }
}
