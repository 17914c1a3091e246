//! Signal value-range derivation
//!
//! Maps a signal descriptor to the (low, high) domain used for value
//! generation. Declared DBC bounds are trusted as-is; without them the
//! range falls back to what the signal's bit-width can represent.

use crate::schema::{SignalSpec, ValueType};

/// Compute the generation range for a signal.
///
/// Declared (min, max) bounds take precedence over bit-width derivation
/// regardless of type, and are not validated against the bit-width.
/// Otherwise, for bit length L: signed signals span
/// [-2^(L-1), 2^(L-1) - 1] and unsigned signals span [0, 2^L - 1].
/// The float flag does not alter the derivation; it only affects sampling.
pub fn value_range(signal: &SignalSpec) -> (f64, f64) {
    if let Some((min, max)) = signal.bounds {
        return (min, max);
    }

    let bits = signal.length as i32;
    match signal.value_type {
        ValueType::Signed => (-(2f64.powi(bits - 1)), 2f64.powi(bits - 1) - 1.0),
        ValueType::Unsigned => (0.0, 2f64.powi(bits) - 1.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ByteOrder;

    fn signal(length: u16, value_type: ValueType, bounds: Option<(f64, f64)>) -> SignalSpec {
        SignalSpec {
            name: "TestSignal".to_string(),
            start_bit: 0,
            length,
            byte_order: ByteOrder::LittleEndian,
            value_type,
            is_float: false,
            factor: 1.0,
            offset: 0.0,
            bounds,
            unit: None,
        }
    }

    #[test]
    fn test_declared_bounds_returned_exactly() {
        let sig = signal(12, ValueType::Signed, Some((-40.0, 120.0)));
        assert_eq!(value_range(&sig), (-40.0, 120.0));
    }

    #[test]
    fn test_declared_bounds_trusted_even_when_wider_than_bit_width() {
        // Bounds are authoritative; no validation against the 4-bit field
        let sig = signal(4, ValueType::Unsigned, Some((0.0, 100000.0)));
        assert_eq!(value_range(&sig), (0.0, 100000.0));
    }

    #[test]
    fn test_derived_unsigned() {
        assert_eq!(
            value_range(&signal(8, ValueType::Unsigned, None)),
            (0.0, 255.0)
        );
        assert_eq!(
            value_range(&signal(16, ValueType::Unsigned, None)),
            (0.0, 65535.0)
        );
        assert_eq!(value_range(&signal(1, ValueType::Unsigned, None)), (0.0, 1.0));
    }

    #[test]
    fn test_derived_signed() {
        assert_eq!(
            value_range(&signal(8, ValueType::Signed, None)),
            (-128.0, 127.0)
        );
        assert_eq!(
            value_range(&signal(12, ValueType::Signed, None)),
            (-2048.0, 2047.0)
        );
    }

    #[test]
    fn test_float_flag_does_not_alter_derivation() {
        let mut sig = signal(32, ValueType::Unsigned, None);
        sig.is_float = true;
        assert_eq!(value_range(&sig), (0.0, 2f64.powi(32) - 1.0));
    }
}
