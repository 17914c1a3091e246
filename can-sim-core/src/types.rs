//! Core types for the CAN traffic simulator library
//!
//! Defines the frame type handed to the bus adapter, the per-tick signal
//! value representation, and the library error taxonomy. Frames and value
//! sets are ephemeral: built inside one loop iteration, discarded after
//! encode/send.

use std::collections::HashMap;
use std::fmt;

/// Result type for simulator operations
pub type Result<T> = std::result::Result<T, SimError>;

/// One tick's worth of generated values, keyed by signal name.
///
/// Built fresh for every transmission attempt and never reused across
/// ticks; a failed encode abandons the set rather than retrying it.
pub type SignalValueSet = HashMap<String, SignalValue>;

/// An encoded CAN frame ready for transmission
///
/// Identifier and extended flag are copied from the source message; the
/// payload length is fixed by the message's declared byte size.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// CAN message ID (11-bit standard or 29-bit extended)
    pub can_id: u32,
    /// True if this is an extended (29-bit) CAN ID
    pub is_extended: bool,
    /// Payload bytes, laid out per the message's signal definitions
    pub data: Vec<u8>,
}

impl Frame {
    /// Get the data length code (DLC) - number of payload bytes
    pub fn dlc(&self) -> usize {
        self.data.len()
    }
}

/// Errors that can occur while simulating traffic
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Failed to parse DBC file: {0}")]
    DbcParse(String),

    #[error("Failed to open bus channel '{channel}': {cause}")]
    BusOpen { channel: String, cause: String },

    #[error("Encoding failed for message '{message}': {cause}")]
    Encoding { message: String, cause: String },

    #[error("Bus send failed: {0}")]
    Send(String),

    #[error("Invalid value range for signal '{signal}': min {low} > max {high}")]
    InvalidRange {
        signal: String,
        low: f64,
        high: f64,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A generated signal value in the signal's physical domain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalValue {
    /// Integer value (signed or unsigned signals)
    Integer(i64),
    /// Floating-point value (float-flagged signals)
    Float(f64),
}

impl fmt::Display for SignalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalValue::Integer(v) => write!(f, "{}", v),
            SignalValue::Float(v) => write!(f, "{:.3}", v),
        }
    }
}

impl SignalValue {
    /// Convert to f64, the domain the encoder quantizes from
    pub fn as_f64(&self) -> f64 {
        match self {
            SignalValue::Integer(v) => *v as f64,
            SignalValue::Float(v) => *v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_value_conversions() {
        let int_val = SignalValue::Integer(42);
        assert_eq!(int_val.as_f64(), 42.0);

        let float_val = SignalValue::Float(3.14);
        assert_eq!(float_val.as_f64(), 3.14);
    }

    #[test]
    fn test_signal_value_display() {
        assert_eq!(format!("{}", SignalValue::Integer(-7)), "-7");
        assert_eq!(format!("{}", SignalValue::Float(3.14159)), "3.142");
    }

    #[test]
    fn test_frame_dlc() {
        let frame = Frame {
            can_id: 0x100,
            is_extended: false,
            data: vec![0xAB, 0xCD],
        };
        assert_eq!(frame.dlc(), 2);
    }
}
