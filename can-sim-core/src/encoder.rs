//! Message Encoding Engine
//!
//! Packs a complete signal-value set into a message's binary payload based
//! on the signal definitions from the schema. Handles physical-to-raw
//! quantization, bit insertion, endianness, two's complement, and IEEE-754
//! float fields.

use crate::schema::{ByteOrder, MessageSpec, SignalSpec, ValueType};
use crate::types::{Frame, Result, SignalValue, SignalValueSet, SimError};

/// Message encoder - packs signal values into CAN frames
pub struct MessageEncoder;

impl MessageEncoder {
    /// Encode a signal-value set into a Frame.
    ///
    /// The value set must contain exactly one entry per declared signal
    /// (matched by name). Fails without producing a partial frame when a
    /// signal is missing, a value does not fit its packed width, or a
    /// signal's bit span exceeds the message's payload size.
    pub fn encode(message: &MessageSpec, values: &SignalValueSet) -> Result<Frame> {
        let mut data = vec![0u8; message.size];

        for signal in &message.signals {
            let value = values.get(&signal.name).ok_or_else(|| SimError::Encoding {
                message: message.name.clone(),
                cause: format!("missing value for signal '{}'", signal.name),
            })?;

            let span_end = signal.start_bit as usize + signal.length as usize;
            if span_end > message.size * 8 {
                return Err(SimError::Encoding {
                    message: message.name.clone(),
                    cause: format!(
                        "signal '{}' ends at bit {} but payload is {} bytes",
                        signal.name, span_end, message.size
                    ),
                });
            }

            let bits = Self::quantize(&message.name, signal, *value)?;

            match signal.byte_order {
                ByteOrder::LittleEndian => Self::insert_little_endian(
                    &mut data,
                    signal.start_bit as usize,
                    signal.length as usize,
                    bits,
                ),
                ByteOrder::BigEndian => Self::insert_big_endian(
                    &mut data,
                    signal.start_bit as usize,
                    signal.length as usize,
                    bits,
                ),
            }
        }

        Ok(Frame {
            can_id: message.id,
            is_extended: message.is_extended,
            data,
        })
    }

    /// Convert a physical value into the raw bit pattern for one signal.
    ///
    /// Applies the DBC scaling (raw = (physical - offset) / factor), then
    /// range-checks against the signal's packed width. Integer raws are
    /// stored two's complement; float raws are stored as IEEE-754 bits.
    fn quantize(message: &str, signal: &SignalSpec, value: SignalValue) -> Result<u64> {
        let raw = (value.as_f64() - signal.offset) / signal.factor;

        if signal.is_float {
            return match signal.length {
                32 => Ok((raw as f32).to_bits() as u64),
                64 => Ok(raw.to_bits()),
                n => Err(SimError::Encoding {
                    message: message.to_string(),
                    cause: format!("float signal '{}' has unsupported length {}", signal.name, n),
                }),
            };
        }

        let raw = raw.round();
        if !raw.is_finite() {
            return Err(SimError::Encoding {
                message: message.to_string(),
                cause: format!("non-finite raw value for signal '{}'", signal.name),
            });
        }

        // i128 holds the full raw domain of any <=64-bit field
        let raw = raw as i128;
        let length = signal.length as u32;
        let in_range = match signal.value_type {
            ValueType::Unsigned => raw >= 0 && (raw as u128) <= Self::unsigned_max(length),
            ValueType::Signed => {
                let max = (1i128 << (length - 1)) - 1;
                let min = -(1i128 << (length - 1));
                raw >= min && raw <= max
            }
        };
        if !in_range {
            return Err(SimError::Encoding {
                message: message.to_string(),
                cause: format!(
                    "raw value {} does not fit signal '{}' ({} bits, {:?})",
                    raw, signal.name, signal.length, signal.value_type
                ),
            });
        }

        Ok(raw as u64 & Self::bit_mask(length))
    }

    fn unsigned_max(length: u32) -> u128 {
        (1u128 << length) - 1
    }

    fn bit_mask(length: u32) -> u64 {
        if length >= 64 {
            u64::MAX
        } else {
            (1u64 << length) - 1
        }
    }

    /// Insert signal bits with little-endian (Intel) byte order
    ///
    /// Little-endian format:
    /// - Start bit points to the LSB (least significant bit)
    /// - Bits are numbered from LSB to MSB within each byte
    /// - Byte 0 is the first byte in the CAN frame
    fn insert_little_endian(data: &mut [u8], start_bit: usize, length: usize, bits: u64) {
        for i in 0..length {
            let bit_value = ((bits >> i) & 0x01) as u8;
            let bit_pos = start_bit + i;
            let byte_idx = bit_pos / 8;
            let bit_in_byte = bit_pos % 8;

            if byte_idx < data.len() {
                data[byte_idx] |= bit_value << bit_in_byte;
            }
        }
    }

    /// Insert signal bits with big-endian (Motorola) byte order
    ///
    /// Big-endian format in CAN:
    /// - Start bit points to the MSB (most significant bit) of the signal
    /// - Bit numbering: bit 0 = MSB of byte 0, bit 7 = LSB of byte 0
    /// - Signal grows downward (towards higher bit numbers)
    fn insert_big_endian(data: &mut [u8], start_bit: usize, length: usize, bits: u64) {
        for i in 0..length {
            let bit_value = ((bits >> (length - 1 - i)) & 0x01) as u8;
            let bit_pos = start_bit + i;
            let byte_idx = bit_pos / 8;
            let bit_in_byte = 7 - (bit_pos % 8); // Bit 0 = MSB, bit 7 = LSB

            if byte_idx < data.len() {
                data[byte_idx] |= bit_value << bit_in_byte;
            }
        }
    }
}
