//! DBC file loader
//!
//! Parses Vector DBC files and converts them into the simulator's message
//! and signal descriptors.

use crate::schema::database::{ByteOrder, MessageSpec, Schema, SignalSpec, ValueType};
use crate::types::{Result, SimError};
use std::collections::HashMap;
use std::path::Path;

/// Extended-frame marker bit in a raw DBC message ID
const DBC_EXTENDED_FLAG: u32 = 0x8000_0000;
/// Mask selecting the 29-bit identifier from a raw DBC message ID
const DBC_ID_MASK: u32 = 0x1FFF_FFFF;

/// Parse a DBC file and return the loaded schema
pub fn load_dbc(path: &Path) -> Result<Schema> {
    log::info!("Parsing DBC file: {:?}", path);

    // Read the DBC file as bytes first (handle non-UTF8 encodings)
    let bytes = std::fs::read(path)
        .map_err(|e| SimError::DbcParse(format!("Failed to read file {:?}: {}", path, e)))?;

    // Try UTF-8 first, then fallback to Latin-1/Windows-1252 encoding
    let dbc_content = String::from_utf8(bytes.clone()).unwrap_or_else(|_| {
        log::warn!("DBC file is not UTF-8, trying Latin-1 encoding");
        bytes.iter().map(|&b| b as char).collect()
    });

    // Parse using can-dbc crate
    let dbc = can_dbc::DBC::from_slice(dbc_content.as_bytes())
        .map_err(|e| SimError::DbcParse(format!("Failed to parse DBC file {:?}: {:?}", path, e)))?;

    // SIG_VALTYPE_ entries mark signals whose raw field is an IEEE float
    let float_signals = collect_float_signals(&dbc);

    let mut schema = Schema::new();
    for dbc_msg in dbc.messages() {
        schema.add_message(convert_message(dbc_msg, &float_signals));
    }

    let stats = schema.stats();
    log::info!(
        "Parsed {} messages ({} signals) from {:?}",
        stats.num_messages,
        stats.num_signals,
        path
    );

    Ok(schema)
}

/// Build a lookup of (raw message ID, signal name) -> float flag
fn collect_float_signals(dbc: &can_dbc::DBC) -> HashMap<(u32, String), bool> {
    let mut floats = HashMap::new();
    for entry in dbc.signal_extended_value_type_list() {
        let is_float = matches!(
            entry.signal_extended_value_type(),
            can_dbc::SignalExtendedValueType::IEEEfloat32Bit
                | can_dbc::SignalExtendedValueType::IEEEdouble64bit
        );
        floats.insert(
            (entry.message_id().0, entry.signal_name().clone()),
            is_float,
        );
    }
    floats
}

/// Convert a can-dbc message to our MessageSpec
fn convert_message(
    dbc_msg: &can_dbc::Message,
    float_signals: &HashMap<(u32, String), bool>,
) -> MessageSpec {
    let raw_id = dbc_msg.message_id().0; // Extract raw ID from MessageId tuple struct

    let signals = dbc_msg
        .signals()
        .iter()
        .map(|sig| convert_signal(sig, raw_id, float_signals))
        .collect();

    MessageSpec {
        id: raw_id & DBC_ID_MASK,
        is_extended: raw_id & DBC_EXTENDED_FLAG != 0,
        name: dbc_msg.message_name().to_string(),
        size: *dbc_msg.message_size() as usize,
        sender: match dbc_msg.transmitter() {
            can_dbc::Transmitter::NodeName(name) => Some(name.to_string()),
            _ => None,
        },
        signals,
    }
}

/// Convert a can-dbc signal to our SignalSpec
fn convert_signal(
    dbc_sig: &can_dbc::Signal,
    raw_msg_id: u32,
    float_signals: &HashMap<(u32, String), bool>,
) -> SignalSpec {
    let byte_order = match *dbc_sig.byte_order() {
        can_dbc::ByteOrder::LittleEndian => ByteOrder::LittleEndian,
        can_dbc::ByteOrder::BigEndian => ByteOrder::BigEndian,
    };

    let value_type = match *dbc_sig.value_type() {
        can_dbc::ValueType::Signed => ValueType::Signed,
        can_dbc::ValueType::Unsigned => ValueType::Unsigned,
    };

    let is_float = float_signals
        .get(&(raw_msg_id, dbc_sig.name().clone()))
        .copied()
        .unwrap_or(false);

    let min = *dbc_sig.min();
    let max = *dbc_sig.max();
    // A DBC range of [0|0] means "no range given"
    let bounds = if min == 0.0 && max == 0.0 {
        None
    } else {
        Some((min, max))
    };

    SignalSpec {
        name: dbc_sig.name().to_string(),
        start_bit: *dbc_sig.start_bit() as u16,
        length: *dbc_sig.signal_size() as u16,
        byte_order,
        value_type,
        is_float,
        factor: *dbc_sig.factor(),
        offset: *dbc_sig.offset(),
        bounds,
        unit: if dbc_sig.unit().is_empty() {
            None
        } else {
            Some(dbc_sig.unit().to_string())
        },
    }
}
